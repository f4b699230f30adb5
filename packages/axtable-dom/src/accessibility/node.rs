use axtable_traits::AccessibilityRole;

use super::table::TableModel;

/// Identifier of an accessible object.
///
/// Ids are handed out in increasing order and never reused, so an id that outlives its
/// object simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxId(pub u64);

/// What an accessible object stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxNodeKind {
    /// Backed by a DOM node
    Dom(usize),
    /// Synthetic column of a table
    Column { table: AxId, index: usize },
    /// Synthetic aggregator of a table's column headers
    HeaderContainer { table: AxId },
}

/// Per-row and per-cell placement data, written by the grid builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCellData {
    pub row_index: usize,
    pub column_index: usize,
    /// Number of grid rows the cell actually covers, which can be smaller than its
    /// declared `rowspan` when the row group ends early.
    pub effective_row_span: usize,
    /// `aria-colindex` of the parent row plus the cell's position among its siblings
    pub ax_col_index_from_row: Option<usize>,
}

impl Default for TableCellData {
    fn default() -> Self {
        Self {
            row_index: 0,
            column_index: 0,
            effective_row_span: 1,
            ax_col_index_from_row: None,
        }
    }
}

#[derive(Debug)]
pub struct AxNode {
    pub(crate) id: AxId,
    pub(crate) kind: AxNodeKind,
    pub(crate) role: AccessibilityRole,
    /// Role parsed from the `role` attribute, if any token was recognised
    pub(crate) aria_role: Option<AccessibilityRole>,
    pub(crate) parent: Option<AxId>,
    pub(crate) cell: TableCellData,
    /// Present on every object that is a table, exposed or not
    pub(crate) table: Option<TableModel>,
}

impl AxNode {
    pub(crate) fn new(id: AxId, kind: AxNodeKind) -> Self {
        Self {
            id,
            kind,
            role: AccessibilityRole::Unknown,
            aria_role: None,
            parent: None,
            cell: TableCellData::default(),
            table: None,
        }
    }

    pub fn id(&self) -> AxId {
        self.id
    }

    pub fn kind(&self) -> AxNodeKind {
        self.kind
    }

    pub fn role(&self) -> AccessibilityRole {
        self.role
    }

    pub fn aria_role(&self) -> Option<AccessibilityRole> {
        self.aria_role
    }

    /// The DOM node behind this object, `None` for synthetic objects.
    pub fn dom_node(&self) -> Option<usize> {
        match self.kind {
            AxNodeKind::Dom(node_id) => Some(node_id),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<AxId> {
        self.parent
    }

    pub fn cell_data(&self) -> &TableCellData {
        &self.cell
    }

    pub fn is_ignored(&self) -> bool {
        self.role.is_ignored()
    }

    pub fn is_table(&self) -> bool {
        self.table.is_some()
    }

    pub fn table_model(&self) -> Option<&TableModel> {
        self.table.as_ref()
    }
}
