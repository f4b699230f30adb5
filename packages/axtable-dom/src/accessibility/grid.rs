//! Placement of rows and cells into a table's slot grid.
//!
//! Follows the HTML "forming a table" algorithm: rows are processed group by group, cells
//! take the first free slot of the current row, and cells with a `rowspan` keep growing
//! downwards until their span runs out or their row group ends. ARIA tables get the same
//! treatment, except that rows may sit inside arbitrary wrapper elements.

use std::collections::HashSet;

use axtable_traits::AccessibilityRole;

use super::table::CellSlots;
use super::table_helpers::is_row_group_element;
use super::{AxId, AxTree};
use crate::BaseDocument;

/// A cell whose row span still reaches into rows below the current one.
#[derive(Debug, Clone, Copy)]
struct DownwardGrowingCell {
    cell: AxId,
    x: usize,
    col_span: usize,
    remaining_rows: usize,
}

#[derive(Debug, Default)]
pub(crate) struct GridOutput {
    pub rows: Vec<AxId>,
    pub caption: Option<AxId>,
    pub cell_slots: CellSlots,
    pub width: usize,
}

pub(crate) struct GridBuilder<'a> {
    tree: &'a mut AxTree,
    doc: &'a BaseDocument,
    table: AxId,
    table_dom: usize,
    is_aria_table: bool,

    slots: CellSlots,
    x_width: usize,
    y_height: usize,
    y_current: usize,
    pending_tfoot: Vec<usize>,
    downward_growing_cells: Vec<DownwardGrowingCell>,
    processed_rows: HashSet<AxId>,
    rows: Vec<AxId>,
    caption: Option<AxId>,
    within_implicit_row_group: bool,
}

impl<'a> GridBuilder<'a> {
    pub fn new(tree: &'a mut AxTree, doc: &'a BaseDocument, table: AxId) -> Option<Self> {
        let table_dom = tree.dom_node(table)?;
        let is_aria_table = tree.is_aria_table(table);
        Some(Self {
            tree,
            doc,
            table,
            table_dom,
            is_aria_table,
            slots: CellSlots::default(),
            x_width: 0,
            y_height: 0,
            y_current: 0,
            pending_tfoot: Vec::new(),
            downward_growing_cells: Vec::new(),
            processed_rows: HashSet::new(),
            rows: Vec::new(),
            caption: None,
            within_implicit_row_group: false,
        })
    }

    pub fn build(mut self) -> GridOutput {
        let is_html_table = self
            .doc
            .get_node(self.table_dom)
            .is_some_and(|node| node.is_element_named("table"));
        if !is_html_table && !self.is_aria_table {
            return GridOutput::default();
        }

        for child in self.doc.element_children(self.table_dom) {
            self.process_table_descendant(child);
        }

        if self.within_implicit_row_group {
            self.end_row_group();
            self.within_implicit_row_group = false;
        }

        // Footers go last regardless of where they appear
        for tfoot in std::mem::take(&mut self.pending_tfoot) {
            self.process_row_group(tfoot);
        }

        self.slots.normalize(self.y_height, self.x_width);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Built {}x{} grid for table {:?}",
            self.y_height,
            self.x_width,
            self.table
        );

        GridOutput {
            rows: self.rows,
            caption: self.caption,
            cell_slots: self.slots,
            width: self.x_width,
        }
    }

    fn process_table_descendant(&mut self, node_id: usize) {
        let Some(element) = self.doc.get_node(node_id).and_then(|node| node.element_data()) else {
            return;
        };

        if element.is("caption") {
            if self.caption.is_none() {
                self.caption = self.tree.get_or_create(self.doc, node_id);
            }
            return;
        }

        let is_row = element.is("tr") || element.has_role_token("row");
        let is_row_group = !is_row && is_row_group_element(element);
        let is_tfoot = element.is("tfoot");

        // Consecutive rows outside any section share one implicit group. Other children
        // of an HTML table neither start nor end a group.
        if is_row_group {
            if self.within_implicit_row_group {
                self.end_row_group();
            }
            self.within_implicit_row_group = false;
        } else if is_row || self.is_aria_table {
            self.within_implicit_row_group = true;
        }
        if !self.within_implicit_row_group {
            self.downward_growing_cells.clear();
        }

        if !is_row && !is_row_group {
            if self.is_aria_table {
                let Some(object) = self.tree.get_or_create(self.doc, node_id) else {
                    return;
                };
                if self.needs_to_descend(object) {
                    for child in self.doc.element_children(node_id) {
                        self.process_table_descendant(child);
                    }
                }
            }
            return;
        }

        if is_row {
            if let Some(row) = self.tree.get_or_create(self.doc, node_id) {
                self.process_row(row);
            }
        }

        if !self.within_implicit_row_group {
            self.end_row_group();
        }

        if is_tfoot {
            self.pending_tfoot.push(node_id);
            return;
        }
        if is_row_group {
            self.process_row_group(node_id);
        }
    }

    fn needs_to_descend(&self, object: AxId) -> bool {
        !self.tree.is_table_row(self.doc, object) && !self.processed_rows.contains(&object)
    }

    fn process_row_group(&mut self, section: usize) {
        let Some(element) = self.doc.get_node(section).and_then(|node| node.element_data()) else {
            return;
        };

        if matches!(element.name.as_str(), "thead" | "tbody" | "tfoot") {
            for child in self.doc.element_children(section) {
                let is_tr = self
                    .doc
                    .get_node(child)
                    .is_some_and(|node| node.is_element_named("tr"));
                if !is_tr {
                    continue;
                }
                if let Some(row) = self.tree.get_or_create(self.doc, child) {
                    if self.tree.is_table_row(self.doc, row) {
                        self.process_row(row);
                    }
                }
            }
        } else if let Some(group) = self.tree.get_or_create(self.doc, section) {
            // role="rowgroup"
            for child in self.tree.unignored_children(self.doc, group) {
                self.process_row_descending_if_needed(child);
            }
        }

        self.end_row_group();
    }

    fn process_row_descending_if_needed(&mut self, object: AxId) {
        if self.needs_to_descend(object) {
            for child in self.tree.unignored_children(self.doc, object) {
                self.process_row_descending_if_needed(child);
            }
        } else if self.tree.is_table_row(self.doc, object) {
            self.process_row(object);
        }
    }

    fn process_row(&mut self, row: AxId) {
        if !self.processed_rows.insert(row) {
            return;
        }
        let role = self.tree.role(row);
        if role == AccessibilityRole::Unknown || role.is_ignored() {
            return;
        }

        if self.y_height <= self.y_current {
            self.y_height = self.y_current + 1;
        }

        let mut x_current = 0;
        self.grow_downward_cells();

        let row_col_index = self
            .tree
            .dom_node(row)
            .and_then(|dom_id| self.doc.get_node(dom_id)?.element_data())
            .map(|element| element.integral_attr("aria-colindex"))
            .filter(|index| *index >= 1)
            .and_then(|index| usize::try_from(index).ok());

        let cells: Vec<AxId> = self
            .tree
            .unignored_children(self.doc, row)
            .into_iter()
            .filter(|child| self.tree.is_table_cell(self.doc, *child))
            .collect();

        for (position, cell) in cells.into_iter().enumerate() {
            while self.slots.get(self.y_current, x_current).is_some() {
                x_current += 1;
            }
            if x_current >= self.x_width {
                self.x_width = x_current + 1;
            }

            let col_span = self.tree.col_span(self.doc, cell);
            let row_span = self.tree.row_span(self.doc, cell);
            if self.x_width < x_current + col_span {
                self.x_width = x_current + col_span;
            }

            let y_current = self.y_current;
            if let Some(node) = self.tree.node_mut(cell) {
                node.parent = Some(row);
                node.cell.row_index = y_current;
                node.cell.column_index = x_current;
                node.cell.effective_row_span = 1;
                node.cell.ax_col_index_from_row = row_col_index.map(|index| index + position);
            }

            for x in x_current..x_current + col_span {
                self.slots.claim(y_current, x, cell);
            }

            let remaining_rows = match row_span {
                // Spans to the end of the row group
                0 => self
                    .tree
                    .config()
                    .span_limits
                    .max_rowspan
                    .saturating_sub(y_current),
                span => span - 1,
            };
            if remaining_rows > 0 {
                self.downward_growing_cells.push(DownwardGrowingCell {
                    cell,
                    x: x_current,
                    col_span,
                    remaining_rows,
                });
            }

            x_current += col_span;
        }

        let (table, y_current) = (self.table, self.y_current);
        if let Some(node) = self.tree.node_mut(row) {
            node.parent = Some(table);
            node.cell.row_index = y_current;
        }
        self.rows.push(row);
        self.y_current += 1;
    }

    /// Extend every growing cell into the current row.
    fn grow_downward_cells(&mut self) {
        let y_current = self.y_current;
        for growing in self.downward_growing_cells.iter_mut() {
            if growing.remaining_rows == 0 {
                continue;
            }
            growing.remaining_rows -= 1;
            if let Some(data) = self.tree.cell_data_mut(growing.cell) {
                data.effective_row_span += 1;
            }
            for x in growing.x..growing.x + growing.col_span {
                self.slots.claim(y_current, x, growing.cell);
            }
        }
    }

    /// Let growing cells fill the rows the group already reserved, then stop them.
    fn end_row_group(&mut self) {
        while self.y_current < self.y_height {
            self.grow_downward_cells();
            self.y_current += 1;
        }
        self.downward_growing_cells.clear();
    }
}

impl AxTree {
    /// Columns spanned by a cell: `colspan`, then `aria-colspan`, clamped to the maximum.
    pub fn col_span(&self, doc: &BaseDocument, cell: AxId) -> usize {
        if !self.is_table_cell(doc, cell) {
            return 1;
        }
        let Some(element) = self
            .dom_node(cell)
            .and_then(|dom_id| doc.get_node(dom_id)?.element_data())
        else {
            return 1;
        };
        let max = self.config().span_limits.max_colspan;

        ["colspan", "aria-colspan"]
            .into_iter()
            .filter_map(|name| element.html_integer_attr(name))
            .find(|span| *span >= 1)
            .and_then(|span| usize::try_from(span).ok())
            .map_or(1, |span| span.min(max))
    }

    /// Rows spanned by a cell. `0` means the cell spans to the end of its row group.
    pub fn row_span(&self, doc: &BaseDocument, cell: AxId) -> usize {
        if !self.is_table_cell(doc, cell) {
            return 1;
        }
        let Some(element) = self
            .dom_node(cell)
            .and_then(|dom_id| doc.get_node(dom_id)?.element_data())
        else {
            return 1;
        };
        let max = self.config().span_limits.max_rowspan;

        let declared = element
            .html_integer_attr("rowspan")
            .or_else(|| element.html_integer_attr("aria-rowspan"));
        match declared {
            Some(span) if span < 0 => 1,
            Some(span) => usize::try_from(span).map_or(1, |span| span.min(max)),
            None => 1,
        }
    }
}
