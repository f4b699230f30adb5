use axtable_traits::AccessibilityRole;

use super::grid::{GridBuilder, GridOutput};
use super::table_helpers::is_row_group_element;
use super::{AxId, AxNodeKind, AxTree};
use crate::BaseDocument;

/// Rectangular grid of slots. Each slot names the cell covering it, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSlots {
    slots: Vec<Vec<Option<AxId>>>,
}

impl CellSlots {
    pub fn height(&self) -> usize {
        self.slots.len()
    }

    pub fn width(&self) -> usize {
        self.slots.first().map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<AxId> {
        *self.slots.get(row)?.get(column)?
    }

    pub fn rows(&self) -> &[Vec<Option<AxId>>] {
        &self.slots
    }

    /// Stamp `cell` into a slot unless another cell got there first.
    pub(crate) fn claim(&mut self, row: usize, column: usize, cell: AxId) -> bool {
        if self.slots.len() <= row {
            self.slots.resize_with(row + 1, Vec::new);
        }
        let slots = &mut self.slots[row];
        if slots.len() <= column {
            slots.resize(column + 1, None);
        }
        if slots[column].is_some() {
            return false;
        }
        slots[column] = Some(cell);
        true
    }

    /// Pad or truncate to exactly `height` rows of `width` slots.
    pub(crate) fn normalize(&mut self, height: usize, width: usize) {
        self.slots.resize_with(height, Vec::new);
        for row in &mut self.slots {
            row.resize(width, None);
        }
    }

    fn clear_where(&mut self, mut is_stale: impl FnMut(AxId) -> bool) {
        for slot in self.slots.iter_mut().flatten() {
            if slot.is_some_and(&mut is_stale) {
                *slot = None;
            }
        }
    }
}

/// Table state kept on every object that is a table.
///
/// Everything but `is_exposable` and the header container is rebuilt from scratch the next
/// time it is read after being marked dirty.
#[derive(Debug, Clone)]
pub struct TableModel {
    pub(crate) is_exposable: bool,
    pub(crate) dirty: bool,
    pub(crate) is_building: bool,
    pub(crate) rows: Vec<AxId>,
    pub(crate) columns: Vec<AxId>,
    pub(crate) header_container: Option<AxId>,
    pub(crate) caption: Option<AxId>,
    pub(crate) cell_slots: CellSlots,
}

impl TableModel {
    pub(crate) fn new(is_exposable: bool) -> Self {
        Self {
            is_exposable,
            dirty: true,
            is_building: false,
            rows: Vec::new(),
            columns: Vec::new(),
            header_container: None,
            caption: None,
            cell_slots: CellSlots::default(),
        }
    }

    pub fn is_exposable(&self) -> bool {
        self.is_exposable
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn rows(&self) -> &[AxId] {
        &self.rows
    }

    pub fn columns(&self) -> &[AxId] {
        &self.columns
    }

    pub fn caption(&self) -> Option<AxId> {
        self.caption
    }

    pub fn cell_slots(&self) -> &CellSlots {
        &self.cell_slots
    }
}

impl AxTree {
    fn model(&self, table: AxId) -> Option<&TableModel> {
        self.object_for_id(table)?.table_model()
    }

    fn model_mut(&mut self, table: AxId) -> Option<&mut TableModel> {
        self.node_mut(table)?.table.as_mut()
    }

    /// Rebuild the table's grid if it is dirty. Returns `false` when `table` is not a
    /// table.
    pub(crate) fn update_table_if_necessary(&mut self, doc: &BaseDocument, table: AxId) -> bool {
        let Some(model) = self.model(table) else {
            return false;
        };
        if !model.dirty {
            return true;
        }
        if model.is_building {
            #[cfg(feature = "tracing")]
            tracing::warn!("Table {:?} queried while its grid is being built", table);
            return true;
        }
        self.rebuild_table(doc, table);
        true
    }

    fn rebuild_table(&mut self, doc: &BaseDocument, table: AxId) {
        let Some(model) = self.model_mut(table) else {
            return;
        };
        model.dirty = false;
        model.is_building = true;
        model.rows.clear();
        model.caption = None;
        model.cell_slots = CellSlots::default();
        let exposable = model.is_exposable;
        let stale_columns = std::mem::take(&mut model.columns);
        for column in stale_columns {
            self.nodes.remove(&column);
        }

        let output = if exposable {
            GridBuilder::new(self, doc, table)
                .map(GridBuilder::build)
                .unwrap_or_default()
        } else {
            GridOutput::default()
        };

        let columns: Vec<AxId> = (0..output.width)
            .map(|index| self.create_synthetic(AxNodeKind::Column { table, index }, table))
            .collect();
        let rows = output.rows.clone();

        if let Some(model) = self.model_mut(table) {
            model.rows = output.rows;
            model.caption = output.caption;
            model.cell_slots = output.cell_slots;
            model.columns = columns;
            model.is_building = false;
        }

        self.update_row_descendant_roles(doc, &rows);
    }

    /// Mark the table's grid stale. The next read rebuilds it.
    pub fn set_cell_slots_dirty(&mut self, table: AxId) {
        if let Some(model) = self.model_mut(table) {
            model.dirty = true;
        }
    }

    /// Re-run the classifier and, when the verdict flips, update the roles that depend
    /// on it. A table that becomes exposed has its grid rebuilt right away.
    pub fn recompute_is_exposable_if_necessary(&mut self, doc: &BaseDocument, table: AxId) {
        if !self.update_table_if_necessary(doc, table) {
            return;
        }
        let previous = self.is_exposable_table(table);
        let exposable = self.compute_is_table_exposable(doc, table);
        if previous == exposable {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Table {:?} is now {}",
            table,
            if exposable { "exposed" } else { "a layout table" }
        );

        let mut stale_rows = Vec::new();
        if let Some(model) = self.model_mut(table) {
            model.is_exposable = exposable;
            model.dirty = true;
            stale_rows = model.rows.clone();
        }
        self.update_role(doc, table);
        self.update_row_descendant_roles(doc, &stale_rows);
        if exposable {
            // Rows and cells take their table roles now rather than on the next query
            self.update_table_if_necessary(doc, table);
        }
    }

    /// The up to date table state, or `None` when `table` is not a table.
    pub fn table_model(&mut self, doc: &BaseDocument, table: AxId) -> Option<&TableModel> {
        if !self.update_table_if_necessary(doc, table) {
            return None;
        }
        self.model(table)
    }

    fn is_live(&self, id: AxId) -> bool {
        self.object_for_id(id).is_some()
    }

    pub fn rows(&mut self, doc: &BaseDocument, table: AxId) -> Vec<AxId> {
        let rows = self
            .table_model(doc, table)
            .map(|model| model.rows.clone())
            .unwrap_or_default();
        rows.into_iter().filter(|row| self.is_live(*row)).collect()
    }

    pub fn columns(&mut self, doc: &BaseDocument, table: AxId) -> Vec<AxId> {
        self.table_model(doc, table)
            .map(|model| model.columns.clone())
            .unwrap_or_default()
    }

    pub fn row_count(&mut self, doc: &BaseDocument, table: AxId) -> usize {
        self.rows(doc, table).len()
    }

    pub fn column_count(&mut self, doc: &BaseDocument, table: AxId) -> usize {
        self.table_model(doc, table).map_or(0, |model| model.columns.len())
    }

    pub fn caption(&mut self, doc: &BaseDocument, table: AxId) -> Option<AxId> {
        self.table_model(doc, table)?
            .caption
            .filter(|caption| self.is_live(*caption))
    }

    /// Every cell of every row, in row order.
    pub fn cells(&mut self, doc: &BaseDocument, table: AxId) -> Vec<AxId> {
        let mut cells = Vec::new();
        for row in self.rows(doc, table) {
            for child in self.unignored_children(doc, row) {
                if self.is_table_cell(doc, child) {
                    cells.push(child);
                }
            }
        }
        cells
    }

    /// The slot grid. Slots whose cell has since been destroyed read as empty.
    pub fn cell_slots(&mut self, doc: &BaseDocument, table: AxId) -> CellSlots {
        let Some(model) = self.table_model(doc, table) else {
            return CellSlots::default();
        };
        let mut slots = model.cell_slots.clone();
        slots.clear_where(|cell| !self.is_live(cell));
        slots
    }

    pub fn cell_at(
        &mut self,
        doc: &BaseDocument,
        table: AxId,
        row: usize,
        column: usize,
    ) -> Option<AxId> {
        self.table_model(doc, table)?
            .cell_slots
            .get(row, column)
            .filter(|cell| self.is_live(*cell))
    }

    /// The exposed table a cell belongs to, with its grid brought up to date.
    fn table_with_fresh_indexes(&mut self, doc: &BaseDocument, cell: AxId) -> Option<AxId> {
        if !self.is_table_cell(doc, cell) {
            return None;
        }
        let table = self.parent_table(doc, cell)?;
        self.update_table_if_necessary(doc, table);
        self.is_exposable_table(table).then_some(table)
    }

    /// `(first row, number of rows)` covered by a cell.
    pub fn row_index_range(&mut self, doc: &BaseDocument, cell: AxId) -> Option<(usize, usize)> {
        self.table_with_fresh_indexes(doc, cell)?;
        let data = self.cell_data(cell)?;
        Some((data.row_index, data.effective_row_span))
    }

    /// `(first column, number of columns)` covered by a cell.
    pub fn column_index_range(&mut self, doc: &BaseDocument, cell: AxId) -> Option<(usize, usize)> {
        self.table_with_fresh_indexes(doc, cell)?;
        let data = self.cell_data(cell)?;
        Some((data.column_index, self.col_span(doc, cell)))
    }

    /// Synthetic object grouping the table's column headers, created on first use.
    pub fn header_container(&mut self, doc: &BaseDocument, table: AxId) -> Option<AxId> {
        let model = self.table_model(doc, table)?;
        if !model.is_exposable {
            return None;
        }
        if let Some(container) = model.header_container.filter(|id| self.is_live(*id)) {
            return Some(container);
        }

        let container = self.create_synthetic(AxNodeKind::HeaderContainer { table }, table);
        if let Some(model) = self.model_mut(table) {
            model.header_container = Some(container);
        }
        Some(container)
    }

    /// Distinct cells of one column, top to bottom.
    pub(crate) fn column_cells(&mut self, doc: &BaseDocument, table: AxId, column: usize) -> Vec<AxId> {
        let slots = self.cell_slots(doc, table);
        let mut cells: Vec<AxId> = Vec::new();
        for row in slots.rows() {
            if let Some(cell) = row.get(column).copied().flatten() {
                if !cells.contains(&cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    pub(crate) fn table_children(&mut self, doc: &BaseDocument, table: AxId) -> Vec<AxId> {
        let mut children = Vec::new();
        if let Some(caption) = self.caption(doc, table) {
            if !self.is_ignored(caption) {
                children.push(caption);
            }
        }
        children.extend(self.rows(doc, table));
        children.extend(self.columns(doc, table));
        children.extend(self.header_container(doc, table));
        children
    }

    /// The first column header of each column.
    pub fn column_headers(&mut self, doc: &BaseDocument, table: AxId) -> Vec<AxId> {
        let column_count = self.column_count(doc, table);
        let mut headers = Vec::new();
        for column in 0..column_count {
            let header = self
                .column_cells(doc, table, column)
                .into_iter()
                .find(|cell| self.is_column_header(doc, *cell));
            if let Some(header) = header {
                if !headers.contains(&header) {
                    headers.push(header);
                }
            }
        }
        headers
    }

    pub fn is_column_header(&mut self, doc: &BaseDocument, cell: AxId) -> bool {
        if self.table_with_fresh_indexes(doc, cell).is_none() {
            return false;
        }
        self.role(cell) == AccessibilityRole::ColumnHeader
            || self.is_column_header_by_markup(doc, cell)
    }

    pub fn is_row_header(&mut self, doc: &BaseDocument, cell: AxId) -> bool {
        if self.table_with_fresh_indexes(doc, cell).is_none() {
            return false;
        }
        self.role(cell) == AccessibilityRole::RowHeader || self.is_row_header_by_markup(doc, cell)
    }

    /// A row's header: its first cell, when that is a `<th>` and the row is not made of
    /// `<th>` cells only.
    pub fn row_header(&mut self, doc: &BaseDocument, row: AxId) -> Option<AxId> {
        if !self.is_table_row(doc, row) {
            return None;
        }
        let cells: Vec<AxId> = self
            .unignored_children(doc, row)
            .into_iter()
            .filter(|child| self.is_table_cell(doc, *child))
            .collect();
        let is_th: Vec<bool> = cells
            .iter()
            .map(|cell| {
                self.dom_node(*cell)
                    .and_then(|dom_id| doc.get_node(dom_id))
                    .is_some_and(|node| node.is_element_named("th"))
            })
            .collect();

        let first = *cells.first()?;
        if is_th.first() != Some(&true) {
            return None;
        }
        is_th.contains(&false).then_some(first)
    }

    /// Row headers of a table (one per row that has one), of a row, or of a cell.
    ///
    /// For a cell these are the header cells to its left in the same row.
    pub fn row_headers(&mut self, doc: &BaseDocument, id: AxId) -> Vec<AxId> {
        if self.object_for_id(id).is_some_and(|object| object.is_table()) {
            return self
                .rows(doc, id)
                .into_iter()
                .filter_map(|row| self.row_header(doc, row))
                .collect();
        }
        if self.is_table_row(doc, id) {
            return self.row_header(doc, id).into_iter().collect();
        }

        let Some(table) = self.table_with_fresh_indexes(doc, id) else {
            return Vec::new();
        };
        let Some((row, _)) = self.row_index_range(doc, id) else {
            return Vec::new();
        };
        let Some((column, _)) = self.column_index_range(doc, id) else {
            return Vec::new();
        };
        let row_group = self.row_group_of(doc, id);

        let mut headers = Vec::new();
        for x in 0..column {
            let Some(candidate) = self.cell_at(doc, table, row, x) else {
                continue;
            };
            if candidate == id || headers.contains(&candidate) {
                continue;
            }
            let scope = self
                .dom_node(candidate)
                .and_then(|dom_id| doc.get_node(dom_id)?.attr("scope"))
                .map(|scope| scope.trim().to_ascii_lowercase());
            if scope.as_deref() == Some("rowgroup") && row_group == self.row_group_of(doc, candidate) {
                headers.push(candidate);
            } else if self.is_row_header(doc, candidate) {
                headers.push(candidate);
            }
        }
        headers
    }

    /// Nearest `thead`/`tbody`/`tfoot`/`role="rowgroup"` ancestor of a cell.
    fn row_group_of(&self, doc: &BaseDocument, cell: AxId) -> Option<usize> {
        let dom_id = self.dom_node(cell)?;
        doc.ancestors(dom_id).find(|ancestor| {
            doc.get_node(*ancestor)
                .and_then(|node| node.element_data())
                .is_some_and(is_row_group_element)
        })
    }

    /// `aria-rowcount` when it is `-1` or at least the number of rows, `0` otherwise.
    pub fn ax_row_count(&mut self, doc: &BaseDocument, table: AxId) -> i32 {
        let actual = self.row_count(doc, table);
        self.declared_count(doc, table, "aria-rowcount", actual)
    }

    /// `aria-colcount` when it is `-1` or at least the number of columns, `0` otherwise.
    pub fn ax_column_count(&mut self, doc: &BaseDocument, table: AxId) -> i32 {
        let actual = self.column_count(doc, table);
        self.declared_count(doc, table, "aria-colcount", actual)
    }

    fn declared_count(&self, doc: &BaseDocument, table: AxId, attr: &str, actual: usize) -> i32 {
        if !self.object_for_id(table).is_some_and(|object| object.is_table()) {
            return 0;
        }
        let declared = self
            .dom_node(table)
            .and_then(|dom_id| doc.get_node(dom_id)?.element_data())
            .map_or(0, |element| element.integral_attr(attr));
        if declared == -1 {
            return declared;
        }
        match usize::try_from(declared) {
            Ok(value) if value >= actual => declared,
            _ => 0,
        }
    }

    fn positive_attr(&self, doc: &BaseDocument, id: AxId, attr: &str) -> Option<usize> {
        let value = self
            .dom_node(id)
            .and_then(|dom_id| doc.get_node(dom_id)?.element_data())
            .map(|element| element.integral_attr(attr))?;
        usize::try_from(value).ok().filter(|value| *value >= 1)
    }

    /// `aria-rowindex` of a row or cell; cells fall back to their row's.
    pub fn ax_row_index(&mut self, doc: &BaseDocument, id: AxId) -> Option<usize> {
        if let Some(index) = self.positive_attr(doc, id, "aria-rowindex") {
            return Some(index);
        }
        if self.is_table_cell(doc, id) {
            let row = self.parent_row(doc, id)?;
            return self.positive_attr(doc, row, "aria-rowindex");
        }
        None
    }

    /// `aria-colindex` of a cell, or the index derived from its row's `aria-colindex`.
    pub fn ax_column_index(&mut self, doc: &BaseDocument, id: AxId) -> Option<usize> {
        if let Some(index) = self.positive_attr(doc, id, "aria-colindex") {
            return Some(index);
        }
        if self.is_table_cell(doc, id) {
            self.table_with_fresh_indexes(doc, id)?;
            return self.cell_data(id)?.ax_col_index_from_row;
        }
        None
    }

    pub fn ax_row_index_text(&mut self, doc: &BaseDocument, id: AxId) -> Option<String> {
        if let Some(own) = self.non_empty_attr(doc, id, "aria-rowindextext") {
            return Some(own);
        }
        if self.is_table_cell(doc, id) {
            let row = self.parent_row(doc, id)?;
            return self.non_empty_attr(doc, row, "aria-rowindextext");
        }
        None
    }

    pub fn ax_column_index_text(&self, doc: &BaseDocument, id: AxId) -> Option<String> {
        self.non_empty_attr(doc, id, "aria-colindextext")
    }

    fn non_empty_attr(&self, doc: &BaseDocument, id: AxId, attr: &str) -> Option<String> {
        self.dom_node(id)
            .and_then(|dom_id| doc.get_node(dom_id)?.attr(attr))
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }

    /// `aria-level` of a treegrid row, `0` when absent.
    fn hierarchical_level(&self, doc: &BaseDocument, row: AxId) -> usize {
        self.positive_attr(doc, row, "aria-level").unwrap_or(0)
    }

    /// The tree grid this row belongs to and the row's position in it.
    fn tree_grid_position(&mut self, doc: &BaseDocument, row: AxId) -> Option<(Vec<AxId>, usize)> {
        if !self.is_table_row(doc, row) {
            return None;
        }
        let table = self.parent_table(doc, row)?;
        if self.role(table) != AccessibilityRole::TreeGrid {
            return None;
        }
        let rows = self.rows(doc, table);
        let index = rows.iter().position(|candidate| *candidate == row)?;
        Some((rows, index))
    }

    /// The rows directly below a treegrid row that sit exactly one level deeper.
    pub fn disclosed_rows(&mut self, doc: &BaseDocument, row: AxId) -> Vec<AxId> {
        let Some((rows, index)) = self.tree_grid_position(doc, row) else {
            return Vec::new();
        };
        let level = self.hierarchical_level(doc, row);
        rows[index + 1..]
            .iter()
            .copied()
            .take_while(|candidate| self.hierarchical_level(doc, *candidate) == level + 1)
            .collect()
    }

    /// The nearest earlier treegrid row one level up.
    pub fn disclosed_by_row(&mut self, doc: &BaseDocument, row: AxId) -> Option<AxId> {
        let (rows, index) = self.tree_grid_position(doc, row)?;
        let level = self.hierarchical_level(doc, row);
        if level <= 1 {
            return None;
        }
        rows[..index]
            .iter()
            .rev()
            .copied()
            .find(|candidate| self.hierarchical_level(doc, *candidate) == level - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccessibilityConfig;

    #[test]
    fn claim_keeps_the_first_cell() {
        let mut slots = CellSlots::default();
        assert!(slots.claim(1, 2, AxId(7)));
        assert!(!slots.claim(1, 2, AxId(8)));
        assert_eq!(slots.get(1, 2), Some(AxId(7)));
        assert_eq!(slots.get(0, 0), None);

        slots.normalize(2, 4);
        assert_eq!(slots.height(), 2);
        assert_eq!(slots.width(), 4);
        assert!(slots.rows().iter().all(|row| row.len() == 4));
    }

    #[test]
    fn queries_during_a_build_do_not_rebuild() {
        let mut doc = BaseDocument::new();
        let mut mutr = doc.mutate();
        let table = mutr.append_element(0, "table", &[("role", "grid")]).unwrap();
        let row = mutr.append_element(table, "tr", &[]).unwrap();
        mutr.append_element(row, "td", &[]).unwrap();
        drop(mutr);

        let mut tree = AxTree::new(AccessibilityConfig::for_testing());
        let table = tree.get_or_create(&doc, table).unwrap();
        assert_eq!(tree.row_count(&doc, table), 1);

        tree.set_cell_slots_dirty(table);
        tree.model_mut(table).unwrap().is_building = true;
        // Stale but stable
        assert_eq!(tree.row_count(&doc, table), 1);
        assert!(tree.model(table).unwrap().is_dirty());

        tree.model_mut(table).unwrap().is_building = false;
        assert_eq!(tree.row_count(&doc, table), 1);
        assert!(!tree.model(table).unwrap().is_dirty());
    }
}
