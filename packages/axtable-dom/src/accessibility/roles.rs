//! Role resolution and the table relationships it depends on.

use axtable_traits::{AccessibilityRole, Display};

use super::table_helpers::{
    has_cell_aria_role, has_row_role, is_table_cell_element, is_table_row_element,
};
use super::{AxId, AxNodeKind, AxTree};
use crate::BaseDocument;

/// The node or one of its ancestors is `display: none` or `aria-hidden="true"`.
pub(crate) fn is_hidden(doc: &BaseDocument, node_id: usize) -> bool {
    std::iter::once(node_id)
        .chain(doc.ancestors(node_id))
        .filter_map(|id| doc.get_node(id))
        .filter(|node| node.is_element())
        .any(|node| {
            node.style.display == Display::None
                || node
                    .attr("aria-hidden")
                    .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
        })
}

/// `<th>`, or a `<td>` directly inside a row of a `<thead>`.
fn is_table_header_cell(doc: &BaseDocument, node_id: usize) -> bool {
    let Some(node) = doc.get_node(node_id) else {
        return false;
    };
    if node.is_element_named("th") {
        return true;
    }
    node.is_element_named("td")
        && node
            .parent
            .and_then(|row| doc.get_node(row)?.parent)
            .and_then(|section| doc.get_node(section))
            .is_some_and(|section| section.is_element_named("thead"))
}

fn scope(doc: &BaseDocument, node_id: usize) -> Option<String> {
    doc.get_node(node_id)?
        .attr("scope")
        .map(|value| value.trim().to_ascii_lowercase())
}

impl AxTree {
    pub(crate) fn update_role(&mut self, doc: &BaseDocument, id: AxId) {
        let role = self.compute_role(doc, id);
        if let Some(node) = self.node_mut(id) {
            node.role = role;
        }
    }

    fn compute_role(&mut self, doc: &BaseDocument, id: AxId) -> AccessibilityRole {
        let Some(object) = self.object_for_id(id) else {
            return AccessibilityRole::Unknown;
        };
        let aria_role = object.aria_role;
        let table = object.table_model().map(|model| model.is_exposable());
        let dom_id = match object.kind {
            AxNodeKind::Column { .. } => return AccessibilityRole::Column,
            AxNodeKind::HeaderContainer { .. } => return AccessibilityRole::TableHeaderContainer,
            AxNodeKind::Dom(dom_id) => dom_id,
        };

        let Some(node) = doc.get_node(dom_id) else {
            return AccessibilityRole::Ignored;
        };
        if dom_id == BaseDocument::ROOT_NODE_ID {
            return AccessibilityRole::Generic;
        }
        if is_hidden(doc, dom_id) {
            return AccessibilityRole::Ignored;
        }
        if node.is_text_node() {
            return if node.text_content().trim().is_empty() {
                AccessibilityRole::Ignored
            } else {
                AccessibilityRole::StaticText
            };
        }
        let Some(element) = node.element_data() else {
            return AccessibilityRole::Ignored;
        };

        if let Some(role) = aria_role {
            return role;
        }
        if let Some(exposable) = table {
            return if exposable {
                AccessibilityRole::Table
            } else {
                AccessibilityRole::Generic
            };
        }
        if is_table_row_element(doc, dom_id) {
            return if self.is_exposed_table_row(doc, id) {
                AccessibilityRole::Row
            } else {
                AccessibilityRole::Generic
            };
        }
        if is_table_cell_element(doc, dom_id) {
            return self.cell_role(doc, id);
        }

        match element.name.as_str() {
            "thead" | "tbody" | "tfoot" => AccessibilityRole::RowGroup,
            "caption" => AccessibilityRole::Caption,
            "col" | "colgroup" => AccessibilityRole::Ignored,
            _ => AccessibilityRole::Generic,
        }
    }

    fn cell_role(&mut self, doc: &BaseDocument, id: AxId) -> AccessibilityRole {
        let Some(table) = self.parent_table(doc, id) else {
            return AccessibilityRole::Generic;
        };
        if !self.is_exposable_table(table) {
            return AccessibilityRole::Generic;
        }
        if self.is_column_header_by_markup(doc, id) {
            AccessibilityRole::ColumnHeader
        } else if self.is_row_header_by_markup(doc, id) {
            AccessibilityRole::RowHeader
        } else if self.role(table).is_grid() {
            AccessibilityRole::GridCell
        } else {
            AccessibilityRole::Cell
        }
    }

    pub fn is_table_row(&self, doc: &BaseDocument, id: AxId) -> bool {
        self.dom_node(id)
            .is_some_and(|dom_id| is_table_row_element(doc, dom_id))
    }

    pub fn is_table_cell(&self, doc: &BaseDocument, id: AxId) -> bool {
        self.dom_node(id)
            .is_some_and(|dom_id| is_table_cell_element(doc, dom_id))
    }

    /// A row made with `role="row"` rather than `<tr>`.
    pub fn is_aria_grid_row(&self, doc: &BaseDocument, id: AxId) -> bool {
        self.dom_node(id)
            .and_then(|dom_id| doc.get_node(dom_id)?.element_data())
            .is_some_and(|element| has_row_role(element) && !element.is("tr"))
    }

    /// A cell made with a cell role rather than `<td>`/`<th>`.
    pub fn is_aria_grid_cell(&self, doc: &BaseDocument, id: AxId) -> bool {
        self.dom_node(id)
            .and_then(|dom_id| doc.get_node(dom_id)?.element_data())
            .is_some_and(|element| {
                has_cell_aria_role(element) && !element.is("td") && !element.is("th")
            })
    }

    pub fn is_exposable_table(&self, id: AxId) -> bool {
        self.object_for_id(id)
            .and_then(|object| object.table_model())
            .is_some_and(|model| model.is_exposable())
    }

    pub fn is_exposed_table_row(&mut self, doc: &BaseDocument, id: AxId) -> bool {
        self.is_table_row(doc, id) && self.parent_table(doc, id).is_some()
    }

    pub fn is_exposed_table_cell(&mut self, doc: &BaseDocument, id: AxId) -> bool {
        self.is_table_cell(doc, id)
            && self
                .parent_table(doc, id)
                .is_some_and(|table| self.is_exposable_table(table))
    }

    /// The table a row or cell belongs to.
    ///
    /// Rows only report an exposed table. Cells made with ARIA roles look for the nearest
    /// exposed, unignored table; other cells report their nearest table ancestor.
    pub fn parent_table(&mut self, doc: &BaseDocument, id: AxId) -> Option<AxId> {
        let dom_id = self.dom_node(id)?;

        if self.is_aria_grid_cell(doc, id) {
            for ancestor in doc.ancestors(dom_id) {
                let Some(candidate) = self.get_or_create(doc, ancestor) else {
                    continue;
                };
                if self.is_exposable_table(candidate) && !self.is_ignored(candidate) {
                    return Some(candidate);
                }
            }
            return None;
        }

        if self.is_table_cell(doc, id) {
            for ancestor in doc.ancestors(dom_id) {
                let Some(candidate) = self.get_or_create(doc, ancestor) else {
                    continue;
                };
                if self.object_for_id(candidate).is_some_and(|object| object.is_table()) {
                    return Some(candidate);
                }
            }
            return None;
        }

        if self.is_table_row(doc, id) {
            let is_aria_row = self.is_aria_grid_row(doc, id);
            for ancestor in doc.ancestors(dom_id) {
                let Some(candidate) = self.get_or_create(doc, ancestor) else {
                    continue;
                };
                if !self.object_for_id(candidate).is_some_and(|object| object.is_table()) {
                    continue;
                }
                // An ARIA row inside an HTML table only belongs to it when the table has
                // an ARIA role too
                let compatible = !is_aria_row
                    || self.is_aria_table(candidate)
                    || doc.get_node(dom_id).is_some_and(|node| node.is_element_named("tr"));
                if compatible && self.is_exposable_table(candidate) {
                    return Some(candidate);
                }
                if !is_aria_row {
                    break;
                }
            }
        }

        None
    }

    /// The row a cell sits in.
    pub fn parent_row(&mut self, doc: &BaseDocument, id: AxId) -> Option<AxId> {
        let dom_id = self.dom_node(id)?;
        if !self.is_table_cell(doc, id) {
            return None;
        }
        let row = doc
            .ancestors(dom_id)
            .take_while(|ancestor| {
                doc.get_node(*ancestor)
                    .is_some_and(|node| !node.is_element_named("table"))
            })
            .find(|ancestor| is_table_row_element(doc, *ancestor))?;
        self.get_or_create(doc, row)
    }

    /// Header markup as seen during role computation. Reads the indices stored by the
    /// last grid build and never rebuilds.
    pub(crate) fn is_column_header_by_markup(&self, doc: &BaseDocument, id: AxId) -> bool {
        let Some(dom_id) = self.dom_node(id) else {
            return false;
        };
        match scope(doc, dom_id).as_deref() {
            Some("col" | "colgroup") => return true,
            Some("row" | "rowgroup") => return false,
            _ => {}
        }
        if !is_table_header_cell(doc, dom_id) {
            return false;
        }

        let row_index = self.cell_data(id).map_or(0, |data| data.row_index);
        for ancestor in doc.ancestors(dom_id) {
            let Some(node) = doc.get_node(ancestor) else {
                continue;
            };
            match node.local_name() {
                Some("thead") => return true,
                Some("tfoot") => return false,
                Some("table" | "tbody") => return row_index == 0,
                _ => {}
            }
        }
        false
    }

    pub(crate) fn is_row_header_by_markup(&self, doc: &BaseDocument, id: AxId) -> bool {
        let Some(dom_id) = self.dom_node(id) else {
            return false;
        };
        match scope(doc, dom_id).as_deref() {
            Some("row" | "rowgroup") => return true,
            Some("col" | "colgroup") => return false,
            _ => {}
        }
        if !is_table_header_cell(doc, dom_id) {
            return false;
        }

        let column_index = self.cell_data(id).map_or(0, |data| data.column_index);
        for ancestor in doc.ancestors(dom_id) {
            let Some(node) = doc.get_node(ancestor) else {
                continue;
            };
            match node.local_name() {
                Some("thead") => return false,
                Some("tfoot" | "tbody" | "table") => return column_index == 0,
                _ => {}
            }
        }
        false
    }

    /// Recompute the roles of a table's rows and their cells once the grid has placed
    /// them.
    pub(crate) fn update_row_descendant_roles(&mut self, doc: &BaseDocument, rows: &[AxId]) {
        for &row in rows {
            self.update_role(doc, row);
            for child in self.unignored_children(doc, row) {
                if self.is_table_cell(doc, child) {
                    self.update_role(doc, child);
                }
            }
        }
    }
}
