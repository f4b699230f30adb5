//! Deciding whether a node is a table, and whether a table holds data or only layout.

use std::collections::{HashMap, VecDeque};

use axtable_traits::style::{is_opaque, same_color, Color};
use axtable_traits::{AccessibilityRole, BorderEdges, Display, EmptyCells};

use super::{AxId, AxTree};
use crate::node::ElementData;
use crate::BaseDocument;

const SECTION_NAMES: [&str; 3] = ["thead", "tbody", "tfoot"];

fn is_section_name(name: &str) -> bool {
    SECTION_NAMES.contains(&name)
}

/// The element carries a cell role (`cell`, `gridcell`, `columnheader`, `rowheader`).
pub(crate) fn has_cell_aria_role(element: &ElementData) -> bool {
    element
        .role_attr()
        .and_then(AccessibilityRole::from_aria)
        .is_some_and(AccessibilityRole::is_cell_role)
}

pub(crate) fn has_row_role(element: &ElementData) -> bool {
    element.has_role_token("row")
}

/// `<tr>`, `role="row"`, or anything rendered as a table row with no other role.
pub(crate) fn is_table_row_element(doc: &BaseDocument, node_id: usize) -> bool {
    let Some(node) = doc.get_node(node_id) else {
        return false;
    };
    let Some(element) = node.element_data() else {
        return false;
    };
    if has_row_role(element) {
        return true;
    }
    if element.role_attr().is_some() {
        return false;
    }
    node.style.display == Display::TableRow || element.is("tr")
}

/// `<td>`/`<th>` without a role, a cell role, or anything rendered as a table cell.
pub(crate) fn is_table_cell_element(doc: &BaseDocument, node_id: usize) -> bool {
    let Some(node) = doc.get_node(node_id) else {
        return false;
    };
    let Some(element) = node.element_data() else {
        return false;
    };
    if has_cell_aria_role(element) {
        return true;
    }
    if (element.is("td") || element.is("th")) && element.role_attr().is_none() {
        return true;
    }
    node.style.display == Display::TableCell
}

/// `thead`, `tbody`, `tfoot` or `role="rowgroup"`
pub(crate) fn is_row_group_element(element: &ElementData) -> bool {
    is_section_name(&element.name) || element.has_role_token("rowgroup")
}

/// Structural markup on a `<table>` that only data tables use.
pub(crate) fn table_element_indicates_accessible_table(doc: &BaseDocument, table: usize) -> bool {
    let Some(element) = doc.get_node(table).and_then(|node| node.element_data()) else {
        return false;
    };
    if !element.attr_or_empty("summary").is_empty() || !element.attr_or_empty("rules").is_empty() {
        return true;
    }

    let children = doc.element_children(table);
    let first_named = |name: &str| {
        children
            .iter()
            .copied()
            .find(|child| doc.get_node(*child).is_some_and(|node| node.is_element_named(name)))
    };
    let is_rendered = |node_id: usize| {
        doc.get_node(node_id)
            .is_some_and(|node| node.rendered_style().is_some())
    };

    if first_named("thead").is_some_and(is_rendered)
        || first_named("tfoot").is_some_and(is_rendered)
        || first_named("caption").is_some()
    {
        return true;
    }

    children.iter().any(|child| {
        doc.get_node(*child)
            .is_some_and(|node| node.is_element_named("col") || node.is_element_named("colgroup"))
    })
}

#[derive(Default)]
struct CellStatistics {
    cell_count: usize,
    bordered: usize,
    background_difference: usize,
    top: usize,
    bottom: usize,
    left: usize,
    right: usize,
}

impl AxTree {
    /// Whether the object is a table at all, exposed or not.
    pub fn is_table(&self, doc: &BaseDocument, id: AxId) -> bool {
        let Some(object) = self.object_for_id(id) else {
            return false;
        };
        match object.aria_role {
            Some(role) if role.is_table_role() => return true,
            Some(_) => return false,
            None => {}
        }
        let Some(node) = object.dom_node().and_then(|dom_id| doc.get_node(dom_id)) else {
            return false;
        };
        let Some(element) = node.element_data() else {
            return false;
        };
        if element.is("table") {
            return true;
        }
        node.style.display == Display::Table && !is_section_name(&element.name)
    }

    /// The table carries an ARIA table role.
    pub fn is_aria_table(&self, id: AxId) -> bool {
        self.object_for_id(id)
            .and_then(|object| object.aria_role)
            .is_some_and(AccessibilityRole::is_table_role)
    }

    pub(crate) fn compute_is_table_exposable(&mut self, doc: &BaseDocument, id: AxId) -> bool {
        let exposable = self.is_aria_table(id) || self.is_data_table(doc, id);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Classified table {:?} as {}",
            id,
            if exposable { "data table" } else { "layout table" }
        );

        exposable
    }

    /// Whether a table without an ARIA table role holds tabular data.
    pub fn is_data_table(&mut self, doc: &BaseDocument, id: AxId) -> bool {
        let Some(object) = self.object_for_id(id) else {
            return false;
        };
        if object.aria_role.is_some_and(|role| !role.is_table_role()) {
            return false;
        }
        let Some(dom_id) = object.dom_node() else {
            return false;
        };
        let Some(element) = doc.get_node(dom_id).and_then(|node| node.element_data()) else {
            return false;
        };

        if doc.has_editable_style(dom_id) {
            return true;
        }

        // Everything below reads <table> markup
        if !element.is("table") {
            return false;
        }
        if table_element_indicates_accessible_table(doc, dom_id) {
            return true;
        }
        if self.has_rendered_section_with_non_group_role(doc, dom_id) {
            return true;
        }

        let row_count = element.integral_attr("aria-rowcount");
        let column_count = element.integral_attr("aria-colcount");
        if row_count == -1 || row_count > 0 || column_count == -1 || column_count > 0 {
            return true;
        }

        self.is_data_table_with_traversal(doc, dom_id)
    }

    fn has_rendered_section_with_non_group_role(&self, doc: &BaseDocument, table: usize) -> bool {
        doc.element_children(table).into_iter().any(|child| {
            let Some(node) = doc.get_node(child) else {
                return false;
            };
            let Some(element) = node.element_data() else {
                return false;
            };
            is_section_name(&element.name)
                && node.rendered_style().is_some()
                && element
                    .role_attr()
                    .and_then(AccessibilityRole::from_aria)
                    .is_some_and(|role| !role.is_group() && !role.is_ignored())
        })
    }

    /// A section whose object has a role other than a group role marks a layout table.
    fn table_section_indicates_accessible_table(&mut self, doc: &BaseDocument, section: usize) -> bool {
        let Some(id) = self.get_or_create(doc, section) else {
            return false;
        };
        let role = self.role(id);
        !role.is_group() && role != AccessibilityRole::Unknown && role != AccessibilityRole::Ignored
    }

    fn is_data_table_with_traversal(&mut self, doc: &BaseDocument, table: usize) -> bool {
        let heuristics = self.config().heuristics.clone();
        let Some(table_node) = doc.get_node(table) else {
            return false;
        };
        let table_background = table_node.style.background_color;
        let horizontal_spacing = table_node.style.border_spacing_horizontal;
        let vertical_spacing = table_node.style.border_spacing_vertical;

        let mut did_top_section_check = false;
        let mut top_section_indicates_layout_table =
            |tree: &mut AxTree, section: Option<usize>| -> bool {
                let Some(section) = section else {
                    return false;
                };
                if did_top_section_check {
                    return false;
                }
                did_top_section_check = true;
                tree.table_section_indicates_accessible_table(doc, section)
            };

        let mut stats = CellStatistics::default();
        let mut cell_count_for_row: HashMap<usize, usize> = HashMap::new();
        let mut row_colors: Vec<Color> = Vec::with_capacity(heuristics.zebra_sample_rows);
        let mut row_count = 0;
        let mut max_column_count = 0;

        let is_data_table_by_count = |rows: usize, columns: usize| {
            (rows >= heuristics.many_rows && columns >= heuristics.min_columns_for_many_rows)
                || (rows >= heuristics.min_rows_for_many_columns
                    && columns >= heuristics.many_columns)
        };

        let mut first_column_all_headers = true;
        let mut first_row: Option<usize> = None;
        let mut first_body: Option<usize> = None;
        let mut first_foot: Option<usize> = None;

        // Breadth-first over elements, not descending into nested tables
        let mut queue = VecDeque::from([table]);
        while let Some(parent) = queue.pop_front() {
            let mut row_is_all_header_cells = true;

            for child in doc.element_children(parent) {
                let Some(node) = doc.get_node(child) else {
                    continue;
                };
                let Some(element) = node.element_data() else {
                    continue;
                };

                match element.name.as_str() {
                    "thead" => {
                        if top_section_indicates_layout_table(&mut *self, Some(child)) {
                            return false;
                        }
                    }
                    "tbody" => {
                        first_body.get_or_insert(child);
                    }
                    "tfoot" => {
                        first_foot.get_or_insert(child);
                    }
                    "tr" => {
                        first_row.get_or_insert(child);
                        row_count += 1;
                        if is_data_table_by_count(row_count, max_column_count) {
                            return true;
                        }

                        if element.integral_attr("aria-rowindex") >= 1
                            || element.integral_attr("aria-colindex") != 0
                            || !element.attr_or_empty("aria-rowindextext").is_empty()
                            || has_row_role(element)
                        {
                            return true;
                        }

                        if row_colors.len() < heuristics.zebra_sample_rows {
                            row_colors.push(node.style.background_color);
                        }
                    }
                    "td" | "th" => {
                        stats.cell_count += 1;

                        let is_header_cell = element.is("th");
                        if !is_header_cell {
                            row_is_all_header_cells = false;
                        }
                        if let Some(row) = node.parent {
                            let count = cell_count_for_row.entry(row).or_insert_with(|| {
                                // First cell seen in this row
                                if !is_header_cell {
                                    first_column_all_headers = false;
                                }
                                0
                            });
                            *count += 1;
                            max_column_count = max_column_count.max(*count);
                            if is_data_table_by_count(row_count, max_column_count) {
                                return true;
                            }
                        }

                        if ["headers", "abbr", "axis", "scope"]
                            .iter()
                            .any(|name| !element.attr_or_empty(name).is_empty())
                            || has_cell_aria_role(element)
                        {
                            return true;
                        }

                        if element.integral_attr("aria-colindex") >= 1
                            || element.integral_attr("aria-rowindex") >= 1
                            || !element.attr_or_empty("aria-colindextext").is_empty()
                            || !element.attr_or_empty("aria-rowindextext").is_empty()
                        {
                            return true;
                        }

                        // Declared ARIA spans are not exposed, but still show intent
                        if element.integral_attr("aria-colspan") >= 1
                            || element.integral_attr("aria-rowspan") >= 1
                        {
                            return true;
                        }

                        let cell_style = &node.style;
                        if cell_style.empty_cells == EmptyCells::Hide {
                            return true;
                        }

                        if let Some(rendered) = node.rendered_style() {
                            let border = rendered.border;
                            if border.is_fully_bordered() {
                                stats.bordered += 1;
                            }
                            stats.top += usize::from(border.contains(BorderEdges::TOP));
                            stats.bottom += usize::from(border.contains(BorderEdges::BOTTOM));
                            stats.left += usize::from(border.contains(BorderEdges::LEFT));
                            stats.right += usize::from(border.contains(BorderEdges::RIGHT));
                        }

                        let cell_color = cell_style.background_color;
                        if horizontal_spacing > 0.0
                            && vertical_spacing > 0.0
                            && !same_color(table_background, cell_color)
                            && !is_opaque(cell_color)
                        {
                            stats.background_difference += 1;
                        }

                        if stats.bordered >= heuristics.good_cell_count
                            || stats.background_difference >= heuristics.good_cell_count
                        {
                            return true;
                        }
                    }
                    "table" => continue,
                    _ => {}
                }
                queue.push_back(child);
            }

            if first_row == Some(parent)
                && row_is_all_header_cells
                && cell_count_for_row.get(&parent).copied().unwrap_or(0) >= 1
                && row_count >= 2
            {
                return true;
            }
        }

        if stats.cell_count <= 1 {
            return false;
        }

        if top_section_indicates_layout_table(&mut *self, first_body)
            || top_section_indicates_layout_table(&mut *self, first_foot)
        {
            return false;
        }

        if first_column_all_headers && row_count >= 2 {
            return true;
        }

        let needed = stats.cell_count / 2;
        if stats.bordered >= needed
            || stats.top >= needed
            || stats.bottom >= needed
            || stats.left >= needed
            || stats.right >= needed
        {
            return true;
        }
        if stats.background_difference >= needed {
            return true;
        }
        if is_data_table_by_count(row_count, max_column_count) {
            return true;
        }

        is_zebra_striped(&row_colors)
    }
}

/// Sampled row backgrounds alternate, starting with the first row's color.
fn is_zebra_striped(colors: &[Color]) -> bool {
    if colors.len() <= 2 {
        return false;
    }
    let first = colors[0];
    colors.iter().enumerate().skip(1).all(|(index, color)| {
        if index % 2 == 1 {
            !same_color(*color, first)
        } else {
            same_color(*color, first)
        }
    })
}
