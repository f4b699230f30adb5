use accesskit::{Node as AccessKitNode, NodeId, Role, Tree, TreeUpdate};
use axtable_traits::AccessibilityRole;

use super::{AxId, AxNodeKind, AxTree};
use crate::BaseDocument;

fn node_id(id: AxId) -> NodeId {
    NodeId(id.0)
}

fn accesskit_role(role: AccessibilityRole) -> Role {
    match role {
        AccessibilityRole::Table => Role::Table,
        AccessibilityRole::Grid => Role::Grid,
        AccessibilityRole::TreeGrid => Role::TreeGrid,
        AccessibilityRole::Caption => Role::Caption,
        AccessibilityRole::RowGroup => Role::RowGroup,
        AccessibilityRole::Row => Role::Row,
        AccessibilityRole::Cell | AccessibilityRole::GridCell => Role::Cell,
        AccessibilityRole::ColumnHeader => Role::ColumnHeader,
        AccessibilityRole::RowHeader => Role::RowHeader,
        AccessibilityRole::StaticText => Role::Label,
        AccessibilityRole::Group => Role::Group,
        // accesskit has no column or header container roles
        AccessibilityRole::Column
        | AccessibilityRole::TableHeaderContainer
        | AccessibilityRole::Generic => Role::GenericContainer,
        AccessibilityRole::Unknown | AccessibilityRole::Ignored | AccessibilityRole::Presentation => {
            Role::Unknown
        }
    }
}

impl AxTree {
    /// Export an exposed table as an accesskit tree rooted at the table.
    ///
    /// Rows own their cells; columns and the header container are emitted without
    /// children so that every cell keeps a single parent.
    pub fn build_table_tree_update(&mut self, doc: &BaseDocument, table: AxId) -> Option<TreeUpdate> {
        if !self.is_exposable_table(table) {
            return None;
        }

        let mut nodes = Vec::new();
        let children = self.children(doc, table);

        let mut root = self.build_accesskit_node(doc, table);
        root.set_row_count(self.row_count(doc, table));
        root.set_column_count(self.column_count(doc, table));
        root.set_children(children.iter().copied().map(node_id).collect::<Vec<_>>());
        nodes.push((node_id(table), root));

        for child in children {
            let mut node = self.build_accesskit_node(doc, child);
            match self.object_for_id(child).map(|object| object.kind()) {
                Some(AxNodeKind::Column { index, .. }) => {
                    node.set_column_index(index);
                }
                Some(AxNodeKind::HeaderContainer { .. }) => {}
                Some(AxNodeKind::Dom(_)) if self.is_table_row(doc, child) => {
                    if let Some(data) = self.cell_data(child) {
                        node.set_row_index(data.row_index);
                    }
                    let cells: Vec<AxId> = self
                        .unignored_children(doc, child)
                        .into_iter()
                        .filter(|cell| self.is_table_cell(doc, *cell))
                        .collect();
                    node.set_children(cells.iter().copied().map(node_id).collect::<Vec<_>>());
                    for cell in cells {
                        let cell_node = self.build_cell_node(doc, cell);
                        nodes.push((node_id(cell), cell_node));
                    }
                }
                _ => {}
            }
            nodes.push((node_id(child), node));
        }

        Some(TreeUpdate {
            nodes,
            tree: Some(Tree::new(node_id(table))),
            focus: node_id(table),
        })
    }

    fn build_accesskit_node(&self, doc: &BaseDocument, id: AxId) -> AccessKitNode {
        let mut node = AccessKitNode::new(accesskit_role(self.role(id)));
        if let Some(dom_node) = self.dom_node(id).and_then(|dom_id| doc.get_node(dom_id)) {
            if let Some(name) = dom_node.local_name() {
                node.set_html_tag(name);
            }
        }
        node
    }

    fn build_cell_node(&mut self, doc: &BaseDocument, cell: AxId) -> AccessKitNode {
        let mut node = self.build_accesskit_node(doc, cell);
        if let Some((row, row_span)) = self.row_index_range(doc, cell) {
            node.set_row_index(row);
            node.set_row_span(row_span);
        }
        if let Some((column, column_span)) = self.column_index_range(doc, cell) {
            node.set_column_index(column);
            node.set_column_span(column_span);
        }
        let label = self.text_content(doc, cell);
        if !label.is_empty() {
            node.set_label(label);
        }
        node
    }

    /// Concatenated text of the DOM subtree behind an object.
    fn text_content(&self, doc: &BaseDocument, id: AxId) -> String {
        let Some(root) = self.dom_node(id) else {
            return String::new();
        };
        crate::traversal::TreeTraverser::new_with_root(doc, root)
            .filter_map(|node_id| doc.get_node(node_id))
            .filter(|node| node.is_text_node())
            .map(|node| node.text_content())
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string()
    }
}
