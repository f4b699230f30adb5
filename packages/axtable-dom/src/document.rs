use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use slab::Slab;

use crate::node::{Node, NodeData, NodeFlags};
use crate::traversal::AncestorTraverser;
use crate::DocumentMutator;

pub struct BaseDocument {
    /// ID of the document
    id: usize,

    /// A slab-backed tree of nodes
    pub nodes: Box<Slab<Node>>,

    /// Map of element id attributes to node IDs for fast lookups
    pub(crate) nodes_to_id: HashMap<String, usize>,

    /// Set of changed nodes for updating the accessibility tree
    pub(crate) changed_nodes: HashSet<usize>,
    /// Nodes dropped from the document since the last accessibility flush
    pub(crate) removed_nodes: Vec<usize>,
}

impl Default for BaseDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseDocument {
    pub const ROOT_NODE_ID: usize = 0;

    /// Create a new document holding only the root Document node
    pub fn new() -> Self {
        static ID_GENERATOR: AtomicUsize = AtomicUsize::new(1);

        let id = ID_GENERATOR.fetch_add(1, Ordering::SeqCst);
        let mut doc = Self {
            id,
            nodes: Box::new(Slab::new()),
            nodes_to_id: HashMap::new(),
            changed_nodes: HashSet::new(),
            removed_nodes: Vec::new(),
        };

        let root = doc.create_node(NodeData::Document);
        debug_assert_eq!(root, Self::ROOT_NODE_ID);
        doc.nodes[root].flags.insert(NodeFlags::IS_IN_DOCUMENT);
        doc
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn tree(&self) -> &Slab<Node> {
        &self.nodes
    }

    pub fn get_node(&self, node_id: usize) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn get_node_mut(&mut self, node_id: usize) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[Self::ROOT_NODE_ID]
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<usize> {
        self.nodes_to_id
            .get(id)
            .copied()
            .filter(|node_id| self.nodes.contains(*node_id))
    }

    pub fn mutate<'doc>(&'doc mut self) -> DocumentMutator<'doc> {
        DocumentMutator::new(self)
    }

    pub(crate) fn create_node(&mut self, data: NodeData) -> usize {
        let entry = self.nodes.vacant_entry();
        let id = entry.key();
        entry.insert(Node::new(id, data));
        id
    }

    /// The element children of a node, in tree order.
    pub fn element_children(&self, node_id: usize) -> Vec<usize> {
        let Some(node) = self.get_node(node_id) else {
            return Vec::new();
        };
        node.children
            .iter()
            .copied()
            .filter(|child| self.nodes.get(*child).is_some_and(Node::is_element))
            .collect()
    }

    pub fn ancestors(&self, node_id: usize) -> AncestorTraverser<'_> {
        AncestorTraverser::new(self, node_id)
    }

    /// Whether `node_id` is `ancestor_id` or one of its descendants
    pub fn is_inclusive_descendant_of(&self, node_id: usize, ancestor_id: usize) -> bool {
        node_id == ancestor_id || self.ancestors(node_id).any(|id| id == ancestor_id)
    }

    /// Whether the node sits inside an editable region (`contenteditable`).
    pub fn has_editable_style(&self, node_id: usize) -> bool {
        std::iter::once(node_id)
            .chain(self.ancestors(node_id))
            .filter_map(|id| self.get_node(id)?.attr("contenteditable"))
            .map(|value| value.trim().to_ascii_lowercase())
            .find_map(|value| match value.as_str() {
                "" | "true" | "plaintext-only" => Some(true),
                "false" => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Nodes that changed since the last call, sorted by id.
    pub fn take_changed_nodes(&mut self) -> Vec<usize> {
        let mut changed: Vec<usize> = self.changed_nodes.drain().collect();
        changed.sort_unstable();
        changed
    }

    pub fn take_removed_nodes(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.removed_nodes)
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.changed_nodes.is_empty() || !self.removed_nodes.is_empty()
    }

    pub fn print_tree(&self) {
        self.print_subtree(Self::ROOT_NODE_ID, 0);
    }

    fn print_subtree(&self, node_id: usize, depth: usize) {
        let Some(node) = self.get_node(node_id) else {
            return;
        };
        println!("{}{} {}", "  ".repeat(depth), node.id, node.node_debug_str());
        for child in &node.children {
            self.print_subtree(*child, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_only_a_root() {
        let doc = BaseDocument::new();
        assert_eq!(doc.tree().len(), 1);
        assert!(matches!(doc.root_node().data, NodeData::Document));
        assert!(doc.root_node().is_in_document());
    }

    #[test]
    fn editable_region_is_inherited_until_false() {
        let mut doc = BaseDocument::new();
        let mut mutr = doc.mutate();
        let editor = mutr
            .append_element(BaseDocument::ROOT_NODE_ID, "div", &[("contenteditable", "")])
            .unwrap();
        let inner = mutr.append_element(editor, "table", &[]).unwrap();
        let locked = mutr
            .append_element(editor, "div", &[("contenteditable", "false")])
            .unwrap();
        let locked_table = mutr.append_element(locked, "table", &[]).unwrap();
        drop(mutr);

        assert!(doc.has_editable_style(inner));
        assert!(!doc.has_editable_style(locked_table));
        assert!(!doc.has_editable_style(BaseDocument::ROOT_NODE_ID));
    }
}
