use crate::BaseDocument;

/// Pre-order traversal of the subtree rooted at a node (the root included).
#[derive(Clone)]
pub struct TreeTraverser<'a> {
    doc: &'a BaseDocument,
    stack: Vec<usize>,
}

impl<'a> TreeTraverser<'a> {
    /// Traverse the whole document
    pub fn new(doc: &'a BaseDocument) -> Self {
        Self::new_with_root(doc, BaseDocument::ROOT_NODE_ID)
    }

    pub fn new_with_root(doc: &'a BaseDocument, root: usize) -> Self {
        let stack = if doc.get_node(root).is_some() {
            vec![root]
        } else {
            Vec::new()
        };
        TreeTraverser { doc, stack }
    }
}

impl Iterator for TreeTraverser<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let Some(node) = self.doc.get_node(id) {
            self.stack.extend(node.children.iter().rev());
        }
        Some(id)
    }
}

/// Walks from a node's parent up to the document root.
#[derive(Clone)]
pub struct AncestorTraverser<'a> {
    doc: &'a BaseDocument,
    current: Option<usize>,
}

impl<'a> AncestorTraverser<'a> {
    pub fn new(doc: &'a BaseDocument, node_id: usize) -> Self {
        let current = doc.get_node(node_id).and_then(|node| node.parent);
        AncestorTraverser { doc, current }
    }
}

impl Iterator for AncestorTraverser<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.doc.get_node(id).and_then(|node| node.parent);
        Some(id)
    }
}
