use axtable_traits::ComputedStyle;

use crate::error::{DomError, DomResult};
use crate::node::{Attribute, ElementData, NodeData, NodeFlags, TextNodeData};
use crate::BaseDocument;

/// Mutable access to a [`BaseDocument`] that records every change for the
/// accessibility tree to pick up on its next flush.
pub struct DocumentMutator<'doc> {
    doc: &'doc mut BaseDocument,
}

impl<'doc> DocumentMutator<'doc> {
    pub fn new(doc: &'doc mut BaseDocument) -> Self {
        Self { doc }
    }

    pub fn doc(&self) -> &BaseDocument {
        self.doc
    }

    /// Create a detached element with the user agent's default style for its tag.
    pub fn create_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> usize {
        let attrs = attrs
            .iter()
            .map(|(name, value)| Attribute::new(name, value))
            .collect();
        let data = ElementData::new(name, attrs);
        let element_id = data.id.clone();
        let node_id = self.doc.create_node(NodeData::Element(data));
        if let Some(element_id) = element_id {
            self.doc.nodes_to_id.insert(element_id, node_id);
        }
        node_id
    }

    pub fn create_text_node(&mut self, text: &str) -> usize {
        self.doc.create_node(NodeData::Text(TextNodeData {
            content: text.to_string(),
        }))
    }

    /// Append `child_ids` to `parent_id`, detaching each child from its previous parent first.
    pub fn append_children(&mut self, parent_id: usize, child_ids: &[usize]) -> DomResult<()> {
        self.node_exists(parent_id)?;
        for &child_id in child_ids {
            self.node_exists(child_id)?;
            if child_id == BaseDocument::ROOT_NODE_ID
                || self.doc.is_inclusive_descendant_of(parent_id, child_id)
            {
                return Err(DomError::HierarchyRequest {
                    parent: parent_id,
                    child: child_id,
                });
            }
        }

        for &child_id in child_ids {
            self.detach(child_id);
            self.doc.nodes[child_id].parent = Some(parent_id);
            self.doc.nodes[parent_id].children.push(child_id);
            let in_document = self.doc.nodes[parent_id].is_in_document();
            self.set_in_document(child_id, in_document);
        }
        self.doc.changed_nodes.insert(parent_id);
        Ok(())
    }

    /// Create an element and append it to `parent_id`.
    pub fn append_element(
        &mut self,
        parent_id: usize,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> DomResult<usize> {
        self.node_exists(parent_id)?;
        let node_id = self.create_element(name, attrs);
        self.append_children(parent_id, &[node_id])?;
        Ok(node_id)
    }

    pub fn append_text(&mut self, parent_id: usize, text: &str) -> DomResult<usize> {
        self.node_exists(parent_id)?;
        let node_id = self.create_text_node(text);
        self.append_children(parent_id, &[node_id])?;
        Ok(node_id)
    }

    pub fn set_attribute(&mut self, node_id: usize, name: &str, value: &str) -> DomResult<()> {
        let element = self
            .doc
            .nodes
            .get_mut(node_id)
            .ok_or(DomError::NoSuchNode { node_id })?
            .element_data_mut()
            .ok_or(DomError::NotAnElement { node_id })?;

        let previous_id = element.id.clone();
        element.set_attr(name, value);
        let current_id = element.id.clone();
        let display = element.ua_display();

        if previous_id != current_id {
            self.update_id_map(node_id, previous_id, current_id);
        }
        if name.eq_ignore_ascii_case("hidden") {
            self.doc.nodes[node_id].style.display = display;
        }
        self.doc.changed_nodes.insert(node_id);
        Ok(())
    }

    pub fn clear_attribute(&mut self, node_id: usize, name: &str) -> DomResult<()> {
        let element = self
            .doc
            .nodes
            .get_mut(node_id)
            .ok_or(DomError::NoSuchNode { node_id })?
            .element_data_mut()
            .ok_or(DomError::NotAnElement { node_id })?;

        let previous_id = element.id.clone();
        if element.clear_attr(name).is_none() {
            return Ok(());
        }
        let current_id = element.id.clone();
        let display = element.ua_display();

        if previous_id != current_id {
            self.update_id_map(node_id, previous_id, current_id);
        }
        if name.eq_ignore_ascii_case("hidden") {
            self.doc.nodes[node_id].style.display = display;
        }
        self.doc.changed_nodes.insert(node_id);
        Ok(())
    }

    /// Update an element's computed style in place.
    pub fn set_style(
        &mut self,
        node_id: usize,
        update: impl FnOnce(&mut ComputedStyle),
    ) -> DomResult<()> {
        let node = self
            .doc
            .nodes
            .get_mut(node_id)
            .ok_or(DomError::NoSuchNode { node_id })?;
        if !node.is_element() {
            return Err(DomError::NotAnElement { node_id });
        }
        update(&mut node.style);
        self.doc.changed_nodes.insert(node_id);
        Ok(())
    }

    /// Remove a node and its whole subtree from the document.
    pub fn remove_node(&mut self, node_id: usize) -> DomResult<()> {
        if node_id == BaseDocument::ROOT_NODE_ID {
            return Err(DomError::CannotRemoveRoot);
        }
        self.node_exists(node_id)?;
        self.detach(node_id);

        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            let node = self.doc.nodes.remove(id);
            stack.extend(node.children.iter().copied());
            if let Some(element_id) = node.element_data().and_then(|el| el.id.as_ref()) {
                if self.doc.nodes_to_id.get(element_id) == Some(&id) {
                    self.doc.nodes_to_id.remove(element_id);
                }
            }
            self.doc.changed_nodes.remove(&id);
            self.doc.removed_nodes.push(id);
        }
        Ok(())
    }

    fn node_exists(&self, node_id: usize) -> DomResult<()> {
        if self.doc.nodes.contains(node_id) {
            Ok(())
        } else {
            Err(DomError::NoSuchNode { node_id })
        }
    }

    fn detach(&mut self, node_id: usize) {
        let Some(parent_id) = self.doc.nodes[node_id].parent.take() else {
            return;
        };
        if let Some(parent) = self.doc.nodes.get_mut(parent_id) {
            parent.children.retain(|child| *child != node_id);
        }
        self.doc.changed_nodes.insert(parent_id);
    }

    fn set_in_document(&mut self, node_id: usize, in_document: bool) {
        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            let node = &mut self.doc.nodes[id];
            node.flags.set(NodeFlags::IS_IN_DOCUMENT, in_document);
            stack.extend(node.children.iter().copied());
        }
    }

    fn update_id_map(&mut self, node_id: usize, previous: Option<String>, current: Option<String>) {
        if let Some(previous) = previous {
            if self.doc.nodes_to_id.get(&previous) == Some(&node_id) {
                self.doc.nodes_to_id.remove(&previous);
            }
        }
        if let Some(current) = current {
            self.doc.nodes_to_id.insert(current, node_id);
        }
    }
}
