//! The accessibility object cache and its table model.
//!
//! An [`AxTree`] lazily creates one accessible object per DOM node it is asked about,
//! plus synthetic column and header-container objects for exposed tables. Tables keep a
//! [`TableModel`] that is rebuilt on demand after the DOM changes; see
//! [`AxTree::flush_document_changes`].

use std::collections::HashMap;

use axtable_traits::AccessibilityRole;

use crate::{AccessibilityConfig, BaseDocument};

#[cfg(feature = "accessibility")]
mod export;
mod grid;
mod node;
mod roles;
mod table;
mod table_helpers;

pub use node::{AxId, AxNode, AxNodeKind, TableCellData};
pub use table::{CellSlots, TableModel};

pub struct AxTree {
    config: AccessibilityConfig,
    nodes: HashMap<AxId, AxNode>,
    dom_to_ax: HashMap<usize, AxId>,
    next_id: u64,
    torn_down: bool,
}

impl Default for AxTree {
    fn default() -> Self {
        Self::new(AccessibilityConfig::default())
    }
}

impl AxTree {
    pub fn new(config: AccessibilityConfig) -> Self {
        Self {
            config,
            nodes: HashMap::new(),
            dom_to_ax: HashMap::new(),
            next_id: 1,
            torn_down: false,
        }
    }

    pub fn config(&self) -> &AccessibilityConfig {
        &self.config
    }

    /// Number of live accessible objects
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// The existing object for a DOM node, without creating one.
    pub fn get(&self, dom_id: usize) -> Option<AxId> {
        self.dom_to_ax.get(&dom_id).copied()
    }

    pub fn object_for_id(&self, id: AxId) -> Option<&AxNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn node_mut(&mut self, id: AxId) -> Option<&mut AxNode> {
        self.nodes.get_mut(&id)
    }

    pub fn dom_node(&self, id: AxId) -> Option<usize> {
        self.nodes.get(&id)?.dom_node()
    }

    pub fn role(&self, id: AxId) -> AccessibilityRole {
        self.nodes
            .get(&id)
            .map_or(AccessibilityRole::Unknown, |node| node.role)
    }

    pub fn is_ignored(&self, id: AxId) -> bool {
        self.nodes.get(&id).is_some_and(AxNode::is_ignored)
    }

    pub fn parent(&self, id: AxId) -> Option<AxId> {
        self.nodes.get(&id)?.parent
    }

    pub fn cell_data(&self, id: AxId) -> Option<TableCellData> {
        self.nodes.get(&id).map(|node| node.cell)
    }

    pub(crate) fn cell_data_mut(&mut self, id: AxId) -> Option<&mut TableCellData> {
        self.nodes.get_mut(&id).map(|node| &mut node.cell)
    }

    /// Return the object for `dom_id`, creating it if needed.
    ///
    /// Returns `None` for nodes that do not exist, for comment nodes and after
    /// [`AxTree::teardown`].
    pub fn get_or_create(&mut self, doc: &BaseDocument, dom_id: usize) -> Option<AxId> {
        if self.torn_down {
            return None;
        }
        if let Some(id) = self.get(dom_id) {
            return Some(id);
        }

        let node = doc.get_node(dom_id)?;
        if !(node.is_element() || node.is_text_node() || dom_id == BaseDocument::ROOT_NODE_ID) {
            return None;
        }

        let id = self.allocate_id();
        let mut ax_node = AxNode::new(id, AxNodeKind::Dom(dom_id));
        ax_node.aria_role = node
            .element_data()
            .and_then(|el| el.role_attr())
            .and_then(AccessibilityRole::from_aria);
        ax_node.parent = node.parent.and_then(|parent| self.get(parent));
        self.nodes.insert(id, ax_node);
        self.dom_to_ax.insert(dom_id, id);

        // Table state has to exist before the role is computed
        if self.is_table(doc, id) {
            self.init_table_model(doc, id);
        }
        self.update_role(doc, id);

        #[cfg(feature = "tracing")]
        tracing::trace!("Created accessible object {:?} for node {}", id, dom_id);

        Some(id)
    }

    pub(crate) fn create_synthetic(&mut self, kind: AxNodeKind, parent: AxId) -> AxId {
        let id = self.allocate_id();
        let mut node = AxNode::new(id, kind);
        node.role = match kind {
            AxNodeKind::Column { .. } => AccessibilityRole::Column,
            AxNodeKind::HeaderContainer { .. } => AccessibilityRole::TableHeaderContainer,
            AxNodeKind::Dom(_) => AccessibilityRole::Unknown,
        };
        node.parent = Some(parent);
        self.nodes.insert(id, node);
        id
    }

    fn allocate_id(&mut self) -> AxId {
        let id = AxId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Forget the object of a DOM node that left the document.
    ///
    /// Table slots still holding its id read as empty from now on.
    pub fn remove_dom_node(&mut self, dom_id: usize) {
        let Some(id) = self.dom_to_ax.remove(&dom_id) else {
            return;
        };
        if let Some(node) = self.nodes.remove(&id) {
            if let Some(model) = node.table {
                self.discard_synthetic(&model);
            }
        }
    }

    fn discard_synthetic(&mut self, model: &TableModel) {
        for column in &model.columns {
            self.nodes.remove(column);
        }
        if let Some(container) = model.header_container {
            self.nodes.remove(&container);
        }
    }

    /// Drop every object. Queries afterwards return empty results.
    pub fn teardown(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!("Tearing down accessibility tree with {} objects", self.nodes.len());

        self.nodes.clear();
        self.dom_to_ax.clear();
        self.torn_down = true;
    }

    /// The unignored DOM-derived children of an object. Ignored children are replaced
    /// by their own unignored children.
    pub fn unignored_children(&mut self, doc: &BaseDocument, id: AxId) -> Vec<AxId> {
        let Some(dom_id) = self.dom_node(id) else {
            return Vec::new();
        };
        let Some(node) = doc.get_node(dom_id) else {
            return Vec::new();
        };

        let mut children = Vec::new();
        for &child_dom in &node.children {
            let Some(child) = self.get_or_create(doc, child_dom) else {
                continue;
            };
            if self.is_ignored(child) {
                children.extend(self.unignored_children(doc, child));
            } else {
                children.push(child);
            }
        }
        children
    }

    /// Children of an object in the accessibility tree.
    ///
    /// Exposed tables report their caption, rows, columns and header container instead of
    /// their DOM children.
    pub fn children(&mut self, doc: &BaseDocument, id: AxId) -> Vec<AxId> {
        let Some(kind) = self.nodes.get(&id).map(AxNode::kind) else {
            return Vec::new();
        };
        match kind {
            AxNodeKind::Column { table, index } => self.column_cells(doc, table, index),
            AxNodeKind::HeaderContainer { table } => self.column_headers(doc, table),
            AxNodeKind::Dom(_) if self.is_exposable_table(id) => self.table_children(doc, id),
            AxNodeKind::Dom(_) => self.unignored_children(doc, id),
        }
    }

    /// Bring the tree up to date with everything the document recorded since the last
    /// flush.
    pub fn flush_document_changes(&mut self, doc: &mut BaseDocument) {
        if self.torn_down {
            doc.take_removed_nodes();
            doc.take_changed_nodes();
            return;
        }

        for removed in doc.take_removed_nodes() {
            self.remove_dom_node(removed);
        }

        let changed = doc.take_changed_nodes();
        let doc: &BaseDocument = doc;

        #[cfg(feature = "tracing")]
        if !changed.is_empty() {
            tracing::debug!("Flushing {} changed nodes", changed.len());
        }

        for dom_id in changed {
            if let Some(id) = self.get(dom_id) {
                self.refresh_object(doc, id);
            }

            let tables: Vec<AxId> = std::iter::once(dom_id)
                .chain(doc.ancestors(dom_id))
                .filter_map(|ancestor| self.get(ancestor))
                .filter(|ancestor| self.object_for_id(*ancestor).is_some_and(AxNode::is_table))
                .collect();
            for table in tables {
                self.set_cell_slots_dirty(table);
                self.recompute_is_exposable_if_necessary(doc, table);
            }
        }
    }

    /// Re-read an element's `role` attribute and recompute its role.
    fn refresh_object(&mut self, doc: &BaseDocument, id: AxId) {
        let Some(dom_id) = self.dom_node(id) else {
            return;
        };
        let aria_role = doc
            .get_node(dom_id)
            .and_then(|node| node.element_data())
            .and_then(|el| el.role_attr())
            .and_then(AccessibilityRole::from_aria);
        if let Some(node) = self.node_mut(id) {
            node.aria_role = aria_role;
        }

        let was_table = self.object_for_id(id).is_some_and(AxNode::is_table);
        let is_table = self.is_table(doc, id);
        if is_table && !was_table {
            self.init_table_model(doc, id);
        } else if was_table && !is_table {
            if let Some(model) = self.node_mut(id).and_then(|node| node.table.take()) {
                self.discard_synthetic(&model);
            }
        }
        self.update_role(doc, id);
    }

    fn init_table_model(&mut self, doc: &BaseDocument, id: AxId) {
        let exposable = self.compute_is_table_exposable(doc, id);
        if let Some(node) = self.node_mut(id) {
            node.table = Some(TableModel::new(exposable));
        }
    }
}
