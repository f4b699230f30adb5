//! Small DSL for building test documents by hand.

#![allow(dead_code)]

use axtable_dom::{AxId, AxTree, BaseDocument};

pub enum Tree {
    Element {
        name: &'static str,
        attrs: Vec<(&'static str, &'static str)>,
        children: Vec<Tree>,
    },
    Text(&'static str),
}

pub fn h(name: &'static str, attrs: &[(&'static str, &'static str)], children: Vec<Tree>) -> Tree {
    Tree::Element {
        name,
        attrs: attrs.to_vec(),
        children,
    }
}

pub fn t(text: &'static str) -> Tree {
    Tree::Text(text)
}

/// A cell holding a single text node.
pub fn cell(name: &'static str, attrs: &[(&'static str, &'static str)], text: &'static str) -> Tree {
    h(name, attrs, vec![t(text)])
}

pub fn td(text: &'static str) -> Tree {
    cell("td", &[], text)
}

pub fn th(text: &'static str) -> Tree {
    cell("th", &[], text)
}

pub fn tr(children: Vec<Tree>) -> Tree {
    h("tr", &[], children)
}

/// Append `tree` under `parent` and return the id of its root node.
pub fn build(doc: &mut BaseDocument, parent: usize, tree: &Tree) -> usize {
    let mut mutr = doc.mutate();
    let node_id = match tree {
        Tree::Element { name, attrs, .. } => mutr.append_element(parent, name, attrs).unwrap(),
        Tree::Text(text) => mutr.append_text(parent, text).unwrap(),
    };
    drop(mutr);

    if let Tree::Element { children, .. } = tree {
        for child in children {
            build(doc, node_id, child);
        }
    }
    node_id
}

/// A fresh document holding `tree` under its root, with pending changes already drained.
pub fn document(tree: Tree) -> (BaseDocument, usize) {
    let mut doc = BaseDocument::new();
    let root = build(&mut doc, BaseDocument::ROOT_NODE_ID, &tree);
    doc.take_changed_nodes();
    (doc, root)
}

pub fn by_id(doc: &BaseDocument, id: &str) -> usize {
    doc.get_element_by_id(id)
        .unwrap_or_else(|| panic!("no element with id {id}"))
}

pub fn ax(tree: &mut AxTree, doc: &BaseDocument, id: &str) -> AxId {
    let node_id = by_id(doc, id);
    tree.get_or_create(doc, node_id)
        .unwrap_or_else(|| panic!("no accessible object for #{id}"))
}

/// Slot grid as rows of element ids (`""` for empty slots).
pub fn slot_ids(tree: &mut AxTree, doc: &BaseDocument, table: AxId) -> Vec<Vec<String>> {
    let slots = tree.cell_slots(doc, table);
    slots
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|slot| {
                    slot.and_then(|cell| tree.dom_node(cell))
                        .and_then(|node_id| doc.get_node(node_id)?.element_data()?.id.clone())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect()
}

pub fn ids(tree: &AxTree, doc: &BaseDocument, objects: &[AxId]) -> Vec<String> {
    objects
        .iter()
        .map(|object| {
            tree.dom_node(*object)
                .and_then(|node_id| doc.get_node(node_id)?.element_data()?.id.clone())
                .unwrap_or_default()
        })
        .collect()
}
