use axtable_traits::ComputedStyle;
use bitflags::bitflags;

use super::{Attribute, ElementData};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        /// Whether the node is connected to the document root
        const IS_IN_DOCUMENT = 0b0000_0001;
    }
}

#[derive(Debug, Clone)]
pub struct TextNodeData {
    pub content: String,
}

#[derive(Debug, Clone)]
pub enum NodeData {
    /// The document root
    Document,
    Element(ElementData),
    Text(TextNodeData),
    Comment,
}

impl NodeData {
    pub fn downcast_element(&self) -> Option<&ElementData> {
        match self {
            Self::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn downcast_element_mut(&mut self) -> Option<&mut ElementData> {
        match self {
            Self::Element(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    /// Our Id
    pub id: usize,
    /// Our parent's ID
    pub parent: Option<usize>,
    /// What are our children?
    pub children: Vec<usize>,

    pub flags: NodeFlags,

    /// Node type (Element, Text, etc) specific data
    pub data: NodeData,

    /// Computed style. Text and document nodes keep the default.
    pub style: ComputedStyle,
}

impl Node {
    pub(crate) fn new(id: usize, data: NodeData) -> Self {
        let style = match &data {
            NodeData::Element(element) => ComputedStyle::with_display(element.ua_display()),
            _ => ComputedStyle::default(),
        };
        Self {
            id,
            parent: None,
            children: Vec::new(),
            flags: NodeFlags::empty(),
            data,
            style,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    pub fn is_text_node(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    pub fn element_data(&self) -> Option<&ElementData> {
        self.data.downcast_element()
    }

    pub fn element_data_mut(&mut self) -> Option<&mut ElementData> {
        self.data.downcast_element_mut()
    }

    /// The element's local name, if this is an element.
    pub fn local_name(&self) -> Option<&str> {
        self.element_data().map(|el| el.name.as_str())
    }

    pub fn is_element_named(&self, name: &str) -> bool {
        self.local_name() == Some(name)
    }

    pub fn attrs(&self) -> Option<&[Attribute]> {
        Some(self.element_data()?.attrs())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element_data()?.attr(name)
    }

    pub fn is_in_document(&self) -> bool {
        self.flags.contains(NodeFlags::IS_IN_DOCUMENT)
    }

    /// The style of the node's box, or `None` when it generates no box.
    pub fn rendered_style(&self) -> Option<&ComputedStyle> {
        (self.is_element() && self.style.is_rendered()).then_some(&self.style)
    }

    pub fn text_content(&self) -> String {
        match &self.data {
            NodeData::Text(text) => text.content.clone(),
            _ => String::new(),
        }
    }

    pub fn node_debug_str(&self) -> String {
        match &self.data {
            NodeData::Document => "DOCUMENT".to_string(),
            NodeData::Element(element) => {
                let mut s = format!("<{}", element.name);
                if let Some(id) = &element.id {
                    s.push_str(&format!(" #{id}"));
                }
                if let Some(role) = element.role_attr() {
                    s.push_str(&format!(" role={role}"));
                }
                s.push('>');
                s
            }
            NodeData::Text(text) => format!("TEXT {:?}", text.content),
            NodeData::Comment => "COMMENT".to_string(),
        }
    }
}
