use std::ops::{Deref, DerefMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
        }
    }
}

/// An element's attribute list, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    inner: Vec<Attribute>,
}

impl Attributes {
    pub fn new(attrs: Vec<Attribute>) -> Self {
        let mut attributes = Self { inner: Vec::with_capacity(attrs.len()) };
        for attr in attrs {
            attributes.set(attr);
        }
        attributes
    }

    /// Insert the attribute, replacing the value of an existing attribute with the same name.
    pub fn set(&mut self, attr: Attribute) {
        match self.inner.iter_mut().find(|existing| existing.name == attr.name) {
            Some(existing) => existing.value = attr.value,
            None => self.inner.push(attr),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        let idx = self.inner.iter().position(|attr| attr.name == name)?;
        Some(self.inner.remove(idx))
    }
}

impl Deref for Attributes {
    type Target = Vec<Attribute>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Attributes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
