use std::str::FromStr;

use axtable_traits::style::Display;

use super::{Attribute, Attributes};
use crate::util::parse_html_integer;

#[derive(Debug, Clone)]
pub struct ElementData {
    /// The element's lowercased local name
    pub name: String,

    /// The element's id attribute (if it has one)
    pub id: Option<String>,

    /// The element's attributes
    pub attrs: Attributes,
}

impl ElementData {
    pub fn new(name: &str, attrs: Vec<Attribute>) -> Self {
        let attrs = Attributes::new(attrs);
        let id = attrs
            .iter()
            .find(|attr| attr.name == "id")
            .map(|attr| attr.value.clone());

        ElementData {
            name: name.to_ascii_lowercase(),
            id,
            attrs,
        }
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        let attr = self.attrs.iter().find(|attr| attr.name == name)?;
        Some(&attr.value)
    }

    pub fn attr_parsed<T: FromStr>(&self, name: &str) -> Option<T> {
        self.attr(name)?.parse::<T>().ok()
    }

    /// Detects the presence of the attribute, treating *any* value as truthy.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|attr| attr.name == name)
    }

    /// The attribute's value, or `""` when it is absent.
    pub fn attr_or_empty(&self, name: &str) -> &str {
        self.attr(name).unwrap_or("")
    }

    /// The attribute parsed with the HTML rules for parsing integers.
    pub fn html_integer_attr(&self, name: &str) -> Option<i32> {
        parse_html_integer(self.attr(name)?)
    }

    /// The attribute parsed as an integer, defaulting to 0 when absent or unparseable.
    pub fn integral_attr(&self, name: &str) -> i32 {
        self.html_integer_attr(name).unwrap_or(0)
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// The explicit `role` attribute, untouched.
    pub fn role_attr(&self) -> Option<&str> {
        self.attr("role").filter(|role| !role.trim().is_empty())
    }

    /// Whether the element's `role` attribute contains the given token.
    pub fn has_role_token(&self, token: &str) -> bool {
        self.role_attr().is_some_and(|role| {
            role.split_ascii_whitespace()
                .any(|candidate| candidate.eq_ignore_ascii_case(token))
        })
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: &str) {
        let attr = Attribute::new(name, value);
        if attr.name == "id" {
            self.id = Some(attr.value.clone());
        }
        self.attrs.set(attr);
    }

    pub(crate) fn clear_attr(&mut self, name: &str) -> Option<Attribute> {
        let removed = self.attrs.remove(&name.to_ascii_lowercase())?;
        if removed.name == "id" {
            self.id = None;
        }
        Some(removed)
    }

    /// The display type the user agent stylesheet gives this element.
    pub fn ua_display(&self) -> Display {
        if self.has_attr("hidden") {
            return Display::None;
        }
        match self.name.as_str() {
            "table" => Display::Table,
            "caption" => Display::TableCaption,
            "thead" => Display::TableHeaderGroup,
            "tbody" => Display::TableRowGroup,
            "tfoot" => Display::TableFooterGroup,
            "tr" => Display::TableRow,
            "td" | "th" => Display::TableCell,
            "colgroup" => Display::TableColumnGroup,
            "col" => Display::TableColumn,
            "head" | "script" | "style" | "template" | "title" | "meta" | "link" => Display::None,
            "span" | "a" | "b" | "i" | "em" | "strong" | "abbr" | "code" => Display::Inline,
            _ => Display::Block,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, attrs: &[(&str, &str)]) -> ElementData {
        ElementData::new(
            name,
            attrs.iter().map(|(k, v)| Attribute::new(k, v)).collect(),
        )
    }

    #[test]
    fn attribute_lookup_is_case_insensitive_on_names() {
        let el = element("TD", &[("ColSpan", "3"), ("id", "cell")]);
        assert_eq!(el.name, "td");
        assert_eq!(el.attr("colspan"), Some("3"));
        assert_eq!(el.id.as_deref(), Some("cell"));
        assert_eq!(el.integral_attr("colspan"), 3);
        assert_eq!(el.integral_attr("rowspan"), 0);
    }

    #[test]
    fn role_tokens() {
        let el = element("div", &[("role", "foo  Row")]);
        assert!(el.has_role_token("row"));
        assert!(!el.has_role_token("rowgroup"));
        assert_eq!(element("div", &[("role", "  ")]).role_attr(), None);
    }

    #[test]
    fn ua_display_defaults() {
        assert_eq!(element("tfoot", &[]).ua_display(), Display::TableFooterGroup);
        assert_eq!(element("th", &[]).ua_display(), Display::TableCell);
        assert_eq!(element("div", &[("hidden", "")]).ua_display(), Display::None);
        assert_eq!(element("tr", &[("hidden", "")]).ua_display(), Display::None);
    }
}
