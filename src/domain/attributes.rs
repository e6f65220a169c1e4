//! Attribute Store
//!
//! Ordered `name -> value` attributes shared by nodes, edges, defaults
//! statements and (sub)graphs. Insertion order is part of the model and is
//! what the serializer emits.

use crate::domain::id::Id;
use crate::domain::loose::Object;
use crate::error::Result;
use indexmap::IndexMap;

/// Name of the multi-valued attribute maintained by [`Attributes::add_style`].
pub const STYLE: &str = "style";

/// Value of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    Text(Id),
    /// Bare key in an attribute list (`[decorate]`), no value.
    Implicit,
}

impl AttrValue {
    pub fn as_id(&self) -> Option<&Id> {
        match self {
            AttrValue::Text(id) => Some(id),
            AttrValue::Implicit => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_id().map(Id::as_str)
    }

    pub fn is_implicit(&self) -> bool {
        matches!(self, AttrValue::Implicit)
    }
}

impl<T: Into<Id>> From<T> for AttrValue {
    fn from(value: T) -> Self {
        AttrValue::Text(value.into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Attributes {
    entries: IndexMap<String, AttrValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert. An existing name keeps its position.
    ///
    /// Integers convert to their decimal id text (`set("width", 3)` stores
    /// `3`). Loosely typed callers go through [`Attributes::try_set`], which
    /// rejects anything but text.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn set_implicit(&mut self, name: impl Into<String>) {
        self.entries.insert(name.into(), AttrValue::Implicit);
    }

    /// Loosely typed upsert: only text values are accepted.
    pub fn try_set(&mut self, name: impl Into<String>, value: impl Into<Object>) -> Result<()> {
        let text = value.into().into_text("attribute value")?;
        self.set(name, text);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries.get(name)
    }

    /// Raw text of a valued attribute.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove `name`, keeping the relative order of the others.
    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.entries.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set every pair of `other`, in its order.
    pub fn merge(&mut self, other: &Attributes) {
        for (name, value) in other.iter() {
            self.entries.insert(name.to_string(), value.clone());
        }
    }

    pub fn to_pairs(&self) -> Vec<(&str, &AttrValue)> {
        self.iter().collect()
    }

    /// Append `token` to the comma-joined `style` list.
    ///
    /// Tokens already present are ignored.
    pub fn add_style(&mut self, token: &str) {
        let token = token.trim();
        if token.is_empty() {
            return;
        }
        let mut parts = self.style_parts();
        if parts.iter().any(|p| p == token) {
            return;
        }
        parts.push(token.to_string());
        self.set(STYLE, parts.join(","));
    }

    /// The `style` value with any quoting removed.
    pub fn style(&self) -> Option<String> {
        self.get(STYLE)
            .and_then(AttrValue::as_id)
            .map(|id| id.unquoted().into_owned())
    }

    fn style_parts(&self) -> Vec<String> {
        self.style()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

// IndexMap equality ignores order; ours must not.
impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for Attributes {}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_preserves_position() {
        let mut attrs = Attributes::new();
        attrs.set("shape", "box");
        attrs.set("label", "mine");
        attrs.set("shape", "circle");

        let names: Vec<&str> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["shape", "label"]);
        assert_eq!(attrs.get_text("shape"), Some("circle"));
    }

    #[test]
    fn test_get_unset() {
        let attrs = Attributes::new();
        assert!(attrs.get("color").is_none());
        assert!(attrs.get_text("color").is_none());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut attrs: Attributes = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(attrs.remove("b"), Some(AttrValue::from("2")));
        assert_eq!(attrs.remove("missing"), None);
        let names: Vec<&str> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_add_style() {
        let mut attrs = Attributes::new();
        attrs.add_style("abc");
        assert_eq!(attrs.style().as_deref(), Some("abc"));
        attrs.add_style("def");
        assert_eq!(attrs.style().as_deref(), Some("abc,def"));
        attrs.add_style("ghi");
        assert_eq!(attrs.style().as_deref(), Some("abc,def,ghi"));
        attrs.add_style("abc");
        assert_eq!(attrs.style().as_deref(), Some("abc,def,ghi"));
    }

    #[test]
    fn test_add_style_on_quoted_value() {
        let mut attrs = Attributes::new();
        attrs.set(STYLE, "\"filled,rounded\"");
        attrs.add_style("dashed");
        assert_eq!(attrs.style().as_deref(), Some("filled,rounded,dashed"));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a: Attributes = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: Attributes = [("y", "2"), ("x", "1")].into_iter().collect();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_implicit_value() {
        let mut attrs = Attributes::new();
        attrs.set_implicit("decorate");
        assert!(attrs.contains("decorate"));
        assert!(attrs.get("decorate").unwrap().is_implicit());
        assert!(attrs.get_text("decorate").is_none());
    }

    #[test]
    fn test_try_set_rejects_non_text() {
        let mut attrs = Attributes::new();
        assert!(attrs.try_set("label", "ok").is_ok());
        assert!(attrs.try_set("width", 3i64).unwrap_err().is_type());
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_set_integer_is_numeral_id() {
        let mut attrs = Attributes::new();
        attrs.set("width", 3);
        assert_eq!(attrs.get_text("width"), Some("3"));
        assert!(attrs.get("width").unwrap().as_id().unwrap().is_numeral());
    }
}
