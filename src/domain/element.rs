//! Ordered element tree used as the wire-format substrate.
//!
//! Requests are assembled as an owned tree of [`Element`]s rooted at the
//! operation tag; responses are parsed into an [`ElementTree`]. Children are
//! owned by exactly one parent: `append` moves the subtree, so reusing a
//! fragment in a second document requires an explicit `clone()`.

use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    #[error("missing element <{0}>")]
    MissingElement(String),
    #[error("malformed value in <{tag}>: {value:?}")]
    MalformedValue { tag: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    tag: String,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Creates a detached node.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Creates a child named `tag`, appends it to `parent` and returns it.
    pub fn sub_element(parent: &mut Element, tag: impl Into<String>) -> &mut Element {
        parent.children.push(Element::new(tag));
        let last = parent.children.len() - 1;
        &mut parent.children[last]
    }

    /// Creates a child holding `value` as its text. Shorthand for
    /// `sub_element(...).text(value)`.
    pub fn sub_text(parent: &mut Element, tag: impl Into<String>, value: impl Into<String>) {
        Element::sub_element(parent, tag).text(value);
    }

    /// Like [`Element::sub_text`] but does nothing when `value` is `None`.
    pub fn sub_text_opt<V: ToString>(parent: &mut Element, tag: &str, value: Option<V>) {
        if let Some(value) = value {
            Element::sub_text(parent, tag, value.to_string());
        }
    }

    pub fn append(&mut self, child: Element) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Sets or overwrites the text payload.
    pub fn text(&mut self, value: impl Into<String>) -> &mut Self {
        self.text = Some(value.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn text_value(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First direct child named `tag`.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    pub fn has(&self, tag: &str) -> bool {
        self.child(tag).is_some()
    }

    /// Follows a path of direct-child tags, e.g. `["Block1", "Amt"]`.
    pub fn at(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |node, tag| node.child(tag))
    }

    pub fn get_string(&self, tag: &str) -> Result<String, ElementError> {
        self.get_string_opt(tag)?
            .ok_or_else(|| ElementError::MissingElement(tag.to_string()))
    }

    /// `Ok(None)` when the child is absent. A present child without text
    /// reads as the empty string.
    pub fn get_string_opt(&self, tag: &str) -> Result<Option<String>, ElementError> {
        Ok(self
            .child(tag)
            .map(|c| c.text.clone().unwrap_or_default()))
    }

    pub fn get_int(&self, tag: &str) -> Result<i64, ElementError> {
        self.get_int_opt(tag)?
            .ok_or_else(|| ElementError::MissingElement(tag.to_string()))
    }

    pub fn get_int_opt(&self, tag: &str) -> Result<Option<i64>, ElementError> {
        self.parse_child(tag, |s| s.parse::<i64>().ok())
    }

    pub fn get_decimal(&self, tag: &str) -> Result<Decimal, ElementError> {
        self.get_decimal_opt(tag)?
            .ok_or_else(|| ElementError::MissingElement(tag.to_string()))
    }

    pub fn get_decimal_opt(&self, tag: &str) -> Result<Option<Decimal>, ElementError> {
        self.parse_child(tag, |s| Decimal::from_str(s).ok())
    }

    fn parse_child<T>(
        &self,
        tag: &str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<Option<T>, ElementError> {
        let Some(raw) = self.get_string_opt(tag)? else {
            return Ok(None);
        };
        parse(raw.trim())
            .map(Some)
            .ok_or_else(|| ElementError::MalformedValue {
                tag: tag.to_string(),
                value: raw,
            })
    }
}

/// A parsed response document.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementTree {
    root: Element,
}

impl ElementTree {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// First element named `tag` anywhere in the document, searched breadth
    /// first so shallower matches win.
    pub fn get(&self, tag: &str) -> Option<&Element> {
        let mut queue = VecDeque::from([&self.root]);
        while let Some(node) = queue.pop_front() {
            if node.tag == tag {
                return Some(node);
            }
            queue.extend(node.children.iter());
        }
        None
    }

    pub fn require(&self, tag: &str) -> Result<&Element, ElementError> {
        self.get(tag)
            .ok_or_else(|| ElementError::MissingElement(tag.to_string()))
    }

    pub fn has(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }
}

impl From<Element> for ElementTree {
    fn from(root: Element) -> Self {
        Self::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Element {
        let mut root = Element::new("CreditSale");
        let block1 = Element::sub_element(&mut root, "Block1");
        Element::sub_text(block1, "Amt", "50.00");
        Element::sub_text(block1, "AllowDup", "Y");
        Element::sub_element(block1, "Empty");
        root
    }

    #[test]
    fn test_sub_element_appends_in_order() {
        let root = sample();
        let block1 = root.child("Block1").unwrap();
        let tags: Vec<&str> = block1.children().iter().map(|c| c.tag()).collect();
        assert_eq!(tags, vec!["Amt", "AllowDup", "Empty"]);
    }

    #[test]
    fn test_text_overwrites() {
        let mut el = Element::new("RspCode");
        el.text("91").text("00");
        assert_eq!(el.text_value(), Some("00"));
    }

    #[test]
    fn test_getters_distinguish_missing_from_malformed() {
        let mut header = Element::new("Header");
        Element::sub_text(&mut header, "GatewayTxnId", "abc");

        assert_eq!(
            header.get_int("GatewayRspCode"),
            Err(ElementError::MissingElement("GatewayRspCode".into()))
        );
        assert!(matches!(
            header.get_int("GatewayTxnId"),
            Err(ElementError::MalformedValue { .. })
        ));
        assert_eq!(header.get_int_opt("Nope"), Ok(None));
    }

    #[test]
    fn test_path_and_decimal_lookup() {
        let root = sample();
        let amt = root.at(&["Block1"]).unwrap().get_decimal("Amt").unwrap();
        assert_eq!(amt, dec!(50.00));
        assert_eq!(amt.to_string(), "50.00");
        assert!(root.at(&["Block1", "Missing"]).is_none());
    }

    #[test]
    fn test_present_element_without_text_reads_empty() {
        let root = sample();
        let block1 = root.child("Block1").unwrap();
        assert_eq!(block1.get_string("Empty").unwrap(), "");
    }

    #[test]
    fn test_tree_get_prefers_shallow_matches() {
        let mut root = Element::new("PosResponse");
        let ver = Element::sub_element(&mut root, "Ver1.0");
        let header = Element::sub_element(ver, "Header");
        Element::sub_text(header, "GatewayRspCode", "0");
        let txn = Element::sub_element(ver, "Transaction");
        let sale = Element::sub_element(txn, "CreditSale");
        Element::sub_text(sale, "RspCode", "00");

        let tree = ElementTree::new(root);
        assert_eq!(
            tree.get("Header").unwrap().get_string("GatewayRspCode").unwrap(),
            "0"
        );
        assert!(tree.has("CreditSale"));
        assert!(tree.require("CreditAuth").is_err());
    }

    #[test]
    fn test_append_moves_subtree() {
        let mut holder = Element::new("CardHolderData");
        Element::sub_text(&mut holder, "CardHolderZip", "75024");

        let mut first = Element::new("Block1");
        first.append(holder.clone());
        let mut second = Element::new("Block1");
        second.append(holder);

        assert_eq!(first, second);
    }
}
