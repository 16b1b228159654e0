//! Headless document model.
//!
//! Every component in this crate manipulates a [`Document`]: an arena of
//! element and text nodes addressed by [`NodeId`] handles. The model covers
//! exactly what the enhancement layer touches in a browser DOM:
//!
//! - tree structure (append, detach, clear, replace from markup)
//! - attributes, class lists and inline style declarations
//! - text content
//! - lookups by id and by a small CSS selector subset (see [`Selector`])
//! - HTML fragment parsing ([`parse`]) and serialization
//!
//! ## Arena Semantics
//!
//! Nodes are never freed. Detaching a node (or clearing its parent) only
//! unlinks it from the tree, so stale `NodeId`s stay valid to read but report
//! `false` from [`Document::is_attached`]. Components use that to notice when
//! the content loader replaced the markup they were built on.
//!
//! ## Inline Styles
//!
//! Inline styles live in a per-element declaration list, not in the
//! attribute list. Parsing a `style="..."` attribute fills that list and
//! serialization writes it back out, so `attr(node, "style")` is always `None`.

pub mod parse;
pub mod select;
mod serialize;

pub use select::{Selector, SelectorError};

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Element payload: tag name, attributes, inline style declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    style: Vec<(String, String)>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            style: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    fn set_attr(&mut self, name: &str, value: String) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|(k, _)| k != name);
        before != self.attrs.len()
    }

    fn set_style(&mut self, property: &str, value: String) {
        match self.style.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value,
            None => self.style.push((property.to_string(), value)),
        }
    }

    /// Replace all declarations from a `style` attribute value.
    fn set_style_text(&mut self, text: &str) {
        self.style.clear();
        for decl in text.split(';') {
            if let Some((prop, value)) = decl.split_once(':') {
                let prop = prop.trim();
                let value = value.trim();
                if !prop.is_empty() && !value.is_empty() {
                    self.set_style(&prop.to_ascii_lowercase(), value.to_string());
                }
            }
        }
    }

    fn style_text(&self) -> Option<String> {
        if self.style.is_empty() {
            return None;
        }
        Some(
            self.style
                .iter()
                .map(|(k, v)| format!("{k}: {v};"))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An HTML document held entirely in memory.
///
/// A fresh document is `html > (head, body)`; [`Document::parse`] builds one
/// from markup.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
        };
        doc.root = doc.create_element("html");
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.head);
        doc.append_child(doc.root, doc.body);
        doc
    }

    /// Parse a full page or a bare fragment. `<html>` and `<body>` wrappers
    /// are folded into the document's own; `<head>` content goes to `head`.
    pub fn parse(html: &str) -> Self {
        let mut doc = Self::new();
        let body = doc.body;
        parse::parse_into(&mut doc, body, html);
        doc
    }

    /// The `html` element (`document.documentElement`).
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    // ------------------------------------------------------------------
    // Construction and tree edits
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(Element::new(tag)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already in the tree. Appending a node into its own subtree is ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.contains(child, parent) {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Unlink a node from its parent. No-op for unparented nodes.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Replace the children of `node` with parsed markup (`innerHTML = ...`).
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) {
        self.clear_children(node);
        parse::parse_into(self, node, html);
    }

    /// Deep-copy `node` from another document into this one. The copy is
    /// returned unattached.
    pub fn import(&mut self, from: &Document, node: NodeId) -> NodeId {
        let copy = self.push(from.nodes[node.0].kind.clone());
        for &child in &from.nodes[node.0].children {
            let child_copy = self.import(from, child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    // ------------------------------------------------------------------
    // Tree inspection
    // ------------------------------------------------------------------

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node.0].kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(Element::tag)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// All descendants of `node` in document order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// `node` followed by each of its ancestors up to the tree root.
    pub fn ancestors_inclusive(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |n| self.parent(*n))
    }

    /// True when `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors_inclusive(node).any(|n| n == ancestor)
    }

    /// True when the node is reachable from the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    // ------------------------------------------------------------------
    // Attributes, classes, styles
    // ------------------------------------------------------------------

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|el| el.attr(name))
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(el) = self.element_mut(node) {
            if name.eq_ignore_ascii_case("style") {
                el.set_style_text(&value);
            } else {
                el.set_attr(&name.to_ascii_lowercase(), value);
            }
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> bool {
        self.element_mut(node)
            .is_some_and(|el| el.remove_attr(name))
    }

    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        self.set_class(node, class, true);
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.set_class(node, class, false);
    }

    /// Flip a class and return whether it is now present.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        let on = !self.has_class(node, class);
        self.set_class(node, class, on);
        on
    }

    /// Add or remove a class (`classList.toggle(class, force)`).
    pub fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        let Some(el) = self.element_mut(node) else {
            return;
        };
        let mut classes: Vec<String> = el
            .attr("class")
            .map(|list| list.split_ascii_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let present = classes.iter().any(|c| c == class);
        match (on, present) {
            (true, false) => classes.push(class.to_string()),
            (false, true) => classes.retain(|c| c != class),
            _ => return,
        }
        if classes.is_empty() {
            el.remove_attr("class");
        } else {
            el.set_attr("class", classes.join(" "));
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node).and_then(|el| {
            el.style
                .iter()
                .find(|(k, _)| k == property)
                .map(|(_, v)| v.as_str())
        })
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: impl Into<String>) {
        if let Some(el) = self.element_mut(node) {
            el.set_style(property, value.into());
        }
    }

    pub fn remove_style(&mut self, node: NodeId, property: &str) {
        if let Some(el) = self.element_mut(node) {
            el.style.retain(|(k, _)| k != property);
        }
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Concatenated text of the node and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        if let NodeKind::Text(text) = self.kind(node) {
            return text.clone();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|n| match self.kind(n) {
                NodeKind::Text(text) => Some(text.as_str()),
                NodeKind::Element(_) => None,
            })
            .collect()
    }

    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        if let NodeKind::Text(existing) = &mut self.nodes[node.0].kind {
            *existing = text.to_string();
            return;
        }
        self.clear_children(node);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(node, text_node);
        }
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// First attached element with the given id, in document order.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|n| self.id(*n) == Some(id))
    }

    /// First descendant of `scope` matching `selector`.
    ///
    /// An unparseable selector matches nothing.
    pub fn query(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        let selector = self.compile(selector)?;
        self.query_selector(scope, &selector)
    }

    /// All descendants of `scope` matching `selector`, in document order.
    pub fn query_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        match self.compile(selector) {
            Some(selector) => self.query_selector_all(scope, &selector),
            None => Vec::new(),
        }
    }

    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|n| selector.matches(self, *n))
    }

    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| selector.matches(self, *n))
            .collect()
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        let selector = self.compile(selector)?;
        self.ancestors_inclusive(node)
            .find(|n| selector.matches(self, *n))
    }

    fn compile(&self, selector: &str) -> Option<Selector> {
        match Selector::parse(selector) {
            Ok(selector) => Some(selector),
            Err(err) => {
                tracing::warn!(selector, %err, "ignoring invalid selector");
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            serialize::write_node(self, child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        serialize::write_node(self, node, &mut out);
        out
    }
}
