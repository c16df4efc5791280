//! Read-only view over a page snapshot.
//!
//! Every heuristic in this crate is written against the [`DomNode`] trait so
//! it can run over any tree that exposes parents, children, siblings,
//! attributes and text. [`Page`] provides the HTML-backed implementation on
//! top of `scraper`.

use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};

use crate::error::{Result, TrackerError};

/// A node in a read-only document tree.
///
/// Element nodes report a tag name, text nodes report their own text; any
/// other node kind (document root, comments, doctype) reports neither.
pub trait DomNode: Copy {
    /// Lower-case tag name for element nodes, `None` otherwise.
    fn tag(&self) -> Option<&str>;

    /// Value of the named attribute, if this is an element carrying it.
    fn attribute(&self, name: &str) -> Option<&str>;

    fn parent_node(&self) -> Option<Self>;

    fn child_nodes(&self) -> Vec<Self>;

    fn previous_sibling(&self) -> Option<Self>;

    /// Text of a text node. Elements return `None`.
    fn own_text(&self) -> Option<&str>;

    /// Identity comparison.
    fn same_node(&self, other: &Self) -> bool;

    fn is_element(&self) -> bool {
        self.tag().is_some()
    }

    fn has_tag(&self, name: &str) -> bool {
        self.tag().is_some_and(|t| t.eq_ignore_ascii_case(name))
    }

    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|token| token == class))
    }

    /// Concatenated text of every descendant text node, in document order.
    fn text_content(&self) -> String {
        if let Some(text) = self.own_text() {
            return text.to_string();
        }
        self.descendant_nodes()
            .iter()
            .filter_map(|n| n.own_text())
            .collect()
    }

    /// All descendants in document (pre-)order, excluding `self`.
    fn descendant_nodes(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack: Vec<Self> = self.child_nodes().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.child_nodes().into_iter().rev());
        }
        out
    }

    /// Ancestors from the parent upwards.
    fn ancestor_nodes(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut current = self.parent_node();
        while let Some(node) = current {
            out.push(node);
            current = node.parent_node();
        }
        out
    }

    fn document_root(&self) -> Self {
        self.ancestor_nodes().last().copied().unwrap_or(*self)
    }

    /// `true` if `other` is a strict descendant of `self`.
    fn contains(&self, other: &Self) -> bool {
        other.ancestor_nodes().iter().any(|a| a.same_node(self))
    }

    /// First element in the whole document whose `id` equals `id`.
    fn element_by_id(&self, id: &str) -> Option<Self> {
        if id.is_empty() {
            return None;
        }
        self.document_root()
            .descendant_nodes()
            .into_iter()
            .find(|n| n.attribute("id") == Some(id))
    }
}

impl<'a> DomNode for NodeRef<'a, Node> {
    fn tag(&self) -> Option<&str> {
        match self.value() {
            Node::Element(el) => Some(el.name()),
            _ => None,
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        match self.value() {
            Node::Element(el) => el.attr(name),
            _ => None,
        }
    }

    fn parent_node(&self) -> Option<Self> {
        self.parent()
    }

    fn child_nodes(&self) -> Vec<Self> {
        self.children().collect()
    }

    fn previous_sibling(&self) -> Option<Self> {
        self.prev_sibling()
    }

    fn own_text(&self) -> Option<&str> {
        match self.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        }
    }

    fn same_node(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

/// Collapse runs of whitespace and trim. Returns `None` when nothing is left.
pub fn clean_text(raw: &str) -> Option<String> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!cleaned.is_empty()).then_some(cleaned)
}

/// An owned snapshot of a rendered page.
///
/// # Example
///
/// ```
/// use form_analytics::{DomNode, Page};
///
/// let page = Page::parse(r#"<form id="f"><input id="q" type="text"></form>"#);
/// let form = page.select_first("form#f").unwrap().unwrap();
/// assert_eq!(form.attribute("id"), Some("f"));
/// ```
pub struct Page {
    html: Html,
}

impl Page {
    /// Parse a full HTML document.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// The document node.
    pub fn root(&self) -> NodeRef<'_, Node> {
        self.html.tree.root()
    }

    /// All elements matching a CSS selector, in document order.
    pub fn select(&self, css: &str) -> Result<Vec<NodeRef<'_, Node>>> {
        let selector = parse_selector(css)?;
        Ok(self.html.select(&selector).map(|el| *el).collect())
    }

    /// The first element matching a CSS selector.
    pub fn select_first(&self, css: &str) -> Result<Option<NodeRef<'_, Node>>> {
        let selector = parse_selector(css)?;
        Ok(self.html.select(&selector).next().map(|el| *el))
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| TrackerError::InvalidSelector(format!("{css}: {e}")))
}
