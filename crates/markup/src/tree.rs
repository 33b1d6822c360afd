// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Owned markup trees.
//!
//! Documents are parsed with `roxmltree` and copied into an owned, mutable
//! [`MarkupTree`] so that observed output can be rewritten and merged into a
//! report. Names in a namespace other than SVG or XHTML use Clark notation
//! (`{uri}local`); SVG and XHTML elements keep their plain local names, which
//! lets expected markup embedded in an XHTML suite compare against the
//! standalone SVG a renderer prints.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::sync::LazyLock;
use thiserror::Error;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const FONTTEST_NS: &str = "https://github.com/OpenType/fonttest";

/// Local `url(#name)` references, as in `clip-path`, `fill` or `style`.
static URL_REFERENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(url\(\s*['"]?#)"#).ok());

/// Build the name used for an element or attribute in a [`MarkupTree`].
pub fn qualified_name(namespace: Option<&str>, local: &str) -> String {
    match namespace {
        None | Some(SVG_NS) | Some(XHTML_NS) => local.to_string(),
        Some(ns) => format!("{{{}}}{}", ns, local),
    }
}

/// Markup could not be parsed.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("malformed markup: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// A name/value attribute pair. Attribute order is preserved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Child of an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(MarkupTree),
    Text(String),
}

/// An element with its attributes and children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkupTree {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl MarkupTree {
    /// Create an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute (builder style)
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Append a child element (builder style)
    pub fn with_child(mut self, child: MarkupTree) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Append a text node (builder style)
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Parse a complete document and return its root element.
    ///
    /// A DOCTYPE declaration is accepted, since suite files are XHTML.
    pub fn parse(source: &str) -> Result<Self, MarkupError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = roxmltree::Document::parse_with_options(source, options)?;
        Ok(Self::from_node(doc.root_element()))
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let name = node.tag_name();
        let mut tree = Self::new(qualified_name(name.namespace(), name.name()));
        tree.attributes = node
            .attributes()
            .map(|attr| Attribute {
                name: qualified_name(attr.namespace(), attr.name()),
                value: attr.value().to_string(),
            })
            .collect();
        for child in node.children() {
            if child.is_element() {
                tree.children.push(Node::Element(Self::from_node(child)));
            } else if child.is_text() {
                if let Some(text) = child.text() {
                    tree.children.push(Node::Text(text.to_string()));
                }
            }
        }
        tree
    }

    /// Value of an attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// Element children in document order; text is skipped.
    pub fn elements(&self) -> impl Iterator<Item = &MarkupTree> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// First element child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&MarkupTree> {
        self.elements().find(|element| element.tag == tag)
    }

    /// Concatenated text of the direct children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Replace all direct text with a single leading text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.retain(|child| matches!(child, Node::Element(_)));
        self.children.insert(0, Node::Text(text.into()));
    }

    /// This element and all of its descendants in document order.
    pub fn descendants(&self) -> Vec<&MarkupTree> {
        let mut found = vec![self];
        for element in self.elements() {
            found.extend(element.descendants());
        }
        found
    }

    /// Visit this element and every descendant in document order.
    pub fn visit_mut<F: FnMut(&mut MarkupTree)>(&mut self, f: &mut F) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.visit_mut(f);
            }
        }
    }

    /// Prefix every `id` in the tree and rewrite local references to them.
    ///
    /// `href` and `xlink:href` values of the form `#name` and every
    /// `url(#name)` in any attribute value point at `<prefix>name`
    /// afterwards, so a prefixed copy can live in the same document as the
    /// original without identifier clashes.
    pub fn prefix_ids(&mut self, prefix: &str) {
        let xlink_href = qualified_name(Some(XLINK_NS), "href");
        self.visit_mut(&mut |element| {
            for attr in &mut element.attributes {
                if attr.name == "id" {
                    attr.value = format!("{}{}", prefix, attr.value);
                } else if attr.name == "href" || attr.name == xlink_href {
                    if let Some(target) = attr.value.strip_prefix('#') {
                        attr.value = format!("#{}{}", prefix, target);
                    }
                } else if let Cow::Owned(rewritten) = prefix_url_references(&attr.value, prefix) {
                    attr.value = rewritten;
                }
            }
        });
    }

    /// Serialize without added whitespace.
    pub fn to_markup_string(&self) -> String {
        Serializer::new(self, None).finish(self)
    }

    /// Serialize with one element per line, for line diffs.
    pub fn to_pretty_string(&self) -> String {
        Serializer::new(self, Some(2)).finish(self)
    }
}

impl fmt::Display for MarkupTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup_string())
    }
}

/// Writes a tree as XML, declaring prefixes for every namespace it uses.
struct Serializer {
    prefixes: BTreeMap<String, String>,
    indent: Option<usize>,
    out: String,
}

impl Serializer {
    fn new(root: &MarkupTree, indent: Option<usize>) -> Self {
        let mut prefixes = BTreeMap::new();
        let mut generated = 0;
        for element in root.descendants() {
            let names = std::iter::once(&element.tag)
                .chain(element.attributes.iter().map(|attr| &attr.name));
            for name in names {
                let Some((ns, _)) = split_clark(name) else {
                    continue;
                };
                if prefixes.contains_key(ns) {
                    continue;
                }
                let prefix = match ns {
                    XLINK_NS => "xlink".to_string(),
                    FONTTEST_NS => "ft".to_string(),
                    _ => {
                        generated += 1;
                        format!("ns{}", generated)
                    }
                };
                prefixes.insert(ns.to_string(), prefix);
            }
        }
        Self {
            prefixes,
            indent,
            out: String::new(),
        }
    }

    fn finish(mut self, root: &MarkupTree) -> String {
        self.element(root, 0, true);
        self.out
    }

    fn name(&self, name: &str) -> String {
        match split_clark(name) {
            Some((ns, local)) => match self.prefixes.get(ns) {
                Some(prefix) => format!("{}:{}", prefix, local),
                None => local.to_string(),
            },
            None => name.to_string(),
        }
    }

    fn element(&mut self, element: &MarkupTree, depth: usize, is_root: bool) {
        let tag = self.name(&element.tag);
        let _ = write!(self.out, "<{}", tag);
        if is_root {
            let declarations: Vec<String> = self
                .prefixes
                .iter()
                .map(|(ns, prefix)| format!(" xmlns:{}=\"{}\"", prefix, escape(ns, true)))
                .collect();
            for declaration in declarations {
                self.out.push_str(&declaration);
            }
        }
        for attr in &element.attributes {
            let name = self.name(&attr.name);
            let _ = write!(self.out, " {}=\"{}\"", name, escape(&attr.value, true));
        }
        if element.children.is_empty() {
            self.out.push_str("/>");
            return;
        }
        self.out.push('>');

        // Only indent elements whose content is purely structural.
        let structural = element.children.iter().all(|child| match child {
            Node::Element(_) => true,
            Node::Text(text) => text.trim().is_empty(),
        });
        let indent = self.indent.filter(|_| structural);

        for child in &element.children {
            match child {
                Node::Element(child) => {
                    if let Some(width) = indent {
                        self.newline(width * (depth + 1));
                    }
                    self.element(child, depth + 1, false);
                }
                Node::Text(text) => {
                    if indent.is_none() {
                        self.out.push_str(&escape(text, false));
                    }
                }
            }
        }
        if let Some(width) = indent {
            self.newline(width * depth);
        }
        let _ = write!(self.out, "</{}>", tag);
    }

    fn newline(&mut self, spaces: usize) {
        self.out.push('\n');
        self.out.extend(std::iter::repeat(' ').take(spaces));
    }
}

fn prefix_url_references<'a>(value: &'a str, prefix: &str) -> Cow<'a, str> {
    match URL_REFERENCE.as_ref() {
        Some(re) => re.replace_all(value, |caps: &Captures<'_>| format!("{}{}", &caps[1], prefix)),
        None => Cow::Borrowed(value),
    }
}

fn split_clark(name: &str) -> Option<(&str, &str)> {
    name.strip_prefix('{')?.split_once('}')
}

fn escape(text: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            '\n' if attribute => escaped.push_str("&#10;"),
            '\t' if attribute => escaped.push_str("&#9;"),
            '\r' => escaped.push_str("&#13;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
