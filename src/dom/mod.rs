// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Span-preserving document layer for the HTML subset specifications use.
//!
//! Specifications are published documents with meaningful formatting, so the
//! usual parse/mutate/pretty-print cycle is off the table: rewriting a
//! 400 KB document to change two attributes would drown every diff in
//! incidental churn. This module keeps the original source alongside the
//! tree and records byte spans for every start tag, which lets
//! [`Document::serialize`] splice rebuilt start tags into an otherwise
//! byte-identical copy of the input.
//!
//! # Structure
//!
//! | Piece        | Representation                                        |
//! |--------------|-------------------------------------------------------|
//! | Tree         | Flat arena, `Vec<Node>`, indices are `NodeId`         |
//! | Order        | Arena index order is document order (nodes are pushed |
//! |              | when their start tag is read)                         |
//! | Start tags   | Byte span into the source, plus parsed attributes     |
//! | Content      | Byte span; `inner_html` is a slice of the source      |
//! | Mutation     | `set_attr` only; flips the element's `dirty` flag     |
//!
//! # Invariants
//!
//! - Arena order is document order. `section_ids` and `first_heading` lean on
//!   this instead of walking child lists.
//! - `serialize` touches only the start tags of dirty elements. Everything
//!   else, entities and whitespace included, round-trips byte for byte.
//! - Within a rebuilt start tag, attribute values come out double-quoted and
//!   minimally escaped; attribute order is preserved and new attributes
//!   append at the end. A second pass over already-rebuilt output is a
//!   fixpoint.
//! - Attribute values are entity-decoded at parse time, so a value written by
//!   `serialize` reads back as the same string on the next run.

mod parse;

pub use parse::ParseError;

use std::collections::HashMap;

/// Index into the document's node arena.
pub type NodeId = usize;

/// Half-open byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: usize,
    pub end: usize,
}

/// A parsed attribute. `value` is `None` for bare attributes like `hidden`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug)]
pub(crate) struct ElementData {
    /// Tag name, lowercased
    pub name: String,
    /// Attributes in source order; values entity-decoded
    pub attrs: Vec<Attr>,
    /// Byte span of the start tag, `<` through `>` inclusive
    pub start_tag: Span,
    /// Byte span of the content between start and end tag (empty for void
    /// and self-closing elements)
    pub inner: Span,
    pub self_closing: bool,
    /// Attributes changed since parse; start tag needs rebuilding
    pub dirty: bool,
}

#[derive(Debug)]
pub(crate) enum NodeKind {
    Element(ElementData),
    Text(Span),
    Comment(Span),
    /// Doctype and other `<!...>` declarations, kept verbatim
    Markup(Span),
}

#[derive(Debug)]
pub(crate) struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
}

/// A parsed document: source text plus an arena of nodes over it.
#[derive(Debug)]
pub struct Document {
    pub(crate) source: String,
    pub(crate) nodes: Vec<Node>,
    /// First element carrying each id, like `getElementById`
    pub(crate) by_id: HashMap<String, NodeId>,
}

impl Document {
    /// Parse a document from source text.
    pub fn parse(source: &str) -> Result<Document, ParseError> {
        parse::parse_document(source)
    }

    /// The original source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.nodes.get(node).map(|n| &n.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// Lowercased tag name, or `None` for non-element nodes.
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.name.as_str())
    }

    /// First element in document order carrying this id.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.by_id.get(id).copied()
    }

    /// The section element carrying this id.
    ///
    /// Ids are looked up among sectioning elements only; an id that lands on
    /// a paragraph or a figure does not make that node referenceable. When a
    /// non-section element shadows the id, the sections are scanned instead.
    pub fn section_by_id(&self, id: &str) -> Option<NodeId> {
        if let Some(node) = self.element_by_id(id) {
            if self.tag_name(node) == Some("section") {
                return Some(node);
            }
        }
        (0..self.nodes.len())
            .find(|&node| self.tag_name(node) == Some("section") && self.attr(node, "id") == Some(id))
    }

    /// Ids of all section elements, in document order. Sections without an
    /// id (or with a blank one) are skipped.
    pub fn section_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        for node in 0..self.nodes.len() {
            if self.tag_name(node) == Some("section") {
                match self.attr(node, "id") {
                    Some(id) if !id.is_empty() => ids.push(id.to_string()),
                    _ => {}
                }
            }
        }
        ids
    }

    fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.nodes[node].parent;
        while let Some(parent) = cursor {
            if parent == ancestor {
                return true;
            }
            cursor = self.nodes[parent].parent;
        }
        false
    }

    /// First heading element (`h1`..`h6`) inside this element's subtree, in
    /// document order. Matches `querySelector` traversal: a deep heading in
    /// an earlier child beats a shallow heading in a later one.
    pub fn first_heading(&self, root: NodeId) -> Option<NodeId> {
        let mut node = root + 1;
        // The subtree of `root` is a contiguous arena range (pre-order).
        while node < self.nodes.len() && self.is_descendant_of(node, root) {
            if let Some(name) = self.tag_name(node) {
                if matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") {
                    return Some(node);
                }
            }
            node += 1;
        }
        None
    }

    /// Raw source slice of the element's content, markup and entities
    /// intact. Empty for void elements and non-element nodes.
    ///
    /// This reads the parsed source; attribute edits elsewhere in the tree
    /// do not show up here.
    pub fn inner_html(&self, node: NodeId) -> &str {
        match self.element(node) {
            Some(el) => &self.source[el.inner.start..el.inner.end],
            None => "",
        }
    }

    /// Attribute value, entity-decoded. `None` for absent and bare
    /// attributes. Attribute names are matched lowercased.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attrs
            .iter()
            .find(|attr| attr.name == name)
            .and_then(|attr| attr.value.as_deref())
    }

    /// Set an attribute, replacing an existing value or appending a new
    /// attribute. Setting a value the element already has is a no-op and
    /// leaves the start tag untouched in the serialized output.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(NodeKind::Element(el)) = self.nodes.get_mut(node).map(|n| &mut n.kind) {
            match el.attrs.iter_mut().find(|attr| attr.name == name) {
                Some(attr) if attr.value.as_deref() == Some(value) => {}
                Some(attr) => {
                    attr.value = Some(value.to_string());
                    el.dirty = true;
                }
                None => {
                    el.attrs.push(Attr {
                        name: name.to_string(),
                        value: Some(value.to_string()),
                    });
                    el.dirty = true;
                }
            }
        }
    }

    /// Reproduce the source with the start tags of modified elements rebuilt
    /// in place. Unmodified content is copied byte for byte.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.source.len() + 256);
        let mut cursor = 0;
        for node in &self.nodes {
            if let NodeKind::Element(el) = &node.kind {
                if el.dirty {
                    // Start tags never overlap and arrive in source order.
                    debug_assert!(cursor <= el.start_tag.start);
                    out.push_str(&self.source[cursor..el.start_tag.start]);
                    out.push_str(&rebuild_start_tag(el));
                    cursor = el.start_tag.end;
                }
            }
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}

fn rebuild_start_tag(el: &ElementData) -> String {
    let mut tag = String::with_capacity(el.start_tag.end - el.start_tag.start + 32);
    tag.push('<');
    tag.push_str(&el.name);
    for attr in &el.attrs {
        tag.push(' ');
        tag.push_str(&attr.name);
        if let Some(value) = &attr.value {
            tag.push_str("=\"");
            tag.push_str(&escape_attr(value));
            tag.push('"');
        }
    }
    if el.self_closing {
        tag.push_str("/>");
    } else {
        tag.push('>');
    }
    tag
}

/// Escape an attribute value for a double-quoted position.
pub(crate) fn escape_attr(value: &str) -> String {
    if !value.contains(['&', '"', '<']) {
        return value.to_string();
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Decode the named entities `escape_attr` and common authoring produce.
/// Unknown and numeric entities pass through literally.
pub(crate) fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(at) = rest.find('&') {
        decoded.push_str(&rest[..at]);
        rest = &rest[at..];
        let replaced = [
            ("&amp;", "&"),
            ("&lt;", "<"),
            ("&gt;", ">"),
            ("&quot;", "\""),
            ("&apos;", "'"),
        ]
        .iter()
        .find(|(entity, _)| rest.starts_with(entity));
        match replaced {
            Some((entity, text)) => {
                decoded.push_str(text);
                rest = &rest[entity.len()..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}
