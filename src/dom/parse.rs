// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tokenizer and tree builder for the document layer.
//!
//! This is not a full HTML5 parser and does not try to be: specification
//! documents are machine-published, well-nested markup, and the queries the
//! correlator needs (sections, headings, ids) only require getting start
//! tags, end tags, comments, and raw-text elements right. The builder is
//! lenient about tree shape, the way browsers are:
//!
//! - a stray end tag with no matching open element is ignored
//! - an end tag closes any elements left open inside it
//! - elements still open at end of input close there
//! - `<` not followed by markup is ordinary text
//!
//! What it will not accept is source that ends in the middle of markup (a
//! tag, comment, or quoted attribute left hanging at end of input). That is
//! how truncated files look, and annotating a truncated specification would
//! quietly drop the rest of the document on the next write.

use std::collections::HashMap;
use std::fmt;

use super::{decode_entities, Attr, Document, ElementData, Node, NodeId, NodeKind, Span};

/// Elements with no content and no end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Parse failure: the source ends in the middle of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnterminatedComment { line: usize },
    UnterminatedTag { line: usize },
    UnterminatedAttribute { line: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnterminatedComment { line } => {
                write!(f, "comment opened on line {} is never closed", line)
            }
            ParseError::UnterminatedTag { line } => {
                write!(f, "tag opened on line {} is never closed", line)
            }
            ParseError::UnterminatedAttribute { line } => {
                write!(f, "attribute value opened on line {} is never closed", line)
            }
        }
    }
}

impl std::error::Error for ParseError {}

pub(super) fn parse_document(source: &str) -> Result<Document, ParseError> {
    let mut parser = Parser {
        source,
        bytes: source.as_bytes(),
        pos: 0,
        nodes: Vec::new(),
        open: Vec::new(),
        by_id: HashMap::new(),
    };
    parser.run()?;
    Ok(Document {
        source: source.to_string(),
        nodes: parser.nodes,
        by_id: parser.by_id,
    })
}

struct Parser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    nodes: Vec<Node>,
    /// Stack of open elements; the top is the parent of new nodes
    open: Vec<NodeId>,
    by_id: HashMap<String, NodeId>,
}

impl Parser<'_> {
    fn run(&mut self) -> Result<(), ParseError> {
        while self.pos < self.bytes.len() {
            let text_start = self.pos;
            while self.pos < self.bytes.len() && !self.at_markup() {
                self.pos += 1;
            }
            if self.pos > text_start {
                self.push_node(NodeKind::Text(Span {
                    start: text_start,
                    end: self.pos,
                }));
            }
            if self.pos >= self.bytes.len() {
                break;
            }
            if self.starts_with("<!--") {
                self.comment()?;
            } else if self.starts_with("<!") {
                self.markup_declaration()?;
            } else if self.starts_with("</") {
                self.end_tag()?;
            } else {
                self.start_tag()?;
            }
        }
        // Elements still open close at end of input.
        while let Some(node) = self.open.pop() {
            self.close_at(node, self.bytes.len());
        }
        Ok(())
    }

    /// Does `pos` sit on a `<` that actually begins markup?
    fn at_markup(&self) -> bool {
        if self.bytes[self.pos] != b'<' {
            return false;
        }
        match self.peek(1) {
            Some(b'!') => true,
            Some(b'/') => matches!(self.peek(2), Some(b) if b.is_ascii_alphabetic()),
            Some(b) => b.is_ascii_alphabetic(),
            None => false,
        }
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.source[self.pos..].starts_with(prefix)
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn line_at(&self, offset: usize) -> usize {
        self.bytes[..offset].iter().filter(|&&b| b == b'\n').count() + 1
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let node = self.nodes.len();
        self.nodes.push(Node {
            kind,
            parent: self.open.last().copied(),
        });
        node
    }

    fn element_name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node].kind {
            NodeKind::Element(el) => Some(el.name.as_str()),
            _ => None,
        }
    }

    fn close_at(&mut self, node: NodeId, end: usize) {
        if let NodeKind::Element(el) = &mut self.nodes[node].kind {
            el.inner.end = end;
        }
    }

    fn comment(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        match self.source[start + 4..].find("-->") {
            Some(at) => {
                let end = start + 4 + at + 3;
                self.push_node(NodeKind::Comment(Span { start, end }));
                self.pos = end;
                Ok(())
            }
            None => Err(ParseError::UnterminatedComment {
                line: self.line_at(start),
            }),
        }
    }

    fn markup_declaration(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        match self.source[start..].find('>') {
            Some(at) => {
                let end = start + at + 1;
                self.push_node(NodeKind::Markup(Span { start, end }));
                self.pos = end;
                Ok(())
            }
            None => Err(ParseError::UnterminatedTag {
                line: self.line_at(start),
            }),
        }
    }

    /// Name characters for tags and attributes.
    fn name_token(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.bytes.len() && is_name_byte(self.bytes[self.pos]) {
            self.pos += 1;
        }
        self.source[start..self.pos].to_ascii_lowercase()
    }

    fn end_tag(&mut self) -> Result<(), ParseError> {
        let tag_start = self.pos;
        self.pos += 2;
        let name = self.name_token();
        loop {
            if self.pos >= self.bytes.len() {
                return Err(ParseError::UnterminatedTag {
                    line: self.line_at(tag_start),
                });
            }
            if self.bytes[self.pos] == b'>' {
                self.pos += 1;
                break;
            }
            self.pos += 1;
        }
        // Close the deepest matching open element, taking anything left open
        // inside it along. Unmatched end tags are ignored.
        if let Some(depth) = self
            .open
            .iter()
            .rposition(|&node| self.element_name(node) == Some(name.as_str()))
        {
            while self.open.len() > depth {
                if let Some(node) = self.open.pop() {
                    self.close_at(node, tag_start);
                }
            }
        }
        Ok(())
    }

    fn start_tag(&mut self) -> Result<(), ParseError> {
        let tag_start = self.pos;
        self.pos += 1;
        let name = self.name_token();
        let mut attrs: Vec<Attr> = Vec::new();
        let self_closing = loop {
            self.skip_whitespace();
            if self.pos >= self.bytes.len() {
                return Err(ParseError::UnterminatedTag {
                    line: self.line_at(tag_start),
                });
            }
            match self.bytes[self.pos] {
                b'>' => {
                    self.pos += 1;
                    break false;
                }
                b'/' if self.peek(1) == Some(b'>') => {
                    self.pos += 2;
                    break true;
                }
                b'/' => {
                    self.pos += 1;
                }
                _ => {
                    let attr = self.attribute(tag_start)?;
                    attrs.push(attr);
                }
            }
        };

        let id_value = attrs
            .iter()
            .find(|attr| attr.name == "id")
            .and_then(|attr| attr.value.clone());

        let node = self.push_node(NodeKind::Element(ElementData {
            start_tag: Span {
                start: tag_start,
                end: self.pos,
            },
            inner: Span {
                start: self.pos,
                end: self.pos,
            },
            name: name.clone(),
            attrs,
            self_closing,
            dirty: false,
        }));

        if let Some(id) = id_value {
            if !id.is_empty() {
                self.by_id.entry(id).or_insert(node);
            }
        }

        if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
            self.open.push(node);
            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                self.raw_text(&name);
            }
        }
        Ok(())
    }

    fn attribute(&mut self, tag_start: usize) -> Result<Attr, ParseError> {
        let name_start = self.pos;
        while self.pos < self.bytes.len() && !is_attr_name_end(self.bytes[self.pos]) {
            self.pos += 1;
        }
        let name = self.source[name_start..self.pos].to_ascii_lowercase();
        self.skip_whitespace();
        if self.peek(0) != Some(b'=') {
            return Ok(Attr { name, value: None });
        }
        self.pos += 1;
        self.skip_whitespace();
        match self.peek(0) {
            Some(quote) if quote == b'"' || quote == b'\'' => {
                self.pos += 1;
                let value_start = self.pos;
                while self.pos < self.bytes.len() && self.bytes[self.pos] != quote {
                    self.pos += 1;
                }
                if self.pos >= self.bytes.len() {
                    return Err(ParseError::UnterminatedAttribute {
                        line: self.line_at(tag_start),
                    });
                }
                let raw = &self.source[value_start..self.pos];
                self.pos += 1;
                Ok(Attr {
                    name,
                    value: Some(decode_entities(raw)),
                })
            }
            Some(_) => {
                let value_start = self.pos;
                while self.pos < self.bytes.len()
                    && !self.bytes[self.pos].is_ascii_whitespace()
                    && self.bytes[self.pos] != b'>'
                {
                    self.pos += 1;
                }
                let raw = &self.source[value_start..self.pos];
                Ok(Attr {
                    name,
                    value: Some(decode_entities(raw)),
                })
            }
            None => Err(ParseError::UnterminatedTag {
                line: self.line_at(tag_start),
            }),
        }
    }

    /// Consume raw content up to the matching end tag, which is left for the
    /// main loop. Missing end tag means the content runs to end of input.
    fn raw_text(&mut self, name: &str) {
        let content_start = self.pos;
        let needle = name.as_bytes();
        let mut at = self.pos;
        while at < self.bytes.len() {
            if self.bytes[at] == b'<'
                && at + 2 + needle.len() <= self.bytes.len()
                && self.bytes[at + 1] == b'/'
                && self.bytes[at + 2..at + 2 + needle.len()].eq_ignore_ascii_case(needle)
            {
                let after = self.bytes.get(at + 2 + needle.len());
                if matches!(after, None | Some(b'>') | Some(b'/'))
                    || after.is_some_and(|b| b.is_ascii_whitespace())
                {
                    break;
                }
            }
            at += 1;
        }
        if at > content_start {
            self.push_node(NodeKind::Text(Span {
                start: content_start,
                end: at,
            }));
        }
        self.pos = at;
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':' || b == b'_'
}

fn is_attr_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'=' || b == b'>' || b == b'/'
}
