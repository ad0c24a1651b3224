//! Merging rendered XML fragments into existing descriptor documents.
//!
//! Documents are parsed with `roxmltree` into an owned tree of
//! [`XmlElement`]s, mutated in memory and serialized back as plain XML. Text
//! and comments of the existing document are kept as they are, so merging a
//! fragment only touches the entries it adds or replaces.
//!
//! Two merge policies exist (see [`ExtendMode`]):
//!
//! * `append` adds every element child of the fragment root to the document
//!   root, even when an equivalent entry is already there. Scaffolding the same
//!   widget twice therefore leaves two entries behind; remove the old one by
//!   hand or use `upsert`.
//! * `upsert` replaces the first child with the same tag name and `id`
//!   attribute and appends otherwise.
//!
//! # Examples
//!
//! ```
//! use mscaffold_core::xml::{merge, ExtendMode, XmlDocument};
//!
//! let mut doc = XmlDocument::parse("<widgets><widget id=\"a\"/></widgets>", "doc").unwrap();
//! let fragment = XmlDocument::parse("<widgets><widget id=\"b\"/></widgets>", "fragment").unwrap();
//!
//! let report = merge(&mut doc, &fragment, ExtendMode::Append).unwrap();
//! assert_eq!(report.appended, 1);
//! assert_eq!(doc.root().child_elements().count(), 2);
//! ```

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scaffold::write_new_file;

/// Attribute identifying an entry for upserts
pub const ID_ATTRIBUTE: &str = "id";

/// How fragment entries are incorporated into an existing document
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExtendMode {
    /// Always add fragment entries as new siblings
    #[default]
    Append,
    /// Replace an entry with the same tag and `id`, append otherwise
    Upsert,
}

impl fmt::Display for ExtendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Append => write!(f, "append"),
            Self::Upsert => write!(f, "upsert"),
        }
    }
}

/// A node below an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
    ProcessingInstruction { target: String, value: Option<String> },
}

impl XmlNode {
    /// Convert a non-element node; element children go through [`XmlElement::from_node`]
    fn from_misc(node: roxmltree::Node<'_, '_>) -> Option<Self> {
        match node.node_type() {
            roxmltree::NodeType::Text => {
                Some(Self::Text(node.text().unwrap_or_default().to_string()))
            }
            roxmltree::NodeType::Comment => {
                Some(Self::Comment(node.text().unwrap_or_default().to_string()))
            }
            roxmltree::NodeType::PI => node.pi().map(|pi| Self::ProcessingInstruction {
                target: pi.target.to_string(),
                value: pi.value.map(str::to_string),
            }),
            _ => None,
        }
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Self::Element(el) => el.write_to(out),
            Self::Text(text) => out.push_str(&escape_text(text)),
            Self::Comment(text) => {
                let _ = write!(out, "<!--{text}-->");
            }
            Self::ProcessingInstruction { target, value } => match value {
                Some(value) => {
                    let _ = write!(out, "<?{target} {value}?>");
                }
                None => {
                    let _ = write!(out, "<?{target}?>");
                }
            },
        }
    }
}

/// An element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Direct element children, skipping text and comments
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Concatenated direct text content
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whitespace that precedes the first element child, if any
    fn child_indent(&self) -> Option<String> {
        let first = self
            .children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(_)))?;
        match first.checked_sub(1).map(|i| &self.children[i]) {
            Some(XmlNode::Text(t)) if t.trim().is_empty() => Some(t.clone()),
            _ => None,
        }
    }

    /// Append an element after the existing children, keeping their indentation
    pub fn append_child(&mut self, child: XmlElement) {
        let has_trailing_space =
            matches!(self.children.last(), Some(XmlNode::Text(t)) if t.trim().is_empty());
        let trailing = if has_trailing_space {
            self.children.pop()
        } else {
            None
        };
        if let Some(indent) = self.child_indent() {
            self.children.push(XmlNode::Text(indent));
        }
        self.children.push(XmlNode::Element(child));
        if let Some(trailing) = trailing {
            self.children.push(trailing);
        }
    }

    /// Index of the first child element with the same tag and `id` as `entry`
    fn position_of_entry(&self, entry: &XmlElement) -> Option<usize> {
        self.children.iter().position(|node| match node {
            XmlNode::Element(el) => {
                el.name == entry.name && el.attribute(ID_ATTRIBUTE) == entry.attribute(ID_ATTRIBUTE)
            }
            _ => false,
        })
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut element = XmlElement::new(qualified_name(
            node,
            node.tag_name().namespace(),
            node.tag_name().name(),
        ));

        let parent_namespaces: Vec<(Option<&str>, &str)> = node
            .parent_element()
            .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
            .unwrap_or_default();
        for ns in node.namespaces() {
            if ns.name() == Some("xml") || parent_namespaces.contains(&(ns.name(), ns.uri())) {
                continue;
            }
            let name = match ns.name() {
                Some(prefix) => format!("xmlns:{prefix}"),
                None => "xmlns".to_string(),
            };
            element.attributes.push((name, ns.uri().to_string()));
        }

        for attr in node.attributes() {
            element.attributes.push((
                qualified_name(node, attr.namespace(), attr.name()),
                attr.value().to_string(),
            ));
        }

        element.children = node
            .children()
            .filter_map(|child| {
                if child.is_element() {
                    Some(XmlNode::Element(Self::from_node(child)))
                } else {
                    XmlNode::from_misc(child)
                }
            })
            .collect();
        element
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escaper for attribute values, also used for XML template output
pub(crate) fn escape_attr(value: &str) -> String {
    escape_text(value)
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

/// An owned XML document.
///
/// Comments and processing instructions around the root element are kept in
/// `prolog` and `epilog`; whitespace between them is normalized to newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    prolog: Vec<XmlNode>,
    root: XmlElement,
    epilog: Vec<XmlNode>,
}

impl XmlDocument {

    /// Parse XML text; `origin` names the source in error messages
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let document = roxmltree::Document::parse(text).map_err(|e| Error::XmlParse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        let root = document.root_element();
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut seen_root = false;
        for node in document.root().children() {
            if node == root {
                seen_root = true;
                continue;
            }
            if node.is_text() {
                continue;
            }
            if let Some(misc) = XmlNode::from_misc(node) {
                if seen_root {
                    epilog.push(misc);
                } else {
                    prolog.push(misc);
                }
            }
        }
        Ok(Self {
            prolog,
            root: XmlElement::from_node(root),
            epilog,
        })
    }

    /// Read and parse a document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::file_io(path, e))?;
        Self::parse(&text, &path.display().to_string())
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Serialize with an XML declaration and a trailing newline
    pub fn to_xml_string(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\"?>\n");
        for node in &self.prolog {
            node.write_to(&mut out);
            out.push('\n');
        }
        self.root.write_to(&mut out);
        out.push('\n');
        for node in &self.epilog {
            node.write_to(&mut out);
            out.push('\n');
        }
        out
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_xml_string()).map_err(|e| Error::file_io(path, e))
    }
}

/// What a merge did to the document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub appended: usize,
    pub replaced: usize,
}

/// Merge the element children of `fragment`'s root into `document`'s root
pub fn merge(
    document: &mut XmlDocument,
    fragment: &XmlDocument,
    mode: ExtendMode,
) -> Result<MergeReport> {
    if document.root.name != fragment.root.name {
        return Err(Error::XmlRootMismatch {
            expected: document.root.name.clone(),
            found: fragment.root.name.clone(),
        });
    }

    let mut report = MergeReport::default();
    for entry in fragment.root.child_elements() {
        let existing = match mode {
            ExtendMode::Append => None,
            ExtendMode::Upsert => document.root.position_of_entry(entry),
        };
        match existing {
            Some(index) => {
                log::debug!("Replacing <{}> entry at position {}", entry.name, index);
                document.root.children[index] = XmlNode::Element(entry.clone());
                report.replaced += 1;
            }
            None => {
                document.root.append_child(entry.clone());
                report.appended += 1;
            }
        }
    }
    Ok(report)
}

/// Merge a rendered fragment into the document stored at `path` and write it back
pub fn merge_file(path: impl AsRef<Path>, fragment: &str, mode: ExtendMode) -> Result<MergeReport> {
    let path = path.as_ref();
    let mut document = XmlDocument::load(path)?;
    let fragment = XmlDocument::parse(fragment, "rendered fragment")?;
    let report = merge(&mut document, &fragment, mode)?;
    document.save(path)?;
    log::info!(
        "Merged into {} ({} appended, {} replaced)",
        path.display(),
        report.appended,
        report.replaced
    );
    Ok(report)
}

/// Result of [`create_or_merge`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorOutcome {
    /// The file did not exist and was written from the full document
    Created,
    /// The fragment was merged into the existing file
    Updated(MergeReport),
}

/// Write the full document when `path` is absent, otherwise merge the fragment into it.
///
/// Only the branch that runs renders its input.
pub fn create_or_merge<F, G>(
    path: impl AsRef<Path>,
    mode: ExtendMode,
    render_document: F,
    render_fragment: G,
) -> Result<DescriptorOutcome>
where
    F: FnOnce() -> Result<String>,
    G: FnOnce() -> Result<String>,
{
    let path = path.as_ref();
    if path.exists() {
        let report = merge_file(path, &render_fragment()?, mode)?;
        return Ok(DescriptorOutcome::Updated(report));
    }

    let text = render_document()?;
    XmlDocument::parse(&text, "rendered document")?;
    write_new_file(path, &text)?;
    Ok(DescriptorOutcome::Created)
}
