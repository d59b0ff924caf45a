// HTML fragment trees for structural comparison.
//
// Parses with html5ever into an RcDom, then copies the element structure of
// the fragment (the element children of <head> followed by those of <body>)
// into an owned tree. Text, comments and doctypes are not carried over.
//
// The input is parsed behind an HTML5 doctype so the tree builder stays in
// no-quirks mode, matching fragment parsing (e.g. `<table>` closes an open `<p>`).

use std::io::Read;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

const NO_QUIRKS_DOCTYPE: &str = "<!DOCTYPE html>";

const HTML_NS: &str = "http://www.w3.org/1999/xhtml";
const SVG_NS: &str = "http://www.w3.org/2000/svg";
const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";

/// The kind of element node, as determined by its namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Html,
    Svg,
    MathMl,
    Other,
}

impl ElementKind {
    fn from_namespace(ns: &str) -> Self {
        match ns {
            HTML_NS => ElementKind::Html,
            SVG_NS => ElementKind::Svg,
            MATHML_NS => ElementKind::MathMl,
            _ => ElementKind::Other,
        }
    }
}

/// An element in a parsed fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    /// Local tag name as produced by the parser.
    pub name: String,
    /// Attributes in source order. Names are unique.
    pub attributes: Vec<(String, String)>,
    /// Element children in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// An HTML element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Html,
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse an HTML fragment into its top-level elements.
///
/// ```
/// let nodes = mdconform::fragment::parse("<p><em>a</em></p>\n");
/// assert_eq!(nodes.len(), 1);
/// assert_eq!(nodes[0].name, "p");
/// assert_eq!(nodes[0].children[0].name, "em");
/// ```
pub fn parse(html: &str) -> Vec<Element> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut NO_QUIRKS_DOCTYPE.as_bytes().chain(html.as_bytes()))
        .unwrap_or_else(|_| RcDom::default());

    let mut elements = Vec::new();
    for node in dom.document.children.borrow().iter() {
        if local_name(node) != Some("html") {
            continue;
        }
        for section in node.children.borrow().iter() {
            if matches!(local_name(section), Some("head" | "body")) {
                elements.extend(element_children(section));
            }
        }
    }
    elements
}

fn local_name(handle: &Handle) -> Option<&str> {
    match handle.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

fn element_children(handle: &Handle) -> Vec<Element> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(to_element)
        .collect()
}

fn to_element(handle: &Handle) -> Option<Element> {
    let NodeData::Element {
        ref name,
        ref attrs,
        ref template_contents,
        ..
    } = handle.data
    else {
        return None;
    };

    let attributes = attrs
        .borrow()
        .iter()
        .map(|attr| {
            let local = &*attr.name.local;
            let key = match &attr.name.prefix {
                Some(prefix) => format!("{}:{local}", &**prefix),
                None => local.to_string(),
            };
            (key, attr.value.to_string())
        })
        .collect();

    // <template> keeps its content in a separate document fragment.
    let children = match template_contents.borrow().as_ref() {
        Some(contents) => element_children(contents),
        None => element_children(handle),
    };

    Some(Element {
        kind: ElementKind::from_namespace(&name.ns),
        name: name.local.as_ref().to_string(),
        attributes,
        children,
    })
}
