// ABOUTME: Fragment parsers that turn one matched fragment's text into a structured element.
// ABOUTME: Provides the FragmentParser trait, a scraper-backed HtmlFragmentParser, and RawFragmentParser.

//! Fragment parsing.
//!
//! The scanner never builds a tree itself. Each accepted fragment is handed to
//! a [`FragmentParser`], which is free to produce whatever element type suits
//! the caller.

use ego_tree::NodeId;
use scraper::{ElementRef, Html};

use crate::attrs::Attributes;
use crate::error::FragmentError;

/// Converts one fragment into an element.
pub trait FragmentParser {
    type Element;

    fn parse_fragment(&self, fragment: &str) -> Result<Self::Element, FragmentError>;
}

/// Returns the fragment text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFragmentParser;

impl FragmentParser for RawFragmentParser {
    type Element = String;

    fn parse_fragment(&self, fragment: &str) -> Result<String, FragmentError> {
        Ok(fragment.to_string())
    }
}

/// Parses fragments with html5ever through `scraper`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFragmentParser;

impl FragmentParser for HtmlFragmentParser {
    type Element = Element;

    fn parse_fragment(&self, fragment: &str) -> Result<Element, FragmentError> {
        let name = leading_tag_name(fragment).ok_or(FragmentError::NoElement)?;

        // Fragment parsing runs in a <body> context, which drops table parts
        // unless they sit inside a table, and drops document-level tags such
        // as <html>, <head> and <body>; those need a full parse.
        let html = match table_context(&name) {
            Some((open, close)) => Html::parse_fragment(&format!("{open}{fragment}{close}")),
            None => Html::parse_fragment(fragment),
        };
        // Skip the synthetic <html> root the fragment parser adds
        let id = html
            .root_element()
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == name)
            .map(|el| el.id());
        if let Some(id) = id {
            return Ok(Element::new(html, id, fragment));
        }

        let html = Html::parse_document(fragment);
        let id = html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == name)
            .map(|el| el.id())
            .ok_or(FragmentError::NoElement)?;
        Ok(Element::new(html, id, fragment))
    }
}

/// Wrapper markup that gives a table part the parent it needs to survive parsing.
fn table_context(name: &str) -> Option<(&'static str, &'static str)> {
    match name {
        "td" | "th" => Some(("<table><tbody><tr>", "</tr></tbody></table>")),
        "tr" => Some(("<table><tbody>", "</tbody></table>")),
        "col" => Some(("<table><colgroup>", "</colgroup></table>")),
        "thead" | "tbody" | "tfoot" | "caption" | "colgroup" => Some(("<table>", "</table>")),
        _ => None,
    }
}

/// Lowercased tag name at the start of a fragment.
fn leading_tag_name(fragment: &str) -> Option<String> {
    let rest = fragment.strip_prefix('<')?;
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    Some(rest[..end].to_ascii_lowercase())
}

/// A parsed element together with the fragment it came from.
#[derive(Debug, Clone)]
pub struct Element {
    html: Html,
    id: NodeId,
    source: String,
}

impl Element {
    fn new(html: Html, id: NodeId, source: &str) -> Self {
        Self {
            html,
            id,
            source: source.to_string(),
        }
    }

    /// The element as a `scraper` node, for tree navigation.
    pub fn element_ref(&self) -> ElementRef<'_> {
        self.html
            .tree
            .get(self.id)
            .and_then(ElementRef::wrap)
            .expect("element id belongs to its own tree")
    }

    /// Lowercased tag name.
    pub fn name(&self) -> &str {
        self.element_ref().value().name()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element_ref().value().attr(name)
    }

    pub fn attrs(&self) -> Attributes {
        self.element_ref()
            .value()
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        self.element_ref().text().collect()
    }

    pub fn inner_html(&self) -> String {
        self.element_ref().inner_html()
    }

    /// Serialized outer HTML as produced by the parser.
    pub fn html(&self) -> String {
        self.element_ref().html()
    }

    /// The fragment text this element was parsed from.
    pub fn fragment(&self) -> &str {
        &self.source
    }

    /// Child elements, skipping text and comment nodes.
    pub fn children(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.element_ref().children().filter_map(ElementRef::wrap)
    }
}
