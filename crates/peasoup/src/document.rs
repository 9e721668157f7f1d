// ABOUTME: Document and query engine: scans cleaned text for matching tags and parses each fragment.
// ABOUTME: Lenient methods return partial results on failure; scan and try_find_all expose the cause.

use std::sync::Arc;

use crate::attrs::{parse_attributes, AttrValue, Predicate};
use crate::boundary::{self, OpenTag, Span};
use crate::error::ScanError;
use crate::fragment::{FragmentParser, HtmlFragmentParser};
use crate::options::{DocumentBuilder, Options};
use crate::patterns::{attr_text, is_self_closing, TagPatternCache, TagPatterns};
use crate::preprocess;

/// Elements collected by a scan, plus the error that stopped it early, if any.
#[derive(Debug)]
pub struct ScanOutcome<E> {
    pub elements: Vec<E>,
    pub error: Option<ScanError>,
}

impl<E> ScanOutcome<E> {
    fn empty() -> Self {
        Self {
            elements: Vec::new(),
            error: None,
        }
    }

    /// True if the scan ran to completion or to its limit.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Converts to a strict result, discarding partial elements on error.
    pub fn into_result(self) -> Result<Vec<E>, ScanError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.elements),
        }
    }
}

/// A preprocessed document that can be queried by tag name and attributes.
///
/// The cleaned text is computed once at construction. A document whose text
/// carries no HTML marker answers every query with nothing.
#[derive(Debug)]
pub struct Document<P = HtmlFragmentParser> {
    raw: String,
    cleaned: Option<String>,
    opts: Options,
    cache: Arc<TagPatternCache>,
    parser: P,
}

impl Document<HtmlFragmentParser> {
    /// Builds a document with default options, a private pattern cache and
    /// the HTML fragment parser.
    pub fn new(raw: &str) -> Self {
        DocumentBuilder::new().build(raw)
    }

    pub fn builder() -> DocumentBuilder<HtmlFragmentParser> {
        DocumentBuilder::new()
    }
}

impl<P: FragmentParser> Document<P> {
    pub(crate) fn from_parts(
        raw: &str,
        opts: Options,
        cache: Arc<TagPatternCache>,
        parser: P,
    ) -> Self {
        let cleaned = if opts.require_html {
            preprocess::clean(raw, opts.strip_scripts)
        } else {
            Some(preprocess::strip(raw, opts.strip_scripts))
        };
        Self {
            raw: raw.to_string(),
            cleaned,
            opts,
            cache,
            parser,
        }
    }

    /// False if the text was classified as non-HTML.
    pub fn is_html(&self) -> bool {
        self.cleaned.is_some()
    }

    /// Text as given at construction.
    pub fn raw_text(&self) -> &str {
        &self.raw
    }

    /// Text after comment and script removal.
    pub fn cleaned_text(&self) -> Option<&str> {
        self.cleaned.as_deref()
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn cache(&self) -> &Arc<TagPatternCache> {
        &self.cache
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Finds elements named `name` whose attributes satisfy `attrs`, in
    /// document order, stopping after `limit` results.
    ///
    /// Failures stop the scan and are logged; whatever was collected before
    /// is returned. Use [`Document::scan`] to see the failure.
    pub fn find_all(&self, name: &str, attrs: &Predicate, limit: Option<usize>) -> Vec<P::Element> {
        let outcome = self.scan(name, attrs, limit);
        if let Some(err) = &outcome.error {
            tracing::debug!(
                error = %err,
                kept = outcome.elements.len(),
                "scan stopped early, returning partial results"
            );
        }
        outcome.elements
    }

    /// First matching element, if any.
    pub fn find(&self, name: &str, attrs: &Predicate) -> Option<P::Element> {
        self.find_all(name, attrs, Some(1)).into_iter().next()
    }

    /// The document's `<title>` element, if any.
    pub fn title(&self) -> Option<P::Element> {
        self.find("title", &Predicate::new())
    }

    /// Like [`Document::find_all`], but fails on the first error.
    pub fn try_find_all(
        &self,
        name: &str,
        attrs: &Predicate,
        limit: Option<usize>,
    ) -> Result<Vec<P::Element>, ScanError> {
        self.scan(name, attrs, limit).into_result()
    }

    /// Runs a scan and reports both the elements and any error that cut it short.
    pub fn scan(&self, name: &str, attrs: &Predicate, limit: Option<usize>) -> ScanOutcome<P::Element> {
        let mut outcome = ScanOutcome::empty();
        let Some(text) = self.cleaned.as_deref() else {
            return outcome;
        };
        if limit == Some(0) {
            return outcome;
        }

        let patterns = match self.cache.get(name) {
            Ok(patterns) => patterns,
            Err(err) => {
                outcome.error = Some(ScanError::pattern(name, err));
                return outcome;
            }
        };

        for span in self.spans(text, &patterns, attrs) {
            match self.parser.parse_fragment(span.slice(text)) {
                Ok(element) => outcome.elements.push(element),
                Err(err) => {
                    outcome.error = Some(ScanError::fragment(name, err));
                    break;
                }
            }
            if limit.is_some_and(|n| outcome.elements.len() >= n) {
                break;
            }
        }
        outcome
    }

    /// Resolved fragment texts for matching elements, without parsing them.
    pub fn fragments(&self, name: &str, attrs: &Predicate, limit: Option<usize>) -> Vec<&str> {
        let Some(text) = self.cleaned.as_deref() else {
            return Vec::new();
        };
        let patterns = match self.cache.get(name) {
            Ok(patterns) => patterns,
            Err(err) => {
                tracing::debug!(error = %err, tag = name, "tag pattern failed to compile");
                return Vec::new();
            }
        };
        self.spans(text, &patterns, attrs)
            .take(limit.unwrap_or(usize::MAX))
            .map(|span| span.slice(text))
            .collect()
    }

    /// Starts a query builder for `name`.
    pub fn query(&self, name: impl Into<String>) -> Query<'_, P> {
        Query {
            doc: self,
            name: name.into(),
            positional: Predicate::new(),
            named: Predicate::new(),
            limit: None,
        }
    }

    fn spans<'a>(&self, text: &'a str, patterns: &'a TagPatterns, attrs: &'a Predicate) -> Spans<'a> {
        Spans {
            text,
            patterns,
            attrs,
            opts: self.opts,
            pos: 0,
        }
    }
}

/// Iterator over the spans of accepted open tags, in document order.
struct Spans<'a> {
    text: &'a str,
    patterns: &'a TagPatterns,
    attrs: &'a Predicate,
    opts: Options,
    pos: usize,
}

impl Iterator for Spans<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        loop {
            let caps = self.patterns.open().captures_at(self.text, self.pos)?;
            let whole = caps.get(0)?;
            self.pos = whole.end();

            if !self.attrs.matches(&parse_attributes(attr_text(&caps))) {
                continue;
            }

            let open = OpenTag {
                start: whole.start(),
                end: whole.end(),
                self_closing: is_self_closing(&caps),
            };
            let span = boundary::resolve(self.text, open, self.patterns, self.opts.nesting);
            if !self.opts.nested {
                self.pos = span.end;
            }
            return Some(span);
        }
    }
}

/// Fluent query against a document.
///
/// Attributes given through [`Query::attrs`] form the positional mapping;
/// those given through [`Query::attr`] override it key by key.
#[derive(Debug)]
pub struct Query<'d, P> {
    doc: &'d Document<P>,
    name: String,
    positional: Predicate,
    named: Predicate,
    limit: Option<usize>,
}

impl<'d, P: FragmentParser> Query<'d, P> {
    /// Set the positional attribute mapping.
    pub fn attrs(mut self, attrs: Predicate) -> Self {
        self.positional = attrs;
        self
    }

    /// Require an attribute value, overriding the positional mapping.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.named.insert(name, value);
        self
    }

    /// Stop after `n` results.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// The merged predicate this query will apply.
    pub fn predicate(&self) -> Predicate {
        Predicate::merge(&self.positional, &self.named)
    }

    pub fn all(&self) -> Vec<P::Element> {
        self.doc.find_all(&self.name, &self.predicate(), self.limit)
    }

    pub fn first(&self) -> Option<P::Element> {
        self.doc.find(&self.name, &self.predicate())
    }

    pub fn scan(&self) -> ScanOutcome<P::Element> {
        self.doc.scan(&self.name, &self.predicate(), self.limit)
    }

    pub fn try_all(&self) -> Result<Vec<P::Element>, ScanError> {
        self.doc.try_find_all(&self.name, &self.predicate(), self.limit)
    }

    pub fn fragments(&self) -> Vec<&'d str> {
        self.doc.fragments(&self.name, &self.predicate(), self.limit)
    }
}
