// ABOUTME: Configuration for documents including NestingStrategy, Options, and DocumentBuilder.
// ABOUTME: DocumentBuilder provides a fluent API for choosing the pattern cache and fragment parser.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::document::Document;
use crate::fragment::{FragmentParser, HtmlFragmentParser};
use crate::patterns::TagPatternCache;

/// How the end of a non-self-closing element is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestingStrategy {
    /// Forward scan that absorbs one nested open tag per close tag.
    #[default]
    Heuristic,
    /// Depth counting over open and close tags.
    Balanced,
}

impl fmt::Display for NestingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NestingStrategy::Heuristic => "heuristic",
            NestingStrategy::Balanced => "balanced",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for NestingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heuristic" => Ok(NestingStrategy::Heuristic),
            "balanced" | "strict" => Ok(NestingStrategy::Balanced),
            other => Err(format!("unknown nesting strategy: {other}")),
        }
    }
}

/// Document configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub nesting: NestingStrategy,
    pub strip_scripts: bool,
    pub require_html: bool,
    /// Also report matches nested inside an earlier result.
    pub nested: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            nesting: NestingStrategy::Heuristic,
            strip_scripts: true,
            require_html: true,
            nested: false,
        }
    }
}

/// Builder for constructing documents with custom configuration.
#[derive(Debug, Clone)]
pub struct DocumentBuilder<P = HtmlFragmentParser> {
    opts: Options,
    cache: Option<Arc<TagPatternCache>>,
    parser: P,
}

impl DocumentBuilder<HtmlFragmentParser> {
    /// Create a new DocumentBuilder with default options and the HTML parser.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
            cache: None,
            parser: HtmlFragmentParser,
        }
    }
}

impl Default for DocumentBuilder<HtmlFragmentParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: FragmentParser> DocumentBuilder<P> {
    /// Set the nesting strategy.
    pub fn nesting(mut self, nesting: NestingStrategy) -> Self {
        self.opts.nesting = nesting;
        self
    }

    /// Enable or disable script block removal.
    pub fn strip_scripts(mut self, strip: bool) -> Self {
        self.opts.strip_scripts = strip;
        self
    }

    /// Require an `<html` or `/html>` marker before scanning anything.
    pub fn require_html(mut self, require: bool) -> Self {
        self.opts.require_html = require;
        self
    }

    /// Report elements nested inside an earlier result as well.
    pub fn nested(mut self, nested: bool) -> Self {
        self.opts.nested = nested;
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, opts: Options) -> Self {
        self.opts = opts;
        self
    }

    /// Use an existing pattern cache.
    pub fn cache(mut self, cache: Arc<TagPatternCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use the process-wide pattern cache.
    pub fn shared_cache(self) -> Self {
        self.cache(TagPatternCache::shared())
    }

    /// Use a different fragment parser.
    pub fn parser<Q: FragmentParser>(self, parser: Q) -> DocumentBuilder<Q> {
        DocumentBuilder {
            opts: self.opts,
            cache: self.cache,
            parser,
        }
    }

    /// Preprocess `raw` and build the document.
    pub fn build(self, raw: &str) -> Document<P> {
        let cache = self.cache.unwrap_or_default();
        Document::from_parts(raw, self.opts, cache, self.parser)
    }
}
