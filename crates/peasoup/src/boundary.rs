// ABOUTME: End-boundary resolution for a located open tag in the presence of same-name nesting.
// ABOUTME: Uses only forward regex scans; the default heuristic trades exactness for simplicity.

//! Boundary resolution.
//!
//! Given an open tag found by the scanner, work out where its element ends.
//! Two strategies are available:
//!
//! - [`NestingStrategy::Heuristic`] walks close tags in document order and,
//!   for each one, looks for another open tag of the same name between the
//!   scan cursor and that close tag. If there is none, the close tag is the
//!   match. Otherwise the cursor moves past the nested open tag and the next
//!   close tag is tried. Nested self-closing tags and tags overlapping a
//!   close tag can throw it off.
//! - [`NestingStrategy::Balanced`] counts depth over interleaved open and
//!   close tags.
//!
//! Both fall back to the open tag alone when no end can be found.

use std::ops::Range;

use crate::options::NestingStrategy;
use crate::patterns::{is_self_closing, TagPatterns};

/// Byte range of one fragment within the cleaned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        &text[self.range()]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An open tag located by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenTag {
    pub start: usize,
    pub end: usize,
    pub self_closing: bool,
}

impl OpenTag {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Resolves the fragment span for `open` within `text`.
///
/// The returned span always starts at `open.start` and never ends before
/// `open.end`.
pub fn resolve(
    text: &str,
    open: OpenTag,
    patterns: &TagPatterns,
    strategy: NestingStrategy,
) -> Span {
    if open.self_closing {
        return open.span();
    }

    let end = match strategy {
        NestingStrategy::Heuristic => heuristic_end(text, open.end, patterns),
        NestingStrategy::Balanced => balanced_end(text, open.end, patterns),
    };

    match end {
        Some(end) => Span::new(open.start, end),
        None => {
            tracing::trace!(
                tag = patterns.name(),
                offset = open.start,
                "no matching close tag, using open tag alone"
            );
            open.span()
        }
    }
}

fn heuristic_end(text: &str, open_end: usize, patterns: &TagPatterns) -> Option<usize> {
    let mut cursor = open_end;
    for close in patterns.close().find_iter(&text[open_end..]) {
        let close_start = open_end + close.start();
        match patterns.open().find(&text[cursor..close_start]) {
            None => return Some(open_end + close.end()),
            // One nesting level to be absorbed by a later close tag
            Some(nested) => cursor += nested.end(),
        }
    }
    None
}

fn balanced_end(text: &str, open_end: usize, patterns: &TagPatterns) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = open_end;
    loop {
        let close = patterns.close().find_at(text, pos)?;
        let nested = patterns
            .open()
            .captures_at(text, pos)
            .and_then(|caps| caps.get(0).map(|m| (m.start(), m.end(), is_self_closing(&caps))));

        match nested {
            Some((start, end, self_closing)) if start < close.start() => {
                if !self_closing {
                    depth += 1;
                }
                pos = end;
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(close.end());
                }
                pos = close.end();
            }
        }
    }
}
