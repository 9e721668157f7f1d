// ABOUTME: Main library entry point for peasoup, a scan-based HTML element extractor.
// ABOUTME: Re-exports the public API: Document, Query, Predicate, AttrValue, fragment parsers, Options and errors.

//! peasoup - element extraction from HTML text without building a full DOM.
//!
//! A [`Document`] strips comments and scripts once, then answers queries by
//! scanning the text with per-tag regular expressions. Only the fragments
//! that match are handed to a [`FragmentParser`] for structural parsing.
//!
//! # Example
//!
//! ```
//! use peasoup::{Document, Predicate};
//!
//! let doc = Document::new(r#"<html><body><p class="a">One</p><p class="b">Two</p></body></html>"#);
//! let found = doc.find_all("p", &Predicate::new().with("class", "b"), None);
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].text(), "Two");
//! assert!(doc.title().is_none());
//! ```

pub mod attrs;
pub mod boundary;
pub mod document;
pub mod error;
pub mod fragment;
pub mod options;
pub mod patterns;
pub mod preprocess;

pub use crate::attrs::{parse_attributes, AttrValue, Attributes, Predicate};
pub use crate::boundary::Span;
pub use crate::document::{Document, Query, ScanOutcome};
pub use crate::error::{ErrorCode, FragmentError, ScanError};
pub use crate::fragment::{Element, FragmentParser, HtmlFragmentParser, RawFragmentParser};
pub use crate::options::{DocumentBuilder, NestingStrategy, Options};
pub use crate::patterns::{TagPatternCache, TagPatterns};

pub use regex::Regex;
