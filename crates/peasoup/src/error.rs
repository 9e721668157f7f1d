// ABOUTME: Error types for tag scanning including ErrorCode, ScanError and FragmentError.
// ABOUTME: Scan errors are suppressed by the lenient query methods and surfaced by the strict ones.

use std::fmt;

use thiserror::Error;

/// Errors a fragment parser can report for one fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    /// The fragment parsed, but produced no element node.
    #[error("fragment produced no element")]
    NoElement,

    /// Any other parser-specific failure.
    #[error("fragment parse failed: {0}")]
    Other(String),
}

impl FragmentError {
    /// Creates an Other error with a custom message.
    pub fn other(msg: impl Into<String>) -> Self {
        FragmentError::Other(msg.into())
    }
}

/// Categories of scan failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Pattern,
    Fragment,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Pattern => "pattern error",
            ErrorCode::Fragment => "fragment error",
        };
        write!(f, "{}", s)
    }
}

/// An error that stopped a scan early.
#[derive(Debug, Error)]
pub struct ScanError {
    pub code: ErrorCode,
    pub tag: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peasoup: scanning <{}>: {}", self.tag, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ScanError {
    /// Create a Pattern error from a failed regex compilation.
    pub fn pattern(tag: impl Into<String>, source: regex::Error) -> Self {
        Self {
            code: ErrorCode::Pattern,
            tag: tag.into(),
            source: Some(anyhow::Error::new(source)),
        }
    }

    /// Create a Fragment error from a failed fragment parse.
    pub fn fragment(tag: impl Into<String>, source: FragmentError) -> Self {
        Self {
            code: ErrorCode::Fragment,
            tag: tag.into(),
            source: Some(anyhow::Error::new(source)),
        }
    }

    /// Returns true if this is a Pattern error.
    pub fn is_pattern(&self) -> bool {
        self.code == ErrorCode::Pattern
    }

    /// Returns true if this is a Fragment error.
    pub fn is_fragment(&self) -> bool {
        self.code == ErrorCode::Fragment
    }
}
