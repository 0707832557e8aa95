//! Single-file rewriters.
//!
//! A [`Rewriter`] reads one file, transforms its text and writes it back only
//! when something changed. Each rewriter owns its counters; the pipeline
//! reads them through [`Rewriter::stats`] once the run is over.

pub mod image;
pub mod pattern;
pub mod slug;
pub mod wrap;

use std::path::Path;

use thiserror::Error;

use crate::frontmatter::FrontmatterParseError;
use crate::slug::SlugError;
use crate::vault;

pub use image::{ImageOptions, ImageSyntaxRewriter};
pub use pattern::{PatternRewriter, PatternRule};
pub use slug::{PermalinkUpdate, SlugRewriter};
pub use wrap::{EndMode, SectionWrapRewriter, StartMode, WrapBoundary, WrapOptions};

/// Errors that abort processing of a single file.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid frontmatter in {path}: {source}")]
    Frontmatter {
        path: String,
        #[source]
        source: FrontmatterParseError,
    },

    #[error("failed to serialize frontmatter for {path}: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("slug generation failed for '{title}': {source}")]
    Slug {
        title: String,
        #[source]
        source: SlugError,
    },

    #[error("pattern '{pattern}' failed to match: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

/// Errors raised while constructing a rewriter.
#[derive(Debug, Error)]
pub enum RewriterBuildError {
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },

    #[error(transparent)]
    Slug(#[from] SlugError),
}

/// Read-only snapshot of a rewriter's counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteStats {
    /// Rewriter name as shown in the run summary.
    pub name: String,
    /// Files this rewriter actually changed.
    pub processed_count: usize,
    /// Substitutions, conversions or wraps performed, where meaningful.
    pub total_replacements: Option<usize>,
}

/// A single-file transformation unit.
pub trait Rewriter {
    /// Name used in logs and the run summary.
    fn name(&self) -> &str;

    /// Rewrite one file in place.
    ///
    /// Returns `Ok(true)` when the file was changed and persisted, `Ok(false)`
    /// when the file was out of scope or needed no change.
    fn process_file(&mut self, path: &Path) -> Result<bool, RewriteError>;

    /// Current counters.
    fn stats(&self) -> RewriteStats;
}

pub(crate) fn read_file(path: &Path) -> Result<String, RewriteError> {
    vault::read_note(path)
        .map_err(|source| RewriteError::Read { path: path.display().to_string(), source })
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<(), RewriteError> {
    vault::write_atomic(path, content)
        .map_err(|source| RewriteError::Write { path: path.display().to_string(), source })
}
