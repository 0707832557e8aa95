//! Wrapping a section of a note in a collapsible `<details>` block.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{RewriteError, RewriteStats, Rewriter, read_file, write_file};
use crate::frontmatter;

const OPEN_TAG: &str = "<details";
const CLOSE_TAG: &str = "</details>";

/// Where the wrapped section begins.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StartMode {
    /// Right after the leading frontmatter block, or offset 0 without one.
    #[default]
    Auto,
    /// Offset 0, frontmatter included.
    DocumentStart,
    /// The line following the first occurrence of `marker`.
    ///
    /// When `required` is false and the marker is absent, falls back to
    /// [`StartMode::Auto`].
    Marker {
        marker: String,
        #[serde(default = "default_required")]
        required: bool,
    },
}

fn default_required() -> bool {
    true
}

/// Where the wrapped section ends.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EndMode {
    #[default]
    DocumentEnd,
    /// Just past the first `marker` after the start; the marker is wrapped too.
    Marker { marker: String },
}

/// Settings for [`SectionWrapRewriter`].
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WrapOptions {
    /// Text of the `<summary>` line.
    pub caption: String,
    #[serde(default)]
    pub start: StartMode,
    #[serde(default)]
    pub end: EndMode,
}

/// Byte range of the section to wrap. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapBoundary {
    pub start: usize,
    pub end: usize,
}

/// Why a boundary could not be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryMiss {
    StartMarker(String),
    EndMarker(String),
}

impl WrapBoundary {
    pub fn locate(
        text: &str,
        start: &StartMode,
        end: &EndMode,
    ) -> Result<Self, BoundaryMiss> {
        let start = match start {
            StartMode::Auto => after_frontmatter(text),
            StartMode::DocumentStart => 0,
            StartMode::Marker { marker, required } => match line_after(text, marker) {
                Some(offset) => offset,
                None if *required => return Err(BoundaryMiss::StartMarker(marker.clone())),
                None => after_frontmatter(text),
            },
        };

        let end = match end {
            EndMode::DocumentEnd => text.len(),
            EndMode::Marker { marker } => text[start..]
                .find(marker.as_str())
                .map(|i| start + i + marker.len())
                .ok_or_else(|| BoundaryMiss::EndMarker(marker.clone()))?,
        };

        Ok(Self { start, end })
    }
}

fn after_frontmatter(text: &str) -> usize {
    frontmatter::split(text).map_or(0, |block| block.end)
}

/// Offset of the line following the first occurrence of `marker`.
fn line_after(text: &str, marker: &str) -> Option<usize> {
    let after = text.find(marker)? + marker.len();
    Some(text[after..].find('\n').map_or(text.len(), |n| after + n + 1))
}

/// Result of attempting a wrap on in-memory text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapOutcome {
    Wrapped(String),
    Missing(BoundaryMiss),
    AlreadyWrapped,
    EmptySection,
}

/// Wraps a section of each note in `<details>` with a caption.
#[derive(Debug)]
pub struct SectionWrapRewriter {
    options: WrapOptions,
    processed_count: usize,
}

impl SectionWrapRewriter {
    pub fn new(options: WrapOptions) -> Self {
        Self { options, processed_count: 0 }
    }

    pub fn rewrite(&self, text: &str) -> WrapOutcome {
        let boundary = match WrapBoundary::locate(text, &self.options.start, &self.options.end)
        {
            Ok(b) => b,
            Err(miss) => return WrapOutcome::Missing(miss),
        };

        let section = text[boundary.start..boundary.end].trim();
        if section.contains(OPEN_TAG) || section.contains(CLOSE_TAG) {
            return WrapOutcome::AlreadyWrapped;
        }
        if section.is_empty() {
            return WrapOutcome::EmptySection;
        }

        let block = format!(
            "<details>\n<summary>{}</summary>\n\n{}\n\n</details>",
            self.options.caption, section
        );

        let prefix = &text[..boundary.start];
        let output = if boundary.end == text.len() {
            format!("{prefix}{block}\n")
        } else {
            format!("{prefix}{block}{}", &text[boundary.end..])
        };
        WrapOutcome::Wrapped(output)
    }
}

impl Rewriter for SectionWrapRewriter {
    fn name(&self) -> &str {
        "SectionWrapRewriter"
    }

    fn process_file(&mut self, path: &Path) -> Result<bool, RewriteError> {
        let content = read_file(path)?;

        match self.rewrite(&content) {
            WrapOutcome::Wrapped(output) => {
                write_file(path, &output)?;
                self.processed_count += 1;
                debug!("{}: section wrapped", path.display());
                Ok(true)
            }
            WrapOutcome::Missing(BoundaryMiss::StartMarker(marker)) => {
                warn!("{}: start marker '{}' not found, skipping", path.display(), marker);
                Ok(false)
            }
            WrapOutcome::Missing(BoundaryMiss::EndMarker(marker)) => {
                warn!("{}: end marker '{}' not found, skipping", path.display(), marker);
                Ok(false)
            }
            WrapOutcome::AlreadyWrapped => {
                debug!("{}: section already wrapped, skipping", path.display());
                Ok(false)
            }
            WrapOutcome::EmptySection => {
                debug!("{}: nothing to wrap, skipping", path.display());
                Ok(false)
            }
        }
    }

    fn stats(&self) -> RewriteStats {
        RewriteStats {
            name: self.name().to_string(),
            processed_count: self.processed_count,
            total_replacements: Some(self.processed_count),
        }
    }
}
