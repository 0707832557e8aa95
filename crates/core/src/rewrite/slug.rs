//! Permalink generation from note titles.

use std::path::Path;

use serde_yaml::Value;
use tracing::{debug, info};

use super::{RewriteError, RewriteStats, Rewriter, read_file, write_file};
use crate::frontmatter::{self, ParsedDocument};
use crate::slug::SlugProvider;

/// Sets the `permalink` frontmatter field to `<prefix>/<slug>/`.
///
/// The slug comes from a [`SlugProvider`] fed with the file stem. Files
/// without frontmatter are left untouched.
pub struct SlugRewriter {
    prefix: String,
    provider: Box<dyn SlugProvider>,
    processed_count: usize,
}

impl std::fmt::Debug for SlugRewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlugRewriter")
            .field("prefix", &self.prefix)
            .field("processed_count", &self.processed_count)
            .finish_non_exhaustive()
    }
}

/// A rewritten note and the permalink it now carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermalinkUpdate {
    pub permalink: String,
    pub content: String,
}

impl SlugRewriter {
    pub fn new(prefix: &str, provider: Box<dyn SlugProvider>) -> Self {
        Self { prefix: prefix.to_string(), provider, processed_count: 0 }
    }

    /// Build the permalink for a slug.
    pub fn permalink(&self, slug: &str) -> String {
        format!("{}/{}/", self.prefix.trim_end_matches('/'), slug)
    }

    /// Rewrite `content` belonging to the file at `path`.
    ///
    /// Returns `None` when the file is out of scope: no frontmatter block or
    /// an empty title.
    pub fn rewrite(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<Option<PermalinkUpdate>, RewriteError> {
        let doc = frontmatter::parse(content).map_err(|source| {
            RewriteError::Frontmatter { path: path.display().to_string(), source }
        })?;
        let Some(mut fm) = doc.frontmatter else {
            debug!("{}: no frontmatter, skipping", path.display());
            return Ok(None);
        };

        let title = title_for(path);
        if title.is_empty() {
            debug!("{}: empty title, skipping", path.display());
            return Ok(None);
        }

        let slug = self
            .provider
            .generate_slug(&title)
            .map_err(|source| RewriteError::Slug { title: title.clone(), source })?;
        let permalink = self.permalink(&slug);

        fm.set("permalink", Value::String(permalink.clone()));

        let rebuilt = ParsedDocument { frontmatter: Some(fm), body: doc.body };
        let content = frontmatter::serialize(&rebuilt).map_err(|source| {
            RewriteError::Serialize { path: path.display().to_string(), source }
        })?;

        Ok(Some(PermalinkUpdate { permalink, content }))
    }
}

/// Human-readable title derived from the file name, extension stripped.
fn title_for(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().trim().to_string()).unwrap_or_default()
}

impl Rewriter for SlugRewriter {
    fn name(&self) -> &str {
        "SlugRewriter"
    }

    fn process_file(&mut self, path: &Path) -> Result<bool, RewriteError> {
        let content = read_file(path)?;
        let Some(update) = self.rewrite(path, &content)? else {
            return Ok(false);
        };

        write_file(path, &update.content)?;
        info!("Updated permalink of {} -> {}", path.display(), update.permalink);
        self.processed_count += 1;
        Ok(true)
    }

    fn stats(&self) -> RewriteStats {
        RewriteStats {
            name: self.name().to_string(),
            processed_count: self.processed_count,
            total_replacements: None,
        }
    }
}
