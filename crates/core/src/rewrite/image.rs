//! Wiki-style embedded images to centered HTML `<img>` tags.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;
use tracing::debug;

use super::{RewriteError, RewriteStats, Rewriter, read_file, write_file};

// ![[path]] or ![[path|width]]; a non-numeric suffix leaves the token alone.
static EMBED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[\[\s*([^|\]]+?)\s*(?:\|\s*(\d+(?:\.\d+)?)\s*)?\]\]").unwrap()
});

const IMG_STYLE: &str = "display: block; margin: 0 auto;";

/// Settings for [`ImageSyntaxRewriter`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageOptions {
    /// Directory prefix joined in front of every image path.
    pub base_path: String,
    /// `width` attribute used when the token carries no width.
    pub default_width: String,
    /// Factor applied to an explicit width.
    pub width_multiplier: f64,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            base_path: "./assets".to_string(),
            default_width: "500".to_string(),
            width_multiplier: 1.5,
        }
    }
}

/// Converts `![[path|width]]` embeds into `<img>` elements.
#[derive(Debug)]
pub struct ImageSyntaxRewriter {
    options: ImageOptions,
    processed_count: usize,
    total_converted: usize,
}

impl ImageSyntaxRewriter {
    pub fn new(options: ImageOptions) -> Self {
        Self { options, processed_count: 0, total_converted: 0 }
    }

    /// Convert every embed in `text`, returning the new text and the number
    /// of embeds converted.
    pub fn rewrite(&self, text: &str) -> (String, usize) {
        let mut count = 0;
        let out = EMBED_RE.replace_all(text, |caps: &Captures<'_>| {
            count += 1;
            self.render_tag(caps)
        });
        (out.into_owned(), count)
    }

    fn render_tag(&self, caps: &Captures<'_>) -> String {
        let path = &caps[1];
        let alt = Path::new(path).file_stem().map_or_else(
            || path.to_string(),
            |stem| stem.to_string_lossy().into_owned(),
        );

        let width = caps
            .get(2)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .map_or_else(
                || self.options.default_width.clone(),
                |w| format_width(w * self.options.width_multiplier),
            );

        format!(
            r#"<img src="{}" alt="{}" width="{}" style="{}">"#,
            join_src(&self.options.base_path, path),
            alt,
            width,
            IMG_STYLE
        )
    }
}

fn join_src(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return path.to_string();
    }
    format!("{}/{}", base, path.trim_start_matches('/'))
}

/// Floats always carry a fractional part: `600` is written `600.0`.
fn format_width(width: f64) -> String {
    if width.fract() == 0.0 { format!("{width:.1}") } else { format!("{width}") }
}

impl Rewriter for ImageSyntaxRewriter {
    fn name(&self) -> &str {
        "ImageSyntaxRewriter"
    }

    fn process_file(&mut self, path: &Path) -> Result<bool, RewriteError> {
        let content = read_file(path)?;
        let (rewritten, converted) = self.rewrite(&content);

        debug!("{}: {} image(s) converted", path.display(), converted);

        if converted == 0 {
            return Ok(false);
        }

        write_file(path, &rewritten)?;
        self.processed_count += 1;
        self.total_converted += converted;
        Ok(true)
    }

    fn stats(&self) -> RewriteStats {
        RewriteStats {
            name: self.name().to_string(),
            processed_count: self.processed_count,
            total_replacements: Some(self.total_converted),
        }
    }
}
