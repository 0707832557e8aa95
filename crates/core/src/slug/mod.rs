//! Slug generation.
//!
//! [`SlugProvider`] is the seam between the permalink rewriter and whatever
//! turns a note title into a URL slug: a text-generation endpoint in normal
//! runs, a local normalizer for offline runs and tests.

pub mod completion;

use thiserror::Error;

pub use completion::{CompletionSlugProvider, DEFAULT_MODEL, DEFAULT_PROVIDER};

/// Errors raised while configuring a provider or generating a slug.
#[derive(Debug, Error)]
pub enum SlugError {
    #[error("missing API key: set {0} in the environment")]
    MissingApiKey(String),

    #[error("slug request failed: {0}")]
    Request(#[from] ureq::Error),

    #[error("slug endpoint returned HTTP {status}: {body}")]
    HttpResponse { status: u16, body: String },

    #[error("slug endpoint returned no choices")]
    NoChoices,

    #[error("provider returned an empty slug")]
    EmptySlug,
}

/// Turns a note title into a slug.
///
/// Output must be a single line of lowercase ASCII letters, digits and
/// hyphens. How the title is interpreted is up to the implementation.
pub trait SlugProvider {
    fn generate_slug(&self, title: &str) -> Result<String, SlugError>;
}

/// Offline provider that derives the slug from the title text itself.
///
/// Non-ASCII characters are dropped, so titles written entirely in other
/// scripts produce [`SlugError::EmptySlug`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSlugProvider;

impl SlugProvider for LocalSlugProvider {
    fn generate_slug(&self, title: &str) -> Result<String, SlugError> {
        let slug = normalize_slug(title);
        if slug.is_empty() { Err(SlugError::EmptySlug) } else { Ok(slug) }
    }
}

/// Force arbitrary text into the slug charset.
///
/// Only the first line is considered. ASCII letters are lowercased, dots,
/// whitespace, underscores and slashes become hyphens, everything else
/// outside `[a-z0-9-]` is dropped. Hyphen runs collapse and the result has
/// no leading or trailing hyphen.
pub fn normalize_slug(raw: &str) -> String {
    let first_line = raw.lines().next().unwrap_or("");
    let mut slug = String::with_capacity(first_line.len());

    for c in first_line.trim().chars() {
        let mapped = match c {
            'a'..='z' | '0'..='9' => Some(c),
            'A'..='Z' => Some(c.to_ascii_lowercase()),
            '-' | '.' | '_' | '/' => Some('-'),
            c if c.is_whitespace() => Some('-'),
            _ => None,
        };

        match mapped {
            Some('-') if slug.is_empty() || slug.ends_with('-') => {}
            Some(ch) => slug.push(ch),
            None => {}
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2-6-channel-multiplexing-technology", "2-6-channel-multiplexing-technology")]
    #[case("\"2.6 Channel Multiplexing\"", "2-6-channel-multiplexing")]
    #[case("  Hello   World  ", "hello-world")]
    #[case("slug-one\nexplanation", "slug-one")]
    #[case("--a--b--", "a-b")]
    #[case("信道复用", "")]
    fn normalize_slug_cases(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_slug(raw), expected);
    }

    #[test]
    fn local_provider_uses_title() {
        let slug = LocalSlugProvider.generate_slug("3.1 Data Link Layer").unwrap();
        assert_eq!(slug, "3-1-data-link-layer");
    }

    #[test]
    fn local_provider_rejects_empty_result() {
        let err = LocalSlugProvider.generate_slug("数据链路层").unwrap_err();
        assert!(matches!(err, SlugError::EmptySlug));
    }
}
