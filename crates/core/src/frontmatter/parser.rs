//! Frontmatter parsing from markdown documents.

use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;
use thiserror::Error;

use super::types::{Frontmatter, FrontmatterBlock, ParsedDocument};

/// Errors that can occur during frontmatter parsing.
#[derive(Debug, Error)]
pub enum FrontmatterParseError {
    #[error("invalid YAML frontmatter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("frontmatter is not a mapping")]
    NotAMapping,
}

// The block must open at byte 0. Whitespace after either fence is swallowed
// up to the last newline of the run, so blank lines after the closing fence
// belong to the block rather than the body.
static FRONTMATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---\s*\n(.*?)\n---\s*\n").unwrap());

/// Locate the frontmatter block without parsing it.
///
/// Frontmatter is delimited by `---` lines at the very start of the document:
/// ```markdown
/// ---
/// key: value
/// ---
/// # Document content
/// ```
pub fn split(content: &str) -> Option<FrontmatterBlock<'_>> {
    let caps = FRONTMATTER_RE.captures(content)?;
    let whole = caps.get(0)?;
    let yaml = caps.get(1).map_or("", |m| m.as_str());
    Some(FrontmatterBlock { yaml, end: whole.end() })
}

/// Parse frontmatter from markdown content.
///
/// A document without a block yields `frontmatter: None` and the whole
/// content as body. An empty block yields an empty mapping.
pub fn parse(content: &str) -> Result<ParsedDocument, FrontmatterParseError> {
    let Some(block) = split(content) else {
        return Ok(ParsedDocument { frontmatter: None, body: content.to_string() });
    };

    let frontmatter = parse_yaml(block.yaml)?;
    Ok(ParsedDocument {
        frontmatter: Some(frontmatter),
        body: content[block.end..].to_string(),
    })
}

fn parse_yaml(yaml: &str) -> Result<Frontmatter, FrontmatterParseError> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(fields) => Ok(Frontmatter { fields }),
        Value::Null => Ok(Frontmatter::default()),
        _ => Err(FrontmatterParseError::NotAMapping),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_no_frontmatter() {
        let content = "# Hello\n\nSome content";
        let result = parse(content).unwrap();
        assert!(result.frontmatter.is_none());
        assert_eq!(result.body, content);
    }

    #[test]
    fn parse_simple_frontmatter() {
        let content = "---\ntitle: Hello\n---\n# Content";
        let result = parse(content).unwrap();
        let fm = result.frontmatter.unwrap();
        assert_eq!(fm.get("title").and_then(|v| v.as_str()), Some("Hello"));
        assert_eq!(result.body, "# Content");
    }

    #[test]
    fn parse_keeps_key_order() {
        let content = "---\nzeta: 1\nalpha: 2\nmid: 3\n---\nBody";
        let fm = parse(content).unwrap().frontmatter.unwrap();
        let keys: Vec<_> = fm.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn blank_lines_after_closing_fence_are_swallowed() {
        let content = "---\ntitle: Test\n---\n\n\nBody";
        let result = parse(content).unwrap();
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn leading_whitespace_means_no_frontmatter() {
        let content = "\n---\ntitle: Test\n---\nBody";
        assert!(split(content).is_none());
    }

    #[test]
    fn unclosed_block_is_not_frontmatter() {
        let content = "---\ntitle: Test\n# Body";
        let result = parse(content).unwrap();
        assert!(result.frontmatter.is_none());
    }

    #[test]
    fn closing_fence_needs_trailing_newline() {
        assert!(split("---\ntitle: Test\n---").is_none());
        assert!(split("---\ntitle: Test\n---\n").is_some());
    }

    #[test]
    fn nested_values_parse() {
        let content =
            "---\ntitle: Test\ntags:\n  - rust\n  - cli\nmeta:\n  a: 1\n---\nBody";
        let fm = parse(content).unwrap().frontmatter.unwrap();
        assert!(fm.get("tags").unwrap().is_sequence());
        assert!(fm.get("meta").unwrap().is_mapping());
    }

    #[test]
    fn scalar_block_is_rejected() {
        let content = "---\njust a string\n---\nBody";
        assert!(matches!(parse(content), Err(FrontmatterParseError::NotAMapping)));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        assert!(matches!(parse(content), Err(FrontmatterParseError::InvalidYaml(_))));
    }

    #[test]
    fn split_reports_block_end() {
        let content = "---\na: 1\n---\nrest";
        let block = split(content).unwrap();
        assert_eq!(block.yaml, "a: 1");
        assert_eq!(&content[block.end..], "rest");
    }
}
