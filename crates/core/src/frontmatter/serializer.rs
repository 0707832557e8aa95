//! Frontmatter serialization back to markdown.

use super::types::{Frontmatter, ParsedDocument};

/// Serialize frontmatter fields to a YAML string without fences.
///
/// Keys keep their insertion order and non-ASCII text is written literally.
/// The trailing newline emitted by the YAML writer is removed.
pub fn to_yaml(fm: &Frontmatter) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(&fm.fields)?;
    Ok(yaml.trim_end().to_string())
}

/// Serialize a parsed document back to a markdown string.
///
/// Documents with frontmatter are written as `---\n<yaml>\n---\n\n<body>`.
pub fn serialize(doc: &ParsedDocument) -> Result<String, serde_yaml::Error> {
    match &doc.frontmatter {
        Some(fm) => Ok(format!("---\n{}\n---\n\n{}", to_yaml(fm)?, doc.body)),
        None => Ok(doc.body.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::parser::parse;
    use serde_yaml::Value;

    #[test]
    fn serialize_document_without_frontmatter() {
        let doc =
            ParsedDocument { frontmatter: None, body: "# Hello\n\nWorld".to_string() };
        assert_eq!(serialize(&doc).unwrap(), "# Hello\n\nWorld");
    }

    #[test]
    fn serialize_document_with_frontmatter() {
        let mut fm = Frontmatter::default();
        fm.set("title", Value::String("Test".to_string()));

        let doc = ParsedDocument { frontmatter: Some(fm), body: "# Content".to_string() };

        assert_eq!(serialize(&doc).unwrap(), "---\ntitle: Test\n---\n\n# Content");
    }

    #[test]
    fn non_ascii_is_not_escaped() {
        let mut fm = Frontmatter::default();
        fm.set("title", Value::String("信道复用技术".to_string()));
        let yaml = to_yaml(&fm).unwrap();
        assert_eq!(yaml, "title: 信道复用技术");
    }

    #[test]
    fn set_existing_key_keeps_position() {
        let original = "---\ntitle: Hello\npermalink: /old/\ncount: 42\n---\n\n# Body";
        let mut parsed = parse(original).unwrap();
        let fm = parsed.frontmatter.as_mut().unwrap();
        fm.set("permalink", Value::String("/new/".to_string()));

        let serialized = serialize(&parsed).unwrap();
        assert_eq!(
            serialized,
            "---\ntitle: Hello\npermalink: /new/\ncount: 42\n---\n\n# Body"
        );
    }

    #[test]
    fn roundtrip_frontmatter() {
        let original = "---\ntitle: Hello\ncount: 42\n---\n\n# Body";
        let parsed = parse(original).unwrap();
        let serialized = serialize(&parsed).unwrap();
        assert_eq!(serialized, original);
    }
}
