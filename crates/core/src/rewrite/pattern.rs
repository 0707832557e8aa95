//! Ordered regex substitution over whole-file text.

use std::path::Path;

use fancy_regex::Regex;
use tracing::debug;

use super::{RewriteError, RewriteStats, Rewriter, RewriterBuildError, read_file, write_file};

/// One `(pattern, replacement)` pair.
///
/// Patterns support look-around. Replacement templates use `$1` / `${name}`,
/// or the backslash style (`\1`, `\g<name>`) when they contain a backslash.
#[derive(Debug, Clone)]
pub struct PatternRule {
    regex: Regex,
    replacement: String,
}

impl PatternRule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, RewriterBuildError> {
        let regex = Regex::new(pattern).map_err(|e| RewriterBuildError::InvalidPattern {
            pattern: pattern.to_string(),
            source: Box::new(e),
        })?;
        Ok(Self { regex, replacement: translate_template(replacement) })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Replace every match in `text`, returning the new text and the match count.
    pub fn apply(&self, text: &str) -> Result<(String, usize), RewriteError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut count = 0;

        for caps in self.regex.captures_iter(text) {
            let caps = caps.map_err(|e| RewriteError::Pattern {
                pattern: self.pattern().to_string(),
                source: Box::new(e),
            })?;
            let Some(m) = caps.get(0) else { continue };

            out.push_str(&text[last..m.start()]);
            caps.expand(&self.replacement, &mut out);
            last = m.end();
            count += 1;
        }

        if count == 0 {
            return Ok((text.to_string(), 0));
        }
        out.push_str(&text[last..]);
        Ok((out, count))
    }
}

/// Convert a backslash-style template to `fancy_regex` expansion syntax.
fn translate_template(template: &str) -> String {
    if !template.contains('\\') {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len() + 8);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek().copied() {
                Some(d) if d.is_ascii_digit() => {
                    out.push_str("${");
                    while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                        out.push(d);
                        chars.next();
                    }
                    out.push('}');
                }
                Some('g') => {
                    chars.next();
                    let mut rest = chars.clone();
                    if rest.next() == Some('<') {
                        let name: String = rest.by_ref().take_while(|&ch| ch != '>').collect();
                        out.push_str("${");
                        out.push_str(&name);
                        out.push('}');
                        chars = rest;
                    } else {
                        out.push_str("\\g");
                    }
                }
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                Some(e @ ('n' | 't' | 'r' | 'f' | 'v' | 'a')) => {
                    chars.next();
                    out.push(control_escape(e));
                }
                _ => out.push('\\'),
            },
            '$' => out.push_str("$$"),
            other => out.push(other),
        }
    }
    out
}

fn control_escape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'f' => '\x0c',
        'v' => '\x0b',
        _ => '\x07',
    }
}

/// Applies an ordered list of [`PatternRule`]s to each file.
///
/// Every rule runs over the output of the previous one. The file is written
/// at most once, after all rules ran, and only if some rule matched.
#[derive(Debug)]
pub struct PatternRewriter {
    rules: Vec<PatternRule>,
    processed_count: usize,
    total_replacements: usize,
}

impl PatternRewriter {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules, processed_count: 0, total_replacements: 0 }
    }

    /// Compile rules from `(pattern, replacement)` pairs, keeping their order.
    pub fn from_pairs<P, R>(pairs: &[(P, R)]) -> Result<Self, RewriterBuildError>
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        let rules = pairs
            .iter()
            .map(|(p, r)| PatternRule::new(p.as_ref(), r.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// Run every rule in order over `text`.
    pub fn rewrite(&self, text: &str) -> Result<(String, usize), RewriteError> {
        let mut current = text.to_string();
        let mut total = 0;
        for rule in &self.rules {
            let (next, n) = rule.apply(&current)?;
            current = next;
            total += n;
        }
        Ok((current, total))
    }
}

impl Rewriter for PatternRewriter {
    fn name(&self) -> &str {
        "PatternRewriter"
    }

    fn process_file(&mut self, path: &Path) -> Result<bool, RewriteError> {
        let content = read_file(path)?;
        let (rewritten, replacements) = self.rewrite(&content)?;

        debug!("{}: {} replacement(s)", path.display(), replacements);

        if replacements == 0 {
            return Ok(false);
        }

        write_file(path, &rewritten)?;
        self.processed_count += 1;
        self.total_replacements += replacements;
        Ok(true)
    }

    fn stats(&self) -> RewriteStats {
        RewriteStats {
            name: self.name().to_string(),
            processed_count: self.processed_count,
            total_replacements: Some(self.total_replacements),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn rules_apply_to_previous_output() {
        // B only matches what A produced.
        let rewriter = PatternRewriter::from_pairs(&[("cat", "dog"), ("dog", "wolf")]).unwrap();
        let (out, n) = rewriter.rewrite("cat and dog").unwrap();
        assert_eq!(out, "wolf and wolf");
        assert_eq!(n, 3);
    }

    #[test]
    fn rule_order_matters() {
        let forward = PatternRewriter::from_pairs(&[("a", "b"), ("b", "c")]).unwrap();
        let backward = PatternRewriter::from_pairs(&[("b", "c"), ("a", "b")]).unwrap();
        assert_eq!(forward.rewrite("a").unwrap().0, "c");
        assert_eq!(backward.rewrite("a").unwrap().0, "b");
    }

    #[test]
    fn obsidian_image_to_markdown() {
        let rewriter = PatternRewriter::from_pairs(&[(
            r"!\[\[([^|\]]+)(?:\|[^\]]+)?\]\]",
            r"![](\1)",
        )])
        .unwrap();
        let (out, n) = rewriter.rewrite("see ![[img/a b.png|300]] and ![[c.png]]").unwrap();
        assert_eq!(out, "see ![](img/a b.png) and ![](c.png)");
        assert_eq!(n, 2);
    }

    #[test]
    fn embed_to_markdown_then_escape_spaces() {
        let rewriter = PatternRewriter::from_pairs(&[
            (r"!\[\[([^|\]]+)(?:\|[^\]]+)?\]\]", r"![](\1)"),
            (r"(?<=!\[[^\]]*\]\([^)]*)\s(?=[^)]*\))", "%20"),
        ])
        .unwrap();

        let (out, n) = rewriter.rewrite("![[a b.png|300]] and some text").unwrap();
        assert_eq!(out, "![](a%20b.png) and some text");
        assert_eq!(n, 2);

        let (out, _) = rewriter.rewrite("![](a b c.png) x y").unwrap();
        assert_eq!(out, "![](a%20b%20c.png) x y");
    }

    #[test]
    fn lookaround_is_supported() {
        let rewriter = PatternRewriter::from_pairs(&[(r"(?<=\d)px(?=;)", "em")]).unwrap();
        let (out, n) = rewriter.rewrite("a: 12px; b: 3px, c: px;").unwrap();
        assert_eq!(out, "a: 12em; b: 3px, c: px;");
        assert_eq!(n, 1);
    }

    #[test]
    fn invalid_pattern_fails_at_construction() {
        let err = PatternRule::new("(unclosed", "x").unwrap_err();
        assert!(matches!(err, RewriterBuildError::InvalidPattern { .. }));
    }

    #[rstest]
    #[case(r"\1", "${1}")]
    #[case(r"[\1](\2)", "[${1}](${2})")]
    #[case(r"\g<name>!", "${name}!")]
    #[case(r"cost $5 \1", "cost $$5 ${1}")]
    #[case(r"a\\b", r"a\b")]
    #[case(r"\1\t\2", "${1}\t${2}")]
    #[case(r"a\r\nb", "a\r\nb")]
    #[case(r"\q", r"\q")]
    #[case("$1-$2", "$1-$2")]
    fn template_translation(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(translate_template(input), expected);
    }

    #[test]
    fn named_group_in_backslash_style() {
        let rule = PatternRule::new(r"(?P<word>\w+)@", r"<\g<word>>").unwrap();
        assert_eq!(rule.apply("hi@ there").unwrap(), ("<hi> there".to_string(), 1));
    }

    #[test]
    fn control_escapes_in_backslash_template() {
        let rule = PatternRule::new(r"(\w+),(\w+)", r"\1\t\2").unwrap();
        assert_eq!(rule.apply("a,b").unwrap(), ("a\tb".to_string(), 1));
    }

    #[test]
    fn process_file_writes_only_on_change() {
        let dir = TempDir::new().unwrap();
        let hit = dir.path().join("hit.md");
        let miss = dir.path().join("miss.md");
        fs::write(&hit, "foo foo").unwrap();
        fs::write(&miss, "bar").unwrap();

        let mut rewriter = PatternRewriter::from_pairs(&[("foo", "baz")]).unwrap();
        assert!(rewriter.process_file(&hit).unwrap());
        assert!(!rewriter.process_file(&miss).unwrap());

        assert_eq!(fs::read_to_string(&hit).unwrap(), "baz baz");
        assert_eq!(fs::read_to_string(&miss).unwrap(), "bar");

        let stats = rewriter.stats();
        assert_eq!(stats.processed_count, 1);
        assert_eq!(stats.total_replacements, Some(2));
    }
}
