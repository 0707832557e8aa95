use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::rewrite::{ImageOptions, WrapOptions};
use crate::slug::{DEFAULT_MODEL, DEFAULT_PROVIDER};
use crate::vault::FileFilter;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One notes collection and the rewriters applied to it.
#[derive(Debug, Deserialize)]
pub struct Profile {
    pub root: String,
    #[serde(default)]
    pub filter: FileFilter,
    /// Rewriters in the order they run.
    #[serde(default)]
    pub rewriters: Vec<RewriterSpec>,
}

/// Declarative form of a rewriter, tagged by `kind`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RewriterSpec {
    Pattern(PatternSpec),
    Image(ImageOptions),
    Slug(SlugSpec),
    Wrap(WrapOptions),
}

impl RewriterSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            RewriterSpec::Pattern(_) => "pattern",
            RewriterSpec::Image(_) => "image",
            RewriterSpec::Slug(_) => "slug",
            RewriterSpec::Wrap(_) => "wrap",
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PatternSpec {
    /// `[pattern, replacement]` pairs, applied in order.
    pub rules: Vec<(String, String)>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SlugSpec {
    /// Permalink prefix, e.g. `/notes/ComputerNetwork/`.
    pub prefix: String,
    /// Environment prefix for `<provider>API_KEY` and `<provider>BASE_URL`.
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub root: PathBuf,
    pub filter: FileFilter,
    pub rewriters: Vec<RewriterSpec>,
    pub logging: LoggingConfig,
}
