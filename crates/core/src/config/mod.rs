//! Configuration loading and pipeline construction.

pub mod build;
pub mod loader;
pub mod types;

pub use build::{build_pipeline, build_rewriters};
pub use loader::{ConfigError, ConfigLoader, default_config_path};
pub use types::{
    ConfigFile, LoggingConfig, PatternSpec, Profile, ResolvedConfig, RewriterSpec, SlugSpec,
};
