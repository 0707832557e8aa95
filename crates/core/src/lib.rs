#![deny(clippy::all)]

pub mod config;
pub mod frontmatter;
pub mod pipeline;
pub mod rewrite;
pub mod slug;
pub mod vault;

pub use pipeline::{BatchPipeline, RunReport};
pub use rewrite::{Rewriter, RewriteStats};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
