//! Frontmatter parsing and serialization.
//!
//! This module provides functionality to:
//! - Locate the fenced YAML block at the top of a markdown document
//! - Parse it into an order-preserving mapping
//! - Serialize documents back to markdown with frontmatter

pub mod parser;
pub mod serializer;
pub mod types;

pub use parser::{FrontmatterParseError, parse, split};
pub use serializer::{serialize, to_yaml};
pub use types::{Frontmatter, FrontmatterBlock, ParsedDocument};
