//! Note discovery and file persistence.
//!
//! This module provides utilities for walking a notes directory, deciding
//! which files a batch run should touch, and writing rewritten files back.

pub mod filter;
pub mod fs;
pub mod walker;

pub use filter::FileFilter;
pub use fs::{read_note, write_atomic};
pub use walker::{NoteWalker, VaultWalkerError, WalkedFile};
