//! Whole-file reads and atomic writes.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Read a note as UTF-8 text.
pub fn read_note(path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
}

/// Replace the contents of `path` with `content`.
///
/// The new content goes to a temporary file in the same directory which is
/// then renamed over the target, so readers never observe a partial write.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
