//! File-name predicate used to select notes for a batch run.

use serde::Deserialize;

/// Accepts files by extension and rejects a list of exact file names.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileFilter {
    /// Accepted extensions without the leading dot, compared case-insensitively.
    pub extensions: Vec<String>,
    /// File names that are never processed (e.g. `README.md`).
    pub exclude_files: Vec<String>,
    /// Folders skipped entirely, relative to the run root.
    pub excluded_folders: Vec<String>,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string()],
            exclude_files: vec!["README.md".to_string()],
            excluded_folders: Vec::new(),
        }
    }
}

impl FileFilter {
    /// Whether a file with this name should be processed.
    pub fn accepts(&self, file_name: &str) -> bool {
        if self.exclude_files.iter().any(|n| n == file_name) {
            return false;
        }

        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}
