//! Recursive notes directory walker.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum VaultWalkerError {
    #[error("notes root does not exist: {0}")]
    MissingRoot(String),

    #[error("failed to walk notes directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),
}

/// A discovered note file.
#[derive(Debug, Clone)]
pub struct WalkedFile {
    /// Absolute path to the file.
    pub absolute_path: PathBuf,
    /// Path relative to the walk root.
    pub relative_path: PathBuf,
}

/// Walker for discovering the files a batch run applies to.
#[derive(Debug)]
pub struct NoteWalker {
    root: PathBuf,
    /// Folders to exclude from walking (relative paths from the root).
    excluded_folders: Vec<PathBuf>,
}

impl NoteWalker {
    /// Create a new walker for the given root.
    pub fn new(root: &Path) -> Result<Self, VaultWalkerError> {
        Self::with_exclusions(root, Vec::new())
    }

    /// Create a new walker with folder exclusions.
    ///
    /// Excluded folders can be specified as:
    /// - Relative paths from the root (e.g., "assets/drafts")
    /// - Absolute paths (will be converted to relative)
    pub fn with_exclusions(
        root: &Path,
        excluded_folders: Vec<PathBuf>,
    ) -> Result<Self, VaultWalkerError> {
        let root = root
            .canonicalize()
            .map_err(|_| VaultWalkerError::MissingRoot(root.display().to_string()))?;

        if !root.is_dir() {
            return Err(VaultWalkerError::MissingRoot(root.display().to_string()));
        }

        let excluded_folders = excluded_folders
            .into_iter()
            .map(|p| {
                if p.is_absolute() {
                    p.strip_prefix(&root).unwrap_or(&p).to_path_buf()
                } else {
                    p
                }
            })
            .collect();

        Ok(Self { root, excluded_folders })
    }

    /// Walk the root and return every file whose name passes `accept`.
    ///
    /// Hidden directories and configured exclusions are skipped. Results are
    /// sorted by relative path.
    pub fn walk(
        &self,
        accept: &dyn Fn(&str) -> bool,
    ) -> Result<Vec<WalkedFile>, VaultWalkerError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e))
        {
            let entry = entry.map_err(|e| {
                VaultWalkerError::WalkError(self.root.display().to_string(), e)
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !accept(&name) {
                continue;
            }

            let path = entry.path();
            let relative_path =
                path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();

            files.push(WalkedFile { absolute_path: path.to_path_buf(), relative_path });
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    /// Check if an entry should be excluded from walking.
    fn is_excluded(&self, entry: &walkdir::DirEntry) -> bool {
        // Never filter the root directory (depth 0)
        if entry.depth() == 0 {
            return false;
        }

        // Hidden directories only; files are left to the name predicate.
        if entry.file_type().is_dir() && entry.file_name().to_string_lossy().starts_with('.') {
            return true;
        }

        if !self.excluded_folders.is_empty()
            && let Ok(relative) = entry.path().strip_prefix(&self.root)
        {
            return self.excluded_folders.iter().any(|excluded| relative.starts_with(excluded));
        }

        false
    }

    /// Get the walk root path.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::FileFilter;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::write(root.join("note1.md"), "# Note 1").unwrap();
        fs::write(root.join("note2.md"), "# Note 2").unwrap();
        fs::write(root.join("README.md"), "# Readme").unwrap();

        fs::create_dir(root.join("subdir")).unwrap();
        fs::write(root.join("subdir/note3.md"), "# Note 3").unwrap();

        // Hidden directory (should be skipped)
        fs::create_dir(root.join(".obsidian")).unwrap();
        fs::write(root.join(".obsidian/workspace.md"), "# Secret").unwrap();

        fs::write(root.join("image.png"), "not markdown").unwrap();

        dir
    }

    fn accept_default(name: &str) -> bool {
        FileFilter::default().accepts(name)
    }

    #[test]
    fn test_walk_applies_predicate() {
        let tree = create_test_tree();
        let walker = NoteWalker::new(tree.path()).unwrap();
        let files = walker.walk(&accept_default).unwrap();

        let paths: Vec<_> = files.iter().map(|f| f.relative_path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("note1.md"),
                PathBuf::from("note2.md"),
                PathBuf::from("subdir/note3.md"),
            ]
        );
    }

    #[test]
    fn test_walk_with_custom_predicate() {
        let tree = create_test_tree();
        let walker = NoteWalker::new(tree.path()).unwrap();
        let files = walker.walk(&|name: &str| name.ends_with(".png")).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, PathBuf::from("image.png"));
    }

    #[test]
    fn test_missing_root() {
        let result = NoteWalker::new(Path::new("/nonexistent/path"));
        assert!(matches!(result.unwrap_err(), VaultWalkerError::MissingRoot(_)));
    }

    #[test]
    fn test_walk_with_exclusions() {
        let tree = create_test_tree();
        let walker =
            NoteWalker::with_exclusions(tree.path(), vec![PathBuf::from("subdir")]).unwrap();
        let files = walker.walk(&accept_default).unwrap();

        assert_eq!(files.len(), 2);
        assert!(!files.iter().any(|f| f.relative_path.starts_with("subdir")));
    }

    #[test]
    fn test_ordinary_folder_names_and_dotfiles_are_walked() {
        let tree = create_test_tree();
        let root = tree.path();
        for dir in ["target", "venv", "node_modules", "__pycache__"] {
            fs::create_dir(root.join(dir)).unwrap();
            fs::write(root.join(dir).join("chapter.md"), "# Chapter").unwrap();
        }
        fs::write(root.join(".draft.md"), "# Draft").unwrap();

        let walker = NoteWalker::new(root).unwrap();
        let paths: Vec<_> = walker
            .walk(&accept_default)
            .unwrap()
            .into_iter()
            .map(|f| f.relative_path)
            .collect();

        assert!(paths.contains(&PathBuf::from("target/chapter.md")));
        assert!(paths.contains(&PathBuf::from("venv/chapter.md")));
        assert!(paths.contains(&PathBuf::from("node_modules/chapter.md")));
        assert!(paths.contains(&PathBuf::from("__pycache__/chapter.md")));
        assert!(paths.contains(&PathBuf::from(".draft.md")));
        assert!(!paths.contains(&PathBuf::from(".obsidian/workspace.md")));
    }
}
