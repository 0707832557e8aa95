//! Batch orchestration: walk, filter, run every rewriter on every file.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::rewrite::{RewriteError, RewriteStats, Rewriter};
use crate::vault::{FileFilter, NoteWalker, VaultWalkerError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Walker(#[from] VaultWalkerError),
}

/// A file whose processing stopped on an error.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    /// Rewriter that failed.
    pub rewriter: String,
    pub error: RewriteError,
}

/// Outcome of [`BatchPipeline::run`].
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files that passed the filter.
    pub files_seen: usize,
    /// Files every rewriter handled without error.
    pub files_processed: usize,
    pub failures: Vec<FileFailure>,
    /// Per-rewriter counters, in registration order.
    pub rewriters: Vec<RewriteStats>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Done: processed {} file(s)", self.files_processed)?;
        for stats in &self.rewriters {
            write!(f, "\n- {}: changed {} file(s)", stats.name, stats.processed_count)?;
            if let Some(total) = stats.total_replacements {
                write!(f, "\n  total replacements: {total}")?;
            }
        }
        if !self.failures.is_empty() {
            write!(f, "\nFailed: {} file(s)", self.failures.len())?;
            for failure in &self.failures {
                write!(
                    f,
                    "\n- {} ({}): {}",
                    failure.path.display(),
                    failure.rewriter,
                    failure.error
                )?;
            }
        }
        Ok(())
    }
}

type FilePredicate = Box<dyn Fn(&str) -> bool>;

/// Applies an ordered list of rewriters to every accepted file under a root.
///
/// Rewriters run in registration order, each one reading what the previous
/// one wrote. An error stops the current file only; the batch continues.
pub struct BatchPipeline {
    root: PathBuf,
    excluded_folders: Vec<PathBuf>,
    file_filter: FilePredicate,
    rewriters: Vec<Box<dyn Rewriter>>,
}

impl fmt::Debug for BatchPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchPipeline")
            .field("root", &self.root)
            .field("excluded_folders", &self.excluded_folders)
            .field("rewriters", &self.rewriters.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl BatchPipeline {
    /// New pipeline over `root` with the default filter (`*.md`, no `README.md`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let filter = FileFilter::default();
        Self {
            root: root.into(),
            excluded_folders: Vec::new(),
            file_filter: Box::new(move |name: &str| filter.accepts(name)),
            rewriters: Vec::new(),
        }
    }

    pub fn add_rewriter(mut self, rewriter: Box<dyn Rewriter>) -> Self {
        self.rewriters.push(rewriter);
        self
    }

    /// Replace the file-name predicate.
    pub fn with_file_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + 'static,
    {
        self.file_filter = Box::new(filter);
        self
    }

    /// Use a [`FileFilter`], including its folder exclusions.
    pub fn with_filter(self, filter: FileFilter) -> Self {
        let excluded = filter.excluded_folders.iter().map(PathBuf::from).collect();
        let mut pipeline = self.with_file_filter(move |name: &str| filter.accepts(name));
        pipeline.excluded_folders = excluded;
        pipeline
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Process every accepted file.
    ///
    /// Only a missing or unreadable root fails the run as a whole.
    pub fn run(&mut self) -> Result<RunReport, PipelineError> {
        let mut report = RunReport::default();

        if self.rewriters.is_empty() {
            warn!("No rewriters configured, nothing to do");
            return Ok(report);
        }

        let walker = NoteWalker::with_exclusions(&self.root, self.excluded_folders.clone())?;
        let files = walker.walk(self.file_filter.as_ref())?;
        report.files_seen = files.len();

        info!("Processing {} file(s) under {}", files.len(), walker.root().display());

        for file in &files {
            match self.process_one(&file.absolute_path) {
                Ok(()) => report.files_processed += 1,
                Err((rewriter, error)) => {
                    warn!(
                        "Failed to process {} ({}): {}",
                        file.relative_path.display(),
                        rewriter,
                        error
                    );
                    report.failures.push(FileFailure {
                        path: file.relative_path.clone(),
                        rewriter,
                        error,
                    });
                }
            }
        }

        report.rewriters = self.rewriters.iter().map(|r| r.stats()).collect();
        Ok(report)
    }

    fn process_one(&mut self, path: &Path) -> Result<(), (String, RewriteError)> {
        for rewriter in &mut self.rewriters {
            rewriter.process_file(path).map_err(|e| (rewriter.name().to_string(), e))?;
        }
        Ok(())
    }
}
