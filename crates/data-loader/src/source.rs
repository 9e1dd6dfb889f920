//! Dataset sources.
//!
//! A `DatasetSource` is the load interface the dataset cache consumes. The
//! call may block on disk or network I/O, so callers in async code should run
//! it on a blocking thread.

use crate::error::Result;
use crate::types::Dataset;
use std::path::{Path, PathBuf};

/// Something that can produce a complete dataset
pub trait DatasetSource: Send + Sync {
    /// Human-readable description for logs
    fn describe(&self) -> String;

    /// Load both tables. Blocking.
    fn load(&self) -> Result<Dataset>;
}

/// Loads `repos.dat` and `relationships.dat` from a directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    data_dir: PathBuf,
}

impl DirectorySource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl DatasetSource for DirectorySource {
    fn describe(&self) -> String {
        format!("directory {}", self.data_dir.display())
    }

    fn load(&self) -> Result<Dataset> {
        Dataset::load_from_files(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataLoadError;

    #[test]
    fn test_directory_source_missing_dir() {
        let source = DirectorySource::new("/definitely/not/a/dataset");
        assert!(source.describe().contains("/definitely/not/a/dataset"));
        assert!(matches!(source.load(), Err(DataLoadError::FileNotFound { .. })));
    }
}
