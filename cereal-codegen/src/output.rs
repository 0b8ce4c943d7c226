//! Staged generation output and commit statistics.

use std::path::{Path, PathBuf};

use vkcereal_core::StagedFile;

use crate::{Error, Result};

/// Everything one generation run produced, written to temporaries but not
/// yet moved into place.
///
/// Dropping it discards the temporaries and leaves existing outputs as they
/// were.
#[derive(Debug, Default)]
pub struct GeneratedOutput {
    files: Vec<StagedFile>,
}

impl GeneratedOutput {
    pub(crate) fn new(files: Vec<StagedFile>) -> Self {
        Self { files }
    }

    /// Staged files, modules first in registration order (header then
    /// implementation), build description last.
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    /// Find a staged file by its destination path.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&StagedFile> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path() == path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Move every staged file onto its destination, in [`files`] order.
    ///
    /// Each rename is atomic, but the set is not: if a rename fails, the
    /// files before it are already in place next to older outputs, and the
    /// rest are discarded.
    ///
    /// [`files`]: GeneratedOutput::files
    pub fn commit(self) -> Result<WriteStats> {
        let mut stats = WriteStats::default();

        for file in self.files {
            let path = file.path().to_path_buf();
            file.commit().map_err(|source| Error::io(&path, source))?;
            stats.written_paths.push(path);
        }

        tracing::info!(files = stats.written(), "committed generated sources");
        Ok(stats)
    }
}

/// Statistics from a commit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteStats {
    /// Paths of written files, in commit order.
    pub written_paths: Vec<PathBuf>,
}

impl WriteStats {
    /// Number of files written.
    pub fn written(&self) -> usize {
        self.written_paths.len()
    }
}
