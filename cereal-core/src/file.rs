use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

/// An output file that has been opened but not yet written.
///
/// The content goes to a temporary sibling of the destination, so the final
/// path is never observed half-written. Dropping a `PendingFile` deletes the
/// temporary.
#[derive(Debug)]
pub struct PendingFile {
    dest: PathBuf,
    temp: NamedTempFile,
}

impl PendingFile {
    /// Acquire a temporary file next to `dest`, creating parent directories.
    pub fn create(dest: impl Into<PathBuf>) -> io::Result<Self> {
        let dest = dest.into();
        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let prefix = match dest.file_name() {
            Some(name) => format!(".{}.", name.to_string_lossy()),
            None => ".vkcereal.".to_string(),
        };
        let temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(&parent)?;

        Ok(Self { dest, temp })
    }

    /// Get the final destination path
    pub fn path(&self) -> &Path {
        &self.dest
    }

    /// Write `content` durably to the temporary file.
    ///
    /// The destination is untouched until [`StagedFile::commit`].
    pub fn finish(mut self, content: impl Into<String>) -> io::Result<StagedFile> {
        let content = content.into();
        self.temp.write_all(content.as_bytes())?;
        self.temp.flush()?;
        self.temp.as_file().sync_all()?;

        Ok(StagedFile {
            dest: self.dest,
            temp: self.temp,
            content,
        })
    }
}

/// A fully written file waiting to be renamed onto its destination.
#[derive(Debug)]
pub struct StagedFile {
    dest: PathBuf,
    temp: NamedTempFile,
    content: String,
}

impl StagedFile {
    /// Get the final destination path
    pub fn path(&self) -> &Path {
        &self.dest
    }

    /// Get the staged content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Atomically replace the destination with the staged content.
    pub fn commit(self) -> io::Result<PathBuf> {
        self.temp.persist(&self.dest).map_err(|e| e.error)?;
        tracing::debug!(path = %self.dest.display(), "committed generated file");
        Ok(self.dest)
    }
}
