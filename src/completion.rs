use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// The completion signal between launched jobs and the scheduling loop.
///
/// A launched job `publish`es its id exactly once when it finishes. The
/// scheduling loop `poll`s the currently visible ids and `consume`s the
/// ones it recognizes, so a consumed sentinel is never observed twice. Ids
/// the loop does not recognize are left on the channel untouched.
pub trait CompletionChannel {
    /// Record that the job with this id has finished.
    fn publish(&self, id: &str) -> Result<()>;

    /// List every id currently visible on the channel. Non-blocking; may
    /// return ids that do not belong to this run.
    fn poll(&mut self) -> Result<Vec<String>>;

    /// Remove a previously polled id from the channel.
    fn consume(&mut self, id: &str) -> Result<()>;
}

/// Filesystem-backed channel: a sentinel is a file named after the job id,
/// created in a shared directory.
#[derive(Debug, Clone)]
pub struct DirectoryChannel {
    dir: PathBuf,
}

impl DirectoryChannel {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CompletionChannel for DirectoryChannel {
    fn publish(&self, id: &str) -> Result<()> {
        fs::write(self.dir.join(id), b"")?;
        Ok(())
    }

    fn poll(&mut self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            // Non-UTF-8 names cannot match a job id.
            if let Some(name) = entry.file_name().to_str() {
                ids.push(name.to_string());
            }
        }
        Ok(ids)
    }

    fn consume(&mut self, id: &str) -> Result<()> {
        fs::remove_file(self.dir.join(id))?;
        Ok(())
    }
}
