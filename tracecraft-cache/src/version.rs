//! `.version` file at the cache root, carrying the runtime-utility API
//! version the cache is keyed against.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CacheError;

pub struct VersionFile {
    path: PathBuf,
}

impl VersionFile {
    pub fn new(root: &Path) -> Self {
        Self {
            path: root.join(".version"),
        }
    }

    pub fn read(&self) -> Result<Option<u32>, CacheError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(text.trim().parse().ok())
    }

    pub fn write(&self, version: u32) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, version.to_string())?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_version_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let version = VersionFile::new(dir.path());
        assert_eq!(version.read().unwrap(), None);
    }

    #[test]
    fn written_version_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let version = VersionFile::new(dir.path());
        version.write(7).unwrap();
        assert_eq!(version.read().unwrap(), Some(7));
    }
}
