//! On-disk tree: `<root>/<language>/<fp[0..2]>/<fp>.json`, written via a
//! tmp-file-then-rename so a reader never observes a half-written record.

use std::fs;
use std::path::{Path, PathBuf};

use tracecraft_core::types::language::Language;
use tracecraft_script::{Fingerprint, ScriptRecord};

use crate::error::CacheError;

pub fn path_for(root: &Path, language: Language, fingerprint: &Fingerprint) -> PathBuf {
    root.join(language.as_str())
        .join(fingerprint.bucket())
        .join(format!("{}.json", fingerprint.to_hex()))
}

pub fn write_atomic(path: &Path, record: &ScriptRecord) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_vec_pretty(record).map_err(|e| CacheError::Corrupt {
        path: path.display().to_string(),
        source: e,
    })?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn read(path: &Path) -> Result<Option<ScriptRecord>, CacheError> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    let record = serde_json::from_slice(&bytes).map_err(|e| CacheError::Corrupt {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(Some(record))
}

pub fn remove(path: &Path) -> Result<(), CacheError> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Walk every `.json` record under `root`, for `version_sweep`.
pub fn walk_all(root: &Path) -> Result<Vec<(PathBuf, ScriptRecord)>, CacheError> {
    let mut out = Vec::new();
    if !root.exists() {
        return Ok(out);
    }
    walk_dir(root, &mut out)?;
    Ok(out)
}

fn walk_dir(dir: &Path, out: &mut Vec<(PathBuf, ScriptRecord)>) -> Result<(), CacheError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
            if let Some(record) = read(&path)? {
                out.push((path, record));
            }
        }
    }
    Ok(())
}
