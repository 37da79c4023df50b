//! Scratch-directory jail: every path this crate writes to is checked to
//! resolve inside the scratch root before the write happens.

use std::path::{Component, Path, PathBuf};

use crate::error::SandboxError;

pub fn jailed_path(root: &Path, relative: &Path) -> Result<PathBuf, SandboxError> {
    if relative.is_absolute() || relative.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(SandboxError::Jail(relative.to_path_buf()));
    }
    Ok(root.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_dir_component_is_rejected() {
        let root = Path::new("/scratch/abc");
        let result = jailed_path(root, Path::new("../../etc/passwd"));
        assert!(result.is_err());
    }

    #[test]
    fn plain_relative_path_resolves_inside_root() {
        let root = Path::new("/scratch/abc");
        let result = jailed_path(root, Path::new("candidate.py")).unwrap();
        assert_eq!(result, Path::new("/scratch/abc/candidate.py"));
    }
}
