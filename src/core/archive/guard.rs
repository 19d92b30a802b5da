//! Output path safety checks
//!
//! Archive targets are given relative to the output root. A target is
//! rejected when it climbs out with `..`, starts with a separator, or resolves
//! outside the root once symlinks are followed. Nothing is written before the
//! checks pass.

use crate::domain::{RekapError, Result};
use std::path::{Component, Path, PathBuf};

/// Validates `target` against `output_root` and returns the joined path
///
/// # Errors
///
/// Returns [`RekapError::ArchiveValidation`] when the target is unsafe or the
/// root cannot be resolved.
pub fn validate_target(output_root: &Path, target: &Path) -> Result<PathBuf> {
    check_lexical(target)?;

    let resolved = output_root.join(target);

    let is_symlink = resolved
        .symlink_metadata()
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if is_symlink {
        return Err(RekapError::ArchiveValidation(format!(
            "archive target {} is a symlink",
            target.display()
        )));
    }

    let canonical_root = output_root.canonicalize().map_err(|e| {
        RekapError::ArchiveValidation(format!(
            "output root {} cannot be resolved: {}",
            output_root.display(),
            e
        ))
    })?;

    let ancestor = existing_ancestor(&resolved).ok_or_else(|| {
        RekapError::ArchiveValidation(format!(
            "no existing ancestor for {}",
            resolved.display()
        ))
    })?;

    let canonical_ancestor = ancestor.canonicalize().map_err(|e| {
        RekapError::ArchiveValidation(format!("{} cannot be resolved: {}", ancestor.display(), e))
    })?;

    if !canonical_ancestor.starts_with(&canonical_root) {
        return Err(RekapError::ArchiveValidation(format!(
            "{} resolves outside the output root {}",
            target.display(),
            output_root.display()
        )));
    }

    Ok(resolved)
}

fn check_lexical(target: &Path) -> Result<()> {
    let raw = target.to_string_lossy();

    if raw.is_empty() || target.file_name().is_none() {
        return Err(RekapError::ArchiveValidation(format!(
            "invalid archive target '{raw}'"
        )));
    }

    if raw.starts_with('/') || raw.starts_with('\\') || target.is_absolute() {
        return Err(RekapError::ArchiveValidation(format!(
            "archive target must be relative to the output root: {raw}"
        )));
    }

    // Also catch backslash-separated segments on non-Windows hosts
    let climbs = target.components().any(|c| matches!(c, Component::ParentDir))
        || raw.split(['/', '\\']).any(|segment| segment == "..");
    if climbs {
        return Err(RekapError::ArchiveValidation(format!(
            "archive target contains '..': {raw}"
        )));
    }

    Ok(())
}

// symlink_metadata so a dangling link still counts as existing
fn existing_ancestor(path: &Path) -> Option<&Path> {
    path.ancestors()
        .find(|p| !p.as_os_str().is_empty() && p.symlink_metadata().is_ok())
}
