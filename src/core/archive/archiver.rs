//! gzip-compressed tar archives of generated spreadsheets

use super::guard::validate_target;
use crate::domain::{RekapError, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Files to bundle and the archive to write, relative to the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    pub files: Vec<PathBuf>,
    pub target: PathBuf,
}

impl ArchiveRequest {
    pub fn new(files: Vec<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            files,
            target: target.into(),
        }
    }
}

/// Writes archives inside a fixed output root
#[derive(Debug, Clone)]
pub struct Archiver {
    output_root: PathBuf,
}

impl Archiver {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Validates the target and streams every file into it
    ///
    /// Entries are named relative to the output root and keep the mode, size
    /// and modification time of the source file. A failure after the target
    /// was created leaves the partial archive on disk.
    pub fn archive(&self, request: &ArchiveRequest) -> Result<PathBuf> {
        let target = validate_target(&self.output_root, &request.target).map_err(|e| {
            tracing::error!(
                target_path = %request.target.display(),
                error = %e,
                "Invalid archive target"
            );
            e
        })?;

        tracing::info!(
            file_count = request.files.len(),
            target_path = %target.display(),
            "Compression started"
        );

        let out = File::create(&target).map_err(|e| {
            RekapError::ArchiveIo(format!("failed to create {}: {}", target.display(), e))
        })?;

        let encoder = GzEncoder::new(out, Compression::best());
        let mut builder = tar::Builder::new(encoder);

        for file in &request.files {
            let mut input = File::open(file).map_err(|e| {
                RekapError::ArchiveIo(format!("failed to open {}: {}", file.display(), e))
            })?;

            let entry_name = self.entry_name(file);
            builder.append_file(&entry_name, &mut input).map_err(|e| {
                RekapError::ArchiveIo(format!("failed to add {}: {}", file.display(), e))
            })?;
        }

        let encoder = builder
            .into_inner()
            .map_err(|e| RekapError::ArchiveIo(format!("failed to finish tar stream: {e}")))?;
        encoder
            .finish()
            .map_err(|e| RekapError::ArchiveIo(format!("failed to finish gzip stream: {e}")))?;

        tracing::info!(target_path = %target.display(), "Compression finished");

        Ok(target)
    }

    fn entry_name(&self, file: &Path) -> PathBuf {
        match file.strip_prefix(&self.output_root) {
            Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
            _ => file
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| file.to_path_buf()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_entry_names_relative_to_root() {
        let archiver = Archiver::new("files");
        assert_eq!(
            archiver.entry_name(Path::new("files/UNIT_1/part.xlsx")),
            PathBuf::from("UNIT_1/part.xlsx")
        );
        assert_eq!(
            archiver.entry_name(Path::new("/elsewhere/part.xlsx")),
            PathBuf::from("part.xlsx")
        );
    }

    #[test]
    fn test_rejected_target_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let archiver = Archiver::new(temp.path());

        let request = ArchiveRequest::new(vec![], "../escape.tar.gz");
        assert!(archiver.archive(&request).is_err());
        assert!(!temp.path().parent().unwrap().join("escape.tar.gz").exists());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_input_is_archive_io() {
        let temp = TempDir::new().unwrap();
        let archiver = Archiver::new(temp.path());

        let request = ArchiveRequest::new(vec![temp.path().join("nope.xlsx")], "out.tar.gz");
        let err = archiver.archive(&request).unwrap_err();
        assert!(matches!(err, RekapError::ArchiveIo(_)));
        // partial archive stays on disk
        assert!(temp.path().join("out.tar.gz").exists());
    }
}
