//! Output file naming
//!
//! Filenames are consumed by downstream tooling, so their shape is fixed:
//! `REKAP_<KIND>_EXPORT_<SCOPE>_PART_<N>.xlsx` for spreadsheet parts and
//! `<SCOPE>.tar.gz` for archives.

use crate::domain::filter::ExportKind;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Extension of generated archives
pub const ARCHIVE_EXTENSION: &str = "tar.gz";

/// Normalizes free text into a filename-safe label.
///
/// Uppercases ASCII letters and collapses every run of other characters into a
/// single underscore. Leading and trailing separators are dropped, so the
/// result only contains `[A-Z0-9_]` and normalizing it again is a no-op.
///
/// ```
/// use rekap::domain::naming::normalize_label;
///
/// assert_eq!(normalize_label("  52001 ulp Kota-Barat "), "52001_ULP_KOTA_BARAT");
/// ```
pub fn normalize_label(input: &str) -> String {
    separator_pattern()
        .replace_all(input, "_")
        .trim_matches('_')
        .to_ascii_uppercase()
}

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("separator pattern is valid"))
}

/// Filename of one spreadsheet part; `part` is 1-based
pub fn part_filename(kind: ExportKind, label: &str, part: usize) -> String {
    format!("REKAP_{}_EXPORT_{}_PART_{}.xlsx", kind.code(), label, part)
}

/// Directory holding every part of one scope
pub fn part_dir(output_root: &Path, label: &str) -> PathBuf {
    output_root.join(label)
}

/// Full path of one spreadsheet part
pub fn part_path(output_root: &Path, kind: ExportKind, label: &str, part: usize) -> PathBuf {
    part_dir(output_root, label).join(part_filename(kind, label, part))
}

/// Archive path for one scope
pub fn archive_path(output_root: &Path, label: &str) -> PathBuf {
    output_root.join(format!("{label}.{ARCHIVE_EXTENSION}"))
}
