//! Archiving of generated spreadsheets
//!
//! - [`guard`] - Output path validation
//! - [`archiver`] - tar + gzip writer

pub mod archiver;
pub mod guard;

pub use archiver::{ArchiveRequest, Archiver};
pub use guard::validate_target;
