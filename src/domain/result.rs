//! Result type alias for Rekap
//!
//! This module provides a convenient Result type alias that uses RekapError
//! as the error type.

use super::errors::RekapError;

/// Result type alias for Rekap operations
///
/// # Examples
///
/// ```
/// use rekap::domain::result::Result;
/// use rekap::domain::errors::RekapError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(RekapError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RekapError>;
