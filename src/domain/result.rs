//! Result type alias for termport

use super::errors::TermportError;

/// Result type alias for termport operations
///
/// # Examples
///
/// ```
/// use termport::domain::result::Result;
/// use termport::domain::errors::TermportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TermportError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TermportError>;
