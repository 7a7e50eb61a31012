//! Constants used throughout the validation system


/// Minimum length for content
pub const MIN_CONTENT_LENGTH: usize = 1;
/// Maximum length for long-form content
pub const MAX_CONTENT_LENGTH: usize = 2_000;
/// Maximum length for short-form content
pub const MAX_SHORT_CONTENT_LENGTH: usize = 250;
/// Maximum length for a record identifier
pub const MAX_ID_LENGTH: usize = 64;
/// Format expected for dates of birth
pub const DATE_FORMAT: &str = "%Y-%m-%d";
