//! Provides a validated text field representation.
//!
//! Names, contact details and clinical notes all go through this type so that
//! what reaches the database is:
//! - within length constraints
//! - free of control characters
//! - free of HTML markup
//! - trimmed and Unicode-normalized

use ammonia::is_html;
use anyhow::{bail, Context, Result};
use std::fmt;
use unicode_normalization::UnicodeNormalization;
use validator::ValidateNonControlCharacter;

use crate::utils::validation::{MAX_CONTENT_LENGTH, MAX_SHORT_CONTENT_LENGTH, MIN_CONTENT_LENGTH};

/// Represents validated textual content.
/// This type can only be constructed through validation, so any instance
/// meets the formatting requirements above.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextInput {
    // The validated and normalized text content
    text_content: String,
}

impl TextInput {
    /// Creates a new TextInput for long-form content like a medical condition
    /// description.
    ///
    /// # Example
    /// ```
    /// use hms::utils::validation::TextInput;
    ///
    /// let condition = TextInput::new_long_form("Chronic asthma, mild").unwrap();
    /// assert_eq!(condition.as_str(), "Chronic asthma, mild");
    /// ```
    pub fn new_long_form(content: &str) -> Result<Self> {
        Self::new(content, MAX_CONTENT_LENGTH)
            .context("Failed to create long-form content")
    }

    /// Creates a new TextInput for short-form content like names, contact
    /// details or departments.
    ///
    /// # Example
    /// ```
    /// use hms::utils::validation::TextInput;
    ///
    /// let name = TextInput::new_short_form("  Jane Doe ").unwrap();
    /// assert_eq!(name.as_str(), "Jane Doe");
    /// ```
    pub fn new_short_form(content: &str) -> Result<Self> {
        Self::new(content, MAX_SHORT_CONTENT_LENGTH)
            .context("Failed to create short-form content")
    }

    fn new(content: &str, max_length: usize) -> Result<Self> {
        let trimmed = content.trim();

        if trimmed.chars().count() < MIN_CONTENT_LENGTH {
            bail!("Content cannot be empty");
        }

        if trimmed.len() > max_length {
            bail!("Content exceeds maximum length of {} characters", max_length);
        }

        if !trimmed.validate_non_control_character() {
            bail!("Content contains invalid control characters");
        }

        if is_html(trimmed) {
            bail!("Content cannot contain HTML");
        }

        // Normalize Unicode characters to ensure consistent representation
        let normalized = trimmed.nfkc().collect::<String>();

        Ok(Self {
            text_content: normalized,
        })
    }

    /// Returns the validated content as a string slice
    pub fn as_str(&self) -> &str {
        &self.text_content
    }

    pub fn into_inner(self) -> String {
        self.text_content
    }
}

impl fmt::Display for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text_content)
    }
}

impl AsRef<str> for TextInput {
    fn as_ref(&self) -> &str {
        &self.text_content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_content() {
        let valid_contents = vec![
            "Jane Doe",
            "09123456789",
            "nurse@hospital.com",
            "Dr. Nguyễn Văn An",
            " Cardiology  ",  // Should be trimmed
        ];

        for content in valid_contents {
            let result = TextInput::new_short_form(content);
            assert!(result.is_ok(), "Should accept valid content: {}", content);
        }
    }

    #[test]
    fn test_invalid_content() {
        let binding = "a".repeat(MAX_SHORT_CONTENT_LENGTH + 1);
        let invalid_contents = vec![
            "",  // Empty
            "   ",  // Only whitespace
            "<script>alert(1)</script>",
            &binding,  // Too long
            "Jane\0Doe",  // Control character
        ];

        for content in invalid_contents {
            let result = TextInput::new_short_form(content);
            assert!(result.is_err(), "Should reject invalid content: {}", content);
        }
    }

    #[test]
    fn test_content_length_limits() {
        let short_content = "A".repeat(MAX_SHORT_CONTENT_LENGTH);
        assert!(TextInput::new_short_form(&short_content).is_ok());

        let long_content = "A".repeat(MAX_CONTENT_LENGTH);
        assert!(TextInput::new_long_form(&long_content).is_ok());
        assert!(TextInput::new_short_form(&long_content).is_err());
    }

    #[test]
    fn test_unicode_normalization() {
        // "e" followed by a combining acute accent is composed into "é"
        let name = TextInput::new_short_form("Rene\u{301}e").unwrap();
        assert_eq!(name.as_str(), "Renée");
        assert_eq!(name.as_str().chars().count(), 5);
    }

    #[test]
    fn test_display_and_asref() {
        let content = TextInput::new_short_form("Asthma").unwrap();
        assert_eq!(format!("{}", content), "Asthma");
        let reference: &str = content.as_ref();
        assert_eq!(reference, "Asthma");
        assert_eq!(content.into_inner(), "Asthma");
    }
}
