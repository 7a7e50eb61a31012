//! Identifiers of patients, staff members and user accounts (`P005`, `D001`, `U004`...).

use anyhow::{bail, Result};
use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::validation::MAX_ID_LENGTH;

static RECORD_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("Failed to compile record id regex")
});

/// Wrapper type for a record identifier that has been validated
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            bail!("Identifier cannot be empty");
        }

        if trimmed.len() > MAX_ID_LENGTH {
            bail!("Identifier exceeds maximum length of {} characters", MAX_ID_LENGTH);
        }

        if !RECORD_ID_REGEX.is_match(trimmed) {
            bail!("Identifier may only contain letters, digits, '-' and '_'");
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
