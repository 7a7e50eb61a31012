//! Calendar dates received as `YYYY-MM-DD` strings.

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};

use crate::utils::validation::DATE_FORMAT;

/// Parses a date of birth. Dates in the future are rejected.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw.trim()))?;

    if date > Utc::now().date_naive() {
        bail!("Date of birth cannot be in the future");
    }

    Ok(date)
}
