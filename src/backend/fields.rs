//! Extraction et validation des champs reçus dans les requêtes.
//!
//! Les champs optionnels vides (`""`) sont traités comme absents, le
//! formulaire d'administration envoyant des chaînes vides pour les champs
//! non renseignés.

use std::{fmt::Display, str::FromStr};

use chrono::NaiveDate;
use strum::IntoEnumIterator;

use crate::models::accepted_values;
use crate::utils::error_messages::AppError;
use crate::utils::validation::{parse_date, RecordId, TextInput};

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn required_id(field: &str, value: Option<String>) -> Result<String, AppError> {
    optional_id(field, value)?.ok_or_else(|| AppError::missing(field))
}

pub fn optional_id(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    present(value)
        .map(|raw| {
            RecordId::new(&raw)
                .map(RecordId::into_inner)
                .map_err(|e| AppError::invalid(field, e))
        })
        .transpose()
}

pub fn required_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    optional_text(field, value)?.ok_or_else(|| AppError::missing(field))
}

pub fn optional_text(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    present(value)
        .map(|raw| {
            TextInput::new_short_form(&raw)
                .map(TextInput::into_inner)
                .map_err(|e| AppError::invalid(field, format!("{e:#}")))
        })
        .transpose()
}

/// Free text such as a medical condition
pub fn required_long_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    let raw = present(value).ok_or_else(|| AppError::missing(field))?;
    TextInput::new_long_form(&raw)
        .map(TextInput::into_inner)
        .map_err(|e| AppError::invalid(field, format!("{e:#}")))
}

/// Validates every non-blank entry of a list of short texts, such as allergies.
/// Blank entries are dropped.
pub fn text_list(field: &str, values: Vec<String>) -> Result<Vec<String>, AppError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| optional_text(&format!("{field}[{index}]"), Some(value)))
        .filter_map(Result::transpose)
        .collect()
}

pub fn required_date(field: &str, value: Option<String>) -> Result<NaiveDate, AppError> {
    optional_date(field, value)?.ok_or_else(|| AppError::missing(field))
}

pub fn optional_date(field: &str, value: Option<String>) -> Result<Option<NaiveDate>, AppError> {
    present(value)
        .map(|raw| parse_date(&raw).map_err(|e| AppError::invalid(field, format!("{e:#}"))))
        .transpose()
}

/// Parses an enumerated field, listing the accepted values on failure
pub fn parse_enum<E>(field: &str, raw: &str) -> Result<E, AppError>
where
    E: FromStr + IntoEnumIterator + Display,
{
    E::from_str(raw.trim()).map_err(|_| {
        AppError::invalid(
            field,
            format!("'{}' is not one of {}", raw.trim(), accepted_values::<E>()),
        )
    })
}

pub fn required_enum<E>(field: &str, value: Option<String>) -> Result<E, AppError>
where
    E: FromStr + IntoEnumIterator + Display,
{
    optional_enum(field, value)?.ok_or_else(|| AppError::missing(field))
}

pub fn optional_enum<E>(field: &str, value: Option<String>) -> Result<Option<E>, AppError>
where
    E: FromStr + IntoEnumIterator + Display,
{
    present(value).map(|raw| parse_enum(field, &raw)).transpose()
}

/// Passwords are neither trimmed nor normalized, only checked for presence
pub fn required_password(field: &str, value: Option<String>) -> Result<String, AppError> {
    optional_password(value).ok_or_else(|| AppError::missing(field))
}

pub fn optional_password(value: Option<String>) -> Option<String> {
    value.filter(|password| !password.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StaffRole, Ward};

    #[test]
    fn test_empty_is_absent() {
        assert_eq!(optional_text("name", Some("  ".to_string())).unwrap(), None);
        assert_eq!(optional_id("patient_id", None).unwrap(), None);
        assert_eq!(optional_enum::<Ward>("ward", Some(String::new())).unwrap(), None);
        assert!(matches!(
            required_id("patient_id", Some(String::new())),
            Err(AppError::BadRequest(msg)) if msg == "Missing required field: patient_id"
        ));
    }

    #[test]
    fn test_invalid_enum_lists_values() {
        let err = required_enum::<StaffRole>("role", Some("Surgeon".to_string())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed for role: 'Surgeon' is not one of Doctor, Nurse"
        );
    }

    #[test]
    fn test_text_is_trimmed() {
        assert_eq!(
            required_text("name", Some(" Jane Doe ".to_string())).unwrap(),
            "Jane Doe"
        );
        assert!(required_text("name", Some("<b>Jane</b>".to_string())).is_err());
    }

    #[test]
    fn test_text_list() {
        let allergies = vec![" Peanuts".to_string(), "".to_string(), "Pollen, birch".to_string()];
        assert_eq!(
            text_list("allergies", allergies).unwrap(),
            vec!["Peanuts", "Pollen, birch"]
        );

        let err = text_list("allergies", vec!["Dust".to_string(), "<script>".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("allergies[1]"));
        assert!(text_list("allergies", vec!["a\0b".to_string()]).is_err());
    }

    #[test]
    fn test_dates() {
        assert_eq!(
            required_date("date_of_birth", Some("1990-05-15".to_string())).unwrap(),
            NaiveDate::from_ymd_opt(1990, 5, 15).unwrap()
        );
        assert!(required_date("date_of_birth", Some("15/05/1990".to_string())).is_err());
    }

    #[test]
    fn test_password_is_kept_verbatim() {
        assert_eq!(
            required_password("password", Some(" 12345 ".to_string())).unwrap(),
            " 12345 "
        );
        assert!(required_password("password", Some(String::new())).is_err());
    }
}
