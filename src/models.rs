//! Modèle de données: patients, historique médical, personnel et comptes.

use std::collections::HashSet;

use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString};
use uuid::Uuid;

/// Genre d'un patient
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Rôle d'un membre du personnel: Médecin ou Infirmier
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
pub enum StaffRole {
    Doctor,
    Nurse,
}

/// Service hospitalier auquel un infirmier est rattaché
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Ward {
    General,
    #[serde(rename = "ICU")]
    #[strum(serialize = "ICU")]
    #[display("ICU")]
    Icu,
    Pediatric,
    Emergency,
}

/// Jour de la semaine d'un créneau de garde
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Type de garde
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Display,
)]
#[strum(ascii_case_insensitive)]
pub enum ShiftType {
    Morning,
    Afternoon,
    Evening,
    Night,
}

/// Un créneau de garde: un jour et un type de garde
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{day} {shift}")]
pub struct ShiftSlot {
    pub day: Day,
    pub shift: ShiftType,
}

/// Comma separated list of the accepted spellings of an enumerated field,
/// used in validation error messages
pub fn accepted_values<E: IntoEnumIterator + std::fmt::Display>() -> String {
    E::iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// L'historique médical d'un patient
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MedicalHistory {
    pub history_id: Uuid,
    pub patient_id: String,
    pub condition: String,
    pub allergies: Vec<String>,
}

/// Un patient, avec son historique médical s'il en a un
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Display)]
#[display("{patient_id}")]
pub struct Patient {
    pub patient_id: String,
    pub name: String,
    pub gender: Option<Gender>,
    pub date_of_birth: NaiveDate,
    pub contact_info: String,
    pub medical_history: Option<MedicalHistory>,
}

/// Les données nécessaires à l'admission d'un patient
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub patient_id: String,
    pub name: String,
    pub gender: Option<Gender>,
    pub date_of_birth: NaiveDate,
    pub contact_info: String,
    pub condition: String,
    pub allergies: Vec<String>,
}

/// Modification partielle d'un patient; les champs absents restent inchangés
#[derive(Debug, Clone, Default)]
pub struct PatientPatch {
    pub name: Option<String>,
    pub contact_info: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
}

impl PatientPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact_info.is_none()
            && self.gender.is_none()
            && self.date_of_birth.is_none()
    }
}

/// Un membre du personnel.
///
/// La spécialisation et le département n'ont de sens que pour un médecin,
/// le service (`ward`) que pour un infirmier.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Display)]
#[display("{staff_id}")]
pub struct Staff {
    pub staff_id: String,
    pub name: String,
    pub contact_info: String,
    pub role: StaffRole,
    pub specialization: Option<String>,
    pub department: Option<String>,
    pub ward: Option<Ward>,
    pub shift: Vec<ShiftSlot>,
}

#[derive(Debug, Clone)]
pub struct NewStaff {
    pub staff_id: String,
    pub name: String,
    pub contact_info: String,
    pub role: StaffRole,
    pub specialization: Option<String>,
    pub department: Option<String>,
    pub ward: Option<Ward>,
    pub shift: Vec<ShiftSlot>,
}

#[derive(Debug, Clone, Default)]
pub struct StaffPatch {
    pub name: Option<String>,
    pub contact_info: Option<String>,
    pub specialization: Option<String>,
    pub department: Option<String>,
    pub ward: Option<Ward>,
    pub shift: Option<Vec<ShiftSlot>>,
}

impl StaffPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact_info.is_none()
            && self.specialization.is_none()
            && self.department.is_none()
            && self.ward.is_none()
            && self.shift.is_none()
    }
}

/// Les données publiques d'un compte utilisateur. Le haché du mot de passe
/// n'en fait jamais partie.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Display)]
#[display("{username}")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub name: String,
}

/// Création d'un compte; le mot de passe est en clair et sera haché avant
/// d'être stocké
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub username: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.username.is_none() && self.password.is_none()
    }
}

/// Trims every allergy, drops empty entries and removes duplicates while
/// keeping the first occurrence order
pub fn normalize_allergies<I, S>(allergies: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    allergies
        .into_iter()
        .map(|allergy| allergy.as_ref().trim().to_string())
        .filter(|allergy| !allergy.is_empty())
        .filter(|allergy| seen.insert(allergy.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_parsing() {
        assert_eq!(StaffRole::from_str("Doctor").unwrap(), StaffRole::Doctor);
        assert_eq!(StaffRole::from_str("nurse").unwrap(), StaffRole::Nurse);
        assert!(StaffRole::from_str("Surgeon").is_err());
        assert!(StaffRole::from_str("").is_err());
    }

    #[test]
    fn test_ward_spelling() {
        assert_eq!(Ward::from_str("ICU").unwrap(), Ward::Icu);
        assert_eq!(Ward::from_str("icu").unwrap(), Ward::Icu);
        assert_eq!(Ward::Icu.to_string(), "ICU");
        assert_eq!(serde_json::to_string(&Ward::Icu).unwrap(), "\"ICU\"");
        assert!(Ward::from_str("Cardiology").is_err());
    }

    #[test]
    fn test_accepted_values() {
        assert_eq!(accepted_values::<StaffRole>(), "Doctor, Nurse");
        assert_eq!(
            accepted_values::<Ward>(),
            "General, ICU, Pediatric, Emergency"
        );
    }

    #[test]
    fn test_shift_slot_json() {
        let slot = ShiftSlot {
            day: Day::Monday,
            shift: ShiftType::Morning,
        };
        assert_eq!(
            serde_json::to_value(slot).unwrap(),
            serde_json::json!({"day": "Monday", "shift": "Morning"})
        );
        assert_eq!(slot.to_string(), "Monday Morning");
    }

    #[test]
    fn test_normalize_allergies() {
        let allergies = normalize_allergies([" Peanuts", "Dust", "", "Peanuts", "Pollen, birch"]);
        assert_eq!(allergies, vec!["Peanuts", "Dust", "Pollen, birch"]);
    }

    #[test]
    fn test_empty_patches() {
        assert!(PatientPatch::default().is_empty());
        assert!(StaffPatch::default().is_empty());
        assert!(UserPatch::default().is_empty());
        assert!(!UserPatch {
            name: Some("Nurse Daisy".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
