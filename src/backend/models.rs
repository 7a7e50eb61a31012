//! Définitions des structures pour les interactions avec l'API.
//!
//! Tous les champs sont optionnels à la désérialisation: leur présence est
//! vérifiée par les handlers, qui répondent alors par un message explicite.

use serde::Deserialize;
use serde_json::{json, Value};

use axum::Json;

/// Réponse d'acquittement `{"message": ...}`
pub fn message(text: impl Into<String>) -> Json<Value> {
    Json(json!({ "message": text.into() }))
}

// --- Patients ---

#[derive(Debug, Default, Deserialize)]
pub struct PatientQuery {
    pub patient_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PatientIdQuery {
    pub patient_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddPatientRequest {
    pub patient_id: Option<String>,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub contact_info: Option<String>,
    pub condition: Option<String>,
    pub allergies: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePatientInfoRequest {
    pub patient_id: Option<String>,
    pub name: Option<String>,
    pub contact_info: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateConditionRequest {
    pub patient_id: Option<String>,
    pub condition: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAllergiesRequest {
    pub patient_id: Option<String>,
    pub new_allergies: Option<Vec<String>>,
}

// --- Personnel ---

#[derive(Debug, Default, Deserialize)]
pub struct StaffIdQuery {
    pub staff_id: Option<String>,
}

/// Un créneau de garde tel que reçu, avant validation des énumérations:
/// `{"day": "Monday", "shift": "Morning"}` ou `"Monday Morning"`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ShiftSlotRequest {
    Structured {
        day: Option<String>,
        shift: Option<String>,
    },
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct AddStaffRequest {
    pub staff_id: Option<String>,
    pub name: Option<String>,
    pub contact_info: Option<String>,
    pub role: Option<String>,
    pub specialization: Option<String>,
    pub department: Option<String>,
    pub ward: Option<String>,
    pub shift: Option<Vec<ShiftSlotRequest>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStaffInfoRequest {
    pub staff_id: Option<String>,
    pub name: Option<String>,
    pub contact_info: Option<String>,
    pub specialization: Option<String>,
    pub department: Option<String>,
    pub ward: Option<String>,
    /// Le formulaire d'administration renvoie le planning avec les autres champs
    pub shift: Option<Vec<ShiftSlotRequest>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateShiftRequest {
    pub staff_id: Option<String>,
    pub shift: Option<Vec<ShiftSlotRequest>>,
}

// --- Comptes ---

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub id: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserIdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddUserRequest {
    pub id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Quand il est fourni, il doit correspondre au mot de passe actuel
    pub old_password: Option<String>,
}
