//! Gestion des routes des patients et de leur historique médical.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::backend::fields::{
    optional_date, optional_enum, optional_id, optional_text, required_date, required_id,
    required_long_text, required_text, text_list,
};
use crate::backend::middlewares::{JsonBody, QueryParams};
use crate::backend::models::{
    message, AddPatientRequest, PatientIdQuery, PatientQuery, UpdateAllergiesRequest,
    UpdateConditionRequest, UpdatePatientInfoRequest,
};
use crate::database::patient::{self, PatientLookup};
use crate::models::{normalize_allergies, NewPatient, Patient, PatientPatch};
use crate::utils::error_messages::{AppError, EMPTY_LIST_ERROR, NO_CHANGES_ERROR};

/// Recherche un patient par identifiant ou par nom (exactement l'un des deux)
pub async fn get_patient(
    State(pool): State<SqlitePool>,
    QueryParams(query): QueryParams<PatientQuery>,
) -> Result<Json<Patient>, AppError> {
    let patient_id = optional_id("patient_id", query.patient_id)?;
    let name = optional_text("name", query.name)?;

    let lookup = match (&patient_id, &name) {
        (Some(patient_id), None) => PatientLookup::Id(patient_id),
        (None, Some(name)) => PatientLookup::Name(name),
        (Some(_), Some(_)) => {
            return Err(AppError::BadRequest(
                "Provide only one search parameter (patient_id or name)".to_string(),
            ))
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Provide a search parameter (patient_id or name)".to_string(),
            ))
        }
    };

    patient::fetch(&pool, lookup)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No patient found".to_string()))
}

pub async fn get_patients(State(pool): State<SqlitePool>) -> Result<Json<Vec<Patient>>, AppError> {
    let patients = patient::fetch_all(&pool).await?;
    if patients.is_empty() {
        return Err(AppError::NotFound(EMPTY_LIST_ERROR.to_string()));
    }
    Ok(Json(patients))
}

/// Admission d'un patient avec son historique médical
pub async fn add_patient(
    State(pool): State<SqlitePool>,
    JsonBody(payload): JsonBody<AddPatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let patient_id = required_id("patient_id", payload.patient_id)?;
    let name = required_text("name", payload.name)?;
    let gender = optional_enum("gender", payload.gender)?;
    let date_of_birth = required_date("date_of_birth", payload.date_of_birth)?;
    let contact_info = required_text("contact_info", payload.contact_info)?;
    let condition = required_long_text("condition", payload.condition)?;

    let allergies = text_list("allergies", payload.allergies.unwrap_or_default())?;
    let allergies = normalize_allergies(allergies);
    if allergies.is_empty() {
        return Err(AppError::missing("allergies"));
    }

    let new_patient = NewPatient {
        patient_id,
        name,
        gender,
        date_of_birth,
        contact_info,
        condition,
        allergies,
    };

    let created = patient::create(&pool, &new_patient).await?;
    Ok((
        StatusCode::CREATED,
        message(format!("Patient {} added successfully", created.patient_id)),
    ))
}

pub async fn update_patient_info(
    State(pool): State<SqlitePool>,
    JsonBody(payload): JsonBody<UpdatePatientInfoRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = required_id("patient_id", payload.patient_id)?;
    let patch = PatientPatch {
        name: optional_text("name", payload.name)?,
        contact_info: optional_text("contact_info", payload.contact_info)?,
        gender: optional_enum("gender", payload.gender)?,
        date_of_birth: optional_date("date_of_birth", payload.date_of_birth)?,
    };

    if patch.is_empty() {
        return Err(AppError::BadRequest(NO_CHANGES_ERROR.to_string()));
    }

    patient::update_info(&pool, &patient_id, &patch).await?;
    Ok(message(format!("Patient {patient_id} updated successfully")))
}

pub async fn update_condition(
    State(pool): State<SqlitePool>,
    JsonBody(payload): JsonBody<UpdateConditionRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = required_id("patient_id", payload.patient_id)?;
    let condition = required_long_text("condition", payload.condition)?;

    patient::update_condition(&pool, &patient_id, &condition).await?;
    Ok(message(format!("Condition of patient {patient_id} updated successfully")))
}

pub async fn update_allergies(
    State(pool): State<SqlitePool>,
    JsonBody(payload): JsonBody<UpdateAllergiesRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = required_id("patient_id", payload.patient_id)?;
    let allergies = text_list(
        "new_allergies",
        payload
            .new_allergies
            .ok_or_else(|| AppError::missing("new_allergies"))?,
    )?;

    patient::update_allergies(&pool, &patient_id, &allergies).await?;
    Ok(message(format!("Allergies of patient {patient_id} updated successfully")))
}

/// Supprime un patient et son historique médical
pub async fn delete_patient(
    State(pool): State<SqlitePool>,
    QueryParams(query): QueryParams<PatientIdQuery>,
) -> Result<Json<Value>, AppError> {
    let patient_id = required_id("patient_id", query.patient_id)?;

    patient::delete(&pool, &patient_id).await?;
    Ok(message(format!("Patient {patient_id} deleted successfully")))
}
