//! Patients et historique médical.

use chrono::NaiveDate;
use log::info;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::{decode_enum, decode_json, duplicate_or, encode_json, DbError};
use crate::models::{normalize_allergies, MedicalHistory, NewPatient, Patient, PatientPatch};

/// Clé de recherche d'un patient
#[derive(Debug, Clone, Copy)]
pub enum PatientLookup<'a> {
    Id(&'a str),
    /// Plusieurs patients peuvent porter le même nom, le plus petit identifiant l'emporte
    Name(&'a str),
}

fn patient_from_row(row: &SqliteRow) -> Result<Patient, DbError> {
    let gender: Option<String> = row.try_get("gender")?;
    let date_of_birth: NaiveDate = row.try_get("date_of_birth")?;

    Ok(Patient {
        patient_id: row.try_get("patient_id")?,
        name: row.try_get("name")?,
        gender: gender
            .as_deref()
            .map(|raw| decode_enum("gender", raw))
            .transpose()?,
        date_of_birth,
        contact_info: row.try_get("contact_info")?,
        medical_history: None,
    })
}

fn history_from_row(row: &SqliteRow, patient_id: &str) -> Result<MedicalHistory, DbError> {
    let history_id: String = row.try_get("history_id")?;
    let allergies: String = row.try_get("allergies")?;

    Ok(MedicalHistory {
        history_id: Uuid::parse_str(&history_id).map_err(|e| DbError::Corrupted {
            column: "history_id",
            reason: e.to_string(),
        })?,
        patient_id: patient_id.to_string(),
        condition: row.try_get("condition")?,
        allergies: decode_json("allergies", &allergies)?,
    })
}

async fn fetch_history(
    conn: &mut SqliteConnection,
    patient_id: &str,
) -> Result<Option<MedicalHistory>, DbError> {
    let row = sqlx::query(
        "SELECT history_id, \"condition\", allergies FROM MedicalHistory WHERE patient_id = ?",
    )
    .bind(patient_id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(|row| history_from_row(&row, patient_id)).transpose()
}

async fn fetch_with(
    conn: &mut SqliteConnection,
    lookup: PatientLookup<'_>,
) -> Result<Option<Patient>, DbError> {
    let row = match lookup {
        PatientLookup::Id(patient_id) => {
            sqlx::query(
                "SELECT patient_id, name, gender, date_of_birth, contact_info
                 FROM Patient WHERE patient_id = ?",
            )
            .bind(patient_id)
            .fetch_optional(&mut *conn)
            .await?
        }
        PatientLookup::Name(name) => {
            sqlx::query(
                "SELECT patient_id, name, gender, date_of_birth, contact_info
                 FROM Patient WHERE name = ? ORDER BY patient_id LIMIT 1",
            )
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?
        }
    };

    let Some(row) = row else {
        return Ok(None);
    };

    let mut patient = patient_from_row(&row)?;
    patient.medical_history = fetch_history(conn, &patient.patient_id).await?;
    Ok(Some(patient))
}

/// Distinguishes a missing patient from a patient without medical history
async fn missing_history(conn: &mut SqliteConnection, patient_id: &str) -> DbError {
    let exists = sqlx::query("SELECT 1 FROM Patient WHERE patient_id = ?")
        .bind(patient_id)
        .fetch_optional(&mut *conn)
        .await;

    match exists {
        Ok(Some(_)) => DbError::NoMedicalHistory(patient_id.to_string()),
        Ok(None) => DbError::NotFound(format!("Patient {patient_id}")),
        Err(e) => DbError::Sqlx(e),
    }
}

/// Récupère un patient et son historique médical
pub async fn fetch(pool: &SqlitePool, lookup: PatientLookup<'_>) -> Result<Option<Patient>, DbError> {
    let mut conn = pool.acquire().await?;
    fetch_with(&mut conn, lookup).await
}

/// Tous les patients, avec leur historique éventuel, triés par identifiant
pub async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Patient>, DbError> {
    let mut conn = pool.acquire().await?;
    let rows = sqlx::query(
        "SELECT p.patient_id, p.name, p.gender, p.date_of_birth, p.contact_info,
                h.history_id, h.\"condition\", h.allergies
         FROM Patient p
         LEFT JOIN MedicalHistory h ON h.patient_id = p.patient_id
         ORDER BY p.patient_id",
    )
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|row| -> Result<Patient, DbError> {
            let mut patient = patient_from_row(row)?;
            let history_id: Option<String> = row.try_get("history_id")?;
            if history_id.is_some() {
                patient.medical_history = Some(history_from_row(row, &patient.patient_id)?);
            }
            Ok(patient)
        })
        .collect()
}

/// Admet un patient et crée son historique médical, dans une seule transaction
pub async fn create(pool: &SqlitePool, new_patient: &NewPatient) -> Result<Patient, DbError> {
    let history = MedicalHistory {
        history_id: Uuid::new_v4(),
        patient_id: new_patient.patient_id.clone(),
        condition: new_patient.condition.clone(),
        allergies: normalize_allergies(&new_patient.allergies),
    };
    let allergies = encode_json("allergies", &history.allergies)?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO Patient (patient_id, name, gender, date_of_birth, contact_info)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&new_patient.patient_id)
    .bind(&new_patient.name)
    .bind(new_patient.gender.map(|gender| gender.to_string()))
    .bind(new_patient.date_of_birth)
    .bind(&new_patient.contact_info)
    .execute(&mut *tx)
    .await
    .map_err(|e| duplicate_or(e, || format!("Patient {}", new_patient.patient_id)))?;

    sqlx::query(
        "INSERT INTO MedicalHistory (history_id, patient_id, \"condition\", allergies)
         VALUES (?, ?, ?, ?)",
    )
    .bind(history.history_id.to_string())
    .bind(&history.patient_id)
    .bind(&history.condition)
    .bind(allergies)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!("Created patient {}", new_patient.patient_id);

    Ok(Patient {
        patient_id: new_patient.patient_id.clone(),
        name: new_patient.name.clone(),
        gender: new_patient.gender,
        date_of_birth: new_patient.date_of_birth,
        contact_info: new_patient.contact_info.clone(),
        medical_history: Some(history),
    })
}

/// Applique une modification partielle en une seule requête
pub async fn update_info(
    pool: &SqlitePool,
    patient_id: &str,
    patch: &PatientPatch,
) -> Result<Patient, DbError> {
    let mut conn = pool.acquire().await?;

    let result = sqlx::query(
        "UPDATE Patient SET
            name = COALESCE(?, name),
            contact_info = COALESCE(?, contact_info),
            gender = COALESCE(?, gender),
            date_of_birth = COALESCE(?, date_of_birth)
         WHERE patient_id = ?",
    )
    .bind(patch.name.as_deref())
    .bind(patch.contact_info.as_deref())
    .bind(patch.gender.map(|gender| gender.to_string()))
    .bind(patch.date_of_birth)
    .bind(patient_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound(format!("Patient {patient_id}")));
    }

    info!("Updated patient {patient_id}");
    fetch_with(&mut conn, PatientLookup::Id(patient_id))
        .await?
        .ok_or_else(|| DbError::NotFound(format!("Patient {patient_id}")))
}

pub async fn update_condition(
    pool: &SqlitePool,
    patient_id: &str,
    condition: &str,
) -> Result<MedicalHistory, DbError> {
    let mut conn = pool.acquire().await?;

    let result = sqlx::query("UPDATE MedicalHistory SET \"condition\" = ? WHERE patient_id = ?")
        .bind(condition)
        .bind(patient_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(missing_history(&mut conn, patient_id).await);
    }

    info!("Updated condition of patient {patient_id}");
    fetch_history(&mut conn, patient_id)
        .await?
        .ok_or_else(|| DbError::NoMedicalHistory(patient_id.to_string()))
}

/// Remplace l'ensemble des allergies d'un patient
pub async fn update_allergies(
    pool: &SqlitePool,
    patient_id: &str,
    allergies: &[String],
) -> Result<MedicalHistory, DbError> {
    let encoded = encode_json("allergies", &normalize_allergies(allergies))?;
    let mut conn = pool.acquire().await?;

    let result = sqlx::query("UPDATE MedicalHistory SET allergies = ? WHERE patient_id = ?")
        .bind(encoded)
        .bind(patient_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(missing_history(&mut conn, patient_id).await);
    }

    info!("Updated allergies of patient {patient_id}");
    fetch_history(&mut conn, patient_id)
        .await?
        .ok_or_else(|| DbError::NoMedicalHistory(patient_id.to_string()))
}

/// Supprime l'historique puis le patient; tout est annulé si le patient n'existe pas
pub async fn delete(pool: &SqlitePool, patient_id: &str) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM MedicalHistory WHERE patient_id = ?")
        .bind(patient_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM Patient WHERE patient_id = ?")
        .bind(patient_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound(format!("Patient {patient_id}")));
    }

    tx.commit().await?;
    info!("Deleted patient {patient_id}");
    Ok(())
}
