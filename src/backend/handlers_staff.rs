//! Gestion des routes du personnel soignant.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::backend::fields::{
    optional_enum, optional_text, required_enum, required_id, required_text,
};
use crate::backend::middlewares::{JsonBody, QueryParams};
use crate::backend::models::{
    message, AddStaffRequest, ShiftSlotRequest, StaffIdQuery, UpdateShiftRequest,
    UpdateStaffInfoRequest,
};
use crate::database::staff;
use crate::models::{NewStaff, ShiftSlot, Staff, StaffPatch};
use crate::utils::error_messages::{AppError, EMPTY_LIST_ERROR, NO_CHANGES_ERROR};

/// Valide chaque créneau; l'ordre reçu est conservé
fn parse_shift(slots: Vec<ShiftSlotRequest>) -> Result<Vec<ShiftSlot>, AppError> {
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| -> Result<ShiftSlot, AppError> {
            let field = format!("shift[{index}]");
            let (day, shift) = match slot {
                ShiftSlotRequest::Structured { day, shift } => (day, shift),
                ShiftSlotRequest::Text(text) => match text.split_whitespace().collect::<Vec<_>>()[..] {
                    [day, shift] => (Some(day.to_string()), Some(shift.to_string())),
                    _ => {
                        return Err(AppError::invalid(
                            &field,
                            format!("'{text}' is not of the form '<day> <shift>'"),
                        ))
                    }
                },
            };

            Ok(ShiftSlot {
                day: required_enum(&format!("{field}.day"), day)?,
                shift: required_enum(&format!("{field}.shift"), shift)?,
            })
        })
        .collect()
}

pub async fn get_staff(
    State(pool): State<SqlitePool>,
    QueryParams(query): QueryParams<StaffIdQuery>,
) -> Result<Json<Staff>, AppError> {
    let staff_id = required_id("staff_id", query.staff_id)?;

    staff::fetch(&pool, &staff_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No staff member found".to_string()))
}

pub async fn get_staffs(State(pool): State<SqlitePool>) -> Result<Json<Vec<Staff>>, AppError> {
    let members = staff::fetch_all(&pool).await?;
    if members.is_empty() {
        return Err(AppError::NotFound(EMPTY_LIST_ERROR.to_string()));
    }
    Ok(Json(members))
}

/// Ajoute un membre du personnel. Un rôle ou un service inconnu est refusé
/// avant toute écriture.
pub async fn add_staff(
    State(pool): State<SqlitePool>,
    JsonBody(payload): JsonBody<AddStaffRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let staff_id = required_id("staff_id", payload.staff_id)?;
    let name = required_text("name", payload.name)?;
    let contact_info = required_text("contact_info", payload.contact_info)?;
    let role = required_enum("role", payload.role)?;

    let new_staff = NewStaff {
        staff_id,
        name,
        contact_info,
        role,
        specialization: optional_text("specialization", payload.specialization)?,
        department: optional_text("department", payload.department)?,
        ward: optional_enum("ward", payload.ward)?,
        shift: parse_shift(payload.shift.unwrap_or_default())?,
    };

    let created = staff::create(&pool, &new_staff).await?;
    Ok((
        StatusCode::CREATED,
        message(format!("Staff {} added successfully", created.staff_id)),
    ))
}

pub async fn update_staff_info(
    State(pool): State<SqlitePool>,
    JsonBody(payload): JsonBody<UpdateStaffInfoRequest>,
) -> Result<Json<Value>, AppError> {
    let staff_id = required_id("staff_id", payload.staff_id)?;
    let patch = StaffPatch {
        name: optional_text("name", payload.name)?,
        contact_info: optional_text("contact_info", payload.contact_info)?,
        specialization: optional_text("specialization", payload.specialization)?,
        department: optional_text("department", payload.department)?,
        ward: optional_enum("ward", payload.ward)?,
        shift: payload.shift.map(parse_shift).transpose()?,
    };

    if patch.is_empty() {
        return Err(AppError::BadRequest(NO_CHANGES_ERROR.to_string()));
    }

    staff::update_info(&pool, &staff_id, &patch).await?;
    Ok(message(format!("Staff {staff_id} updated successfully")))
}

/// Remplace le planning de garde
pub async fn update_staff_shift(
    State(pool): State<SqlitePool>,
    JsonBody(payload): JsonBody<UpdateShiftRequest>,
) -> Result<Json<Value>, AppError> {
    let staff_id = required_id("staff_id", payload.staff_id)?;
    let shift = parse_shift(payload.shift.ok_or_else(|| AppError::missing("shift"))?)?;

    staff::update_shift(&pool, &staff_id, &shift).await?;
    Ok(message(format!("Shift of staff {staff_id} updated successfully")))
}

pub async fn delete_staff(
    State(pool): State<SqlitePool>,
    QueryParams(query): QueryParams<StaffIdQuery>,
) -> Result<Json<Value>, AppError> {
    let staff_id = required_id("staff_id", query.staff_id)?;

    staff::delete(&pool, &staff_id).await?;
    Ok(message(format!("Staff {staff_id} deleted successfully")))
}
