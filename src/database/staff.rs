//! Personnel soignant: médecins et infirmiers.

use log::info;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

use super::{decode_enum, decode_json, duplicate_or, encode_json, DbError};
use crate::models::{NewStaff, ShiftSlot, Staff, StaffPatch};

const STAFF_COLUMNS: &str =
    "staff_id, name, contact_info, role, specialization, department, ward, shift";

fn staff_from_row(row: &SqliteRow) -> Result<Staff, DbError> {
    let role: String = row.try_get("role")?;
    let ward: Option<String> = row.try_get("ward")?;
    let shift: String = row.try_get("shift")?;

    Ok(Staff {
        staff_id: row.try_get("staff_id")?,
        name: row.try_get("name")?,
        contact_info: row.try_get("contact_info")?,
        role: decode_enum("role", &role)?,
        specialization: row.try_get("specialization")?,
        department: row.try_get("department")?,
        ward: ward.as_deref().map(|raw| decode_enum("ward", raw)).transpose()?,
        shift: decode_json("shift", &shift)?,
    })
}

async fn fetch_with(conn: &mut SqliteConnection, staff_id: &str) -> Result<Option<Staff>, DbError> {
    let row = sqlx::query(&format!("SELECT {STAFF_COLUMNS} FROM Staff WHERE staff_id = ?"))
        .bind(staff_id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(staff_from_row).transpose()
}

pub async fn fetch(pool: &SqlitePool, staff_id: &str) -> Result<Option<Staff>, DbError> {
    let mut conn = pool.acquire().await?;
    fetch_with(&mut conn, staff_id).await
}

pub async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Staff>, DbError> {
    let mut conn = pool.acquire().await?;
    let rows = sqlx::query(&format!("SELECT {STAFF_COLUMNS} FROM Staff ORDER BY staff_id"))
        .fetch_all(&mut *conn)
        .await?;

    rows.iter().map(staff_from_row).collect()
}

/// Ajoute un membre du personnel. Le rôle et le service ont déjà été
/// validés à la frontière, sous forme d'énumérations.
pub async fn create(pool: &SqlitePool, new_staff: &NewStaff) -> Result<Staff, DbError> {
    let shift = encode_json("shift", &new_staff.shift)?;
    let mut conn = pool.acquire().await?;

    sqlx::query(&format!(
        "INSERT INTO Staff ({STAFF_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(&new_staff.staff_id)
    .bind(&new_staff.name)
    .bind(&new_staff.contact_info)
    .bind(new_staff.role.to_string())
    .bind(new_staff.specialization.as_deref())
    .bind(new_staff.department.as_deref())
    .bind(new_staff.ward.map(|ward| ward.to_string()))
    .bind(shift)
    .execute(&mut *conn)
    .await
    .map_err(|e| duplicate_or(e, || format!("Staff {}", new_staff.staff_id)))?;

    info!("Created {} {}", new_staff.role, new_staff.staff_id);

    Ok(Staff {
        staff_id: new_staff.staff_id.clone(),
        name: new_staff.name.clone(),
        contact_info: new_staff.contact_info.clone(),
        role: new_staff.role,
        specialization: new_staff.specialization.clone(),
        department: new_staff.department.clone(),
        ward: new_staff.ward,
        shift: new_staff.shift.clone(),
    })
}

pub async fn update_info(
    pool: &SqlitePool,
    staff_id: &str,
    patch: &StaffPatch,
) -> Result<Staff, DbError> {
    let shift = patch
        .shift
        .as_deref()
        .map(|shift| encode_json("shift", shift))
        .transpose()?;
    let mut conn = pool.acquire().await?;

    let result = sqlx::query(
        "UPDATE Staff SET
            name = COALESCE(?, name),
            contact_info = COALESCE(?, contact_info),
            specialization = COALESCE(?, specialization),
            department = COALESCE(?, department),
            ward = COALESCE(?, ward),
            shift = COALESCE(?, shift)
         WHERE staff_id = ?",
    )
    .bind(patch.name.as_deref())
    .bind(patch.contact_info.as_deref())
    .bind(patch.specialization.as_deref())
    .bind(patch.department.as_deref())
    .bind(patch.ward.map(|ward| ward.to_string()))
    .bind(shift)
    .bind(staff_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound(format!("Staff {staff_id}")));
    }

    info!("Updated staff {staff_id}");
    fetch_with(&mut conn, staff_id)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("Staff {staff_id}")))
}

/// Remplace entièrement le planning de garde
pub async fn update_shift(
    pool: &SqlitePool,
    staff_id: &str,
    shift: &[ShiftSlot],
) -> Result<Staff, DbError> {
    let encoded = encode_json("shift", shift)?;
    let mut conn = pool.acquire().await?;

    let result = sqlx::query("UPDATE Staff SET shift = ? WHERE staff_id = ?")
        .bind(encoded)
        .bind(staff_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound(format!("Staff {staff_id}")));
    }

    info!("Updated shift of staff {staff_id}");
    fetch_with(&mut conn, staff_id)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("Staff {staff_id}")))
}

pub async fn delete(pool: &SqlitePool, staff_id: &str) -> Result<(), DbError> {
    let mut conn = pool.acquire().await?;

    let result = sqlx::query("DELETE FROM Staff WHERE staff_id = ?")
        .bind(staff_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound(format!("Staff {staff_id}")));
    }

    info!("Deleted staff {staff_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connect_in_memory;
    use crate::models::{Day, ShiftType, StaffRole, Ward};

    fn doctor() -> NewStaff {
        NewStaff {
            staff_id: "D001".to_string(),
            name: "Dr. John Doe".to_string(),
            contact_info: "john.doe@hospital.com".to_string(),
            role: StaffRole::Doctor,
            specialization: Some("Cardiology".to_string()),
            department: Some("Cardiology".to_string()),
            ward: None,
            shift: vec![
                ShiftSlot {
                    day: Day::Monday,
                    shift: ShiftType::Morning,
                },
                ShiftSlot {
                    day: Day::Wednesday,
                    shift: ShiftType::Evening,
                },
            ],
        }
    }

    fn nurse() -> NewStaff {
        NewStaff {
            staff_id: "N001".to_string(),
            name: "Nurse Jane Smith".to_string(),
            contact_info: "jane.smith@hospital.com".to_string(),
            role: StaffRole::Nurse,
            specialization: None,
            department: None,
            ward: Some(Ward::Icu),
            shift: vec![ShiftSlot {
                day: Day::Friday,
                shift: ShiftType::Night,
            }],
        }
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let pool = connect_in_memory().await.unwrap();
        let created = create(&pool, &doctor()).await.unwrap();

        let fetched = fetch(&pool, "D001").await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.role, StaffRole::Doctor);
        assert_eq!(fetched.shift.len(), 2);
        assert_eq!(fetched.shift[1].day, Day::Wednesday);

        let stored: (String, Option<String>) =
            sqlx::query_as("SELECT role, ward FROM Staff WHERE staff_id = 'D001'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(stored, ("Doctor".to_string(), None));
    }

    #[tokio::test]
    async fn test_fetch_all_and_unknown() {
        let pool = connect_in_memory().await.unwrap();
        assert!(fetch_all(&pool).await.unwrap().is_empty());
        assert!(fetch(&pool, "D404").await.unwrap().is_none());

        create(&pool, &nurse()).await.unwrap();
        create(&pool, &doctor()).await.unwrap();

        let all = fetch_all(&pool).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].staff_id, "D001");
        assert_eq!(all[1].ward, Some(Ward::Icu));
    }

    #[tokio::test]
    async fn test_duplicate_staff() {
        let pool = connect_in_memory().await.unwrap();
        create(&pool, &doctor()).await.unwrap();
        assert!(matches!(
            create(&pool, &doctor()).await,
            Err(DbError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn test_update_info() {
        let pool = connect_in_memory().await.unwrap();
        create(&pool, &doctor()).await.unwrap();

        let patch = StaffPatch {
            contact_info: Some("new.email@hospital.com".to_string()),
            ..Default::default()
        };
        let updated = update_info(&pool, "D001", &patch).await.unwrap();
        assert_eq!(updated.contact_info, "new.email@hospital.com");
        assert_eq!(updated.name, "Dr. John Doe");
        assert_eq!(updated.specialization.as_deref(), Some("Cardiology"));
        assert_eq!(updated.shift, doctor().shift);

        let with_shift = StaffPatch {
            name: Some("Dr. B".to_string()),
            shift: Some(vec![ShiftSlot {
                day: Day::Friday,
                shift: ShiftType::Night,
            }]),
            ..Default::default()
        };
        let updated = update_info(&pool, "D001", &with_shift).await.unwrap();
        assert_eq!(updated.name, "Dr. B");
        assert_eq!(
            fetch(&pool, "D001").await.unwrap().unwrap().shift,
            vec![ShiftSlot {
                day: Day::Friday,
                shift: ShiftType::Night,
            }]
        );

        assert!(matches!(
            update_info(&pool, "D404", &patch).await,
            Err(DbError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_shift_replaces_sequence() {
        let pool = connect_in_memory().await.unwrap();
        create(&pool, &doctor()).await.unwrap();

        let shift = vec![ShiftSlot {
            day: Day::Sunday,
            shift: ShiftType::Afternoon,
        }];
        let updated = update_shift(&pool, "D001", &shift).await.unwrap();
        assert_eq!(updated.shift, shift);

        let cleared = update_shift(&pool, "D001", &[]).await.unwrap();
        assert!(cleared.shift.is_empty());

        assert!(matches!(
            update_shift(&pool, "D404", &shift).await,
            Err(DbError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = connect_in_memory().await.unwrap();
        create(&pool, &nurse()).await.unwrap();

        delete(&pool, "N001").await.unwrap();
        assert!(fetch(&pool, "N001").await.unwrap().is_none());
        assert!(matches!(delete(&pool, "N001").await, Err(DbError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_corrupted_shift_column() {
        let pool = connect_in_memory().await.unwrap();
        sqlx::query(
            "INSERT INTO Staff (staff_id, name, contact_info, role, shift)
             VALUES ('D002', 'Dr. Who', 'who@hospital.com', 'Doctor', 'Morning,Evening')",
        )
        .execute(&pool)
        .await
        .unwrap();

        assert!(matches!(
            fetch(&pool, "D002").await,
            Err(DbError::Corrupted { column: "shift", .. })
        ));
    }
}
