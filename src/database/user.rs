//! Comptes utilisateurs et authentification.
//!
//! Seul le haché Argon2 du mot de passe est stocké; il ne quitte jamais ce module.

use std::str::FromStr;

use log::{info, warn};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

use super::{duplicate_or, DbError};
use crate::models::{NewUser, UserPatch, UserProfile};
use crate::utils::password_utils::{hash, verify, PWHash};

/// Clé de recherche d'un compte
#[derive(Debug, Clone, Copy)]
pub enum UserLookup<'a> {
    Id(&'a str),
    Username(&'a str),
}

fn profile_from_row(row: &SqliteRow) -> Result<UserProfile, DbError> {
    Ok(UserProfile {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        name: row.try_get("name")?,
    })
}

fn hash_from_row(row: &SqliteRow) -> Result<PWHash, DbError> {
    let stored: String = row.try_get("password")?;
    PWHash::from_str(&stored).map_err(|e| DbError::Corrupted {
        column: "password",
        reason: e.to_string(),
    })
}

async fn fetch_with(
    conn: &mut SqliteConnection,
    lookup: UserLookup<'_>,
) -> Result<Option<UserProfile>, DbError> {
    let query = match lookup {
        UserLookup::Id(id) => sqlx::query("SELECT id, username, name FROM Users WHERE id = ?").bind(id),
        UserLookup::Username(username) => {
            sqlx::query("SELECT id, username, name FROM Users WHERE username = ?").bind(username)
        }
    };

    let row = query.fetch_optional(&mut *conn).await?;
    row.as_ref().map(profile_from_row).transpose()
}

/// Argon2 monopolise le processeur: le calcul se fait hors du runtime async
async fn hash_blocking(password: &str) -> Result<PWHash, DbError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password)).await??;
    Ok(hashed)
}

async fn verify_blocking(password: &str, stored_hash: Option<PWHash>) -> Result<bool, DbError> {
    let password = password.to_owned();
    let matches = tokio::task::spawn_blocking(move || verify(&password, stored_hash.as_ref())).await?;
    Ok(matches)
}

/// Crée un compte; le mot de passe est haché avant d'être stocké
pub async fn create(pool: &SqlitePool, new_user: &NewUser) -> Result<UserProfile, DbError> {
    let password = hash_blocking(&new_user.password).await?;
    let mut conn = pool.acquire().await?;

    sqlx::query("INSERT INTO Users (id, username, password, name) VALUES (?, ?, ?, ?)")
        .bind(&new_user.id)
        .bind(&new_user.username)
        .bind(password.as_str())
        .bind(&new_user.name)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            duplicate_or(e, || {
                format!("User with id {} or username {}", new_user.id, new_user.username)
            })
        })?;

    info!("Created user {}", new_user.id);

    Ok(UserProfile {
        id: new_user.id.clone(),
        username: new_user.username.clone(),
        name: new_user.name.clone(),
    })
}

pub async fn fetch(pool: &SqlitePool, lookup: UserLookup<'_>) -> Result<Option<UserProfile>, DbError> {
    let mut conn = pool.acquire().await?;
    fetch_with(&mut conn, lookup).await
}

pub async fn fetch_all(pool: &SqlitePool) -> Result<Vec<UserProfile>, DbError> {
    let mut conn = pool.acquire().await?;
    let rows = sqlx::query("SELECT id, username, name FROM Users ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;

    rows.iter().map(profile_from_row).collect()
}

/// Vérifie des identifiants.
///
/// Retourne `None` aussi bien pour un utilisateur inconnu que pour un mauvais
/// mot de passe: l'appelant ne peut pas distinguer les deux cas, et le temps
/// de réponse non plus puisqu'une vérification est toujours effectuée.
pub async fn login(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<UserProfile>, DbError> {
    let mut conn = pool.acquire().await?;
    let row = sqlx::query("SELECT id, username, name, password FROM Users WHERE username = ?")
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?;
    drop(conn);

    let (profile, stored_hash) = match row {
        Some(row) => (Some(profile_from_row(&row)?), Some(hash_from_row(&row)?)),
        None => (None, None),
    };

    if verify_blocking(password, stored_hash).await? {
        Ok(profile)
    } else {
        warn!("Rejected login attempt");
        Ok(None)
    }
}

/// Vérifie le mot de passe actuel d'un compte existant
pub async fn check_password(pool: &SqlitePool, id: &str, password: &str) -> Result<bool, DbError> {
    let mut conn = pool.acquire().await?;
    let row = sqlx::query("SELECT password FROM Users WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("User {id}")))?;
    drop(conn);

    verify_blocking(password, Some(hash_from_row(&row)?)).await
}

/// Applique une modification partielle; un nouveau mot de passe est re-haché
pub async fn update(pool: &SqlitePool, id: &str, patch: &UserPatch) -> Result<UserProfile, DbError> {
    let password = match patch.password.as_deref() {
        Some(password) => Some(hash_blocking(password).await?),
        None => None,
    };
    let mut conn = pool.acquire().await?;

    let result = sqlx::query(
        "UPDATE Users SET
            name = COALESCE(?, name),
            username = COALESCE(?, username),
            password = COALESCE(?, password)
         WHERE id = ?",
    )
    .bind(patch.name.as_deref())
    .bind(patch.username.as_deref())
    .bind(password.as_ref().map(PWHash::as_str))
    .bind(id)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        duplicate_or(e, || {
            format!("User with username {}", patch.username.as_deref().unwrap_or_default())
        })
    })?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound(format!("User {id}")));
    }

    info!("Updated user {id}");
    fetch_with(&mut conn, UserLookup::Id(id))
        .await?
        .ok_or_else(|| DbError::NotFound(format!("User {id}")))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<(), DbError> {
    let mut conn = pool.acquire().await?;

    let result = sqlx::query("DELETE FROM Users WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound(format!("User {id}")));
    }

    info!("Deleted user {id}");
    Ok(())
}
