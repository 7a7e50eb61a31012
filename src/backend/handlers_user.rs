//! Gestion des routes des comptes utilisateurs et de l'authentification.
//!
//! `/auth/login` ne fait que vérifier des identifiants: aucune session ni
//! aucun jeton n'est émis.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::backend::fields::{
    optional_id, optional_password, optional_text, required_id, required_password, required_text,
};
use crate::backend::middlewares::{JsonBody, QueryParams};
use crate::backend::models::{
    message, AddUserRequest, LoginRequest, UpdateUserRequest, UserIdQuery, UserQuery,
};
use crate::database::user::{self, UserLookup};
use crate::models::{NewUser, UserPatch, UserProfile};
use crate::utils::error_messages::{AppError, EMPTY_LIST_ERROR, LOGIN_SUCCESS, NO_CHANGES_ERROR};

/// Vérifie des identifiants et retourne l'identité de l'utilisateur sous
/// `user`, sans mot de passe
pub async fn login(
    State(pool): State<SqlitePool>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let username = required_text("username", payload.username)?;
    let password = required_password("password", payload.password)?;

    let profile = user::login(&pool, &username, &password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    Ok(Json(json!({
        "message": LOGIN_SUCCESS,
        "user": profile,
    })))
}

pub async fn get_user(
    State(pool): State<SqlitePool>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<Json<UserProfile>, AppError> {
    let id = optional_id("id", query.id)?;
    let username = optional_text("username", query.username)?;

    let lookup = match (&id, &username) {
        (Some(id), None) => UserLookup::Id(id),
        (None, Some(username)) => UserLookup::Username(username),
        _ => {
            return Err(AppError::BadRequest(
                "Provide exactly one search parameter (id or username)".to_string(),
            ))
        }
    };

    user::fetch(&pool, lookup)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No user found".to_string()))
}

pub async fn get_users(State(pool): State<SqlitePool>) -> Result<Json<Vec<UserProfile>>, AppError> {
    let users = user::fetch_all(&pool).await?;
    if users.is_empty() {
        return Err(AppError::NotFound(EMPTY_LIST_ERROR.to_string()));
    }
    Ok(Json(users))
}

pub async fn add_user(
    State(pool): State<SqlitePool>,
    JsonBody(payload): JsonBody<AddUserRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let new_user = NewUser {
        id: required_id("id", payload.id)?,
        username: required_text("username", payload.username)?,
        password: required_password("password", payload.password)?,
        name: required_text("name", payload.name)?,
    };

    let created = user::create(&pool, &new_user).await?;
    Ok((
        StatusCode::CREATED,
        message(format!("User {} added successfully", created.username)),
    ))
}

/// Met à jour le nom, le nom d'utilisateur et/ou le mot de passe.
///
/// Si `old_password` est fourni avec un nouveau mot de passe, il doit
/// correspondre au mot de passe actuel.
pub async fn update_user(
    State(pool): State<SqlitePool>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> Result<Json<Value>, AppError> {
    let id = required_id("id", payload.id)?;
    let patch = UserPatch {
        name: optional_text("name", payload.name)?,
        username: optional_text("username", payload.username)?,
        password: optional_password(payload.password),
    };

    if patch.is_empty() {
        return Err(AppError::BadRequest(NO_CHANGES_ERROR.to_string()));
    }

    if let (Some(_), Some(old_password)) = (&patch.password, optional_password(payload.old_password)) {
        if !user::check_password(&pool, &id, &old_password).await? {
            return Err(AppError::WrongOldPassword);
        }
    }

    user::update(&pool, &id, &patch).await?;
    Ok(message(format!("User {id} updated successfully")))
}

pub async fn delete_user(
    State(pool): State<SqlitePool>,
    QueryParams(query): QueryParams<UserIdQuery>,
) -> Result<Json<Value>, AppError> {
    let id = required_id("id", query.id)?;

    user::delete(&pool, &id).await?;
    Ok(message(format!("User {id} deleted successfully")))
}
