//! Accès à la base de données relationnelle.
//!
//! Le pool de connexions est créé une seule fois au démarrage puis injecté
//! dans chaque opération. Une opération emprunte une connexion (ou ouvre une
//! transaction) pour toute sa durée; la connexion retourne au pool, et une
//! transaction non validée est annulée, dès qu'elle sort de portée.

pub mod patient;
pub mod staff;
pub mod user;

use std::str::FromStr;

use log::info;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use crate::config::Config;
use crate::utils::password_utils::HashError;

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS Patient (
        patient_id   TEXT PRIMARY KEY NOT NULL,
        name         TEXT NOT NULL,
        gender       TEXT,
        date_of_birth TEXT NOT NULL,
        contact_info TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS MedicalHistory (
        history_id   TEXT PRIMARY KEY NOT NULL,
        patient_id   TEXT NOT NULL UNIQUE REFERENCES Patient(patient_id),
        \"condition\" TEXT NOT NULL,
        allergies    TEXT NOT NULL DEFAULT '[]'
    )",
    "CREATE TABLE IF NOT EXISTS Staff (
        staff_id       TEXT PRIMARY KEY NOT NULL,
        name           TEXT NOT NULL,
        contact_info   TEXT NOT NULL,
        role           TEXT NOT NULL,
        specialization TEXT,
        department     TEXT,
        ward           TEXT,
        shift          TEXT NOT NULL DEFAULT '[]'
    )",
    "CREATE TABLE IF NOT EXISTS Users (
        id       TEXT PRIMARY KEY NOT NULL,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        name     TEXT NOT NULL
    )",
];

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Duplicate entry: {0} already exists")]
    Duplicate(String),

    #[error("No medical history found for patient {0}")]
    NoMedicalHistory(String),

    #[error("Corrupted value in column {column}: {reason}")]
    Corrupted { column: &'static str, reason: String },

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Ouvre le pool de connexions décrit par la configuration
pub async fn connect(config: &Config) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // Every connection to an in-memory database is a distinct database, so the
    // pool must hold on to exactly one connection
    let pool = if is_in_memory(&config.database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?
    };

    info!("Connected to {}", config.redacted_database_url());
    Ok(pool)
}

/// Crée les tables si elles n'existent pas encore
pub async fn init_schema(pool: &SqlitePool) -> Result<(), DbError> {
    let mut conn = pool.acquire().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}

/// Base de données éphémère, déjà initialisée
pub async fn connect_in_memory() -> Result<SqlitePool, DbError> {
    let config = Config {
        http_port: 0,
        database_url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let pool = connect(&config).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Converts a unique-constraint violation into [`DbError::Duplicate`]
fn duplicate_or(err: sqlx::Error, what: impl FnOnce() -> String) -> DbError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Duplicate(what()),
        _ => DbError::Sqlx(err),
    }
}

/// Compound values (allergies, shifts) are stored as JSON text
fn encode_json<T: Serialize + ?Sized>(column: &'static str, value: &T) -> Result<String, DbError> {
    serde_json::to_string(value).map_err(|e| DbError::Corrupted {
        column,
        reason: e.to_string(),
    })
}

fn decode_json<T: DeserializeOwned>(column: &'static str, raw: &str) -> Result<T, DbError> {
    serde_json::from_str(raw).map_err(|e| DbError::Corrupted {
        column,
        reason: e.to_string(),
    })
}

/// Enumerated columns are stored as their display text
fn decode_enum<E: FromStr>(column: &'static str, raw: &str) -> Result<E, DbError> {
    E::from_str(raw).map_err(|_| DbError::Corrupted {
        column,
        reason: format!("unknown value '{raw}'"),
    })
}
