//! Service de gestion hospitalière: dossiers patients, personnel soignant
//! et comptes utilisateurs, exposés via une API JSON.

pub mod backend;
pub mod config;
pub mod consts;
pub mod database;
pub mod models;
pub mod utils;
