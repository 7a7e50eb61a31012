//! Module principal pour le backend de l'application.
//! Contient les gestionnaires pour les routes, les modèles de requêtes,
//! le routeur, et les middlewares.
mod fields;
pub mod handlers_patient;
pub mod handlers_staff;
pub mod handlers_user;
mod middlewares;
pub mod models;
pub mod router;
