//! Configuration des routes pour l'application.
//! Chaque route reçoit le pool de connexions comme état partagé.

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::backend::handlers_patient::{
    add_patient, delete_patient, get_patient, get_patients, update_allergies, update_condition,
    update_patient_info,
};
use crate::backend::handlers_staff::{
    add_staff, delete_staff, get_staff, get_staffs, update_staff_info, update_staff_shift,
};
use crate::backend::handlers_user::{
    add_user, delete_user, get_user, get_users, login, update_user,
};
use crate::backend::middlewares::log_requests;

/// Initialisation du routeur principal et des middlewares
pub fn get_router(pool: SqlitePool) -> Router {
    let router = Router::new()
        .merge(patient_routes())
        .merge(staff_routes())
        .merge(user_routes())
        .with_state(pool);

    let service = ServiceBuilder::new().layer(middleware::from_fn(log_requests));
    let router = router.layer(service);

    // CORS permissif pour le frontend d'administration (en mode debug uniquement)
    if cfg!(debug_assertions) {
        let cors = CorsLayer::new()
            .allow_methods(tower_http::cors::AllowMethods::any())
            .allow_headers(Any)
            .allow_origin(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Patients et historique médical
fn patient_routes() -> Router<SqlitePool> {
    Router::new()
        .route("/patient", get(get_patient))
        .route("/patients", get(get_patients))
        .route("/patient/add", post(add_patient))
        .route("/patient/update_info", put(update_patient_info))
        .route("/patient/update_condition", put(update_condition))
        .route("/patient/update_allergies", put(update_allergies))
        .route("/patient/delete", delete(delete_patient))
}

/// Personnel soignant
fn staff_routes() -> Router<SqlitePool> {
    Router::new()
        .route("/staff", get(get_staff))
        .route("/staffs", get(get_staffs))
        .route("/staff/add", post(add_staff))
        .route("/staff/update_info", put(update_staff_info))
        .route("/staff/update_shift", put(update_staff_shift))
        .route("/staff/delete", delete(delete_staff))
}

/// Comptes et authentification
fn user_routes() -> Router<SqlitePool> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/user", get(get_user))
        .route("/users", get(get_users))
        .route("/user/add", post(add_user))
        .route("/user/update", put(update_user))
        .route("/user/delete", delete(delete_user))
}
