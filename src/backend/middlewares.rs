//! Middlewares et extracteurs communs à toutes les routes.

use std::time::Instant;

use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    middleware::Next,
    response::Response,
};
use log::info;

use crate::utils::error_messages::AppError;

/// Corps JSON dont le rejet produit une réponse `{"error": ...}` en 400
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Paramètres de requête, rejetés de la même manière que [`JsonBody`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// Journalise chaque requête avec son statut et sa durée
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
