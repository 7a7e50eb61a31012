//! Point d'entrée principal de l'application.
//! Charge la configuration, ouvre la base de données et démarre le serveur
//! web avec Axum.

use std::{future::Future, io, net::SocketAddr};

use anyhow::{Context, Result};
use dotenv::dotenv;
use log::{error, info};

use hms::{backend, config::Config, database};

#[tokio::main]
async fn main() -> Result<()> {
    // Charger les variables d'environnement
    dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = Config::from_env().context("Invalid configuration")?;

    // Ouvrir la base de données et créer les tables au besoin
    let pool = database::connect(&config)
        .await
        .context("Failed to connect to database")?;
    database::init_schema(&pool)
        .await
        .context("Failed to create database schema")?;

    let app = backend::router::get_router(pool.clone());

    // Démarrer le serveur web
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to open web server listener")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to bind Axum to listener")?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await
}

/// Attend le signal d'arrêt. Si le gestionnaire n'a pas pu être installé,
/// l'erreur est journalisée et le serveur tourne jusqu'à être tué.
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_signal_stops_server() {
        let signal = async { io::Result::Ok(()) };
        let stopped = tokio::time::timeout(Duration::from_millis(100), wait_for_signal(signal)).await;
        assert!(stopped.is_ok());
    }

    #[tokio::test]
    async fn test_missing_signal_handler_keeps_serving() {
        let failing = async {
            io::Result::<()>::Err(io::Error::new(io::ErrorKind::Other, "no signal support"))
        };
        let stopped = tokio::time::timeout(Duration::from_millis(100), wait_for_signal(failing)).await;
        assert!(stopped.is_err());
    }
}
