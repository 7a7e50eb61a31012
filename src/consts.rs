//! Définition des constantes globales pour l'application.

pub const DEFAULT_HTTP_PORT: u16 = 5000; // Port par défaut pour le serveur HTTP.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://hospital.db"; // Base de données par défaut.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5; // Taille maximale du pool de connexions.

pub const ENV_HTTP_PORT: &str = "HTTP_PORT";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
