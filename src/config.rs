use std::env;

/// AppConfig
///
/// The application's configuration, loaded once at startup and immutable
/// afterwards. It is pulled into the application state via FromRef so that
/// any component can read it without global statics.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// SQLite connection URL. Defaults to an in-memory database locally.
    pub database_url: String,
    /// TCP port the HTTP server binds.
    pub port: u16,
    /// Runtime environment marker; selects the logging format and tightens
    /// configuration requirements.
    pub env: Env,
}

/// Env
///
/// Runtime context: human-readable logging and permissive defaults locally,
/// JSON logging and mandatory configuration in production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Safe, non-panicking instance for test setup. No environment variables
    /// are consulted.
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 5000,
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Canonical startup initialization from environment variables, fail-fast
    /// where it matters.
    ///
    /// # Panics
    /// Panics when `DATABASE_URL` is unset in production, or when `PORT` is
    /// set but not a valid port number. Starting with an incomplete
    /// production configuration is worse than not starting.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let database_url = match env {
            // Locally the in-memory store is always available.
            Env::Local => {
                env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
            }
            Env::Production => {
                env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in production")
            }
        };

        let port = env::var("PORT")
            .map(|raw| raw.parse().expect("FATAL: PORT must be a number"))
            .unwrap_or(5000);

        Self {
            database_url,
            port,
            env,
        }
    }
}
