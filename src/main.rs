use course_api::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{self, RepositoryState, SqliteRepository},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Asynchronous entry point: configuration, logging, database, router, serve.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (fail-fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging filter setup. RUST_LOG wins; otherwise sensible local
    // defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "course_api=debug,tower_http=info,axum=trace".into());

    // 3. Logging format per environment: pretty for humans locally, JSON for
    // log aggregators in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Database initialization (SQLite)
    let pool = repository::connect(&config.database_url)
        .await
        .expect("FATAL: Failed to open SQLite database. Check DATABASE_URL.");

    repository::init_schema(&pool)
        .await
        .expect("FATAL: Failed to initialize database schema.");

    tracing::info!("Connection to the database successful!");

    let repo = Arc::new(SqliteRepository::new(pool)) as RepositoryState;

    // 5. Unified state assembly and router construction.
    let addr = format!("0.0.0.0:{}", config.port);
    let app_state = AppState { repo, config };
    let app = create_router(app_state);

    // 6. Bind and serve.
    let listener = TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|err| panic!("FATAL: failed to bind {addr}: {err}"));

    tracing::info!("Listening on {addr}");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:{}/swagger-ui",
        listener.local_addr().map(|a| a.port()).unwrap_or_default());

    axum::serve(listener, app).await.unwrap();
}
