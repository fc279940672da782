use card_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    registry::demo_cards,
    repository::{InMemoryCardRepository, PostgresCardRepository, RepositoryState},
    storage::{InMemorySubmissionStore, PostgresSubmissionStore, StorageState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initializes logging, selects the storage backend, seeds
/// demo data in local mode and serves the HTTP API.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing production secrets)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "card_portal=debug,tower_http=info,axum=trace".into());

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

    // 3. Storage backends: Postgres when DATABASE_URL is set, volatile memory otherwise.
    let (repo, storage): (RepositoryState, StorageState) = match &config.db_url {
        Some(db_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(db_url)
                .await
                .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

            let cards = PostgresCardRepository::new(pool.clone());
            let submissions = PostgresSubmissionStore::new(pool);

            // LOCAL-ONLY: bootstrap the schema for the Dockerized database.
            if config.env == Env::Local {
                cards
                    .ensure_schema()
                    .await
                    .expect("FATAL: Failed to create the cards table.");
                submissions
                    .ensure_schema()
                    .await
                    .expect("FATAL: Failed to create the submissions table.");
            }

            (Arc::new(cards), Arc::new(submissions))
        }
        None => {
            if config.env == Env::Production {
                tracing::warn!("DATABASE_URL not set: cards and submissions will not survive a restart");
            }
            (
                Arc::new(InMemoryCardRepository::new()),
                Arc::new(InMemorySubmissionStore::new()),
            )
        }
    };

    let bind_addr = config.bind_addr.clone();
    let seed_demo = config.env == Env::Local && config.db_url.is_none();
    let app_state = AppState::new(repo, storage, config);

    // 4. Demo catalog for local in-memory runs.
    if seed_demo {
        match app_state.registry.seed(demo_cards()).await {
            Ok(()) => tracing::info!("Seeded demo cards."),
            Err(e) => tracing::error!("Failed to seed demo cards: {}", e),
        }
    }

    // 5. Router and server
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("HTTP server terminated: {}", e);
    }
}
