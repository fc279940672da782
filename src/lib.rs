use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Server-side services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod repository;
pub mod storage;
pub mod submission;

// Headless client side: identity adapter, registry HTTP client and the two workflows.
pub mod client;

// Routing segregation (Public, Authenticated, Admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use registry::CardRegistry;
pub use repository::{InMemoryCardRepository, PostgresCardRepository, RepositoryState};
pub use storage::{InMemorySubmissionStore, PostgresSubmissionStore, StorageState};

/// ApiDoc
///
/// OpenAPI document for every route, served at `/api-docs/openapi.json` and
/// browsable through `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_cards, handlers::create_card, handlers::delete_card,
        handlers::verify_admin, handlers::create_submission, handlers::get_my_submissions,
        handlers::get_pending_submissions
    ),
    components(
        schemas(
            models::Card, models::Category, models::CardInput, models::DeleteCardRequest,
            models::VerifySecretRequest, models::CreateCardResponse, models::SuccessResponse,
            models::ErrorBody, models::SubmissionDraft, models::Submission,
        )
    ),
    tags(
        (name = "card-portal", description = "Card catalog and resource submission API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared container for every service a handler may need.
#[derive(Clone)]
pub struct AppState {
    /// Card Registry Service (business rules over an injected repository).
    pub registry: CardRegistry,
    /// Resource Store for pending submissions.
    pub storage: StorageState,
    /// Immutable runtime configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Assembles the state from a card repository and a submission store, wiring the
    /// registry to the configured administrative secret.
    pub fn new(repo: RepositoryState, storage: StorageState, config: AppConfig) -> Self {
        let registry = CardRegistry::new(repo, config.admin_secret.as_str());
        Self {
            registry,
            storage,
            config,
        }
    }

    /// Volatile, fully in-memory state. Used for local runs without a database and in tests.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(
            std::sync::Arc::new(InMemoryCardRepository::new()),
            std::sync::Arc::new(InMemorySubmissionStore::new()),
            config,
        )
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for CardRegistry {
    fn from_ref(app_state: &AppState) -> CardRegistry {
        app_state.registry.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Rejects the request with `401` unless `AuthUser` can be extracted.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles every route, the identity layer for authenticated routes, and the
/// observability stack.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .merge(admin::admin_routes())
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens one span per request carrying method, URI and the `x-request-id`, so every
/// log line of a request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
