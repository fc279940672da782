use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Admin Router Module
///
/// Operator endpoints. There is no route layer here: every handler resolves the
/// administrative secret itself (header first, legacy body `password` second)
/// because the body has to be parsed before the credential can be found.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // POST /api/cards, DELETE /api/cards
        // Catalog mutations. Merged with the public GET on the same path.
        .route(
            "/api/cards",
            post(handlers::create_card).delete(handlers::delete_card),
        )
        // POST /api/cards/verify
        // Non-mutating secret check used by the moderation panel to log in.
        .route("/api/cards/verify", post(handlers::verify_admin))
        // GET /api/submissions/pending
        // Moderation queue of unapproved submissions.
        .route(
            "/api/submissions/pending",
            get(handlers::get_pending_submissions),
        )
}
