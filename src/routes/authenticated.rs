use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Routes for signed-in end users. The whole router is wrapped in the identity
/// middleware in `create_router`, and each handler also takes `AuthUser` to learn
/// who the caller is.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /api/submissions
        // Submits a new resource for review. Always stored with approved=false.
        .route("/api/submissions", post(handlers::create_submission))
        // GET /api/submissions/mine
        // The caller's own submissions, including ones still pending.
        .route("/api/submissions/mine", get(handlers::get_my_submissions))
}
