use crate::{
    AppState,
    auth::{AdminSecret, AuthUser, RequireAdmin},
    error::{RegistryError, StoreError, SubmitError},
    models::{
        Card, CardInput, CreateCardResponse, DeleteCardRequest, ErrorBody, Submission,
        SubmissionDraft, SuccessResponse, VerifySecretRequest,
    },
    registry::CardRegistry,
    storage::StorageState,
    submission::{build_submission, validate_draft},
};
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
};
use serde::de::DeserializeOwned;

/// Parses a JSON body regardless of its `Content-Type`. Only a body that is not
/// valid JSON for `T` is refused.
fn parse_body<T: DeserializeOwned>(handler: &str, body: &Bytes) -> Option<T> {
    serde_json::from_slice(body)
        .map_err(|e| tracing::warn!("{} rejected body: {}", handler, e))
        .ok()
}

// --- Card Registry ---

/// list_cards
///
/// [Public Route] Every card in the catalog, in insertion order.
#[utoipa::path(
    get,
    path = "/api/cards",
    responses((status = 200, description = "All cards", body = [Card]))
)]
pub async fn list_cards(
    State(registry): State<CardRegistry>,
) -> Result<Json<Vec<Card>>, RegistryError> {
    Ok(Json(registry.list().await?))
}

/// create_card
///
/// [Admin Route] Adds a card. Malformed JSON is rejected before the secret is
/// checked; the secret is checked before the fields. `Content-Type` is not required.
#[utoipa::path(
    post,
    path = "/api/cards",
    request_body = CardInput,
    params(("x-admin-secret" = Option<String>, Header, description = "Administrative secret")),
    responses(
        (status = 201, description = "Created", body = CreateCardResponse),
        (status = 400, description = "Missing required fields / Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid password", body = ErrorBody)
    )
)]
pub async fn create_card(
    State(registry): State<CardRegistry>,
    secret: AdminSecret,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateCardResponse>), RegistryError> {
    let mut input: CardInput =
        parse_body("create_card", &body).ok_or(RegistryError::MalformedRequest)?;

    let secret = secret.or_body(input.password.take());
    let card = registry.create(&secret, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCardResponse {
            success: true,
            card,
        }),
    ))
}

/// delete_card
///
/// [Admin Route] Removes a card by id. An unknown id yields `404 Card not found`.
#[utoipa::path(
    delete,
    path = "/api/cards",
    request_body = DeleteCardRequest,
    params(("x-admin-secret" = Option<String>, Header, description = "Administrative secret")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid password", body = ErrorBody),
        (status = 404, description = "Card not found", body = ErrorBody)
    )
)]
pub async fn delete_card(
    State(registry): State<CardRegistry>,
    secret: AdminSecret,
    body: Bytes,
) -> Result<Json<SuccessResponse>, RegistryError> {
    let request: DeleteCardRequest =
        parse_body("delete_card", &body).ok_or(RegistryError::MalformedRequest)?;

    let secret = secret.or_body(request.password);
    let id = request.id.unwrap_or_default();
    registry.delete(&secret, &id).await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// verify_admin
///
/// [Admin Route] Checks the administrative secret without touching the catalog.
/// The body is optional; when present it may carry `{ "password": "..." }`.
#[utoipa::path(
    post,
    path = "/api/cards/verify",
    request_body(content = VerifySecretRequest, description = "Optional legacy in-body secret"),
    params(("x-admin-secret" = Option<String>, Header, description = "Administrative secret")),
    responses(
        (status = 204, description = "Secret accepted"),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid password", body = ErrorBody)
    )
)]
pub async fn verify_admin(
    State(registry): State<CardRegistry>,
    secret: AdminSecret,
    body: Bytes,
) -> Result<StatusCode, RegistryError> {
    let body_password = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        parse_body::<VerifySecretRequest>("verify_admin", &body)
            .ok_or(RegistryError::MalformedRequest)?
            .password
    };

    registry.verify(&secret.or_body(body_password))?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Submissions ---

/// create_submission
///
/// [Authenticated Route] Validates the draft and writes an unapproved submission
/// attributed to the signed-in user.
#[utoipa::path(
    post,
    path = "/api/submissions",
    request_body = SubmissionDraft,
    responses(
        (status = 201, description = "Submitted for review", body = Submission),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Store denied the write", body = ErrorBody),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    )
)]
pub async fn create_submission(
    user: AuthUser,
    State(storage): State<StorageState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Submission>), SubmitError> {
    let draft: SubmissionDraft =
        parse_body("create_submission", &body).ok_or(SubmitError::MalformedRequest)?;

    let valid = validate_draft(&draft)?;
    let record = storage.add(build_submission(valid, &user.submitter())).await?;

    tracing::info!(submission_id = %record.id, user_id = %record.user_id, "submission stored");
    Ok((StatusCode::CREATED, Json(record)))
}

/// get_my_submissions
///
/// [Authenticated Route] The caller's own submissions, newest first.
#[utoipa::path(
    get,
    path = "/api/submissions/mine",
    responses((status = 200, description = "My submissions", body = [Submission]))
)]
pub async fn get_my_submissions(
    user: AuthUser,
    State(storage): State<StorageState>,
) -> Result<Json<Vec<Submission>>, StoreError> {
    Ok(Json(storage.list_by_user(&user.id).await?))
}

/// get_pending_submissions
///
/// [Admin Route] The moderation queue: every submission with `approved=false`.
#[utoipa::path(
    get,
    path = "/api/submissions/pending",
    params(("x-admin-secret" = String, Header, description = "Administrative secret")),
    responses(
        (status = 200, description = "Pending submissions", body = [Submission]),
        (status = 401, description = "Invalid password", body = ErrorBody)
    )
)]
pub async fn get_pending_submissions(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Submission>>, StoreError> {
    Ok(Json(state.storage.list_pending().await?))
}
