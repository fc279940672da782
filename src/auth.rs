use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::{
    config::{AppConfig, Env},
    error::RegistryError,
    registry::CardRegistry,
    submission::Submitter,
};

/// Header carrying the administrative secret.
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Compares two secrets without short-circuiting on the first differing byte.
/// An empty expected secret matches nothing.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

// --- Administrative Credential ---

/// AdminSecret
///
/// The administrative secret as presented in the `x-admin-secret` header, if any.
/// A blank header counts as absent.
/// Never rejects: handlers that also accept the legacy in-body `password` combine
/// the two with [`AdminSecret::or_body`].
#[derive(Clone, Default)]
pub struct AdminSecret(pub Option<String>);

impl AdminSecret {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        AdminSecret(
            headers
                .get(ADMIN_SECRET_HEADER)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.trim().is_empty())
                .map(str::to_string),
        )
    }

    /// The header wins; the body password is only consulted when the header is absent.
    /// A request with neither resolves to the empty string, which never matches.
    pub fn or_body(self, body_password: Option<String>) -> String {
        self.0.or(body_password).unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for AdminSecret
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(AdminSecret::from_headers(&parts.headers))
    }
}

/// RequireAdmin
///
/// Guard for read-only administrative routes that have no body: the header must be
/// present and match, otherwise the request is rejected with `401 Invalid password`.
pub struct RequireAdmin;

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    CardRegistry: FromRef<S>,
{
    type Rejection = RegistryError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let registry = CardRegistry::from_ref(state);
        let secret = AdminSecret::from_headers(&parts.headers).or_body(None);
        registry.verify(&secret)?;
        Ok(RequireAdmin)
    }
}

// --- End-User Identity ---

/// Claims
///
/// Payload of the ID token issued by the identity provider after sign-in.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Provider-assigned user id.
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

/// AuthUser
///
/// The signed-in end user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl AuthUser {
    pub fn submitter(&self) -> Submitter {
        Submitter {
            user_id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// AuthUser Extractor Implementation
///
/// 1. In `Env::Local`, an `x-user-id` header (with optional `x-user-email` and
///    `x-user-name`) is accepted as-is so the API can be driven without a provider.
/// 2. Otherwise a `Bearer` ID token is required, verified with the configured HS256
///    secret, with expiry enforced.
///
/// Rejection: `401 Unauthorized` on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            if let Some(user_id) = header_str(&parts.headers, "x-user-id") {
                if !user_id.trim().is_empty() {
                    return Ok(AuthUser {
                        id: user_id,
                        email: header_str(&parts.headers, "x-user-email"),
                        name: header_str(&parts.headers, "x-user-name"),
                    });
                }
            }
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            tracing::warn!(error = ?e.kind(), "rejected identity token");
            StatusCode::UNAUTHORIZED
        })?;

        let claims = token_data.claims;
        if claims.sub.trim().is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        })
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
