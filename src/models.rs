use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Catalog Schemas ---

/// Category
///
/// The closed set of listing kinds. Raw user input never reaches this type directly:
/// it goes through [`Category::coerce`], which maps anything unrecognized to `Software`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Category {
    #[default]
    Software,
    Plugin,
    Script,
}

impl Category {
    /// Maps free-form input onto a valid category. Case and surrounding whitespace are
    /// ignored; unknown values fall back to `Software`.
    pub fn coerce(raw: &str) -> Category {
        match raw.trim().to_ascii_lowercase().as_str() {
            "plugin" => Category::Plugin,
            "script" => Category::Script,
            _ => Category::Software,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Software => "software",
            Category::Plugin => "plugin",
            Category::Script => "script",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card
///
/// A public catalog entry. Created and deleted only through the administrative
/// channel; read by anyone via `GET /api/cards`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Card {
    /// Generator-assigned, unique within one registry instance.
    pub id: String,
    pub name: String,
    pub description: String,
    /// Optional icon URL. Empty string when absent.
    pub icon: String,
    pub link: String,
    pub category: Category,
}

// --- Request Payloads (Input Schemas) ---

/// CardInput
///
/// Body of `POST /api/cards`. Every field is optional at the wire level so that a
/// missing field surfaces as `Missing required fields` rather than a parse failure.
/// `password` is the legacy in-body credential, honoured only when the
/// `x-admin-secret` header is absent.
#[derive(Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CardInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl CardInput {
    /// Convenience constructor for a fully populated input without an in-body secret.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            password: None,
            name: Some(name.into()),
            description: Some(description.into()),
            icon: None,
            link: Some(link.into()),
            category: Some(category.as_str().to_string()),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// DeleteCardRequest
///
/// Body of `DELETE /api/cards`.
#[derive(Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DeleteCardRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// VerifySecretRequest
///
/// Optional body of `POST /api/cards/verify` for clients that cannot set headers.
#[derive(Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct VerifySecretRequest {
    #[serde(default)]
    pub password: Option<String>,
}

// --- Response Envelopes ---

/// CreateCardResponse
///
/// `201` body of a successful create: `{ "success": true, "card": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateCardResponse {
    pub success: bool,
    pub card: Card,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SuccessResponse {
    pub success: bool,
}

/// ErrorBody
///
/// Uniform error envelope: `{ "error": "Invalid password" }`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorBody {
    pub error: String,
}

// --- Submission Schemas ---

/// SubmissionDraft
///
/// The raw, untrimmed field values a user typed into the submission form. Also the
/// request body of `POST /api/submissions`. `category` stays a plain string here
/// because it has not been coerced yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SubmissionDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub link: String,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    Category::Software.as_str().to_string()
}

impl Default for SubmissionDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            icon: String::new(),
            link: String::new(),
            category: default_category(),
        }
    }
}

/// NewSubmission
///
/// A validated submission ready to be written to the Resource Store. The store
/// assigns `id` and `createdAt`; `approved` is always false here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewSubmission {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub link: String,
    pub category: Category,
    pub approved: bool,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
}

/// Submission
///
/// A pending resource as persisted by the Resource Store. Never mutated by this
/// service after creation; promotion to a [`Card`] happens elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Submission {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub link: String,
    pub category: Category,
    pub approved: bool,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl Submission {
    /// Materializes a stored record from a new submission plus the store-assigned fields.
    pub fn from_new(new: NewSubmission, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            icon: new.icon,
            link: new.link,
            category: new.category,
            approved: new.approved,
            user_id: new.user_id,
            user_email: new.user_email,
            user_name: new.user_name,
            created_at,
        }
    }
}
