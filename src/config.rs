use std::env;

/// Fallback administrative secret used only when `APP_ENV` is not `production`
/// and `ADMIN_SECRET` is unset. Never valid in a production deployment.
pub const LOCAL_ADMIN_SECRET: &str = "local-dev-admin-secret";

/// Fallback ID-token signing secret for local development.
pub const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and
/// shared read-only with every request through `FromRef`.
///
/// Secrets live here and only here: nothing in the client module or the HTTP
/// responses ever echoes them back.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls the local identity bypass and demo seeding.
    pub env: Env,
    // Shared secret guarding every mutating Card Registry operation.
    pub admin_secret: String,
    // HS256 secret used to validate ID tokens issued by the identity provider.
    pub jwt_secret: String,
    // Postgres connection string. `None` selects the volatile in-memory stores.
    pub db_url: Option<String>,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
}

/// Env
///
/// Defines the runtime context: `Local` enables developer conveniences (header-based
/// identity bypass, seeded demo cards, schema bootstrap), `Production` disables them
/// and demands every secret be provided explicitly.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Non-panicking configuration for test scaffolding. Always in-memory.
    fn default() -> Self {
        Self {
            env: Env::Local,
            admin_secret: LOCAL_ADMIN_SECRET.to_string(),
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            db_url: None,
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables, failing fast.
    ///
    /// # Panics
    /// Panics in `Env::Production` when `ADMIN_SECRET` or `IDENTITY_JWT_SECRET` is
    /// missing or empty, so the service never starts with a guessable credential.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let admin_secret = match env {
            Env::Production => non_empty_var("ADMIN_SECRET")
                .expect("FATAL: ADMIN_SECRET must be set in production."),
            Env::Local => {
                non_empty_var("ADMIN_SECRET").unwrap_or_else(|| LOCAL_ADMIN_SECRET.to_string())
            }
        };

        let jwt_secret = match env {
            Env::Production => non_empty_var("IDENTITY_JWT_SECRET")
                .expect("FATAL: IDENTITY_JWT_SECRET must be set in production."),
            Env::Local => {
                non_empty_var("IDENTITY_JWT_SECRET").unwrap_or_else(|| LOCAL_JWT_SECRET.to_string())
            }
        };

        Self {
            env,
            admin_secret,
            jwt_secret,
            db_url: non_empty_var("DATABASE_URL"),
            bind_addr: non_empty_var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
