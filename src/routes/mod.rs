/// Router Module Index
///
/// Routes are split by who may call them. Access control is attached per module
/// (an extractor or a route layer), never left to convention.

/// Anonymous, read-only routes.
pub mod public;

/// Routes behind the end-user identity layer.
pub mod authenticated;

/// Routes guarded by the administrative secret.
pub mod admin;
