//! Client side of the portal, without any rendering.
//!
//! The two workflows are plain state machines driven by user actions. They reach the
//! outside world only through traits: [`identity::IdentityProvider`] for sessions,
//! [`crate::storage::SubmissionStore`] for pending resources and
//! [`registry_client::CardRegistryApi`] for the card catalog.

pub mod identity;
pub mod moderation;
pub mod registry_client;
pub mod submission;

pub use identity::{IdentityError, IdentityProvider, InMemoryIdentityProvider, Session};
pub use moderation::{ModerationPanel, PanelState};
pub use registry_client::{CardRegistryApi, ClientError, HttpCardRegistryClient};
pub use submission::{SubmissionError, SubmissionWorkflow, WorkflowState, WorkflowView};
