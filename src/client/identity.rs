use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::submission::Submitter;

/// Session
///
/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl Session {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn submitter(&self) -> Submitter {
        Submitter {
            user_id: self.uid.clone(),
            email: self.email.clone(),
            name: self.display_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("sign-in was cancelled")]
    Cancelled,
}

/// IdentityProvider
///
/// Adapter over a third-party sign-in service. The provider itself is external;
/// this crate only consumes sign-in, sign-out and session-change notifications.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Runs the provider's interactive sign-in and publishes the new session.
    async fn sign_in(&self) -> Result<Session, IdentityError>;

    /// Ends the current session and publishes `None`.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Receiver that always holds the current session and is notified on every change.
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;
}

/// InMemoryIdentityProvider
///
/// Signs in as a fixed account without any network round trip. Backs local
/// development and tests. Built with `None` it behaves like a user who closes the
/// sign-in popup.
pub struct InMemoryIdentityProvider {
    account: Option<Session>,
    sessions: watch::Sender<Option<Session>>,
}

impl InMemoryIdentityProvider {
    pub fn new(account: Session) -> Self {
        Self::with_account(Some(account))
    }

    pub fn cancelling() -> Self {
        Self::with_account(None)
    }

    fn with_account(account: Option<Session>) -> Self {
        let (sessions, _) = watch::channel(None);
        Self { account, sessions }
    }

    pub fn current(&self) -> Option<Session> {
        self.sessions.borrow().clone()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self) -> Result<Session, IdentityError> {
        let session = self.account.clone().ok_or(IdentityError::Cancelled)?;
        self.sessions.send_replace(Some(session.clone()));
        tracing::debug!(uid = %session.uid, "signed in");
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.sessions.send_replace(None);
        tracing::debug!("signed out");
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.subscribe()
    }
}
