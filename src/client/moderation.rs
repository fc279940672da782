use crate::{
    client::registry_client::{CardRegistryApi, ClientError},
    models::{Card, CardInput},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    LoggedOut,
    Authenticating,
    LoggedIn,
}

/// ModerationPanel
///
/// Operator view over the Card Registry Service. Logging in checks the secret
/// through the non-mutating verify call; every successful mutation is followed by
/// an explicit re-fetch of the listing. Failures leave a notice and are never retried.
pub struct ModerationPanel<A> {
    api: A,
    state: PanelState,
    secret: Option<String>,
    cards: Vec<Card>,
    notice: Option<String>,
}

impl<A: CardRegistryApi> ModerationPanel<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: PanelState::LoggedOut,
            secret: None,
            cards: Vec::new(),
            notice: None,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// The listing as of the last successful refresh.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// authenticate
    ///
    /// `LoggedOut -> Authenticating -> LoggedIn` on success, back to `LoggedOut`
    /// otherwise. A successful login immediately loads the listing.
    pub async fn authenticate(&mut self, secret: &str) -> Result<(), ClientError> {
        self.state = PanelState::Authenticating;
        self.notice = None;

        if let Err(err) = self.api.verify(secret).await {
            // A failed re-login drops the previous credential and listing too.
            self.log_out();
            self.notice = Some(match err {
                ClientError::Unauthorized => "Invalid password".to_string(),
                _ => "Authentication failed".to_string(),
            });
            return Err(err);
        }

        self.secret = Some(secret.to_string());
        self.state = PanelState::LoggedIn;
        tracing::info!("moderation panel logged in");
        // A failed initial load is reported through the notice; the login itself stands.
        let _ = self.refresh().await;
        Ok(())
    }

    /// Re-fetches the public listing.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.api.list().await {
            Ok(cards) => {
                self.cards = cards;
                Ok(())
            }
            Err(err) => {
                self.notice = Some("Failed to load cards".to_string());
                Err(err)
            }
        }
    }

    pub async fn add_card(&mut self, input: CardInput) -> Result<Card, ClientError> {
        let secret = self.logged_in_secret()?;
        self.notice = None;

        match self.api.create(&secret, input).await {
            Ok(card) => {
                let _ = self.refresh().await;
                Ok(card)
            }
            Err(err) => {
                self.notice = Some(match err {
                    ClientError::Network(_) => "Error adding card".to_string(),
                    _ => "Failed to add card".to_string(),
                });
                Err(err)
            }
        }
    }

    /// delete_card
    ///
    /// Asks `confirm` first; a declined confirmation returns `Ok(false)` without
    /// calling the service.
    pub async fn delete_card(
        &mut self,
        id: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<bool, ClientError> {
        let secret = self.logged_in_secret()?;
        if !confirm(id) {
            return Ok(false);
        }
        self.notice = None;

        match self.api.delete(&secret, id).await {
            Ok(()) => {
                let _ = self.refresh().await;
                Ok(true)
            }
            Err(err) => {
                self.notice = Some(match err {
                    ClientError::Network(_) => "Error deleting card".to_string(),
                    _ => "Failed to delete card".to_string(),
                });
                Err(err)
            }
        }
    }

    /// Forgets the secret and the listing.
    pub fn log_out(&mut self) {
        self.secret = None;
        self.cards.clear();
        self.notice = None;
        self.state = PanelState::LoggedOut;
    }

    fn logged_in_secret(&self) -> Result<String, ClientError> {
        match (&self.state, &self.secret) {
            (PanelState::LoggedIn, Some(secret)) => Ok(secret.clone()),
            _ => Err(ClientError::Unauthorized),
        }
    }
}
