use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::secrets_match,
    error::RegistryError,
    models::{Card, CardInput, Category},
    repository::RepositoryState,
};

/// CardRegistry
///
/// The business rules of the card catalog: secret check on every mutation,
/// required-field validation, id assignment and NotFound reporting. Persistence is
/// injected, so the same rules hold for the in-memory and Postgres backends.
#[derive(Clone)]
pub struct CardRegistry {
    repo: RepositoryState,
    admin_secret: Arc<str>,
}

impl CardRegistry {
    pub fn new(repo: RepositoryState, admin_secret: impl Into<Arc<str>>) -> Self {
        Self {
            repo,
            admin_secret: admin_secret.into(),
        }
    }

    /// Public listing. No credential required.
    pub async fn list(&self) -> Result<Vec<Card>, RegistryError> {
        Ok(self.repo.list().await?)
    }

    /// Non-mutating credential check used by the moderation panel to log in.
    pub fn verify(&self, secret: &str) -> Result<(), RegistryError> {
        if secrets_match(secret, &self.admin_secret) {
            Ok(())
        } else {
            tracing::warn!("administrative secret rejected");
            Err(RegistryError::Unauthorized)
        }
    }

    /// create
    ///
    /// Checks the secret before looking at the input, so a caller without the
    /// secret learns nothing about validation and never touches the collection.
    pub async fn create(&self, secret: &str, input: CardInput) -> Result<Card, RegistryError> {
        self.verify(secret)?;

        let name = required(input.name)?;
        let description = required(input.description)?;
        let link = required(input.link)?;
        let category = required(input.category)?;

        let card = Card {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            icon: input
                .icon
                .map(|icon| icon.trim().to_string())
                .unwrap_or_default(),
            link,
            category: Category::coerce(&category),
        };

        let stored = self.repo.insert(card).await?;
        tracing::info!(card_id = %stored.id, name = %stored.name, "card created");
        Ok(stored)
    }

    /// delete
    ///
    /// Removing an absent id is reported as `NotFound`, never as a silent success.
    pub async fn delete(&self, secret: &str, id: &str) -> Result<(), RegistryError> {
        self.verify(secret)?;

        if self.repo.remove(id).await? {
            tracing::info!(card_id = %id, "card deleted");
            Ok(())
        } else {
            Err(RegistryError::NotFound)
        }
    }

    /// Inserts cards verbatim, keeping their ids. Startup seeding only.
    pub async fn seed(&self, cards: Vec<Card>) -> Result<(), RegistryError> {
        for card in cards {
            self.repo.insert(card).await?;
        }
        Ok(())
    }
}

fn required(value: Option<String>) -> Result<String, RegistryError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(RegistryError::InvalidInput)
}

/// The three listings a fresh local instance starts with.
pub fn demo_cards() -> Vec<Card> {
    vec![
        Card {
            id: "1".to_string(),
            name: "Visual Studio Code".to_string(),
            description: "A powerful, lightweight code editor with extensive extension support and integrated terminal.".to_string(),
            icon: "https://code.visualstudio.com/assets/images/code-stable.png".to_string(),
            link: "https://code.visualstudio.com".to_string(),
            category: Category::Software,
        },
        Card {
            id: "2".to_string(),
            name: "Prettier".to_string(),
            description: "An opinionated code formatter that supports many languages and integrates with most editors.".to_string(),
            icon: "https://prettier.io/icon.png".to_string(),
            link: "https://prettier.io".to_string(),
            category: Category::Plugin,
        },
        Card {
            id: "3".to_string(),
            name: "Auto Deploy Script".to_string(),
            description: "Automated deployment script for static sites with built-in optimization and error handling.".to_string(),
            icon: String::new(),
            link: "https://github.com/example/deploy-script".to_string(),
            category: Category::Script,
        },
    ]
}

impl std::fmt::Debug for CardRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardRegistry").finish_non_exhaustive()
    }
}
