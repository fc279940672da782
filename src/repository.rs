use crate::{
    error::StoreError,
    models::{Card, Category},
};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use tokio::sync::RwLock;

/// CardRepository Trait
///
/// Persistence contract behind the Card Registry Service. It knows nothing about
/// secrets or validation; those rules live in [`crate::registry::CardRegistry`] so
/// they can be tested against any backend.
///
/// Implementations must serialize mutations: two concurrent `insert`/`remove` calls
/// may never lose each other's effect.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// All cards in insertion order.
    async fn list(&self) -> Result<Vec<Card>, StoreError>;
    /// Appends a fully formed card. The id is assigned by the caller.
    async fn insert(&self, card: Card) -> Result<Card, StoreError>;
    /// Removes the card with `id`. Returns `false` if no such card existed.
    async fn remove(&self, id: &str) -> Result<bool, StoreError>;
}

/// RepositoryState
///
/// The concrete type used to share card persistence across the application state.
pub type RepositoryState = Arc<dyn CardRepository>;

// --- In-Memory Implementation ---

/// InMemoryCardRepository
///
/// Process-lifetime collection. Contents vanish on restart and are not replicated
/// across instances. The `RwLock` gives one writer at a time.
#[derive(Default)]
pub struct InMemoryCardRepository {
    cards: RwLock<Vec<Card>>,
}

impl InMemoryCardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: RwLock::new(cards),
        }
    }
}

#[async_trait]
impl CardRepository for InMemoryCardRepository {
    async fn list(&self) -> Result<Vec<Card>, StoreError> {
        Ok(self.cards.read().await.clone())
    }

    async fn insert(&self, card: Card) -> Result<Card, StoreError> {
        let mut cards = self.cards.write().await;
        if cards.iter().any(|existing| existing.id == card.id) {
            return Err(StoreError::FailedPrecondition(format!(
                "card id {} already exists",
                card.id
            )));
        }
        cards.push(card.clone());
        Ok(card)
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut cards = self.cards.write().await;
        match cards.iter().position(|card| card.id == id) {
            Some(index) => {
                cards.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// --- Postgres Implementation ---

/// Raw `cards` row. `category` is stored as text and coerced on the way out so a
/// hand-edited row can never produce an out-of-range category.
#[derive(FromRow)]
struct CardRow {
    id: String,
    name: String,
    description: String,
    icon: String,
    link: String,
    category: String,
}

impl From<CardRow> for Card {
    fn from(row: CardRow) -> Self {
        Card {
            id: row.id,
            name: row.name,
            description: row.description,
            icon: row.icon,
            link: row.link,
            category: Category::coerce(&row.category),
        }
    }
}

/// PostgresCardRepository
///
/// Durable card storage. Each statement runs in its own implicit transaction, which
/// is all the serialization the registry needs.
pub struct PostgresCardRepository {
    pool: PgPool,
}

impl PostgresCardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// ensure_schema
    ///
    /// Creates the `cards` table if it is missing. Called at startup in `Env::Local`
    /// only; production schemas are managed out of band.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cards (
                seq BIGSERIAL,
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                icon TEXT NOT NULL DEFAULT '',
                link TEXT NOT NULL,
                category TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CardRepository for PostgresCardRepository {
    async fn list(&self) -> Result<Vec<Card>, StoreError> {
        let rows = sqlx::query_as::<_, CardRow>(
            "SELECT id, name, description, icon, link, category FROM cards ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("list cards error: {:?}", e);
            StoreError::from(e)
        })?;

        Ok(rows.into_iter().map(Card::from).collect())
    }

    async fn insert(&self, card: Card) -> Result<Card, StoreError> {
        let row = sqlx::query_as::<_, CardRow>(
            r#"
            INSERT INTO cards (id, name, description, icon, link, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, icon, link, category
            "#,
        )
        .bind(&card.id)
        .bind(&card.name)
        .bind(&card.description)
        .bind(&card.icon)
        .bind(&card.link)
        .bind(card.category.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("insert card error: {:?}", e);
            StoreError::from(e)
        })?;

        Ok(row.into())
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("delete card error: {:?}", e);
                StoreError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
