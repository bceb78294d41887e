//! Card Issuance Handler
//!
//! Issues cards with generated numbers, expiry and CVV, and provisions the
//! first card for users who have none. Number uniqueness is delegated to
//! the store's unique constraint; inserts retry with a fresh number on
//! conflict, up to a fixed budget.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{generate_cvv, generate_expiry, AuthContext, CardNumber};
use crate::error::{AppError, AppResult};
use crate::model::{Card, CardRecord};

use super::SELECT_CARD_COLUMNS;

/// Regenerations tolerated before giving up on a unique number
const MAX_NUMBER_ATTEMPTS: u32 = 10;

/// Handler for card issuance
pub struct IssueCardHandler {
    pool: PgPool,
}

impl IssueCardHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the session user's cards, provisioning the first one if none
    /// exist yet. Returns cards oldest first.
    pub async fn ensure_cards(&self, context: &AuthContext) -> AppResult<Vec<Card>> {
        let cards = self.list_cards(context.user_id).await?;
        if !cards.is_empty() {
            return Ok(cards);
        }

        let card = self.create_card(context).await?;
        Ok(vec![card])
    }

    /// Issue one additional card for the session user.
    pub async fn create_card(&self, context: &AuthContext) -> AppResult<Card> {
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let number = CardNumber::generate();
            match self.insert_card(context.user_id, &number).await {
                Ok(card) => {
                    tracing::info!(
                        user_id = %context.user_id,
                        card_id = %card.id,
                        number = %number,
                        "card issued"
                    );
                    return Ok(card);
                }
                Err(AppError::CardNumberTaken(_)) => {
                    tracing::warn!(attempt, "card number collision, regenerating");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::CardNumberCollision)
    }

    /// Cards owned by a user, oldest first.
    pub async fn list_cards(&self, user_id: Uuid) -> AppResult<Vec<Card>> {
        let records: Vec<CardRecord> = sqlx::query_as(&format!(
            "SELECT {} FROM cards WHERE user_id = $1 ORDER BY created_at ASC",
            SELECT_CARD_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        records.into_iter().map(Card::try_from).collect()
    }

    /// Insert one card row with issuance defaults.
    ///
    /// A duplicate number surfaces as `AppError::CardNumberTaken` so callers
    /// can retry with a fresh candidate.
    pub async fn insert_card(&self, user_id: Uuid, number: &CardNumber) -> AppResult<Card> {
        let record: CardRecord = sqlx::query_as(&format!(
            r#"
            INSERT INTO cards (id, user_id, card_number, expiry_date, cvv, balance, status, card_type)
            VALUES ($1, $2, $3, $4, $5, 0, 'ACTIVE', 'PHYSICAL')
            RETURNING {}
            "#,
            SELECT_CARD_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(number.as_str())
        .bind(generate_expiry())
        .bind(generate_cvv())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::CardNumberTaken(number.last_four().to_string())
            }
            _ => AppError::Database(e),
        })?;

        Card::try_from(record)
    }
}
