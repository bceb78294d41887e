//! Card Mutation Handler
//!
//! Partial updates on a user's own card and unconditional status updates
//! for admins. Both paths share one status validator, so an unknown status
//! is rejected the same way regardless of who submits it.

use sqlx::PgPool;
use std::str::FromStr;

use crate::domain::AuthContext;
use crate::error::{AppError, AppResult};
use crate::model::{Card, CardRecord, CardStatus};

use super::{SetCardStatusCommand, UpdateOwnCardCommand, SELECT_CARD_COLUMNS};

/// Handler for card mutations
pub struct UpdateCardHandler {
    pool: PgPool,
}

impl UpdateCardHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Update name and/or status on one of the session user's cards.
    ///
    /// A card that does not exist or belongs to someone else fails with the
    /// same not-found error, so the response does not reveal which.
    pub async fn update_own_card(
        &self,
        command: UpdateOwnCardCommand,
        context: &AuthContext,
    ) -> AppResult<Card> {
        let status = match command.status.as_deref() {
            Some(raw) => Some(parse_status(raw)?),
            None => None,
        };

        // One statement covers existence, ownership and the update itself
        let record: Option<CardRecord> = sqlx::query_as(&format!(
            r#"
            UPDATE cards
            SET name = COALESCE($3, name), status = COALESCE($4, status)
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            SELECT_CARD_COLUMNS
        ))
        .bind(command.card_id)
        .bind(context.user_id)
        .bind(command.name.as_deref())
        .bind(status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        let record = record.ok_or_else(|| {
            AppError::CardNotFound("Card not found or unauthorized".to_string())
        })?;

        let card = Card::try_from(record)?;
        tracing::info!(
            user_id = %context.user_id,
            card_id = %card.id,
            status = %card.status,
            "card updated by owner"
        );

        Ok(card)
    }

    /// Set any card's status, regardless of owner. Admin gating happens in
    /// the middleware layer before this runs.
    pub async fn set_card_status(
        &self,
        command: SetCardStatusCommand,
        context: &AuthContext,
    ) -> AppResult<Card> {
        let status = parse_status(&command.status)?;

        let record: Option<CardRecord> = sqlx::query_as(&format!(
            r#"
            UPDATE cards
            SET status = $2
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_CARD_COLUMNS
        ))
        .bind(command.card_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let record = record.ok_or_else(|| AppError::CardNotFound("Card not found".to_string()))?;

        let card = Card::try_from(record)?;
        tracing::info!(
            admin_id = %context.user_id,
            card_id = %card.id,
            status = %card.status,
            "card status set by admin"
        );

        Ok(card)
    }
}

/// Shared status validator for both the owner and admin paths.
fn parse_status(raw: &str) -> AppResult<CardStatus> {
    CardStatus::from_str(raw)
        .map_err(|_| AppError::InvalidArgument("Invalid status. Must be ACTIVE or BLOCKED".to_string()))
}
