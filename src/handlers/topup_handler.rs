//! Top-Up Handler
//!
//! Adds funds to the session user's balance. The increment is a single
//! UPDATE statement so concurrent top-ups never lose updates.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{format_inr, Amount, AuthContext};
use crate::error::{AppError, AppResult};

use super::{TopUpCommand, TopUpResult};

/// Handler for balance top-ups
pub struct TopUpHandler {
    pool: PgPool,
}

impl TopUpHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the top-up command
    pub async fn execute(
        &self,
        command: TopUpCommand,
        context: &AuthContext,
    ) -> AppResult<TopUpResult> {
        let amount = Amount::from_f64(command.amount)?;

        let row: Option<(Decimal,)> = sqlx::query_as(
            r#"
            UPDATE users
            SET balance = balance + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING balance
            "#,
        )
        .bind(context.user_id)
        .bind(amount.value())
        .fetch_optional(&self.pool)
        .await?;

        let (balance,) =
            row.ok_or_else(|| AppError::UserNotFound(context.user_id.to_string()))?;

        tracing::info!(
            user_id = %context.user_id,
            amount = %amount,
            new_balance = %balance,
            "balance topped up"
        );

        Ok(TopUpResult {
            balance,
            message: format!("₹{} added successfully", format_inr(amount.value())),
        })
    }
}
