//! User Registration Handler
//!
//! Admin-initiated registration: creates the user row, its credential
//! account with the default password, and optionally an initial card with
//! an admin-supplied number, all in one transaction.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{hash_password, CREDENTIAL_PROVIDER, DEFAULT_PASSWORD};
use crate::domain::{generate_cvv, generate_expiry, AuthContext, CardNumber};
use crate::error::{AppError, AppResult};
use crate::model::{Card, CardRecord, User, UserRecord};

use super::{RegisterUserCommand, RegisterUserResult, SELECT_CARD_COLUMNS};

/// Handler for admin-initiated user registration
pub struct RegisterUserHandler {
    pool: PgPool,
}

impl RegisterUserHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the register user command
    pub async fn execute(
        &self,
        command: RegisterUserCommand,
        context: &AuthContext,
    ) -> AppResult<RegisterUserResult> {
        // Validate the supplied card number before touching the store
        let initial_card_number = match command.initial_card_number.as_deref() {
            Some(raw) => Some(CardNumber::parse(raw)?),
            None => None,
        };

        let password_hash = hash_password(DEFAULT_PASSWORD)?;

        let mut tx = self.pool.begin().await?;

        let user_record: UserRecord = sqlx::query_as(
            r#"
            INSERT INTO users (id, name, email, role, balance, phone, address)
            VALUES ($1, $2, $3, 'user', 0, $4, $5)
            RETURNING id, name, email, role, balance, phone, address, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&command.name)
        .bind(&command.email)
        .bind(command.phone.as_deref())
        .bind(command.address.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::EmailTaken(command.email.clone())
            }
            _ => AppError::Database(e),
        })?;

        let user = User::try_from(user_record)?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, user_id, provider_id, password_hash)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(CREDENTIAL_PROVIDER)
        .bind(&password_hash)
        .execute(&mut *tx)
        .await?;

        let card = match initial_card_number {
            Some(number) => {
                let record: CardRecord = sqlx::query_as(&format!(
                    r#"
                    INSERT INTO cards (id, user_id, card_number, expiry_date, cvv, balance, status, card_type)
                    VALUES ($1, $2, $3, $4, $5, 0, 'ACTIVE', 'PHYSICAL')
                    RETURNING {}
                    "#,
                    SELECT_CARD_COLUMNS
                ))
                .bind(Uuid::new_v4())
                .bind(user.id)
                .bind(number.as_str())
                .bind(generate_expiry())
                .bind(generate_cvv())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| match &e {
                    sqlx::Error::Database(db) if db.is_unique_violation() => {
                        AppError::CardNumberTaken(number.last_four().to_string())
                    }
                    _ => AppError::Database(e),
                })?;

                Some(Card::try_from(record)?)
            }
            None => None,
        };

        tx.commit().await?;

        tracing::info!(
            admin_id = %context.user_id,
            user_id = %user.id,
            with_card = card.is_some(),
            "user registered by admin"
        );

        Ok(RegisterUserResult {
            user,
            card,
            password: DEFAULT_PASSWORD.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_command_builder() {
        let cmd = RegisterUserCommand::new("Priya Sharma".to_string(), "priya@example.com".to_string())
            .with_phone("+91 98765 43210".to_string())
            .with_initial_card_number("4576001234567890".to_string());

        assert_eq!(cmd.email, "priya@example.com");
        assert_eq!(cmd.phone.as_deref(), Some("+91 98765 43210"));
        assert_eq!(cmd.address, None);
        assert_eq!(cmd.initial_card_number.as_deref(), Some("4576001234567890"));
    }
}
