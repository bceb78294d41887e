//! Password Change Handler
//!
//! Rotates the session user's credential password after verifying the
//! current one against the stored argon2 hash.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, CREDENTIAL_PROVIDER};
use crate::domain::AuthContext;
use crate::error::{AppError, AppResult};

use super::ChangePasswordCommand;

/// Minimum accepted password length in characters
const MIN_PASSWORD_CHARS: usize = 8;

/// Handler for credential password changes
pub struct ChangePasswordHandler {
    pool: PgPool,
}

impl ChangePasswordHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the change password command
    pub async fn execute(
        &self,
        command: ChangePasswordCommand,
        context: &AuthContext,
    ) -> AppResult<()> {
        if command.new_password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AppError::InvalidArgument(
                "New password must be at least 8 characters".to_string(),
            ));
        }

        let account: Option<(Uuid, String)> = sqlx::query_as(
            r#"
            SELECT id, password_hash
            FROM accounts
            WHERE user_id = $1 AND provider_id = $2
            "#,
        )
        .bind(context.user_id)
        .bind(CREDENTIAL_PROVIDER)
        .fetch_optional(&self.pool)
        .await?;

        let (account_id, stored_hash) = account.ok_or_else(|| {
            AppError::InvalidArgument("Password authentication not available".to_string())
        })?;

        if !verify_password(&command.current_password, &stored_hash)? {
            return Err(AppError::InvalidArgument(
                "Current password is incorrect".to_string(),
            ));
        }

        let new_hash = hash_password(&command.new_password)?;

        sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(account_id)
        .bind(&new_hash)
        .execute(&self.pool)
        .await?;

        tracing::info!(user_id = %context.user_id, "credential password changed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_password_command() {
        let cmd = ChangePasswordCommand::new("OldPass123!".to_string(), "NewPass456!".to_string());
        assert_eq!(cmd.current_password, "OldPass123!");
        assert_eq!(cmd.new_password, "NewPass456!");
    }
}
