//! Session resolution
//!
//! Sessions are issued by the external identity provider; this side only
//! resolves them. Tokens are stored SHA-256-hashed, and resolution joins
//! the owning user so the role always comes from the store.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::model::Role;

/// SHA-256 digest of a session token, hex-encoded.
///
/// Matches the digest written by the session-issuing side, so raw tokens
/// never touch the database.
pub fn token_hash(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// A live session joined with its owning user
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Resolve a bearer token to a live session.
///
/// Unknown tokens, expired sessions and sessions whose user row is gone
/// all resolve to `None`; callers treat every `None` as unauthenticated.
pub async fn resolve_token(pool: &PgPool, token: &str) -> AppResult<Option<ResolvedSession>> {
    let row: Option<(Uuid, Uuid, String, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT s.id, s.user_id, u.role, s.expires_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token_hash = $1
        "#,
    )
    .bind(token_hash(token))
    .fetch_optional(pool)
    .await?;

    let Some((session_id, user_id, role, expires_at)) = row else {
        return Ok(None);
    };

    if expires_at <= Utc::now() {
        tracing::debug!(%session_id, "rejected expired session");
        return Ok(None);
    }

    let role = Role::from_str(&role)
        .map_err(|e| AppError::Internal(format!("user {}: {}", user_id, e)))?;

    Ok(Some(ResolvedSession {
        session_id,
        user_id,
        role,
        expires_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_hash_is_hex_sha256() {
        let digest = token_hash("test_token_123");
        assert_eq!(digest.len(), 64);
        assert!(digest.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_token_hash_deterministic() {
        assert_eq!(token_hash("alpha"), token_hash("alpha"));
        assert_ne!(token_hash("alpha"), token_hash("beta"));
    }

    #[test]
    fn test_token_hash_known_vector() {
        // sha256("abc")
        assert_eq!(
            token_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
