//! Common test utilities

use axum::{middleware, Router};
use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use aurapay::api;
use aurapay::auth::{hash_password, token_hash, CREDENTIAL_PROVIDER};

/// Connect to the test database and make sure the schema is applied.
///
/// Seed data is created per test with unique emails and tokens, so tests
/// can run in parallel without stepping on each other.
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    // Every statement in the migration is idempotent
    for statement in include_str!("../../migrations/0001_init.sql").split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("Failed to apply schema statement");
    }

    pool
}

/// Build the API router the way the server wires it, minus request logging
pub fn test_app(pool: PgPool) -> Router {
    let protected = api::create_protected_router().layer(middleware::from_fn_with_state(
        pool.clone(),
        api::middleware::session_auth_middleware,
    ));

    api::create_public_router().merge(protected).with_state(pool)
}

/// A seeded user together with a raw bearer token for their session
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

/// Insert a user with a live 7-day session
pub async fn seed_user_with_session(pool: &PgPool, role: &str) -> TestUser {
    seed_user_with_expiry(pool, role, Utc::now() + Duration::days(7)).await
}

/// Insert a user whose only session has already expired
pub async fn seed_user_with_expired_session(pool: &PgPool, role: &str) -> TestUser {
    seed_user_with_expiry(pool, role, Utc::now() - Duration::hours(1)).await
}

async fn seed_user_with_expiry(
    pool: &PgPool,
    role: &str,
    expires_at: DateTime<Utc>,
) -> TestUser {
    let id = Uuid::new_v4();
    let email = format!("{}-{}@test.aurapay.dev", role, id.simple());

    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, role, balance, created_at, updated_at)
        VALUES ($1, $2, $3, $4, 0, NOW(), NOW())
        "#,
    )
    .bind(id)
    .bind(format!("Test {}", role))
    .bind(&email)
    .bind(role)
    .execute(pool)
    .await
    .expect("Failed to seed user");

    let token = format!("tok_{}", Uuid::new_v4().simple());
    sqlx::query(
        r#"
        INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at)
        VALUES ($1, $2, $3, $4, NOW())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(id)
    .bind(token_hash(&token))
    .bind(expires_at)
    .execute(pool)
    .await
    .expect("Failed to seed session");

    TestUser { id, email, token }
}

/// Attach a credential account holding the given password
pub async fn seed_credential_account(pool: &PgPool, user_id: Uuid, password: &str) {
    let password_hash = hash_password(password).expect("Failed to hash password");

    sqlx::query(
        r#"
        INSERT INTO accounts (id, user_id, provider_id, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, NOW(), NOW())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(CREDENTIAL_PROVIDER)
    .bind(&password_hash)
    .execute(pool)
    .await
    .expect("Failed to seed credential account");
}
