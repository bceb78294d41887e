//! Development Seeding Tool
//!
//! Creates an admin and a demo user with credential accounts, issues a
//! bearer session for each, and prints the tokens.
//!
//! Run with: cargo run --bin seed

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use aurapay::auth::{hash_password, token_hash, CREDENTIAL_PROVIDER, DEFAULT_PASSWORD};

const ADMIN_EMAIL: &str = "admin@aurapay.test";
const DEMO_EMAIL: &str = "demo@aurapay.test";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")?;

    println!("Seeding AuraPay demo data...");
    println!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    let admin_id = seed_user(&pool, "AuraPay Admin", ADMIN_EMAIL, "admin").await?;
    let demo_id = seed_user(&pool, "Demo User", DEMO_EMAIL, "user").await?;

    let admin_token = seed_session(&pool, admin_id).await?;
    let demo_token = seed_session(&pool, demo_id).await?;

    println!("\n=== Seeded Accounts ===");
    println!("admin: {} (password {})", ADMIN_EMAIL, DEFAULT_PASSWORD);
    println!("  bearer token: {}", admin_token);
    println!("user:  {} (password {})", DEMO_EMAIL, DEFAULT_PASSWORD);
    println!("  bearer token: {}", demo_token);

    Ok(())
}

/// Insert a user plus a credential account, skipping both if the email is
/// already present
async fn seed_user(pool: &PgPool, name: &str, email: &str, role: &str) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    if let Some((id,)) = existing {
        println!("User {} already present, skipping", email);
        return Ok(id);
    }

    let user_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, role, balance, created_at, updated_at)
        VALUES ($1, $2, $3, $4, 0, NOW(), NOW())
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(email)
    .bind(role)
    .execute(pool)
    .await?;

    let password_hash = hash_password(DEFAULT_PASSWORD)?;
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
    .await?;

    println!("Created {} user {}", role, email);

    Ok(user_id)
}

/// Issue a 7-day session for the user and return the raw bearer token
async fn seed_session(pool: &PgPool, user_id: Uuid) -> anyhow::Result<String> {
    let token = format!("aura_{}", Uuid::new_v4().simple());

    sqlx::query(
        r#"
        INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at)
        VALUES ($1, $2, $3, NOW() + INTERVAL '7 days', NOW())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(token_hash(&token))
    .execute(pool)
    .await?;

    Ok(token)
}
