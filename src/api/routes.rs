//! API Routes
//!
//! HTTP endpoint definitions and wire DTOs (camelCase JSON).

use std::str::FromStr;

use axum::{
    extract::{Extension, State},
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{group_digits, AuthContext};
use crate::error::AppError;
use crate::handlers::{
    ChangePasswordCommand, ChangePasswordHandler, IssueCardHandler, RegisterUserCommand,
    RegisterUserHandler, SetCardStatusCommand, TopUpCommand, TopUpHandler, UpdateCardHandler,
    UpdateOwnCardCommand,
};
use crate::model::{Card, CardStatus, CardType, Role, User};

use super::middleware::require_admin;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub balance: Decimal,
    pub status: CardStatus,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CardResponse {
    fn from_card(card: Card) -> Self {
        Self {
            id: card.id,
            user_id: card.user_id,
            card_number: card.card_number,
            expiry_date: card.expiry_date,
            cvv: card.cvv,
            balance: card.balance,
            status: card.status,
            card_type: card.card_type,
            name: card.name,
            created_at: card.created_at,
        }
    }

    /// Same as [`Self::from_card`] but with the number in 4-digit display groups
    fn from_card_grouped(card: Card) -> Self {
        let mut response = Self::from_card(card);
        response.card_number = group_digits(&response.card_number);
        response
    }
}

#[derive(Debug, Serialize)]
pub struct CardsResponse {
    pub cards: Vec<CardResponse>,
}

#[derive(Debug, Serialize)]
pub struct CardEnvelope {
    pub success: bool,
    pub card: CardResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMyCardRequest {
    #[serde(default)]
    pub card_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct TopUpRequest {
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct TopUpResponse {
    pub success: bool,
    pub balance: Decimal,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminUserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginResponse {
    pub success: bool,
    pub is_admin: bool,
    pub user: AdminUserSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminVerifyResponse {
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCardEntry {
    pub id: Uuid,
    pub card_number: String,
    pub user_name: String,
    pub user_email: String,
    pub status: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AdminCardsResponse {
    pub cards: Vec<AdminCardEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSetCardStatusRequest {
    #[serde(default)]
    pub card_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: ProfileSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub initial_card_number: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub balance: Decimal,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    fn from_user(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            balance: user.balance,
            phone: user.phone,
            address: user.address,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterUserResponse {
    pub success: bool,
    pub user: UserResponse,
    pub password: String,
}

// =========================================================================
// API Routers
// =========================================================================

/// Routes reachable without a session
pub fn create_public_router() -> Router<PgPool> {
    Router::new().route("/admin/login", post(admin_login))
}

/// Routes behind session auth; the admin group additionally requires the
/// admin role
pub fn create_protected_router() -> Router<PgPool> {
    let user_routes = Router::new()
        // Card endpoints
        .route("/cards/my-card", get(my_cards))
        .route("/cards/my-card", post(create_my_card))
        .route("/cards/my-card", patch(update_my_card))
        // Balance
        .route("/balance", get(get_balance))
        .route("/balance", post(top_up))
        // Credentials
        .route("/change-password", post(change_password));

    let admin_routes = Router::new()
        .route("/admin/verify", get(admin_verify))
        .route("/admin/cards", get(admin_list_cards))
        .route("/admin/cards", patch(admin_set_card_status))
        .route("/admin/profile", patch(admin_update_profile))
        .route("/admin/users/create", post(admin_register_user))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(admin_routes)
}

// =========================================================================
// GET /cards/my-card
// =========================================================================

/// List the session user's cards, issuing the first one on demand
async fn my_cards(
    State(pool): State<PgPool>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<CardsResponse>, AppError> {
    let handler = IssueCardHandler::new(pool);

    let cards = handler.ensure_cards(&context).await?;

    Ok(Json(CardsResponse {
        cards: cards
            .into_iter()
            .map(CardResponse::from_card_grouped)
            .collect(),
    }))
}

// =========================================================================
// POST /cards/my-card
// =========================================================================

/// Issue an additional card for the session user
async fn create_my_card(
    State(pool): State<PgPool>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<CardEnvelope>, AppError> {
    let handler = IssueCardHandler::new(pool);

    let card = handler.create_card(&context).await?;

    Ok(Json(CardEnvelope {
        success: true,
        card: CardResponse::from_card(card),
    }))
}

// =========================================================================
// PATCH /cards/my-card
// =========================================================================

/// Rename or block/unblock one of the session user's cards
async fn update_my_card(
    State(pool): State<PgPool>,
    Extension(context): Extension<AuthContext>,
    Json(request): Json<UpdateMyCardRequest>,
) -> Result<Json<CardEnvelope>, AppError> {
    let card_id = request
        .card_id
        .ok_or_else(|| AppError::InvalidArgument("Card ID is required".to_string()))?;
    let card_id = Uuid::parse_str(&card_id)
        .map_err(|_| AppError::InvalidArgument("Invalid card ID".to_string()))?;

    let command = UpdateOwnCardCommand::new(card_id);
    let command = if let Some(name) = request.name {
        command.with_name(name)
    } else {
        command
    };
    let command = if let Some(status) = request.status {
        command.with_status(status)
    } else {
        command
    };

    let handler = UpdateCardHandler::new(pool);
    let card = handler.update_own_card(command, &context).await?;

    Ok(Json(CardEnvelope {
        success: true,
        card: CardResponse::from_card(card),
    }))
}

// =========================================================================
// GET /balance
// =========================================================================

/// Get the session user's balance
async fn get_balance(
    State(pool): State<PgPool>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance: Option<(Decimal,)> = sqlx::query_as("SELECT balance FROM users WHERE id = $1")
        .bind(context.user_id)
        .fetch_optional(&pool)
        .await?;

    let (balance,) = balance.ok_or_else(|| AppError::UserNotFound(context.user_id.to_string()))?;

    Ok(Json(BalanceResponse { balance }))
}

// =========================================================================
// POST /balance
// =========================================================================

/// Add funds to the session user's balance
async fn top_up(
    State(pool): State<PgPool>,
    Extension(context): Extension<AuthContext>,
    Json(request): Json<TopUpRequest>,
) -> Result<Json<TopUpResponse>, AppError> {
    let amount = request
        .amount
        .ok_or_else(|| AppError::InvalidArgument("Invalid amount".to_string()))?;

    let handler = TopUpHandler::new(pool);
    let result = handler.execute(TopUpCommand::new(amount), &context).await?;

    Ok(Json(TopUpResponse {
        success: true,
        balance: result.balance,
        message: result.message,
    }))
}

// =========================================================================
// POST /change-password
// =========================================================================

/// Rotate the session user's credential password
async fn change_password(
    State(pool): State<PgPool>,
    Extension(context): Extension<AuthContext>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (current_password, new_password) = match (request.current_password, request.new_password) {
        (Some(current), Some(new)) => (current, new),
        _ => {
            return Err(AppError::InvalidArgument(
                "All fields are required".to_string(),
            ))
        }
    };

    let handler = ChangePasswordHandler::new(pool);
    handler
        .execute(
            ChangePasswordCommand::new(current_password, new_password),
            &context,
        )
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Password changed successfully".to_string(),
    }))
}

// =========================================================================
// POST /admin/login
// =========================================================================

/// Pre-authentication role check for the admin console.
///
/// Confirms the email belongs to an admin user before the client runs the
/// credential flow with the identity provider. The password itself is not
/// verified here.
async fn admin_login(
    State(pool): State<PgPool>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, AppError> {
    let email = match (request.email, request.password) {
        (Some(email), Some(_)) => email,
        _ => {
            return Err(AppError::InvalidArgument(
                "Email and password are required".to_string(),
            ))
        }
    };

    let user: Option<(Uuid, String, String, String)> =
        sqlx::query_as("SELECT id, email, name, role FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&pool)
            .await?;

    let (id, email, name, role) = user.ok_or(AppError::UserNotFound(email))?;

    let role = Role::from_str(&role).map_err(AppError::Internal)?;
    if role != Role::Admin {
        return Err(AppError::Forbidden(
            "Access denied. Admin privileges required.".to_string(),
        ));
    }

    Ok(Json(AdminLoginResponse {
        success: true,
        is_admin: true,
        user: AdminUserSummary {
            id,
            email,
            name,
            role,
        },
    }))
}

// =========================================================================
// GET /admin/verify
// =========================================================================

/// Confirm the session belongs to an admin; the middleware chain has
/// already enforced it by the time this runs
async fn admin_verify() -> Json<AdminVerifyResponse> {
    Json(AdminVerifyResponse { is_admin: true })
}

// =========================================================================
// GET /admin/cards
// =========================================================================

/// List every card with its owner, newest first
async fn admin_list_cards(
    State(pool): State<PgPool>,
) -> Result<Json<AdminCardsResponse>, AppError> {
    let rows: Vec<(Uuid, String, String, String, String, String, Decimal, DateTime<Utc>)> =
        sqlx::query_as(
            r#"
            SELECT c.id, c.card_number, u.name, u.email, c.status, c.card_type, c.balance, c.created_at
            FROM cards c
            JOIN users u ON u.id = c.user_id
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(&pool)
        .await?;

    let cards = rows
        .into_iter()
        .map(
            |(id, card_number, user_name, user_email, status, card_type, balance, created_at)| {
                AdminCardEntry {
                    id,
                    card_number,
                    user_name,
                    user_email,
                    status,
                    card_type,
                    balance,
                    created_at,
                }
            },
        )
        .collect();

    Ok(Json(AdminCardsResponse { cards }))
}

// =========================================================================
// PATCH /admin/cards
// =========================================================================

/// Block or unblock any card
async fn admin_set_card_status(
    State(pool): State<PgPool>,
    Extension(context): Extension<AuthContext>,
    Json(request): Json<AdminSetCardStatusRequest>,
) -> Result<Json<CardEnvelope>, AppError> {
    let (card_id, status) = match (request.card_id, request.status) {
        (Some(card_id), Some(status)) => (card_id, status),
        _ => {
            return Err(AppError::InvalidArgument(
                "Card ID and status are required".to_string(),
            ))
        }
    };
    let card_id = Uuid::parse_str(&card_id)
        .map_err(|_| AppError::InvalidArgument("Invalid card ID".to_string()))?;

    let handler = UpdateCardHandler::new(pool);
    let card = handler
        .set_card_status(SetCardStatusCommand::new(card_id, status), &context)
        .await?;

    Ok(Json(CardEnvelope {
        success: true,
        card: CardResponse::from_card(card),
    }))
}

// =========================================================================
// PATCH /admin/profile
// =========================================================================

/// Update the admin's own name and/or email
async fn admin_update_profile(
    State(pool): State<PgPool>,
    Extension(context): Extension<AuthContext>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let updated: Option<(String, String)> = sqlx::query_as(
        r#"
        UPDATE users
        SET name = COALESCE($2, name), email = COALESCE($3, email), updated_at = NOW()
        WHERE id = $1
        RETURNING name, email
        "#,
    )
    .bind(context.user_id)
    .bind(request.name.as_deref())
    .bind(request.email.as_deref())
    .fetch_optional(&pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::EmailTaken(request.email.clone().unwrap_or_default())
        }
        _ => AppError::Database(e),
    })?;

    let (name, email) =
        updated.ok_or_else(|| AppError::UserNotFound(context.user_id.to_string()))?;

    Ok(Json(ProfileResponse {
        success: true,
        user: ProfileSummary { name, email },
    }))
}

// =========================================================================
// POST /admin/users/create
// =========================================================================

/// Register a user with a default-password credential account and an
/// optional initial card
async fn admin_register_user(
    State(pool): State<PgPool>,
    Extension(context): Extension<AuthContext>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<Json<RegisterUserResponse>, AppError> {
    let (name, email) = match (request.name, request.email) {
        (Some(name), Some(email)) => (name, email),
        _ => {
            return Err(AppError::InvalidArgument(
                "Name and Email are required".to_string(),
            ))
        }
    };

    let mut command = RegisterUserCommand::new(name, email);
    if let Some(phone) = request.phone {
        command = command.with_phone(phone);
    }
    if let Some(address) = request.address {
        command = command.with_address(address);
    }
    if let Some(number) = request.initial_card_number {
        command = command.with_initial_card_number(number);
    }

    let handler = RegisterUserHandler::new(pool);
    let result = handler.execute(command, &context).await?;

    Ok(Json(RegisterUserResponse {
        success: true,
        user: UserResponse::from_user(result.user),
        password: result.password,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_my_card_request_deserialize() {
        let json = r#"{
            "cardId": "550e8400-e29b-41d4-a716-446655440000",
            "status": "BLOCKED"
        }"#;

        let request: UpdateMyCardRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.card_id.as_deref(),
            Some("550e8400-e29b-41d4-a716-446655440000")
        );
        assert_eq!(request.status.as_deref(), Some("BLOCKED"));
        assert!(request.name.is_none());
    }

    #[test]
    fn test_top_up_request_missing_amount() {
        let request: TopUpRequest = serde_json::from_str("{}").unwrap();
        assert!(request.amount.is_none());

        let request: TopUpRequest = serde_json::from_str(r#"{"amount": 5000}"#).unwrap();
        assert_eq!(request.amount, Some(5000.0));
    }

    #[test]
    fn test_register_user_request_deserialize() {
        let json = r#"{
            "name": "Priya Sharma",
            "email": "priya@example.com",
            "initialCardNumber": "4576000011112222"
        }"#;

        let request: RegisterUserRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name.as_deref(), Some("Priya Sharma"));
        assert_eq!(
            request.initial_card_number.as_deref(),
            Some("4576000011112222")
        );
        assert!(request.phone.is_none());
    }

    #[test]
    fn test_card_response_serializes_camel_case() {
        let response = CardResponse {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            card_number: "4576 0000 1111 2222".to_string(),
            expiry_date: "08/28".to_string(),
            cvv: "123".to_string(),
            balance: Decimal::ZERO,
            status: CardStatus::Active,
            card_type: CardType::Physical,
            name: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["cardNumber"], "4576 0000 1111 2222");
        assert_eq!(json["expiryDate"], "08/28");
        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["type"], "PHYSICAL");
        // Decimals go over the wire as strings
        assert_eq!(json["balance"], "0");
    }

    #[test]
    fn test_change_password_request_camel_case() {
        let json = r#"{"currentPassword": "old-secret", "newPassword": "new-secret"}"#;

        let request: ChangePasswordRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.current_password.as_deref(), Some("old-secret"));
        assert_eq!(request.new_password.as_deref(), Some("new-secret"));
    }
}
