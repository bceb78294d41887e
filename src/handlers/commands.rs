//! Command definitions
//!
//! Commands represent intentions to change the system state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Card, User};

// =========================================================================
// UpdateOwnCardCommand
// =========================================================================

/// Command for a user to update one of their own cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOwnCardCommand {
    /// Card to update; ownership is checked against the session user
    pub card_id: Uuid,
    /// New display name, when provided
    pub name: Option<String>,
    /// New status as submitted on the wire, validated by the handler
    pub status: Option<String>,
}

impl UpdateOwnCardCommand {
    pub fn new(card_id: Uuid) -> Self {
        Self {
            card_id,
            name: None,
            status: None,
        }
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_status(mut self, status: String) -> Self {
        self.status = Some(status);
        self
    }
}

// =========================================================================
// SetCardStatusCommand
// =========================================================================

/// Command for an admin to set any card's status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCardStatusCommand {
    pub card_id: Uuid,
    /// New status as submitted on the wire, validated by the handler
    pub status: String,
}

impl SetCardStatusCommand {
    pub fn new(card_id: Uuid, status: String) -> Self {
        Self { card_id, status }
    }
}

// =========================================================================
// TopUpCommand
// =========================================================================

/// Command to add funds to the session user's balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUpCommand {
    /// Amount as submitted on the wire (JSON number), validated by the handler
    pub amount: f64,
}

impl TopUpCommand {
    pub fn new(amount: f64) -> Self {
        Self { amount }
    }
}

/// Result of a successful top-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUpResult {
    pub balance: Decimal,
    pub message: String,
}

// =========================================================================
// RegisterUserCommand
// =========================================================================

/// Command for an admin to register a new user with credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserCommand {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Card number for an initial card, when the admin supplies one
    pub initial_card_number: Option<String>,
}

impl RegisterUserCommand {
    pub fn new(name: String, email: String) -> Self {
        Self {
            name,
            email,
            phone: None,
            address: None,
            initial_card_number: None,
        }
    }

    pub fn with_phone(mut self, phone: String) -> Self {
        self.phone = Some(phone);
        self
    }

    pub fn with_address(mut self, address: String) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_initial_card_number(mut self, card_number: String) -> Self {
        self.initial_card_number = Some(card_number);
        self
    }
}

/// Result of a successful registration
#[derive(Debug, Clone)]
pub struct RegisterUserResult {
    pub user: User,
    /// Initial card, when one was requested
    pub card: Option<Card>,
    /// Default password assigned to the new credential account
    pub password: String,
}

// =========================================================================
// ChangePasswordCommand
// =========================================================================

/// Command for the session user to rotate their credential password
#[derive(Debug, Clone)]
pub struct ChangePasswordCommand {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordCommand {
    pub fn new(current_password: String, new_password: String) -> Self {
        Self {
            current_password,
            new_password,
        }
    }
}
