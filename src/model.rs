//! Persistence models
//!
//! Row types for the users and cards tables plus the TEXT-backed enums
//! they carry. Records decode straight from sqlx rows; converting a record
//! into its typed model validates the stored enum text.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

/// User role, stored lowercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card lifecycle status, stored uppercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardStatus {
    Active,
    Blocked,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Active => "ACTIVE",
            CardStatus::Blocked => "BLOCKED",
        }
    }
}

impl FromStr for CardStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(CardStatus::Active),
            "BLOCKED" => Ok(CardStatus::Blocked),
            other => Err(format!("unknown card status '{}'", other)),
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card form factor, stored uppercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardType {
    Physical,
    Virtual,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Physical => "PHYSICAL",
            CardType::Virtual => "VIRTUAL",
        }
    }
}

impl FromStr for CardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PHYSICAL" => Ok(CardType::Physical),
            "VIRTUAL" => Ok(CardType::Virtual),
            other => Err(format!("unknown card type '{}'", other)),
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw users row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub balance: Decimal,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user with validated role
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub balance: Decimal,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = AppError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let role = Role::from_str(&record.role)
            .map_err(|e| AppError::Internal(format!("user {}: {}", record.id, e)))?;

        Ok(Self {
            id: record.id,
            name: record.name,
            email: record.email,
            role,
            balance: record.balance,
            phone: record.phone,
            address: record.address,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Raw cards row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CardRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub balance: Decimal,
    pub status: String,
    pub card_type: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A card with validated status and type
#[derive(Debug, Clone)]
pub struct Card {
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub balance: Decimal,
    pub status: CardStatus,
    pub card_type: CardType,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CardRecord> for Card {
    type Error = AppError;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        let status = CardStatus::from_str(&record.status)
            .map_err(|e| AppError::Internal(format!("card {}: {}", record.id, e)))?;
        let card_type = CardType::from_str(&record.card_type)
            .map_err(|e| AppError::Internal(format!("card {}: {}", record.id, e)))?;

        Ok(Self {
            id: record.id,
            user_id: record.user_id,
            card_number: record.card_number,
            expiry_date: record.expiry_date,
            cvv: record.cvv,
            balance: record.balance,
            status,
            card_type,
            name: record.name,
            created_at: record.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::from_str("admin"), Ok(Role::Admin));
        assert_eq!(Role::from_str("user"), Ok(Role::User));
        assert_eq!(Role::Admin.as_str(), "admin");
        assert!(Role::from_str("root").is_err());
    }

    #[test]
    fn test_card_status_strict_parse() {
        assert_eq!(CardStatus::from_str("ACTIVE"), Ok(CardStatus::Active));
        assert_eq!(CardStatus::from_str("BLOCKED"), Ok(CardStatus::Blocked));
        // Lowercase and unknown values are rejected, not coerced
        assert!(CardStatus::from_str("active").is_err());
        assert!(CardStatus::from_str("FROZEN").is_err());
    }

    #[test]
    fn test_card_type_parse() {
        assert_eq!(CardType::from_str("PHYSICAL"), Ok(CardType::Physical));
        assert_eq!(CardType::from_str("VIRTUAL"), Ok(CardType::Virtual));
        assert!(CardType::from_str("PLASTIC").is_err());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&CardStatus::Active).unwrap(),
            "\"ACTIVE\""
        );
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn test_card_record_validation() {
        let record = CardRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            card_number: "4576001234567890".to_string(),
            expiry_date: "08/28".to_string(),
            cvv: "123".to_string(),
            balance: Decimal::ZERO,
            status: "SHREDDED".to_string(),
            card_type: "PHYSICAL".to_string(),
            name: None,
            created_at: Utc::now(),
        };

        assert!(Card::try_from(record).is_err());
    }
}
