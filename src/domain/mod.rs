//! Domain module
//!
//! Core domain types and business logic.

pub mod amount;
pub mod card;
pub mod context;

pub use amount::{format_inr, Amount, AmountError};
pub use card::{generate_cvv, generate_expiry, group_digits, CardError, CardNumber, ISSUER_PREFIX};
pub use context::AuthContext;
