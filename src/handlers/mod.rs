//! Command Handlers module
//!
//! Command handlers that orchestrate business operations against the store.
//! Route handlers translate HTTP into commands; everything stateful runs here.

mod change_password_handler;
mod commands;
mod issue_card_handler;
mod register_user_handler;
mod topup_handler;
mod update_card_handler;

/// Column list matching [`crate::model::CardRecord`], for RETURNING clauses
pub(crate) const SELECT_CARD_COLUMNS: &str =
    "id, user_id, card_number, expiry_date, cvv, balance, status, card_type, name, created_at";

#[cfg(test)]
mod tests;

pub use change_password_handler::ChangePasswordHandler;
pub use commands::*;
pub use issue_card_handler::IssueCardHandler;
pub use register_user_handler::RegisterUserHandler;
pub use topup_handler::TopUpHandler;
pub use update_card_handler::UpdateCardHandler;
