//! AuraPay Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod auth;
pub mod domain;
pub mod handlers;
pub mod jobs;
pub mod model;

// Private modules (used only by main.rs binary)
pub mod config;
pub mod db;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use domain::{Amount, AmountError, AuthContext, CardError, CardNumber};
pub use model::{Card, CardStatus, CardType, Role, User};
