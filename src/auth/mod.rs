//! Auth module
//!
//! Server-side half of the identity boundary: session token resolution and
//! credential password hashing. Session issuance (sign-up / sign-in) lives
//! with the external identity provider.

pub mod password;
pub mod session;

pub use password::{hash_password, verify_password, PasswordError};
pub use session::{resolve_token, token_hash, ResolvedSession};

/// Provider discriminator for password-credential account rows
pub const CREDENTIAL_PROVIDER: &str = "credential";

/// Default password assigned to admin-registered users
pub const DEFAULT_PASSWORD: &str = "Welcome123!";
