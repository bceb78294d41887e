//! Request context
//!
//! Identity resolved for the current request, used for gating and tracing.

use uuid::Uuid;

use crate::model::Role;

/// Context attached to a request once its session has been resolved.
///
/// The role is always the one read from the users table during session
/// resolution, never a client-supplied value.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Session row backing this request
    pub session_id: Uuid,

    /// User owning the session
    pub user_id: Uuid,

    /// Role loaded from the users table
    pub role: Role,

    /// Correlation ID for request tracing
    pub correlation_id: Option<Uuid>,
}

impl AuthContext {
    /// Create a context for a resolved session
    pub fn new(session_id: Uuid, user_id: Uuid, role: Role) -> Self {
        Self {
            session_id,
            user_id,
            role,
            correlation_id: None,
        }
    }

    /// Attach a correlation ID
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Whether the session belongs to an admin user
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let session_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();

        let context = AuthContext::new(session_id, user_id, Role::User)
            .with_correlation_id(correlation_id);

        assert_eq!(context.session_id, session_id);
        assert_eq!(context.user_id, user_id);
        assert_eq!(context.correlation_id, Some(correlation_id));
        assert!(!context.is_admin());
    }

    #[test]
    fn test_admin_check() {
        let context = AuthContext::new(Uuid::new_v4(), Uuid::new_v4(), Role::Admin);
        assert!(context.is_admin());
    }
}
