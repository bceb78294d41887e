//! Handler-level tests
//!
//! Command construction and validation paths that need no database.
//! Store-backed behavior is covered in tests/integration_store.rs.

#[cfg(test)]
mod tests {
    use crate::domain::{Amount, AmountError, CardNumber};
    use crate::handlers::{
        RegisterUserCommand, SetCardStatusCommand, TopUpCommand, UpdateOwnCardCommand,
    };
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[test]
    fn test_topup_command_carries_raw_wire_amount() {
        let cmd = TopUpCommand::new(5000.0);
        assert_eq!(cmd.amount, 5000.0);

        // Validation happens in the handler, not at construction
        let amount = Amount::from_f64(cmd.amount).unwrap();
        assert_eq!(amount.value(), Decimal::new(5000, 0));
    }

    #[test]
    fn test_topup_rejects_non_positive_amounts() {
        for raw in [0.0, -1.0, -5000.5] {
            let result = Amount::from_f64(TopUpCommand::new(raw).amount);
            assert!(
                matches!(result, Err(AmountError::NotPositive(_))),
                "expected rejection for amount: {}",
                raw
            );
        }
    }

    #[test]
    fn test_update_own_card_command_partial_fields() {
        let card_id = Uuid::new_v4();

        let rename_only = UpdateOwnCardCommand::new(card_id).with_name("Groceries".to_string());
        assert_eq!(rename_only.card_id, card_id);
        assert_eq!(rename_only.name.as_deref(), Some("Groceries"));
        assert!(rename_only.status.is_none());

        let block_only = UpdateOwnCardCommand::new(card_id).with_status("BLOCKED".to_string());
        assert!(block_only.name.is_none());
        assert_eq!(block_only.status.as_deref(), Some("BLOCKED"));
    }

    #[test]
    fn test_set_card_status_command() {
        let card_id = Uuid::new_v4();
        let cmd = SetCardStatusCommand::new(card_id, "ACTIVE".to_string());

        assert_eq!(cmd.card_id, card_id);
        assert_eq!(cmd.status, "ACTIVE");
    }

    #[test]
    fn test_register_command_defaults() {
        let cmd = RegisterUserCommand::new("Arjun Mehta".to_string(), "arjun@example.com".to_string());

        assert!(cmd.phone.is_none());
        assert!(cmd.address.is_none());
        assert!(cmd.initial_card_number.is_none());
    }

    #[test]
    fn test_register_initial_card_number_must_be_sixteen_digits() {
        let cmd = RegisterUserCommand::new("A".to_string(), "a@example.com".to_string())
            .with_initial_card_number("1234".to_string());

        // The handler validates before inserting anything
        let parsed = CardNumber::parse(cmd.initial_card_number.as_deref().unwrap_or_default());
        assert!(parsed.is_err());
    }
}
