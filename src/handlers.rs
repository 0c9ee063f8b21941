pub mod auth;
pub mod business;
pub mod crm;
pub mod dashboard;
pub mod finance;
pub mod inventory;
pub mod operations;
pub mod procurement;
pub mod reports;

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::common::db_utils::MAX_AMOUNT;

// ---
// Validações de valores monetários compartilhadas pelos payloads
// ---
pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("The value cannot be negative.".into());
        return Err(err);
    }
    validate_max_amount(val)
}

pub(crate) fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("exclusive_min".into(), &0.0);
        err.message = Some("The value must be greater than zero.".into());
        return Err(err);
    }
    validate_max_amount(val)
}

fn validate_max_amount(val: &Decimal) -> Result<(), ValidationError> {
    if *val > MAX_AMOUNT {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &MAX_AMOUNT.to_string());
        err.message = Some("The value is too large.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_validators() {
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&Decimal::new(-1, 2)).is_err());
        assert!(validate_positive(&Decimal::ZERO).is_err());
        assert!(validate_positive(&Decimal::new(1, 2)).is_ok());
        assert!(validate_positive(&MAX_AMOUNT).is_ok());
        assert!(validate_positive(&(MAX_AMOUNT + Decimal::new(1, 2))).is_err());
        assert!(validate_not_negative(&Decimal::from(10_000_000_000i64)).is_err());
    }
}
