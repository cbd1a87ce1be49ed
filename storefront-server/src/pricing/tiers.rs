//! Quantity discount tier checks

use std::collections::HashSet;

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::PriceTierInput;

use super::quote::MAX_QUANTITY;

/// Tiers start at quantity >= 1, discount within 0..=100, one tier per quantity
pub fn validate_tiers(tiers: &[PriceTierInput]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for tier in tiers {
        let problem = if tier.min_quantity < 1 || i64::from(tier.min_quantity) > MAX_QUANTITY {
            Some(format!("min_quantity {} out of range", tier.min_quantity))
        } else if tier.discount_percent < Decimal::ZERO
            || tier.discount_percent > Decimal::ONE_HUNDRED
        {
            Some(format!("discount_percent {} out of range", tier.discount_percent))
        } else if !seen.insert(tier.min_quantity) {
            Some(format!("duplicate tier for quantity {}", tier.min_quantity))
        } else {
            None
        };

        if let Some(message) = problem {
            return Err(AppError::with_message(ErrorCode::PriceTierInvalid, message));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(min_quantity: i32, discount: i64) -> PriceTierInput {
        PriceTierInput {
            min_quantity,
            discount_percent: Decimal::from(discount),
        }
    }

    #[test]
    fn test_valid_tiers() {
        assert!(validate_tiers(&[]).is_ok());
        assert!(validate_tiers(&[tier(100, 5), tier(500, 10), tier(1000, 100)]).is_ok());
    }

    #[test]
    fn test_invalid_tiers() {
        let err = validate_tiers(&[tier(0, 5)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::PriceTierInvalid);
        assert!(validate_tiers(&[tier(10, 101)]).is_err());
        assert!(validate_tiers(&[tier(10, -1)]).is_err());
        assert!(validate_tiers(&[tier(10, 5), tier(10, 8)]).is_err());
    }
}
