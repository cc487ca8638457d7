//! Validation
//!
//! Entry-time gate for discount values. The store itself accepts any draft;
//! this check runs in the form before a draft is submitted, so an invalid
//! value never reaches the store.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    discounts::{DiscountKind, PriceKind},
    pricing,
};

/// Reasons a discount value is rejected at entry time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Percentage discounts may not exceed 100%.
    #[error("percentage discount cannot exceed 100%")]
    PercentageAboveLimit,

    /// Fixed discounts may not exceed the base price they apply against.
    #[error("fixed discount cannot exceed the {price_kind} base price")]
    AmountAboveBase {
        /// Which base price was exceeded.
        price_kind: PriceKind,
        /// The base price in minor units.
        base_minor: i64,
    },
}

/// Checks a prospective discount value against the selected base price.
///
/// Values of zero or below are accepted; they mean "no discount yet" while
/// the user is still typing. Boundary equality (a fixed discount exactly
/// matching the base price) is accepted. Fixed values too large to represent
/// in minor units are rejected like any other value above the base.
///
/// # Errors
///
/// - [`ValidationError::PercentageAboveLimit`]: a percentage above 100.
/// - [`ValidationError::AmountAboveBase`]: a fixed amount above the base
///   price for the chosen price kind.
pub fn validate_discount_value(
    kind: DiscountKind,
    price_kind: PriceKind,
    value: Decimal,
    base: &Money<'_, Currency>,
) -> Result<(), ValidationError> {
    if value <= Decimal::ZERO {
        return Ok(());
    }

    match kind {
        DiscountKind::Percentage => {
            if value > Decimal::ONE_HUNDRED {
                Err(ValidationError::PercentageAboveLimit)
            } else {
                Ok(())
            }
        }
        DiscountKind::Fixed => {
            let base_minor = base.to_minor_units();

            match pricing::major_to_minor(value) {
                Ok(amount_minor) if amount_minor <= base_minor => Ok(()),
                Ok(_) | Err(_) => Err(ValidationError::AmountAboveBase {
                    price_kind,
                    base_minor,
                }),
            }
        }
    }
}
