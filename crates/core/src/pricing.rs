//! Pricing
//!
//! Pure derivation of checkout prices from cart items and discount rules.
//! Nothing in here mutates state; the store re-runs [`calculate_prices`] on
//! every query.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    cart::CartItem,
    discounts::{Discount, DiscountKind, PriceKind},
};

/// Errors that can occur while deriving checkout prices.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Minor-unit arithmetic overflowed while summing prices.
    #[error("minor-unit arithmetic overflowed while summing prices")]
    Overflow,

    /// A discount amount could not be safely represented in minor units.
    #[error("discount amount conversion overflowed or was not finite")]
    AmountConversion,
}

/// Derived prices for both price kinds of the current checkout state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown<'a> {
    /// Sum of one-time prices over all cart items, before discounts.
    pub subtotal_onetime: Money<'a, Currency>,

    /// Sum of monthly prices over all cart items, before discounts.
    pub subtotal_monthly: Money<'a, Currency>,

    /// Combined amount of all enabled one-time discounts.
    pub total_discount_onetime: Money<'a, Currency>,

    /// Combined amount of all enabled monthly discounts.
    pub total_discount_monthly: Money<'a, Currency>,

    /// One-time price after discounts, floored at zero.
    pub final_onetime: Money<'a, Currency>,

    /// Monthly price after discounts, floored at zero.
    pub final_monthly: Money<'a, Currency>,

    /// First-window pricing; present exactly when an enabled monthly
    /// discount has a positive duration.
    pub introductory: Option<IntroductoryPricing<'a>>,
}

/// Monthly prices around the initial discounted window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntroductoryPricing<'a> {
    /// Monthly price while the duration-limited discounts apply.
    pub first_period: Money<'a, Currency>,

    /// Undiscounted monthly price for the months after the window.
    pub remaining: Money<'a, Currency>,
}

/// Calculates the price breakdown for the given cart items and discounts.
///
/// Enabled discounts are partitioned by price kind; within a group every
/// discount is measured against the undiscounted subtotal and the amounts
/// are summed, so discounts never compound. Final prices are floored at
/// zero.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a subtotal or discount sum overflowed the
///   minor-unit range.
/// - [`PricingError::AmountConversion`]: a discount amount could not be
///   safely represented in minor units.
pub fn calculate_prices<'a>(
    items: &[CartItem<'a>],
    discounts: &[Discount],
    currency: &'static Currency,
) -> Result<PriceBreakdown<'a>, PricingError> {
    let subtotal_onetime = subtotal_minor(items, PriceKind::OneTime)?;
    let subtotal_monthly = subtotal_minor(items, PriceKind::Monthly)?;

    let enabled: SmallVec<[&Discount; 8]> = discounts
        .iter()
        .filter(|discount| discount.is_enabled())
        .collect();

    let onetime: SmallVec<[&Discount; 8]> = enabled
        .iter()
        .copied()
        .filter(|discount| discount.price_kind() == PriceKind::OneTime)
        .collect();

    let monthly: SmallVec<[&Discount; 8]> = enabled
        .iter()
        .copied()
        .filter(|discount| discount.price_kind() == PriceKind::Monthly)
        .collect();

    let total_discount_onetime = summed_amounts(&onetime, subtotal_onetime)?;
    let total_discount_monthly = summed_amounts(&monthly, subtotal_monthly)?;

    let final_onetime = subtotal_onetime
        .checked_sub(total_discount_onetime)
        .ok_or(PricingError::Overflow)?
        .max(0);

    let final_monthly = subtotal_monthly
        .checked_sub(total_discount_monthly)
        .ok_or(PricingError::Overflow)?
        .max(0);

    let introductory = introductory_pricing(&monthly, subtotal_monthly, currency)?;

    Ok(PriceBreakdown {
        subtotal_onetime: Money::from_minor(subtotal_onetime, currency),
        subtotal_monthly: Money::from_minor(subtotal_monthly, currency),
        total_discount_onetime: Money::from_minor(total_discount_onetime, currency),
        total_discount_monthly: Money::from_minor(total_discount_monthly, currency),
        final_onetime: Money::from_minor(final_onetime, currency),
        final_monthly: Money::from_minor(final_monthly, currency),
        introductory,
    })
}

/// Calculates the minor-unit amount a single discount takes off a subtotal.
///
/// Percentage values are measured against the full, undiscounted subtotal;
/// fixed values are converted from major units and ignore the subtotal.
///
/// # Errors
///
/// - [`PricingError::AmountConversion`]: the amount overflowed the `Decimal`
///   range or does not fit in minor units.
pub fn discount_amount_minor(
    kind: DiscountKind,
    value: Decimal,
    subtotal: i64,
) -> Result<i64, PricingError> {
    match kind {
        DiscountKind::Percentage => {
            let subtotal = Decimal::from_i64(subtotal).ok_or(PricingError::AmountConversion)?;

            subtotal
                .checked_mul(value)
                .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
                .ok_or(PricingError::AmountConversion)?
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
                .ok_or(PricingError::AmountConversion)
        }
        DiscountKind::Fixed => major_to_minor(value),
    }
}

/// Converts a major-unit amount into minor units.
pub(crate) fn major_to_minor(amount: Decimal) -> Result<i64, PricingError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(PricingError::AmountConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::AmountConversion)
}

fn subtotal_minor(items: &[CartItem<'_>], price_kind: PriceKind) -> Result<i64, PricingError> {
    items.iter().try_fold(0_i64, |total, item| {
        let price = match price_kind {
            PriceKind::OneTime => item.product().onetime_price,
            PriceKind::Monthly => item.product().monthly_price,
        };

        let line_total = price
            .to_minor_units()
            .checked_mul(i64::from(item.quantity()))
            .ok_or(PricingError::Overflow)?;

        total.checked_add(line_total).ok_or(PricingError::Overflow)
    })
}

fn summed_amounts(discounts: &[&Discount], subtotal: i64) -> Result<i64, PricingError> {
    discounts.iter().try_fold(0_i64, |total, discount| {
        let amount = discount_amount_minor(discount.kind(), discount.value(), subtotal)?;

        total.checked_add(amount).ok_or(PricingError::Overflow)
    })
}

fn introductory_pricing<'a>(
    monthly: &[&Discount],
    subtotal: i64,
    currency: &'static Currency,
) -> Result<Option<IntroductoryPricing<'a>>, PricingError> {
    let windowed: SmallVec<[&Discount; 4]> = monthly
        .iter()
        .copied()
        .filter(|discount| discount.is_duration_limited())
        .collect();

    if windowed.is_empty() {
        return Ok(None);
    }

    let window_discount = summed_amounts(&windowed, subtotal)?;

    let first_period = subtotal
        .checked_sub(window_discount)
        .ok_or(PricingError::Overflow)?
        .max(0);

    Ok(Some(IntroductoryPricing {
        first_period: Money::from_minor(first_period, currency),
        remaining: Money::from_minor(subtotal, currency),
    }))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use super::*;
    use crate::{
        discounts::{DiscountDraft, DiscountId, Timestamp},
        products::Product,
    };

    fn webasto_cart() -> Vec<CartItem<'static>> {
        let product = Product {
            name: "Webasto Pure II".to_string(),
            onetime_price: Money::from_minor(100_000, EUR),
            monthly_price: Money::from_minor(1_000, EUR),
            image: None,
        };

        vec![CartItem::new(product, 1)]
    }

    fn discount(
        id: u64,
        kind: DiscountKind,
        value: i64,
        price_kind: PriceKind,
        duration_months: Option<u32>,
    ) -> Discount {
        Discount::from_draft(
            DiscountId::new(id),
            Timestamp::from_epoch_millis(0),
            DiscountDraft {
                name: format!("discount {id}"),
                description: None,
                kind,
                value: Decimal::from(value),
                price_kind,
                duration_months,
            },
        )
    }

    #[test]
    fn percentage_amount_is_measured_against_the_subtotal() -> TestResult {
        let amount = discount_amount_minor(DiscountKind::Percentage, Decimal::from(10), 100_000)?;

        assert_eq!(amount, 10_000);

        Ok(())
    }

    #[test]
    fn percentage_amount_rounds_midpoint_away_from_zero() -> TestResult {
        // 50% of 25 minor units is 12.5, which rounds to 13.
        let amount = discount_amount_minor(DiscountKind::Percentage, Decimal::from(50), 25)?;

        assert_eq!(amount, 13);

        Ok(())
    }

    #[test]
    fn fixed_amount_converts_major_units_to_minor() -> TestResult {
        let amount = discount_amount_minor(DiscountKind::Fixed, Decimal::from(250), 100_000)?;

        assert_eq!(amount, 25_000);

        Ok(())
    }

    #[test]
    fn percentage_amount_overflow_returns_error() {
        let result = discount_amount_minor(DiscountKind::Percentage, Decimal::MAX, i64::MAX);

        assert!(matches!(result, Err(PricingError::AmountConversion)));
    }

    #[test]
    fn fixed_amount_overflow_returns_error() {
        let result = discount_amount_minor(DiscountKind::Fixed, Decimal::MAX, 0);

        assert!(matches!(result, Err(PricingError::AmountConversion)));
    }

    #[test]
    fn breakdown_without_discounts_mirrors_subtotals() -> TestResult {
        let items = webasto_cart();
        let breakdown = calculate_prices(&items, &[], EUR)?;

        assert_eq!(breakdown.subtotal_onetime, Money::from_minor(100_000, EUR));
        assert_eq!(breakdown.subtotal_monthly, Money::from_minor(1_000, EUR));
        assert_eq!(breakdown.total_discount_onetime, Money::from_minor(0, EUR));
        assert_eq!(breakdown.total_discount_monthly, Money::from_minor(0, EUR));
        assert_eq!(breakdown.final_onetime, Money::from_minor(100_000, EUR));
        assert_eq!(breakdown.final_monthly, Money::from_minor(1_000, EUR));
        assert!(breakdown.introductory.is_none());

        Ok(())
    }

    #[test]
    fn quantity_scales_the_subtotals() -> TestResult {
        let product = Product {
            name: "Webasto Pure II".to_string(),
            onetime_price: Money::from_minor(100_000, EUR),
            monthly_price: Money::from_minor(1_000, EUR),
            image: None,
        };

        let items = vec![CartItem::new(product, 3)];
        let breakdown = calculate_prices(&items, &[], EUR)?;

        assert_eq!(breakdown.subtotal_onetime, Money::from_minor(300_000, EUR));
        assert_eq!(breakdown.subtotal_monthly, Money::from_minor(3_000, EUR));

        Ok(())
    }

    #[test]
    fn empty_cart_produces_zero_prices() -> TestResult {
        let breakdown = calculate_prices(&[], &[], EUR)?;

        assert_eq!(breakdown.subtotal_onetime, Money::from_minor(0, EUR));
        assert_eq!(breakdown.subtotal_monthly, Money::from_minor(0, EUR));
        assert_eq!(breakdown.final_onetime, Money::from_minor(0, EUR));
        assert_eq!(breakdown.final_monthly, Money::from_minor(0, EUR));

        Ok(())
    }

    #[test]
    fn discounts_apply_only_to_their_price_kind() -> TestResult {
        let items = webasto_cart();
        let discounts = [discount(
            0,
            DiscountKind::Percentage,
            10,
            PriceKind::OneTime,
            None,
        )];

        let breakdown = calculate_prices(&items, &discounts, EUR)?;

        assert_eq!(breakdown.total_discount_onetime, Money::from_minor(10_000, EUR));
        assert_eq!(breakdown.final_onetime, Money::from_minor(90_000, EUR));
        assert_eq!(breakdown.total_discount_monthly, Money::from_minor(0, EUR));
        assert_eq!(breakdown.final_monthly, Money::from_minor(1_000, EUR));

        Ok(())
    }

    #[test]
    fn multiple_discounts_sum_against_the_undiscounted_subtotal() -> TestResult {
        let items = webasto_cart();
        let discounts = [
            discount(0, DiscountKind::Percentage, 10, PriceKind::OneTime, None),
            discount(1, DiscountKind::Fixed, 250, PriceKind::OneTime, None),
        ];

        let breakdown = calculate_prices(&items, &discounts, EUR)?;

        // 10% of the full subtotal plus the flat amount; no compounding.
        assert_eq!(breakdown.total_discount_onetime, Money::from_minor(35_000, EUR));
        assert_eq!(breakdown.final_onetime, Money::from_minor(65_000, EUR));

        Ok(())
    }

    #[test]
    fn disabled_discounts_contribute_nothing() -> TestResult {
        let items = webasto_cart();
        let mut disabled = discount(0, DiscountKind::Percentage, 10, PriceKind::OneTime, None);
        disabled.toggle();

        let breakdown = calculate_prices(&items, &[disabled], EUR)?;

        assert_eq!(breakdown.total_discount_onetime, Money::from_minor(0, EUR));
        assert_eq!(breakdown.final_onetime, Money::from_minor(100_000, EUR));

        Ok(())
    }

    #[test]
    fn zero_valued_discounts_contribute_nothing() -> TestResult {
        let items = webasto_cart();
        let discounts = [discount(0, DiscountKind::Fixed, 0, PriceKind::OneTime, None)];

        let breakdown = calculate_prices(&items, &discounts, EUR)?;

        assert_eq!(breakdown.final_onetime, Money::from_minor(100_000, EUR));

        Ok(())
    }

    #[test]
    fn final_price_floors_at_zero() -> TestResult {
        let items = webasto_cart();
        let discounts = [discount(0, DiscountKind::Fixed, 2_000, PriceKind::OneTime, None)];

        let breakdown = calculate_prices(&items, &discounts, EUR)?;

        assert_eq!(breakdown.total_discount_onetime, Money::from_minor(200_000, EUR));
        assert_eq!(breakdown.final_onetime, Money::from_minor(0, EUR));

        Ok(())
    }

    #[test]
    fn introductory_pricing_requires_a_positive_duration() -> TestResult {
        let items = webasto_cart();

        let open_ended = [discount(0, DiscountKind::Fixed, 5, PriceKind::Monthly, None)];
        let breakdown = calculate_prices(&items, &open_ended, EUR)?;
        assert!(breakdown.introductory.is_none());

        let zero_window = [discount(1, DiscountKind::Fixed, 5, PriceKind::Monthly, Some(0))];
        let breakdown = calculate_prices(&items, &zero_window, EUR)?;
        assert!(breakdown.introductory.is_none());

        Ok(())
    }

    #[test]
    fn introductory_pricing_subtracts_window_discounts_from_the_subtotal() -> TestResult {
        let items = webasto_cart();
        let discounts = [discount(0, DiscountKind::Fixed, 5, PriceKind::Monthly, Some(3))];

        let breakdown = calculate_prices(&items, &discounts, EUR)?;
        let introductory = breakdown.introductory.ok_or("expected introductory pricing")?;

        assert_eq!(introductory.first_period, Money::from_minor(500, EUR));
        assert_eq!(introductory.remaining, Money::from_minor(1_000, EUR));
        assert_eq!(breakdown.final_monthly, Money::from_minor(500, EUR));

        Ok(())
    }

    #[test]
    fn introductory_first_period_floors_at_zero() -> TestResult {
        let items = webasto_cart();
        let discounts = [discount(0, DiscountKind::Fixed, 50, PriceKind::Monthly, Some(6))];

        let breakdown = calculate_prices(&items, &discounts, EUR)?;
        let introductory = breakdown.introductory.ok_or("expected introductory pricing")?;

        assert_eq!(introductory.first_period, Money::from_minor(0, EUR));
        assert_eq!(introductory.remaining, Money::from_minor(1_000, EUR));

        Ok(())
    }

    #[test]
    fn disabled_window_discounts_do_not_create_introductory_pricing() -> TestResult {
        let items = webasto_cart();
        let mut disabled = discount(0, DiscountKind::Fixed, 5, PriceKind::Monthly, Some(3));
        disabled.toggle();

        let breakdown = calculate_prices(&items, &[disabled], EUR)?;

        assert!(breakdown.introductory.is_none());

        Ok(())
    }
}
