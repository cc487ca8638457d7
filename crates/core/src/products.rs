//! Products

use rusty_money::{Money, iso::Currency};

/// Product
///
/// Static reference data for a catalog entry. Each product carries two
/// prices, one charged once and one charged per month, in a single currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product name
    pub name: String,

    /// One-time price
    pub onetime_price: Money<'a, Currency>,

    /// Recurring monthly price
    pub monthly_price: Money<'a, Currency>,

    /// Optional image path for presentation
    pub image: Option<String>,
}
