//! Discount store
//!
//! The single state container behind the discounts panel. It owns the cart
//! items, the discount list, the currency, and the id counter; presentation
//! code mutates it only through the named commands and reads snapshots.

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::CartItem,
    discounts::{Discount, DiscountDraft, DiscountId, Timestamp},
    pricing::{self, PriceBreakdown, PricingError},
};

/// Errors related to store construction.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An item's price currency differs from the store currency (index, item currency, store currency).
    #[error("Item {0} has currency {1}, but store has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),
}

/// Discount store
#[derive(Debug, Clone)]
pub struct DiscountStore<'a> {
    items: Vec<CartItem<'a>>,
    discounts: Vec<Discount>,
    currency: &'static Currency,
    next_id: u64,
}

impl<'a> DiscountStore<'a> {
    /// Create a new store with an empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        DiscountStore {
            items: Vec::new(),
            discounts: Vec::new(),
            currency,
            next_id: 0,
        }
    }

    /// Create a new store with the given cart items.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if any item price is in another currency.
    pub fn with_items(
        items: impl Into<Vec<CartItem<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, StoreError> {
        let items = items.into();

        items.iter().enumerate().try_for_each(|(i, item)| {
            let product = item.product();

            [&product.onetime_price, &product.monthly_price]
                .into_iter()
                .try_for_each(|price| {
                    let item_currency = price.currency();

                    if item_currency == currency {
                        Ok(())
                    } else {
                        Err(StoreError::CurrencyMismatch(
                            i,
                            item_currency.iso_alpha_code,
                            currency.iso_alpha_code,
                        ))
                    }
                })
        })?;

        Ok(DiscountStore {
            items,
            discounts: Vec::new(),
            currency,
            next_id: 0,
        })
    }

    /// Create a discount from the given draft and return its id.
    ///
    /// The store assigns the next id and a creation timestamp and enables
    /// the discount; the record is appended to the list.
    pub fn add_discount(&mut self, draft: DiscountDraft) -> DiscountId {
        let id = DiscountId::new(self.next_id);

        self.next_id = self.next_id.saturating_add(1);
        self.discounts
            .push(Discount::from_draft(id, Timestamp::now(), draft));

        id
    }

    /// Replace the draft fields of the matching discount in place.
    ///
    /// Id, creation timestamp, and the enabled flag are untouched. Unknown
    /// ids are a no-op.
    pub fn update_discount(&mut self, id: DiscountId, draft: DiscountDraft) {
        if let Some(discount) = self
            .discounts
            .iter_mut()
            .find(|discount| discount.id() == id)
        {
            discount.apply_draft(draft);
        }
    }

    /// Remove the matching discount, keeping the order of the remainder.
    ///
    /// Unknown ids are a no-op.
    pub fn remove_discount(&mut self, id: DiscountId) {
        self.discounts.retain(|discount| discount.id() != id);
    }

    /// Flip the enabled flag of the matching discount.
    ///
    /// Unknown ids are a no-op.
    pub fn toggle_discount(&mut self, id: DiscountId) {
        if let Some(discount) = self
            .discounts
            .iter_mut()
            .find(|discount| discount.id() == id)
        {
            discount.toggle();
        }
    }

    /// Calculate the price breakdown for the current state.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if a subtotal or discount amount cannot be
    /// represented in minor units.
    pub fn calculate_prices(&self) -> Result<PriceBreakdown<'a>, PricingError> {
        pricing::calculate_prices(&self.items, &self.discounts, self.currency)
    }

    /// All discounts in insertion order.
    #[must_use]
    pub fn discounts(&self) -> &[Discount] {
        &self.discounts
    }

    /// Look up a discount by id.
    #[must_use]
    pub fn discount(&self, id: DiscountId) -> Option<&Discount> {
        self.discounts.iter().find(|discount| discount.id() == id)
    }

    /// The cart items.
    #[must_use]
    pub fn items(&self) -> &[CartItem<'a>] {
        &self.items
    }

    /// The store currency.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
