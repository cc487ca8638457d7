//! Cart

use crate::products::Product;

/// A product placed in the checkout with a quantity.
#[derive(Clone, Debug, PartialEq)]
pub struct CartItem<'a> {
    product: Product<'a>,
    quantity: u32,
}

impl<'a> CartItem<'a> {
    /// Creates a new cart item with the given product and quantity.
    #[must_use]
    pub fn new(product: Product<'a>, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Returns the product of the item
    pub fn product(&self) -> &Product<'a> {
        &self.product
    }

    /// Returns the quantity of the item
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}
