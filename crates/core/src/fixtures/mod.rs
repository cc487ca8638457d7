//! Fixtures

use thiserror::Error;

pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between a product's prices
    #[error("Currency mismatch: one-time price in {0}, monthly price in {1}")]
    CurrencyMismatch(String, String),

    /// Catalog defines no products
    #[error("No products in catalog")]
    NoProducts,
}
