//! Product Catalog Fixtures

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{fixtures::FixtureError, products::Product};

/// Wrapper for the product catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

impl CatalogFixture {
    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] if the document cannot be parsed.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Take the first product in key order.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoProducts`] for an empty catalog, or any
    /// error from converting the chosen fixture into a [`Product`].
    pub fn into_first_product(self) -> Result<Product<'static>, FixtureError> {
        let mut entries: Vec<(String, ProductFixture)> = self.products.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        let (_key, fixture) = entries.into_iter().next().ok_or(FixtureError::NoProducts)?;

        fixture.try_into()
    }
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// One-time price (e.g., "1000.00 EUR")
    pub onetime_price: String,

    /// Monthly price (e.g., "10.00 EUR")
    pub monthly_price: String,

    /// Optional image path
    pub image: Option<String>,
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (onetime_minor, onetime_currency) = parse_price(&fixture.onetime_price)?;
        let (monthly_minor, monthly_currency) = parse_price(&fixture.monthly_price)?;

        if onetime_currency != monthly_currency {
            return Err(FixtureError::CurrencyMismatch(
                onetime_currency.iso_alpha_code.to_string(),
                monthly_currency.iso_alpha_code.to_string(),
            ));
        }

        Ok(Product {
            name: fixture.name,
            onetime_price: Money::from_minor(onetime_minor, onetime_currency),
            monthly_price: Money::from_minor(monthly_minor, monthly_currency),
            image: fixture.image,
        })
    }
}

/// Parse price string (e.g., "10.00 EUR") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount_text, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount_text
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "EUR" => EUR,
        "GBP" => GBP,
        "USD" => USD,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn webasto_fixture() -> ProductFixture {
        ProductFixture {
            name: "Webasto Pure II".to_string(),
            onetime_price: "1000.00 EUR".to_string(),
            monthly_price: "10.00 EUR".to_string(),
            image: None,
        }
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99EUR");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_eur_and_usd() -> TestResult {
        let (eur_minor, eur) = parse_price("1000.00 EUR")?;
        let (usd_minor, usd) = parse_price("2.50 USD")?;

        assert_eq!(eur_minor, 100_000);
        assert_eq!(eur, EUR);
        assert_eq!(usd_minor, 250);
        assert_eq!(usd, USD);

        Ok(())
    }

    #[test]
    fn product_fixture_builds_a_two_price_product() -> TestResult {
        let product: Product<'_> = webasto_fixture().try_into()?;

        assert_eq!(product.name, "Webasto Pure II");
        assert_eq!(product.onetime_price, Money::from_minor(100_000, EUR));
        assert_eq!(product.monthly_price, Money::from_minor(1_000, EUR));
        assert!(product.image.is_none());

        Ok(())
    }

    #[test]
    fn product_fixture_rejects_mixed_currencies() {
        let mut fixture = webasto_fixture();
        fixture.monthly_price = "10.00 GBP".to_string();

        let result: Result<Product<'_>, _> = fixture.try_into();

        assert!(matches!(
            result,
            Err(FixtureError::CurrencyMismatch(onetime, monthly))
                if onetime == "EUR" && monthly == "GBP"
        ));
    }

    #[test]
    fn catalog_yields_the_first_product_by_key_order() -> TestResult {
        let yaml = "products:\n  \
            z-other:\n    name: Other\n    onetime_price: 1.00 EUR\n    monthly_price: 1.00 EUR\n  \
            a-first:\n    name: First\n    onetime_price: 2.00 EUR\n    monthly_price: 2.00 EUR\n";

        let product = CatalogFixture::from_yaml(yaml)?.into_first_product()?;

        assert_eq!(product.name, "First");

        Ok(())
    }

    #[test]
    fn empty_catalog_has_no_first_product() -> TestResult {
        let catalog = CatalogFixture::from_yaml("products: {}\n")?;
        let result = catalog.into_first_product();

        assert!(matches!(result, Err(FixtureError::NoProducts)));

        Ok(())
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let result = CatalogFixture::from_yaml("products: [not, a, map]");

        assert!(matches!(result, Err(FixtureError::Yaml(_))));
    }
}
