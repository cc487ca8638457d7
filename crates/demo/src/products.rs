use rusty_money::iso::Currency;

use tally::{fixtures::products::CatalogFixture, products::Product};

/// Loaded catalog data needed by the app.
#[derive(Debug)]
pub struct LoadedCatalog {
    /// The single product this checkout sells.
    pub product: Product<'static>,

    /// Currency used by the catalog.
    pub currency: &'static Currency,
}

/// Load the catalog fixture into the product this checkout sells.
///
/// # Errors
///
/// Returns an error when fixture parsing fails, a price is invalid, the two
/// prices disagree on currency, or the catalog has no products.
pub fn load_catalog(yaml: &str) -> Result<LoadedCatalog, String> {
    let product = CatalogFixture::from_yaml(yaml)
        .map_err(|error| format!("Failed to parse products fixture: {error}"))?
        .into_first_product()
        .map_err(|error| error.to_string())?;

    let currency = product.onetime_price.currency();

    Ok(LoadedCatalog { product, currency })
}

/// Symbol used when rendering prices in this currency.
pub fn currency_symbol(currency: &'static Currency) -> &'static str {
    match currency.iso_alpha_code {
        "EUR" => "€",
        "GBP" => "£",
        "USD" => "$",
        _ => currency.iso_alpha_code,
    }
}

/// Format a minor-unit amount into a currency string.
pub fn format_price(minor_units: i64, currency: &'static Currency) -> String {
    let abs_minor = minor_units.unsigned_abs();
    let major_units = abs_minor / 100;
    let fractional = abs_minor % 100;
    let sign = if minor_units < 0 { "-" } else { "" };
    let symbol = currency_symbol(currency);

    if symbol == currency.iso_alpha_code {
        format!("{sign}{major_units}.{fractional:02} {symbol}")
    } else {
        format!("{sign}{symbol} {major_units}.{fractional:02}")
    }
}
