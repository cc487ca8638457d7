use leptos::prelude::*;

use tally::{
    discounts::{Discount, HORIZON_MONTHS, PriceKind},
    pricing,
    store::DiscountStore,
};

use crate::products::format_price;

/// Render model for the order summary sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OverviewViewModel {
    /// Product display name.
    product_name: String,

    /// Optional product image path.
    product_image: Option<String>,

    /// Undiscounted one-time price of the product.
    product_onetime_price: String,

    /// Undiscounted monthly price of the product.
    product_monthly_price: String,

    /// Monthly price after discounts.
    final_monthly: String,

    /// First-window lines, one pair per duration-limited discount.
    introductory_lines: Vec<IntroductoryLines>,

    /// One-time subtotal before discounts.
    subtotal_onetime: String,

    /// Deduction lines, one per enabled one-time discount.
    onetime_discount_lines: Vec<DiscountLine>,

    /// One-time price after discounts.
    final_onetime: String,
}

/// Render model for the discounted window of one duration-limited discount.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IntroductoryLines {
    /// Label for the discounted months.
    window_label: String,

    /// Monthly price while the window lasts.
    window_price: String,

    /// Label for the months after the window.
    remaining_label: String,

    /// Undiscounted monthly price after the window.
    remaining_price: String,
}

/// Render model for one one-time discount deduction.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DiscountLine {
    /// Discount display name.
    name: String,

    /// Deducted amount, rendered as a negative price.
    amount: String,
}

fn build_overview(store: &DiscountStore<'static>) -> Result<OverviewViewModel, String> {
    let currency = store.currency();

    let item = store
        .items()
        .first()
        .ok_or_else(|| "No products in the checkout".to_string())?;
    let product = item.product();

    let breakdown = store
        .calculate_prices()
        .map_err(|error| error.to_string())?;

    let introductory_lines = if let Some(introductory) = breakdown.introductory {
        let window_price = format_price(introductory.first_period.to_minor_units(), currency);
        let remaining_price = format_price(introductory.remaining.to_minor_units(), currency);

        store
            .discounts()
            .iter()
            .filter(|discount| discount.is_enabled() && discount.is_duration_limited())
            .filter_map(Discount::duration_months)
            .map(|months| IntroductoryLines {
                window_label: format!("First {months} months (with discount)"),
                window_price: window_price.clone(),
                remaining_label: format!(
                    "Remaining {} months",
                    HORIZON_MONTHS.saturating_sub(months)
                ),
                remaining_price: remaining_price.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    let subtotal_onetime_minor = breakdown.subtotal_onetime.to_minor_units();
    let mut onetime_discount_lines = Vec::new();

    for discount in store.discounts() {
        if !discount.is_enabled() || discount.price_kind() != PriceKind::OneTime {
            continue;
        }

        let amount = pricing::discount_amount_minor(
            discount.kind(),
            discount.value(),
            subtotal_onetime_minor,
        )
        .map_err(|error| error.to_string())?;

        onetime_discount_lines.push(DiscountLine {
            name: discount.name().to_string(),
            amount: format!("- {}", format_price(amount, currency)),
        });
    }

    Ok(OverviewViewModel {
        product_name: product.name.clone(),
        product_image: product.image.clone(),
        product_onetime_price: format_price(product.onetime_price.to_minor_units(), currency),
        product_monthly_price: format_price(product.monthly_price.to_minor_units(), currency),
        final_monthly: format_price(breakdown.final_monthly.to_minor_units(), currency),
        introductory_lines,
        subtotal_onetime: format_price(subtotal_onetime_minor, currency),
        onetime_discount_lines,
        final_onetime: format_price(breakdown.final_onetime.to_minor_units(), currency),
    })
}

fn render_overview_content(store: RwSignal<DiscountStore<'static>>) -> AnyView {
    match store.with(build_overview) {
        Ok(overview) => view! {
            <div class="overview-product">
                {overview
                    .product_image
                    .map(|src| view! { <img class="overview-product-image" src=src alt="" /> })}
                <div class="overview-product-details">
                    <p class="overview-product-name">{overview.product_name}</p>
                    <p class="overview-product-price">{overview.product_onetime_price}</p>
                    <p class="overview-product-monthly">
                        <span>"Monthly Price"</span>
                        <span>{overview.product_monthly_price}</span>
                    </p>
                </div>
            </div>

            <div class="overview-section">
                <p class="overview-row overview-row-strong">
                    <span>"Eventually per month excl. btw"</span>
                    <span>{overview.final_monthly}</span>
                </p>
                {overview
                    .introductory_lines
                    .into_iter()
                    .map(|lines| {
                        view! {
                            <p class="overview-row">
                                <span>{lines.window_label}</span>
                                <span>{lines.window_price}</span>
                            </p>
                            <p class="overview-row">
                                <span>{lines.remaining_label}</span>
                                <span>{lines.remaining_price}</span>
                            </p>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="overview-section">
                <p class="overview-row">
                    <span>"Subtotal onetime costs excl. btw"</span>
                    <span>{overview.subtotal_onetime}</span>
                </p>
                {overview
                    .onetime_discount_lines
                    .into_iter()
                    .map(|line| {
                        view! {
                            <p class="overview-row overview-row-discount">
                                <span>{line.name}</span>
                                <span>{line.amount}</span>
                            </p>
                        }
                    })
                    .collect_view()}
                <p class="overview-row overview-row-strong">
                    <span>"Onetime costs excl. btw"</span>
                    <span>{overview.final_onetime}</span>
                </p>
            </div>
        }
        .into_any(),
        Err(error_message) => view! { <p class="error-text">{error_message}</p> }.into_any(),
    }
}

/// Order summary sidebar.
#[component]
pub fn OverviewPanel(
    /// Shared checkout state.
    store: RwSignal<DiscountStore<'static>>,
) -> impl IntoView {
    view! {
        <aside class="overview-panel">
            <div class="panel-header">
                <h2 class="panel-title">"Overview"</h2>
            </div>
            <div class="panel-card">{move || render_overview_content(store)}</div>
        </aside>
    }
}
