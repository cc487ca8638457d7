use leptos::prelude::*;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use tally::{
    discounts::{Discount, DiscountDraft, DiscountId, DiscountKind, PriceKind},
    pricing,
    store::DiscountStore,
    validation::{ValidationError, validate_discount_value},
};

use crate::{
    announce,
    products::{currency_symbol, format_price},
};

/// What the discount form is editing.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum FormTarget {
    /// Create a new discount.
    Create,

    /// Edit an existing discount.
    Edit(Discount),
}

/// Base prices the form validates and previews against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BasePrices {
    onetime_minor: i64,
    monthly_minor: i64,
}

impl BasePrices {
    fn for_kind(self, price_kind: PriceKind) -> i64 {
        match price_kind {
            PriceKind::OneTime => self.onetime_minor,
            PriceKind::Monthly => self.monthly_minor,
        }
    }
}

fn base_prices(store: &DiscountStore<'static>) -> BasePrices {
    store.items().first().map_or(
        BasePrices {
            onetime_minor: 0,
            monthly_minor: 0,
        },
        |item| BasePrices {
            onetime_minor: item.product().onetime_price.to_minor_units(),
            monthly_minor: item.product().monthly_price.to_minor_units(),
        },
    )
}

/// Initial field values for one opening of the form.
#[derive(Debug)]
struct FormSeed {
    edit_id: Option<DiscountId>,
    heading: String,
    submit_label: &'static str,
    price_kind: PriceKind,
    kind: DiscountKind,
    value_text: String,
    duration_text: String,
    description_text: String,
}

impl FormSeed {
    fn from_target(target: FormTarget) -> Self {
        match target {
            FormTarget::Create => FormSeed {
                edit_id: None,
                heading: "Add discount".to_string(),
                submit_label: "Add",
                price_kind: PriceKind::Monthly,
                kind: DiscountKind::Percentage,
                value_text: String::new(),
                duration_text: String::new(),
                description_text: String::new(),
            },
            FormTarget::Edit(discount) => FormSeed {
                edit_id: Some(discount.id()),
                heading: discount.name().to_string(),
                submit_label: "Save",
                price_kind: discount.price_kind(),
                kind: discount.kind(),
                value_text: discount.value().normalize().to_string(),
                duration_text: discount
                    .duration_months()
                    .map(|months| months.to_string())
                    .unwrap_or_default(),
                description_text: discount.description().unwrap_or_default().to_string(),
            },
        }
    }
}

fn parse_value(text: &str) -> Decimal {
    text.trim().parse().unwrap_or(Decimal::ZERO)
}

fn validation_message(
    kind: DiscountKind,
    price_kind: PriceKind,
    value_text: &str,
    bases: BasePrices,
    currency: &'static Currency,
) -> Option<String> {
    let base = Money::from_minor(bases.for_kind(price_kind), currency);

    match validate_discount_value(kind, price_kind, parse_value(value_text), &base) {
        Ok(()) => None,
        Err(ValidationError::PercentageAboveLimit) => {
            Some("Percentage discount cannot exceed 100%".to_string())
        }
        Err(ValidationError::AmountAboveBase { base_minor, .. }) => Some(format!(
            "Fixed discount cannot exceed {}",
            format_price(base_minor, currency)
        )),
    }
}

fn preview_minor(
    kind: DiscountKind,
    price_kind: PriceKind,
    value_text: &str,
    bases: BasePrices,
) -> i64 {
    let base = bases.for_kind(price_kind);
    let amount = pricing::discount_amount_minor(kind, parse_value(value_text), base).unwrap_or(0);

    base.saturating_sub(amount).max(0)
}

fn value_max(kind: DiscountKind, price_kind: PriceKind, bases: BasePrices) -> String {
    match kind {
        DiscountKind::Percentage => "100".to_string(),
        DiscountKind::Fixed => Decimal::new(bases.for_kind(price_kind), 2)
            .normalize()
            .to_string(),
    }
}

fn build_draft(
    kind: DiscountKind,
    price_kind: PriceKind,
    value_text: &str,
    duration_text: &str,
    description_text: &str,
    symbol: &str,
) -> Option<DiscountDraft> {
    let value_text = value_text.trim();
    let value: Decimal = value_text.parse().ok()?;

    let unit = match kind {
        DiscountKind::Percentage => "%",
        DiscountKind::Fixed => symbol,
    };

    let description = description_text.trim();
    let description = (!description.is_empty()).then(|| description.to_string());

    let duration_months = match price_kind {
        PriceKind::Monthly => duration_text
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|months| *months > 0),
        PriceKind::OneTime => None,
    };

    Some(DiscountDraft {
        name: format!("{value_text}{unit} discount"),
        description,
        kind,
        value,
        price_kind,
        duration_months,
    })
}

/// Modal form for creating or editing a discount.
#[component]
pub(super) fn DiscountForm(
    /// Create mode or the discount being edited.
    target: FormTarget,
    /// Shared checkout state.
    store: RwSignal<DiscountStore<'static>>,
    /// Live-region announcement signal.
    live_message: RwSignal<(u64, String)>,
    /// Signal that owns whether the form is open.
    form_target: RwSignal<Option<FormTarget>>,
) -> impl IntoView {
    let (currency, bases) = store.with_untracked(|state| (state.currency(), base_prices(state)));
    let symbol = currency_symbol(currency);

    let FormSeed {
        edit_id,
        heading,
        submit_label,
        price_kind: initial_price_kind,
        kind: initial_kind,
        value_text: initial_value,
        duration_text: initial_duration,
        description_text: initial_description,
    } = FormSeed::from_target(target);

    let price_kind = RwSignal::new(initial_price_kind);
    let kind = RwSignal::new(initial_kind);
    let value_text = RwSignal::new(initial_value);
    let duration_text = RwSignal::new(initial_duration);
    let description_text = RwSignal::new(initial_description);

    let close = move || form_target.set(None);

    let error_message = move || {
        value_text
            .with(|text| validation_message(kind.get(), price_kind.get(), text, bases, currency))
    };

    let submit_disabled = move || {
        value_text.with(|text| text.trim().parse::<Decimal>().is_err()) || error_message().is_some()
    };

    let on_submit = move |event: web_sys::SubmitEvent| {
        event.prevent_default();

        let draft = build_draft(
            kind.get_untracked(),
            price_kind.get_untracked(),
            &value_text.get_untracked(),
            &duration_text.get_untracked(),
            &description_text.get_untracked(),
            symbol,
        );

        let Some(draft) = draft else {
            return;
        };

        let name = draft.name.clone();

        if let Some(id) = edit_id {
            store.update(|state| state.update_discount(id, draft));
            announce(live_message, format!("Updated {name}."));
        } else {
            store.update(|state| {
                state.add_discount(draft);
            });
            announce(live_message, format!("Added {name}."));
        }

        form_target.set(None);
    };

    view! {
        <div
            class="discount-form-overlay"
            on:keydown=move |event: web_sys::KeyboardEvent| {
                if event.key() == "Escape" {
                    close();
                }
            }
        >
            <form class="discount-form panel-card" on:submit=on_submit>
                <div class="panel-header">
                    <h3 class="panel-title">{heading}</h3>
                    <button
                        type="button"
                        aria-label="Close discount form"
                        class="icon-button icon-button-secondary icon-button-compact"
                        on:click=move |_| close()
                    >
                        <svg
                            xmlns="http://www.w3.org/2000/svg"
                            width="24"
                            height="24"
                            viewBox="0 0 24 24"
                            fill="none"
                            stroke="currentColor"
                            stroke-width="2"
                            stroke-linecap="round"
                            stroke-linejoin="round"
                            class="lucide lucide-x-icon lucide-x"
                        >
                            <path d="M18 6 6 18"></path>
                            <path d="m6 6 12 12"></path>
                        </svg>
                    </button>
                </div>

                <fieldset class="discount-form-field">
                    <legend>"For which price do you calculate the discount?"</legend>
                    <div class="discount-form-choice">
                        <button
                            type="button"
                            class=move || {
                                if price_kind.get() == PriceKind::OneTime {
                                    "choice-button choice-button-active"
                                } else {
                                    "choice-button"
                                }
                            }
                            aria-pressed=move || {
                                if price_kind.get() == PriceKind::OneTime { "true" } else { "false" }
                            }
                            on:click=move |_| price_kind.set(PriceKind::OneTime)
                        >
                            "One time price"
                        </button>
                        <button
                            type="button"
                            class=move || {
                                if price_kind.get() == PriceKind::Monthly {
                                    "choice-button choice-button-active"
                                } else {
                                    "choice-button"
                                }
                            }
                            aria-pressed=move || {
                                if price_kind.get() == PriceKind::Monthly { "true" } else { "false" }
                            }
                            on:click=move |_| price_kind.set(PriceKind::Monthly)
                        >
                            "Monthly price"
                        </button>
                    </div>
                </fieldset>

                <div class="discount-form-field">
                    <label for="discount-value">"Discount"</label>
                    <div class="discount-form-value">
                        <select
                            class="discount-form-kind"
                            aria-label="Discount type"
                            on:change=move |event| {
                                let selection = event_target_value(&event);

                                kind.set(if selection == "fixed" {
                                    DiscountKind::Fixed
                                } else {
                                    DiscountKind::Percentage
                                });
                            }
                        >
                            <option
                                value="percentage"
                                selected=matches!(initial_kind, DiscountKind::Percentage)
                            >
                                "%"
                            </option>
                            <option value="fixed" selected=matches!(initial_kind, DiscountKind::Fixed)>
                                {symbol}
                            </option>
                        </select>
                        <input
                            id="discount-value"
                            class="discount-form-input"
                            type="number"
                            min="0"
                            step="0.01"
                            max=move || value_max(kind.get(), price_kind.get(), bases)
                            prop:value=move || value_text.get()
                            on:input=move |event| value_text.set(event_target_value(&event))
                        />
                    </div>
                    {move || {
                        error_message()
                            .map(|message| {
                                view! {
                                    <p class="discount-form-error" role="alert">
                                        {message}
                                    </p>
                                }
                            })
                    }}
                </div>

                {move || {
                    (price_kind.get() == PriceKind::Monthly)
                        .then(|| {
                            view! {
                                <div class="discount-form-field">
                                    <label for="discount-duration">"Duration"</label>
                                    <div class="discount-form-duration">
                                        <input
                                            id="discount-duration"
                                            class="discount-form-input"
                                            type="number"
                                            min="1"
                                            max="12"
                                            prop:value=move || duration_text.get()
                                            on:input=move |event| {
                                                duration_text.set(event_target_value(&event));
                                            }
                                        />
                                        <span>"months"</span>
                                    </div>
                                </div>
                            }
                        })
                }}

                <div class="discount-form-field">
                    <label for="discount-new-price">"New price"</label>
                    <input
                        id="discount-new-price"
                        class="discount-form-input"
                        type="text"
                        readonly
                        prop:value=move || {
                            format_price(
                                preview_minor(kind.get(), price_kind.get(), &value_text.get(), bases),
                                currency,
                            )
                        }
                    />
                </div>

                <div class="discount-form-field">
                    <label for="discount-description">"Description"</label>
                    <textarea
                        id="discount-description"
                        class="discount-form-input"
                        rows="3"
                        prop:value=move || description_text.get()
                        on:input=move |event| description_text.set(event_target_value(&event))
                    ></textarea>
                </div>

                <div class="discount-form-actions">
                    <button type="button" class="button button-secondary" on:click=move |_| close()>
                        "Cancel"
                    </button>
                    <button type="submit" class="button button-primary" disabled=submit_disabled>
                        {submit_label}
                    </button>
                </div>
            </form>
        </div>
    }
}
