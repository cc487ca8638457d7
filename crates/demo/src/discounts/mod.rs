use leptos::prelude::*;
use rusty_money::iso::Currency;

use tally::{
    discounts::{Discount, DiscountKind},
    store::DiscountStore,
};

use crate::{announce, products::currency_symbol};

mod form;

use form::{DiscountForm, FormTarget};

/// Detail line shown under a discount name.
fn discount_details(discount: &Discount, symbol: &str) -> String {
    let mut details = match discount.kind() {
        DiscountKind::Percentage => format!(
            "- {} % {}",
            discount.value().normalize(),
            discount.price_kind()
        ),
        DiscountKind::Fixed => format!(
            "- {symbol} {:.2} {}",
            discount.value(),
            discount.price_kind()
        ),
    };

    if discount.is_duration_limited()
        && let Some(months) = discount.duration_months()
    {
        details.push_str(&format!(" first {months} months"));
    }

    details
}

#[component]
fn DiscountRow(
    discount: Discount,
    currency: &'static Currency,
    store: RwSignal<DiscountStore<'static>>,
    live_message: RwSignal<(u64, String)>,
    form_target: RwSignal<Option<FormTarget>>,
) -> impl IntoView {
    let id = discount.id();
    let name = discount.name().to_string();
    let enabled = discount.is_enabled();
    let details = discount_details(&discount, currency_symbol(currency));

    let edit_label = format!("Edit {name}");
    let remove_label = format!("Remove {name}");
    let toggle_label = if enabled {
        format!("Disable {name}")
    } else {
        format!("Enable {name}")
    };

    let name_for_remove = name.clone();
    let name_for_toggle = name.clone();
    let edit_discount = discount;

    view! {
        <li class="discount-row">
            <div>
                <p class="discount-name">{name}</p>
                <p class="discount-details">{details}</p>
            </div>
            <div class="discount-actions">
                <button
                    type="button"
                    aria-label=edit_label
                    class="icon-button icon-button-secondary icon-button-compact"
                    on:click=move |_| {
                        form_target.set(Some(FormTarget::Edit(edit_discount.clone())));
                    }
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
                        class="lucide lucide-pencil-icon lucide-pencil"
                    >
                        <path d="M21.174 6.812a1 1 0 0 0-3.986-3.987L3.842 16.174a2 2 0 0 0-.5.83l-1.321 4.352a.5.5 0 0 0 .623.622l4.353-1.32a2 2 0 0 0 .83-.497z"></path>
                        <path d="m15 5 4 4"></path>
                    </svg>
                </button>
                <button
                    type="button"
                    aria-label=remove_label
                    class="icon-button icon-button-secondary icon-button-compact"
                    on:click=move |_| {
                        store.update(|state| state.remove_discount(id));
                        announce(live_message, format!("Removed {name_for_remove}."));
                    }
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
                        class="lucide lucide-trash-2-icon lucide-trash-2"
                    >
                        <path d="M10 11v6"></path>
                        <path d="M14 11v6"></path>
                        <path d="M19 6v14a2 2 0 0 1-2 2H7a2 2 0 0 1-2-2V6"></path>
                        <path d="M3 6h18"></path>
                        <path d="M8 6V4a2 2 0 0 1 2-2h4a2 2 0 0 1 2 2v2"></path>
                    </svg>
                </button>
                <button
                    type="button"
                    role="switch"
                    aria-checked=if enabled { "true" } else { "false" }
                    aria-label=toggle_label
                    class=if enabled {
                        "discount-toggle discount-toggle-on"
                    } else {
                        "discount-toggle"
                    }
                    on:click=move |_| {
                        store.update(|state| state.toggle_discount(id));

                        let message = if enabled {
                            format!("Disabled {name_for_toggle}.")
                        } else {
                            format!("Enabled {name_for_toggle}.")
                        };

                        announce(live_message, message);
                    }
                >
                    <span class="discount-toggle-thumb" aria-hidden="true"></span>
                </button>
            </div>
        </li>
    }
}

fn render_discount_rows(
    store: RwSignal<DiscountStore<'static>>,
    live_message: RwSignal<(u64, String)>,
    form_target: RwSignal<Option<FormTarget>>,
) -> AnyView {
    let (discounts, currency) =
        store.with(|state| (state.discounts().to_vec(), state.currency()));

    if discounts.is_empty() {
        return view! {
            <div class="discounts-empty">
                <p>"No discounts added yet."</p>
                <p>"Click \"Add manual discount\" to get started."</p>
            </div>
        }
        .into_any();
    }

    view! {
        <ul class="discounts-list">
            {discounts
                .into_iter()
                .map(|discount| {
                    view! {
                        <DiscountRow
                            discount=discount
                            currency=currency
                            store=store
                            live_message=live_message
                            form_target=form_target
                        />
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}

/// Discounts panel component.
#[component]
pub fn DiscountsPanel(
    /// Shared checkout state.
    store: RwSignal<DiscountStore<'static>>,
    /// Live-region announcement signal.
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    let form_target = RwSignal::new(None::<FormTarget>);

    view! {
        <section class="discounts-panel">
            <div class="panel-header">
                <h2 class="panel-title panel-title-offset">"Discounts"</h2>
                <button
                    type="button"
                    class="panel-action"
                    on:click=move |_| form_target.set(Some(FormTarget::Create))
                >
                    "Add manual discount"
                </button>
            </div>
            <div class="panel-card">
                {move || render_discount_rows(store, live_message, form_target)}
            </div>
            {move || {
                form_target
                    .get()
                    .map(|target| {
                        view! {
                            <DiscountForm
                                target=target
                                store=store
                                live_message=live_message
                                form_target=form_target
                            />
                        }
                    })
            }}
        </section>
    }
}
