//! Leptos Tally Demo Application

use leptos::prelude::*;

use tally::{cart::CartItem, store::DiscountStore};

mod discounts;
mod overview;
mod products;

const CATALOG_FIXTURE_YAML: &str = include_str!("../../../fixtures/products/checkout.yml");

/// Parsed application fixtures/state used by the UI.
#[derive(Debug)]
struct AppData {
    /// Checkout store seeded with the catalog product.
    store: DiscountStore<'static>,
}

impl AppData {
    fn load() -> Result<Self, String> {
        let catalog = products::load_catalog(CATALOG_FIXTURE_YAML)?;
        let store =
            DiscountStore::with_items(vec![CartItem::new(catalog.product, 1)], catalog.currency)
                .map_err(|error| error.to_string())?;

        Ok(Self { store })
    }
}

/// Main demo app shell.
#[component]
fn App() -> impl IntoView {
    match AppData::load() {
        Ok(app_data) => {
            let store = RwSignal::new(app_data.store);
            let live_message = RwSignal::new((0_u64, String::new()));

            view! {
                <main class="min-h-screen bg-slate-50 px-4 py-6 text-slate-900">
                    <p class="sr-only" role="status" aria-live="polite" aria-atomic="true">
                        {move || live_message.get().1}
                    </p>
                    <div class="mx-auto mb-6 max-w-5xl">
                        <h1 class="text-2xl font-semibold tracking-tight">"Tally Demo"</h1>
                    </div>
                    <div class="mx-auto grid max-w-5xl grid-cols-1 gap-6 md:grid-cols-2">
                        <discounts::DiscountsPanel store=store live_message=live_message />
                        <overview::OverviewPanel store=store />
                    </div>
                </main>
            }
            .into_any()
        }
        Err(error_message) => view! {
            <main class="min-h-screen bg-slate-50 px-4 py-6 text-slate-900">
                <div class="mx-auto mb-6 max-w-5xl">
                    <h1 class="text-2xl font-semibold tracking-tight">"Tally Demo"</h1>
                </div>
                <div class="mx-auto max-w-3xl rounded-lg border border-red-200 bg-red-50 p-4">
                    <p class="text-sm text-red-700">{error_message}</p>
                </div>
            </main>
        }
        .into_any(),
    }
}

/// Main demo entry point
fn main() {
    console_error_panic_hook::set_once();

    leptos::mount::mount_to_body(App);
}

fn announce(live_message: RwSignal<(u64, String)>, message: String) {
    live_message.update(|(id, text)| {
        *id = id.saturating_add(1);
        *text = message;
    });
}
