//! Discounts
//!
//! Discount records, their identifiers, and the draft payload accepted by the
//! store commands.

use std::fmt;

use rust_decimal::Decimal;

/// Number of months in the billing horizon that bounds duration-limited
/// discounts.
pub const HORIZON_MONTHS: u32 = 12;

/// Identifier assigned by the store when a discount is created.
///
/// Ids increase monotonically within one store and are never reused, so they
/// stay valid across edits and removals of other discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscountId(u64);

impl DiscountId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self(epoch_millis_now())
    }

    /// Build a timestamp from raw epoch milliseconds.
    #[must_use]
    pub const fn from_epoch_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub const fn epoch_millis(self) -> u64 {
        self.0
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn epoch_millis_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|elapsed| u64::try_from(elapsed.as_millis()).ok())
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn epoch_millis_now() -> u64 {
    use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

    Decimal::from_f64(js_sys::Date::now())
        .and_then(|millis| millis.trunc().to_u64())
        .unwrap_or(0)
}

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    /// A percentage (0-100) of the subtotal it applies against.
    Percentage,

    /// A flat amount in major currency units.
    Fixed,
}

/// Which of a product's two prices a discount applies against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceKind {
    /// The single, non-recurring charge.
    OneTime,

    /// The recurring per-month charge.
    Monthly,
}

impl fmt::Display for PriceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceKind::OneTime => write!(f, "one time"),
            PriceKind::Monthly => write!(f, "monthly"),
        }
    }
}

/// The mutable field set accepted by the store's create and update commands.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountDraft {
    /// Display label shown in the panel and the overview.
    pub name: String,

    /// Optional free text.
    pub description: Option<String>,

    /// How `value` is interpreted.
    pub kind: DiscountKind,

    /// Percentage (0-100) or major-unit amount, depending on `kind`.
    pub value: Decimal,

    /// Which base price the discount applies against.
    pub price_kind: PriceKind,

    /// Number of initial months the discount covers; only meaningful for
    /// monthly discounts.
    pub duration_months: Option<u32>,
}

/// A discount rule held by the store.
///
/// Identity (`id`, `created_at`) and the `enabled` flag are managed by the
/// store; the remaining fields are replaced wholesale by updates.
#[derive(Debug, Clone, PartialEq)]
pub struct Discount {
    id: DiscountId,
    name: String,
    description: Option<String>,
    kind: DiscountKind,
    value: Decimal,
    price_kind: PriceKind,
    duration_months: Option<u32>,
    enabled: bool,
    created_at: Timestamp,
}

impl Discount {
    pub(crate) fn from_draft(id: DiscountId, created_at: Timestamp, draft: DiscountDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            kind: draft.kind,
            value: draft.value,
            price_kind: draft.price_kind,
            duration_months: draft.duration_months,
            enabled: true,
            created_at,
        }
    }

    pub(crate) fn apply_draft(&mut self, draft: DiscountDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.kind = draft.kind;
        self.value = draft.value;
        self.price_kind = draft.price_kind;
        self.duration_months = draft.duration_months;
    }

    pub(crate) fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> DiscountId {
        self.id
    }

    /// Display label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional free text.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// How `value` is interpreted.
    #[must_use]
    pub fn kind(&self) -> DiscountKind {
        self.kind
    }

    /// Percentage (0-100) or major-unit amount, depending on `kind`.
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Which base price the discount applies against.
    #[must_use]
    pub fn price_kind(&self) -> PriceKind {
        self.price_kind
    }

    /// Number of initial months the discount covers.
    #[must_use]
    pub fn duration_months(&self) -> Option<u32> {
        self.duration_months
    }

    /// Whether the discount participates in calculations.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// When the discount was created.
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Whether the discount covers only an initial window of months.
    ///
    /// Only monthly discounts with a positive duration have a window.
    #[must_use]
    pub fn is_duration_limited(&self) -> bool {
        self.price_kind == PriceKind::Monthly
            && self.duration_months.is_some_and(|months| months > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percentage_draft(value: i64, price_kind: PriceKind) -> DiscountDraft {
        DiscountDraft {
            name: format!("{value}% discount"),
            description: None,
            kind: DiscountKind::Percentage,
            value: Decimal::from(value),
            price_kind,
            duration_months: None,
        }
    }

    #[test]
    fn from_draft_enables_and_keeps_identity() {
        let id = DiscountId::new(7);
        let created_at = Timestamp::from_epoch_millis(1_700_000_000_000);
        let discount =
            Discount::from_draft(id, created_at, percentage_draft(10, PriceKind::Monthly));

        assert_eq!(discount.id(), id);
        assert_eq!(discount.created_at(), created_at);
        assert!(discount.is_enabled());
        assert_eq!(discount.name(), "10% discount");
    }

    #[test]
    fn apply_draft_replaces_fields_but_not_identity() {
        let id = DiscountId::new(1);
        let created_at = Timestamp::from_epoch_millis(42);
        let mut discount =
            Discount::from_draft(id, created_at, percentage_draft(10, PriceKind::Monthly));

        discount.toggle();
        discount.apply_draft(DiscountDraft {
            name: "25% discount".to_string(),
            description: Some("spring promo".to_string()),
            kind: DiscountKind::Percentage,
            value: Decimal::from(25),
            price_kind: PriceKind::OneTime,
            duration_months: Some(3),
        });

        assert_eq!(discount.id(), id);
        assert_eq!(discount.created_at(), created_at);
        assert!(!discount.is_enabled());
        assert_eq!(discount.name(), "25% discount");
        assert_eq!(discount.description(), Some("spring promo"));
        assert_eq!(discount.value(), Decimal::from(25));
        assert_eq!(discount.price_kind(), PriceKind::OneTime);
        assert_eq!(discount.duration_months(), Some(3));
    }

    #[test]
    fn toggle_flips_enabled_back_and_forth() {
        let mut discount = Discount::from_draft(
            DiscountId::new(0),
            Timestamp::from_epoch_millis(0),
            percentage_draft(10, PriceKind::Monthly),
        );

        discount.toggle();
        assert!(!discount.is_enabled());

        discount.toggle();
        assert!(discount.is_enabled());
    }

    #[test]
    fn duration_limited_requires_monthly_and_positive_months() {
        let base = Timestamp::from_epoch_millis(0);

        let mut windowed_draft = percentage_draft(10, PriceKind::Monthly);
        windowed_draft.duration_months = Some(3);
        let windowed = Discount::from_draft(DiscountId::new(0), base, windowed_draft);

        let mut onetime_draft = percentage_draft(10, PriceKind::OneTime);
        onetime_draft.duration_months = Some(3);
        let onetime = Discount::from_draft(DiscountId::new(1), base, onetime_draft);

        let mut zero_draft = percentage_draft(10, PriceKind::Monthly);
        zero_draft.duration_months = Some(0);
        let zero_window = Discount::from_draft(DiscountId::new(2), base, zero_draft);

        let open_ended = Discount::from_draft(
            DiscountId::new(3),
            base,
            percentage_draft(10, PriceKind::Monthly),
        );

        assert!(windowed.is_duration_limited());
        assert!(!onetime.is_duration_limited());
        assert!(!zero_window.is_duration_limited());
        assert!(!open_ended.is_duration_limited());
    }

    #[test]
    fn price_kind_displays_human_labels() {
        assert_eq!(PriceKind::OneTime.to_string(), "one time");
        assert_eq!(PriceKind::Monthly.to_string(), "monthly");
    }

    #[test]
    fn timestamps_order_by_epoch_millis() {
        assert!(Timestamp::from_epoch_millis(1) < Timestamp::from_epoch_millis(2));
        assert_eq!(Timestamp::from_epoch_millis(5).epoch_millis(), 5);
    }
}
