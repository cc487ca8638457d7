//! Tally
//!
//! Tally is the discount and order-summary engine behind the agent-portal checkout flow: an in-memory store of manual discount rules with a pure pricing calculation over one-time and recurring monthly prices.

pub mod cart;
pub mod discounts;
pub mod fixtures;
pub mod pricing;
pub mod products;
pub mod store;
pub mod validation;
