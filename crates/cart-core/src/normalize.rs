//! # Cart Normalizer
//!
//! Turns the untyped `items` array posted by the storefront into provider
//! line items.
//!
//! Rules:
//! - `items` must be a non-empty array.
//! - Reference pricing needs `priceId` starting with `price_`.
//! - Inline pricing needs an integral `unit_amount` of at least 50 minor units;
//!   `name` and `description` are cut to 100 and 200 characters.
//! - `quantity` defaults to 1 and is clamped into `1..=99`, never rejected.
//!
//! The first bad item fails the whole cart.

use crate::error::{CheckoutError, CheckoutResult};
use crate::line_item::LineItem;
use crate::policy::{CheckoutPolicy, PricingMode};
use serde_json::Value;

pub const PRICE_ID_PREFIX: &str = "price_";
pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 99;
pub const MIN_UNIT_AMOUNT: i64 = 50;
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 200;

// f64 values at or above this are no longer exact integers
const MAX_EXACT_AMOUNT: f64 = 9_007_199_254_740_992.0;

/// Normalize a cart into provider line items.
///
/// Output order and length match the input.
pub fn normalize(items: &Value, policy: &CheckoutPolicy) -> CheckoutResult<Vec<LineItem>> {
    let items = match items.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => return Err(CheckoutError::validation("Missing items[]")),
    };

    items
        .iter()
        .map(|item| normalize_item(item, policy))
        .collect()
}

/// Normalize a single cart item under the given policy
pub fn normalize_item(item: &Value, policy: &CheckoutPolicy) -> CheckoutResult<LineItem> {
    let quantity = clamp_quantity(item.get("quantity"));

    match policy.pricing {
        PricingMode::Reference => {
            let price = match item.get("priceId") {
                Some(Value::String(id)) if id.starts_with(PRICE_ID_PREFIX) => id.clone(),
                _ => return Err(CheckoutError::validation("Invalid priceId")),
            };
            Ok(LineItem::reference(price, quantity))
        }
        PricingMode::Inline => {
            let unit_amount = coerce_unit_amount(item.get("unit_amount"))
                .ok_or_else(|| CheckoutError::validation("Invalid unit_amount"))?;
            let name = coerce_text(item.get("name"), MAX_NAME_CHARS);
            let description = coerce_text(item.get("description"), MAX_DESCRIPTION_CHARS);
            Ok(LineItem::inline(
                policy.currency,
                unit_amount,
                name,
                description,
                quantity,
            ))
        }
    }
}

/// Coerce a requested quantity into `1..=99`.
///
/// Absent or falsy values (null, 0, false, "", NaN, junk) mean 1.
/// Fractions are truncated after clamping.
pub fn clamp_quantity(raw: Option<&Value>) -> u32 {
    let requested = raw
        .and_then(coerce_number)
        .filter(|q| *q != 0.0 && !q.is_nan())
        .unwrap_or(1.0);

    requested
        .clamp(f64::from(MIN_QUANTITY), f64::from(MAX_QUANTITY))
        .trunc() as u32
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                s.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn coerce_unit_amount(raw: Option<&Value>) -> Option<i64> {
    let amount = match raw? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(exact_integer)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(exact_integer))
        }
        _ => None,
    }?;

    (amount >= MIN_UNIT_AMOUNT).then_some(amount)
}

fn exact_integer(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_AMOUNT)
        .then_some(value as i64)
}

fn coerce_text(raw: Option<&Value>, max_chars: usize) -> String {
    let text = match raw {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    };
    truncate_chars(text, max_chars)
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text,
    }
}
