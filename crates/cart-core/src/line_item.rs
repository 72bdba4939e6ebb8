//! # Line Items
//!
//! Provider line items produced by the cart normalizer.
//! A line item either references a provider-side price or carries its
//! price inline.

use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
    EUR,
    #[default]
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    MXN,
}

impl Currency {
    /// Returns the ISO 4217 currency code as the provider expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::JPY => "jpy",
            Currency::CAD => "cad",
            Currency::AUD => "aud",
            Currency::CHF => "chf",
            Currency::MXN => "mxn",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl FromStr for Currency {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "usd" => Ok(Currency::USD),
            "eur" => Ok(Currency::EUR),
            "gbp" => Ok(Currency::GBP),
            "jpy" => Ok(Currency::JPY),
            "cad" => Ok(Currency::CAD),
            "aud" => Ok(Currency::AUD),
            "chf" => Ok(Currency::CHF),
            "mxn" => Ok(Currency::MXN),
            other => Err(CheckoutError::Configuration(format!(
                "Unsupported currency: {}",
                other
            ))),
        }
    }
}

/// Product details shown on the hosted checkout page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductData {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Inline price for an item without a provider-side price object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceData {
    pub currency: Currency,
    /// Amount in minor currency units (pence, cents)
    pub unit_amount: i64,
    pub product_data: ProductData,
}

/// One priced entry submitted to the provider.
///
/// Serializes to `{price, quantity}` or `{price_data, quantity}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineItem {
    /// Priced by a provider price identifier (`price_...`)
    Reference { price: String, quantity: u32 },
    /// Priced inline
    Inline { price_data: PriceData, quantity: u32 },
}

impl LineItem {
    /// Create a reference-priced line item
    pub fn reference(price: impl Into<String>, quantity: u32) -> Self {
        LineItem::Reference {
            price: price.into(),
            quantity,
        }
    }

    /// Create an inline-priced line item
    pub fn inline(
        currency: Currency,
        unit_amount: i64,
        name: impl Into<String>,
        description: impl Into<String>,
        quantity: u32,
    ) -> Self {
        LineItem::Inline {
            price_data: PriceData {
                currency,
                unit_amount,
                product_data: ProductData {
                    name: name.into(),
                    description: description.into(),
                },
            },
            quantity,
        }
    }

    pub fn quantity(&self) -> u32 {
        match self {
            LineItem::Reference { quantity, .. } | LineItem::Inline { quantity, .. } => *quantity,
        }
    }
}
