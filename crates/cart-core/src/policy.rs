//! # Checkout Policy
//!
//! Deployment-specific checkout choices: how cart items are priced, the
//! currency used for inline prices, and where orders may ship.
//! Loaded from `config/checkout.toml` and overridable from the environment.

use crate::error::{CheckoutError, CheckoutResult};
use crate::line_item::Currency;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How cart items carry their price
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    /// Items name a provider price id (`priceId: "price_..."`)
    #[default]
    Reference,
    /// Items carry `unit_amount`, `name` and `description`
    Inline,
}

impl FromStr for PricingMode {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reference" => Ok(PricingMode::Reference),
            "inline" => Ok(PricingMode::Inline),
            other => Err(CheckoutError::Configuration(format!(
                "Unknown pricing mode: {} (expected reference or inline)",
                other
            ))),
        }
    }
}

/// Checkout policy for one deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutPolicy {
    #[serde(default)]
    pub pricing: PricingMode,

    /// Currency for inline prices
    #[serde(default)]
    pub currency: Currency,

    /// ISO 3166-1 alpha-2 shipping countries; empty disables address collection
    #[serde(default = "default_allowed_countries")]
    pub allowed_countries: Vec<String>,
}

fn default_allowed_countries() -> Vec<String> {
    vec!["GB".to_string(), "IE".to_string()]
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            pricing: PricingMode::default(),
            currency: Currency::default(),
            allowed_countries: default_allowed_countries(),
        }
    }
}

impl CheckoutPolicy {
    /// Load policy from a TOML string
    pub fn from_toml(toml_str: &str) -> CheckoutResult<Self> {
        let policy: CheckoutPolicy = toml::from_str(toml_str)
            .map_err(|e| CheckoutError::Configuration(format!("Invalid checkout policy: {}", e)))?;
        policy.validated()
    }

    /// Builder: set pricing mode
    pub fn with_pricing(mut self, pricing: PricingMode) -> Self {
        self.pricing = pricing;
        self
    }

    /// Builder: set currency
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Builder: set allowed shipping countries
    pub fn with_allowed_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_countries = countries.into_iter().map(Into::into).collect();
        self
    }

    /// Apply `PRICING_MODE`, `CURRENCY` and `ALLOWED_COUNTRIES` overrides.
    pub fn with_overrides<F>(mut self, lookup: F) -> CheckoutResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("PRICING_MODE").filter(|v| !v.trim().is_empty()) {
            self.pricing = mode.parse()?;
        }
        if let Some(currency) = lookup("CURRENCY").filter(|v| !v.trim().is_empty()) {
            self.currency = currency.parse()?;
        }
        if let Some(countries) = lookup("ALLOWED_COUNTRIES") {
            self.allowed_countries = countries.split(',').map(str::to_string).collect();
        }
        self.validated()
    }

    fn validated(mut self) -> CheckoutResult<Self> {
        let mut countries = Vec::with_capacity(self.allowed_countries.len());
        for raw in &self.allowed_countries {
            let code = raw.trim().to_uppercase();
            if code.is_empty() {
                continue;
            }
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(CheckoutError::Configuration(format!(
                    "Invalid shipping country code: {}",
                    raw
                )));
            }
            countries.push(code);
        }
        self.allowed_countries = countries;
        Ok(self)
    }
}
