//! Request DTOs for the pricing commands.
//!
//! Amounts accept JSON numbers or strings.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::calculators::Exporter;

/// Request for a full landed cost quotation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteRequest {
    /// Model name as listed in the shipping table
    pub model: String,
    /// Index into the model's preset variants
    #[serde(default)]
    pub variant: Option<usize>,
    #[serde(default)]
    pub winning_bid: Option<Decimal>,
    #[serde(default)]
    pub area_cost: Option<Decimal>,
    /// LKR, replaces the scheduled auction fee
    #[serde(default)]
    pub auction_fee: Option<Decimal>,
    /// JPY CIF discount, ignored for ICM
    #[serde(default)]
    pub tt_amount: Option<Decimal>,
    #[serde(default)]
    pub yen_rate: Option<Decimal>,
    #[serde(default)]
    pub clearing_charges: Option<Decimal>,
    /// Unknown keys fall back to the default category
    #[serde(default)]
    pub tax_category: Option<String>,
    #[serde(default)]
    pub exporter: Option<Exporter>,
    #[serde(default)]
    pub capacity: Option<Decimal>,
    /// Declared customs value, VAT inclusive
    #[serde(default)]
    pub tax_base: Option<Decimal>,
}
