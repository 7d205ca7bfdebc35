//! Landed cost aggregation.
//!
//! Combines shipping, fee schedules and customs tax into the full amount
//! payable for one vehicle. Inputs arrive already resolved; preset filling
//! from a [`QuoteRequest`] happens in [`resolve_quote_input`].

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::Config;

use super::calculators::{
    auction_fee, auction_fee_bracket, checked_sum, ensure_non_negative, handling_charge,
    handling_fee_bracket, max_discount_voucher, round_money, Exporter,
};
use super::models::{
    vehicle_defaults, VehicleVariant, DEFAULT_CAPACITY, DEFAULT_TAX_CATEGORY, DEFAULT_WINNING_BID,
};
use super::requests::QuoteRequest;
use super::shipping::{shipping_info, ShippingInfo, ShippingSelector};
use super::tax::{tax_basis, vehicle_tax, TaxBreakdown, TaxCategory};

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("{field} must be a positive number")]
    InvalidAmount { field: &'static str, value: Decimal },

    #[error("Invalid model code: {0}. Please use codes 1-14.")]
    InvalidShippingCode(i64),

    #[error("Multiple models found for \"{input}\". Please be more specific.")]
    AmbiguousModel { input: String, codes: Vec<u8> },

    #[error("Input must be a string (model name) or number (model code 1-14)")]
    InvalidShippingSelector,

    #[error("Unknown tax category: {0}")]
    UnknownTaxCategory(String),

    #[error("Invalid exporter: {0}. Use 1 (AUTOCOM) or 2 (ICM).")]
    InvalidExporter(String),

    #[error("Variant {index} does not exist for {model}")]
    UnknownVariant { model: String, index: usize },

    #[error("Invalid vehicle details: {0}")]
    InvalidVehicleDetails(String),

    #[error("{0} is too large to calculate")]
    Overflow(&'static str),
}

impl PricingError {
    /// Stable machine readable error code
    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::InvalidAmount { .. } => "invalid_amount",
            PricingError::InvalidShippingCode(_) => "invalid_shipping_code",
            PricingError::AmbiguousModel { .. } => "ambiguous_model",
            PricingError::InvalidShippingSelector => "invalid_shipping_selector",
            PricingError::UnknownTaxCategory(_) => "unknown_tax_category",
            PricingError::InvalidExporter(_) => "invalid_exporter",
            PricingError::UnknownVariant { .. } => "unknown_variant",
            PricingError::InvalidVehicleDetails(_) => "invalid_vehicle_details",
            PricingError::Overflow(_) => "amount_overflow",
        }
    }
}

/// Fully resolved inputs for a landed cost calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteInput {
    pub model: String,
    /// JPY
    pub winning_bid: Decimal,
    /// JPY
    pub area_cost: Decimal,
    /// LKR, replaces the scheduled auction fee when set
    pub auction_fee_override: Option<Decimal>,
    /// CIF discount in JPY; replaced by the voucher for ICM
    pub tt_amount: Decimal,
    /// LKR per JPY
    pub yen_rate: Decimal,
    /// LKR
    pub clearing_charges: Decimal,
    pub tax_category: TaxCategory,
    pub exporter: Exporter,
    pub capacity: Decimal,
    /// Declared customs value (JPY, VAT inclusive)
    pub declared_tax_base: Option<Decimal>,
}

/// Result of a landed cost calculation
#[derive(Debug, Clone)]
pub struct LandedCost {
    pub model: String,
    pub exporter: Exporter,
    pub shipping: ShippingInfo,

    // JPY side
    pub winning_bid: Decimal,
    pub handling: Decimal,
    pub area_cost: Decimal,
    pub tt_deduction: Decimal,
    pub fob: Decimal,
    pub cif_yen: Decimal,

    // LKR side
    pub yen_rate: Decimal,
    pub auction_fee: Decimal,
    pub cif_lkr: Decimal,
    pub bank_commission: Decimal,
    pub lc_amount: Decimal,
    pub tt_lkr: Decimal,
    pub clearing_charges: Decimal,
    pub tax_basis: Decimal,
    pub tax: TaxBreakdown,
    pub total_payable: Decimal,

    pub auction_fee_bracket: &'static str,
    pub handling_fee_bracket: &'static str,
}

/// Calculate the full landed cost of a vehicle.
///
/// Tax is assessed on [`tax_basis`], which may use the declared customs
/// value instead of the computed FOB; the LC amount always uses the
/// computed CIF.
pub fn calculate_landed_cost(
    input: &QuoteInput,
    config: &Config,
) -> Result<LandedCost, PricingError> {
    let winning_bid = ensure_non_negative("Winning bid", input.winning_bid)?;
    let area_cost = ensure_non_negative("Area cost", input.area_cost)?;
    let clearing_charges = ensure_non_negative("Clearing charges", input.clearing_charges)?;
    if input.yen_rate <= Decimal::ZERO {
        return Err(PricingError::InvalidAmount {
            field: "Exchange rate",
            value: input.yen_rate,
        });
    }
    let yen_rate = input.yen_rate;

    let shipping = shipping_info(&ShippingSelector::Model(input.model.clone()))?;

    let tt_deduction = match input.exporter {
        Exporter::Icm => max_discount_voucher(winning_bid).unwrap_or(Decimal::ZERO),
        Exporter::Autocom => ensure_non_negative("TT amount", input.tt_amount)?,
    };

    let handling = handling_charge(winning_bid, input.exporter)?;
    let auction_fee = match input.auction_fee_override {
        Some(fee) => ensure_non_negative("Auction fee", fee)?,
        None => auction_fee(winning_bid)?,
    };

    let overflow = || PricingError::Overflow("Landed cost");

    let fob = checked_sum([Some(winning_bid), Some(handling), Some(area_cost)])
        .and_then(|gross| gross.checked_sub(tt_deduction))
        .ok_or_else(overflow)?;
    let cif_yen = fob.checked_add(shipping.charge).ok_or_else(overflow)?;

    let cif_lkr = cif_yen.checked_mul(yen_rate).ok_or_else(overflow)?;
    let bank_commission = cif_lkr
        .checked_mul(config.bank_commission_rate)
        .ok_or_else(overflow)?;
    let lc_amount = cif_lkr
        .checked_add(bank_commission)
        .map(|lc| round_money(lc, 2))
        .ok_or_else(overflow)?;
    let tt_lkr = yen_rate
        .checked_add(config.tt_rate_spread)
        .and_then(|rate| tt_deduction.checked_mul(rate))
        .map(|tt| round_money(tt, 2))
        .ok_or_else(overflow)?;

    let basis = tax_basis(fob, shipping.charge, input.declared_tax_base, yen_rate)?;
    let tax = vehicle_tax(basis, input.tax_category, input.capacity)?;

    let total_payable = checked_sum([
        Some(auction_fee),
        Some(tt_lkr),
        Some(lc_amount),
        Some(tax.total_tax),
        Some(clearing_charges),
    ])
    .ok_or_else(overflow)?;

    debug!(
        model = %input.model,
        %fob,
        %cif_yen,
        tax_basis = %basis,
        "landed cost components"
    );
    info!(
        model = %input.model,
        exporter = %input.exporter,
        tax_category = input.tax_category.key(),
        %total_payable,
        "landed cost calculated"
    );

    Ok(LandedCost {
        model: input.model.trim().to_string(),
        exporter: input.exporter,
        shipping,
        winning_bid,
        handling,
        area_cost,
        tt_deduction,
        fob,
        cif_yen,
        yen_rate,
        auction_fee,
        cif_lkr: round_money(cif_lkr, 2),
        bank_commission: round_money(bank_commission, 2),
        lc_amount,
        tt_lkr,
        clearing_charges,
        tax_basis: round_money(basis, 2),
        tax,
        total_payable,
        auction_fee_bracket: auction_fee_bracket(winning_bid),
        handling_fee_bracket: handling_fee_bracket(winning_bid),
    })
}

/// Fill a quote request from model presets and configured defaults.
///
/// Explicit request fields win, then the selected variant (first variant when
/// none is selected), then the global defaults.
pub fn resolve_quote_input(
    request: &QuoteRequest,
    config: &Config,
) -> Result<QuoteInput, PricingError> {
    let preset = preset_variant(&request.model, request.variant)?;

    let tax_category = match (&request.tax_category, preset) {
        (Some(key), _) => TaxCategory::resolve(key),
        (None, Some(v)) => v.tax_category,
        (None, None) => DEFAULT_TAX_CATEGORY,
    };

    Ok(QuoteInput {
        model: request.model.clone(),
        winning_bid: request
            .winning_bid
            .or(preset.map(|v| v.winning_bid))
            .unwrap_or(DEFAULT_WINNING_BID),
        area_cost: request.area_cost.unwrap_or(Decimal::ZERO),
        auction_fee_override: request.auction_fee,
        tt_amount: request.tt_amount.unwrap_or(Decimal::ZERO),
        yen_rate: request.yen_rate.unwrap_or(config.yen_rate),
        clearing_charges: request.clearing_charges.unwrap_or(config.clearing_charges),
        tax_category,
        exporter: request.exporter.unwrap_or_default(),
        capacity: request
            .capacity
            .or(preset.map(|v| v.capacity))
            .unwrap_or(DEFAULT_CAPACITY),
        declared_tax_base: request.tax_base.or(preset.map(|v| v.tax_base)),
    })
}

fn preset_variant(
    model: &str,
    index: Option<usize>,
) -> Result<Option<&'static VehicleVariant>, PricingError> {
    let Some(defaults) = vehicle_defaults(model) else {
        if let Some(index) = index {
            return Err(PricingError::UnknownVariant {
                model: model.to_string(),
                index,
            });
        }
        return Ok(None);
    };

    match index {
        Some(index) => defaults
            .variants
            .get(index)
            .map(Some)
            .ok_or_else(|| PricingError::UnknownVariant {
                model: model.to_string(),
                index,
            }),
        None => Ok(defaults.variants.first()),
    }
}
