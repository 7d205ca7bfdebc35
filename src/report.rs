//! Printable quotation rendering.
//!
//! Renders a [`LandedCost`] into a standalone HTML cost breakdown suitable
//! for printing or saving as PDF from a browser.

use std::str::FromStr;

use askama::Template;
use chrono::NaiveDateTime;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::Config;
use crate::error::Result;
use crate::pricing::{LandedCost, PricingError};

const APPROXIMATE_DELIVERY: &str = "8 - 10 Weeks";

/// Vehicle details printed on the quotation but not used in pricing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleDetails {
    pub year: String,
    pub model_grade: String,
    pub auction_grade: String,
    pub mileage: String,
}

impl Default for VehicleDetails {
    fn default() -> Self {
        Self {
            year: "2025".to_string(),
            model_grade: "G".to_string(),
            auction_grade: "5".to_string(),
            mileage: "10000".to_string(),
        }
    }
}

impl FromStr for VehicleDetails {
    type Err = PricingError;

    /// Parse `"Year, Model Grade, Auction Grade, Mileage"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [year, model_grade, auction_grade, mileage] => Ok(Self {
                year: year.to_string(),
                model_grade: model_grade.to_string(),
                auction_grade: auction_grade.to_string(),
                mileage: mileage.to_string(),
            }),
            _ => Err(PricingError::InvalidVehicleDetails(format!(
                "expected 4 comma separated values (Year, Model Grade, Auction Grade, Mileage), got {}",
                parts.len()
            ))),
        }
    }
}

/// Group the integer part of an amount with thousands separators.
///
/// Fractions are truncated toward zero.
pub fn format_amount(amount: Decimal) -> String {
    let whole = amount.trunc().to_i128().unwrap_or_default();
    let digits = whole.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_yen(amount: Decimal) -> String {
    format!("¥{}", format_amount(amount))
}

pub fn format_lkr(amount: Decimal) -> String {
    format!("LKR {}", format_amount(amount))
}

fn model_slug(model: &str) -> String {
    model.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Line of the cost table
struct CostRow {
    description: &'static str,
    amount: String,
    yen: bool,
    highlight: bool,
}

impl CostRow {
    fn yen(description: &'static str, amount: Decimal) -> Self {
        Self {
            description,
            amount: format_yen(amount),
            yen: true,
            highlight: false,
        }
    }

    fn lkr(description: &'static str, amount: Decimal) -> Self {
        Self {
            description,
            amount: format_lkr(amount),
            yen: false,
            highlight: false,
        }
    }
}

#[derive(Template)]
#[template(path = "quotation/breakdown.html")]
struct QuotationTemplate<'a> {
    company_name: &'a str,
    company_address: &'a str,
    company_phone: &'a str,
    generated_date: String,
    generated_time: String,
    reference: &'a str,
    model: &'a str,
    details: &'a VehicleDetails,
    capacity: String,
    approximate_delivery: &'static str,
    yen_rate: String,
    yen_rows: Vec<CostRow>,
    lkr_rows: Vec<CostRow>,
    total_tax: CostRow,
    total_payable: String,
    validity_days: u32,
    copyright_year: String,
}

/// Rendered quotation document
#[derive(Debug, Clone)]
pub struct Quotation {
    pub reference: String,
    pub file_name: String,
    pub html: String,
}

/// Render the quotation for a landed cost calculation.
pub fn render_quotation(
    cost: &LandedCost,
    details: &VehicleDetails,
    config: &Config,
    generated_at: NaiveDateTime,
) -> Result<Quotation> {
    let slug = model_slug(&cost.model);
    let date_stamp = generated_at.format("%Y%m%d").to_string();
    let short_id = Uuid::new_v4().simple().to_string();
    let reference = format!("{}_{}_{}", slug, date_stamp, &short_id[..8]);

    let template = QuotationTemplate {
        company_name: &config.company_name,
        company_address: &config.company_address,
        company_phone: &config.company_phone,
        generated_date: generated_at.format("%B %-d, %Y").to_string(),
        generated_time: generated_at.format("%I:%M %p").to_string(),
        reference: &reference,
        model: &cost.model,
        details,
        capacity: format!(
            "{} {}",
            cost.tax.capacity.normalize(),
            cost.tax.tax_category.capacity_unit()
        ),
        approximate_delivery: APPROXIMATE_DELIVERY,
        yen_rate: cost.yen_rate.normalize().to_string(),
        yen_rows: vec![
            CostRow::yen("Winning Bid", cost.winning_bid),
            CostRow::yen(
                "Handling and Shipping Charges",
                cost.handling + cost.shipping.charge,
            ),
            CostRow::yen("Area Cost", cost.area_cost),
            CostRow::yen("CIF Discount", -cost.tt_deduction),
            CostRow::yen("CIF Value (JPY)", cost.cif_yen),
        ],
        lkr_rows: vec![
            CostRow::lkr("Auction Deposit and Insurance", cost.auction_fee + cost.tt_lkr),
            CostRow::lkr("CIF (LKR) - LC Amount", cost.cif_lkr),
            CostRow::lkr("Bank Commission", cost.bank_commission),
            CostRow::lkr("Clearing Charges", cost.clearing_charges),
        ],
        total_tax: CostRow {
            highlight: true,
            ..CostRow::lkr("TOTAL CUSTOMS TAX", cost.tax.total_tax)
        },
        total_payable: format_lkr(cost.total_payable),
        validity_days: config.quote_validity_days,
        copyright_year: generated_at.format("%Y").to_string(),
    };

    let html = template.render()?;
    tracing::info!(reference = %reference, model = %cost.model, "quotation rendered");

    Ok(Quotation {
        file_name: format!("DNM_{}_Quotation_{}.html", slug, date_stamp),
        reference,
        html,
    })
}
