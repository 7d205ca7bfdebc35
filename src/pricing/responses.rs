//! Response DTOs for the pricing commands.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::Exporter;
use super::services::{LandedCost, PricingError};
use super::shipping::ShippingInfo;
use super::tax::TaxBreakdown;

pub const JPY: &str = "JPY";
pub const LKR: &str = "LKR";

/// Money value for JSON responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    pub fn jpy(amount: Decimal) -> Self {
        Self {
            amount,
            currency: JPY.to_string(),
        }
    }

    pub fn lkr(amount: Decimal) -> Self {
        Self {
            amount,
            currency: LKR.to_string(),
        }
    }
}

/// Response for the bid-driven fees
#[derive(Debug, Serialize)]
pub struct FeesResponse {
    pub winning_bid: MoneyResponse,
    pub exporter: Exporter,
    pub auction_fee: MoneyResponse,
    pub auction_fee_bracket: &'static str,
    pub handling_charge: MoneyResponse,
    pub handling_fee_bracket: &'static str,
    pub max_discount_voucher: Option<MoneyResponse>,
}

/// Response for a shipping lookup
#[derive(Debug, Serialize)]
pub struct ShippingResponse {
    pub code: u8,
    pub charge: MoneyResponse,
    pub charge_formatted: String,
    pub models: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

impl From<ShippingInfo> for ShippingResponse {
    fn from(info: ShippingInfo) -> Self {
        Self {
            charge_formatted: info.charge_formatted(),
            code: info.code,
            charge: MoneyResponse::jpy(info.charge),
            models: info.models,
            model: info.model,
            note: info.note.map(|n| n.message()),
        }
    }
}

/// One named tax line
#[derive(Debug, Serialize)]
pub struct TaxComponentResponse {
    pub name: &'static str,
    pub amount: MoneyResponse,
}

/// Response for a tax evaluation
#[derive(Debug, Serialize)]
pub struct TaxBreakdownResponse {
    pub cif: MoneyResponse,
    pub tax_category: &'static str,
    pub tax_category_label: &'static str,
    pub hs_code: &'static str,
    #[serde(with = "rust_decimal::serde::str")]
    pub capacity: Decimal,
    pub components: Vec<TaxComponentResponse>,
    pub total_tax: MoneyResponse,
    pub total_with_cif: MoneyResponse,
}

impl From<&TaxBreakdown> for TaxBreakdownResponse {
    fn from(tax: &TaxBreakdown) -> Self {
        Self {
            cif: MoneyResponse::lkr(tax.cif),
            tax_category: tax.tax_category.key(),
            tax_category_label: tax.tax_category.label(),
            hs_code: tax.tax_category.hs_code(),
            capacity: tax.capacity,
            components: tax
                .components
                .named()
                .into_iter()
                .map(|(name, amount)| TaxComponentResponse {
                    name,
                    amount: MoneyResponse::lkr(amount),
                })
                .collect(),
            total_tax: MoneyResponse::lkr(tax.total_tax),
            total_with_cif: MoneyResponse::lkr(tax.total_with_cif),
        }
    }
}

/// Response for a landed cost quotation
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub model: String,
    pub exporter: Exporter,
    pub shipping: ShippingResponse,
    pub winning_bid: MoneyResponse,
    pub handling: MoneyResponse,
    pub area_cost: MoneyResponse,
    pub tt_deduction: MoneyResponse,
    pub fob: MoneyResponse,
    pub cif_yen: MoneyResponse,
    #[serde(with = "rust_decimal::serde::str")]
    pub yen_rate: Decimal,
    pub auction_fee: MoneyResponse,
    pub cif_lkr: MoneyResponse,
    pub bank_commission: MoneyResponse,
    pub lc_amount: MoneyResponse,
    pub tt_lkr: MoneyResponse,
    pub clearing_charges: MoneyResponse,
    pub tax_basis: MoneyResponse,
    pub tax: TaxBreakdownResponse,
    pub total_payable: MoneyResponse,
    pub auction_fee_bracket: &'static str,
    pub handling_fee_bracket: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_file: Option<String>,
}

impl From<LandedCost> for QuoteResponse {
    fn from(cost: LandedCost) -> Self {
        Self {
            tax: TaxBreakdownResponse::from(&cost.tax),
            model: cost.model,
            exporter: cost.exporter,
            shipping: cost.shipping.into(),
            winning_bid: MoneyResponse::jpy(cost.winning_bid),
            handling: MoneyResponse::jpy(cost.handling),
            area_cost: MoneyResponse::jpy(cost.area_cost),
            tt_deduction: MoneyResponse::jpy(cost.tt_deduction),
            fob: MoneyResponse::jpy(cost.fob),
            cif_yen: MoneyResponse::jpy(cost.cif_yen),
            yen_rate: cost.yen_rate,
            auction_fee: MoneyResponse::lkr(cost.auction_fee),
            cif_lkr: MoneyResponse::lkr(cost.cif_lkr),
            bank_commission: MoneyResponse::lkr(cost.bank_commission),
            lc_amount: MoneyResponse::lkr(cost.lc_amount),
            tt_lkr: MoneyResponse::lkr(cost.tt_lkr),
            clearing_charges: MoneyResponse::lkr(cost.clearing_charges),
            tax_basis: MoneyResponse::lkr(cost.tax_basis),
            total_payable: MoneyResponse::lkr(cost.total_payable),
            auction_fee_bracket: cost.auction_fee_bracket,
            handling_fee_bracket: cost.handling_fee_bracket,
            report_file: None,
        }
    }
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&PricingError> for PricingErrorResponse {
    fn from(err: &PricingError) -> Self {
        let details = match err {
            PricingError::InvalidAmount { field, value } => Some(serde_json::json!({
                "field": field,
                "value": value.to_string(),
            })),
            PricingError::AmbiguousModel { codes, .. } => {
                Some(serde_json::json!({ "matching_codes": codes }))
            }
            _ => None,
        };

        Self {
            error_type: err.error_type().to_string(),
            message: err.to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::shipping::{shipping_info, ShippingSelector};
    use crate::pricing::tax::{vehicle_tax, TaxCategory};
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_serializes_as_string() {
        let json = serde_json::to_value(MoneyResponse::lkr(dec!(1750.50))).unwrap();
        assert_eq!(json["amount"], "1750.50");
        assert_eq!(json["currency"], "LKR");
    }

    #[test]
    fn test_shipping_response_note_message() {
        let info = shipping_info(&ShippingSelector::Model("Prado".to_string())).unwrap();
        let json = serde_json::to_value(ShippingResponse::from(info)).unwrap();
        assert_eq!(json["code"], 14);
        assert_eq!(json["charge_formatted"], "¥186,000");
        assert_eq!(json["note"], "Partial match found");
    }

    #[test]
    fn test_tax_breakdown_response_lists_components() {
        let tax = vehicle_tax(dec!(2000000), TaxCategory::Petrol1000To1300, dec!(1196)).unwrap();
        let response = TaxBreakdownResponse::from(&tax);
        assert_eq!(response.components.len(), 7);
        assert_eq!(response.hs_code, "8703.22.50");
        assert_eq!(response.total_tax.amount, tax.total_tax);
    }

    #[test]
    fn test_error_response_details() {
        let err = PricingError::AmbiguousModel {
            input: "cross".to_string(),
            codes: vec![6, 8, 9],
        };
        let response = PricingErrorResponse::from(&err);
        assert_eq!(response.error_type, "ambiguous_model");
        assert_eq!(
            response.details,
            Some(serde_json::json!({ "matching_codes": [6, 8, 9] }))
        );

        let response = PricingErrorResponse::from(&PricingError::InvalidShippingSelector);
        assert!(response.details.is_none());

        let response = PricingErrorResponse::from(&PricingError::Overflow("Vehicle tax"));
        assert_eq!(response.error_type, "amount_overflow");
        assert_eq!(response.message, "Vehicle tax is too large to calculate");
    }
}
