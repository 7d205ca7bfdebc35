//! Pricing engine module for vehicle imports.
//!
//! Fee schedules, shipping lookup and customs tax for auction vehicles,
//! plus the landed cost aggregation built on top of them.

pub mod calculators;
pub mod models;
pub mod requests;
pub mod responses;
pub mod services;
pub mod shipping;
pub mod tax;

// Re-export commonly used items
pub use calculators::{auction_fee, handling_charge, max_discount_voucher, round_money, Exporter};
pub use models::{vehicle_defaults, vehicle_variants, VehicleDefaults, VehicleVariant};
pub use services::{calculate_landed_cost, resolve_quote_input, LandedCost, PricingError, QuoteInput};
pub use shipping::{shipping_info, ShippingInfo, ShippingSelector};
pub use tax::{tax_basis, vehicle_tax, vehicle_tax_for_key, TaxBreakdown, TaxCategory};
