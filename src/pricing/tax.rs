//! Customs tax rules for imported vehicles.
//!
//! Each [`TaxCategory`] maps to a fixed [`TaxRules`] record. Amounts are LKR,
//! capacities are cc for combustion and hybrid engines and kW for HEV motors.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::calculators::{checked_sum, ensure_non_negative, round_money};
use super::services::PricingError;

/// Vehicle Emission Levy, charged on every import.
pub const VEHICLE_EMISSION_LEVY: Decimal = dec!(15000);

/// COM/EXM/SEL fixed charge.
pub const FIXED_CHARGE: Decimal = dec!(1750);

/// VAT is levied on CIF uplifted by 10% plus the duties.
const VAT_CIF_UPLIFT: Decimal = dec!(1.1);

/// Declared customs value is quoted VAT-inclusive and before the 15% trade allowance.
const DECLARED_VAT_DIVISOR: Decimal = dec!(1.1);
const DECLARED_ALLOWANCE_FACTOR: Decimal = dec!(0.85);

/// Engine/fuel class used to select customs rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxCategory {
    #[serde(rename = "hybrid_under_1000")]
    HybridUnder1000,
    #[serde(rename = "petrol_under_1000")]
    PetrolUnder1000,
    #[serde(rename = "hybrid_1000_1300")]
    Hybrid1000To1300,
    #[serde(rename = "petrol_1000_1300")]
    Petrol1000To1300,
    #[serde(rename = "hybrid_1300_1500")]
    Hybrid1300To1500,
    #[serde(rename = "petrol_1300_1500")]
    Petrol1300To1500,
    #[serde(rename = "hev_50_100_1year")]
    Hev50To100OneYear,
    #[serde(rename = "hev_50_100_3year")]
    Hev50To100ThreeYear,
}

impl TaxCategory {
    pub const ALL: [TaxCategory; 8] = [
        TaxCategory::HybridUnder1000,
        TaxCategory::PetrolUnder1000,
        TaxCategory::Hybrid1000To1300,
        TaxCategory::Petrol1000To1300,
        TaxCategory::Hybrid1300To1500,
        TaxCategory::Petrol1300To1500,
        TaxCategory::Hev50To100OneYear,
        TaxCategory::Hev50To100ThreeYear,
    ];

    /// Category applied when a key is not recognised.
    pub const FALLBACK: TaxCategory = TaxCategory::PetrolUnder1000;

    pub fn key(self) -> &'static str {
        match self {
            TaxCategory::HybridUnder1000 => "hybrid_under_1000",
            TaxCategory::PetrolUnder1000 => "petrol_under_1000",
            TaxCategory::Hybrid1000To1300 => "hybrid_1000_1300",
            TaxCategory::Petrol1000To1300 => "petrol_1000_1300",
            TaxCategory::Hybrid1300To1500 => "hybrid_1300_1500",
            TaxCategory::Petrol1300To1500 => "petrol_1300_1500",
            TaxCategory::Hev50To100OneYear => "hev_50_100_1year",
            TaxCategory::Hev50To100ThreeYear => "hev_50_100_3year",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaxCategory::HybridUnder1000 => "<1000cc Hybrid",
            TaxCategory::PetrolUnder1000 => "<1000cc Petrol",
            TaxCategory::Hybrid1000To1300 => "1000cc - 1300cc Hybrid",
            TaxCategory::Petrol1000To1300 => "1000cc - 1300cc Petrol",
            TaxCategory::Hybrid1300To1500 => "1300cc - 1500cc Hybrid",
            TaxCategory::Petrol1300To1500 => "1300cc - 1500cc Petrol",
            TaxCategory::Hev50To100OneYear => "HEV 50kW - 100kW, not more than 1yr old",
            TaxCategory::Hev50To100ThreeYear => "HEV 50kW - 100kW, more than 1yr old",
        }
    }

    /// Unit of the capacity figure: motor power for HEVs, displacement otherwise.
    pub fn capacity_unit(self) -> &'static str {
        match self {
            TaxCategory::Hev50To100OneYear | TaxCategory::Hev50To100ThreeYear => "kW",
            _ => "cc",
        }
    }

    pub fn hs_code(self) -> &'static str {
        match self {
            TaxCategory::HybridUnder1000 => "8703.40.28",
            TaxCategory::PetrolUnder1000 => "8703.21.69",
            TaxCategory::Hybrid1000To1300 | TaxCategory::Hybrid1300To1500 => "8703.40.35",
            TaxCategory::Petrol1000To1300 | TaxCategory::Petrol1300To1500 => "8703.22.50",
            TaxCategory::Hev50To100OneYear | TaxCategory::Hev50To100ThreeYear => "8703.80.73",
        }
    }

    /// Resolve a category key, falling back to [`TaxCategory::FALLBACK`].
    pub fn resolve(key: &str) -> TaxCategory {
        key.parse().unwrap_or_else(|_| {
            warn!(
                tax_category = key,
                fallback = TaxCategory::FALLBACK.key(),
                "unknown tax category, using fallback"
            );
            TaxCategory::FALLBACK
        })
    }

    pub fn rules(self) -> TaxRules {
        let (excise, luxury_threshold, luxury_rate) = match self {
            TaxCategory::HybridUnder1000 => {
                (ExciseSchedule::Fixed(dec!(1810900)), dec!(5500000), dec!(0.8))
            }
            TaxCategory::PetrolUnder1000 => (
                ExciseSchedule::SmallEngine {
                    max_capacity: dec!(660),
                    fixed: dec!(1992000),
                    per_unit: dec!(2450),
                },
                dec!(5000000),
                dec!(1.0),
            ),
            TaxCategory::Hybrid1000To1300 => {
                (ExciseSchedule::PerUnit(dec!(2750)), dec!(5500000), dec!(0.8))
            }
            TaxCategory::Petrol1000To1300 => {
                (ExciseSchedule::PerUnit(dec!(3850)), dec!(5500000), dec!(0.8))
            }
            TaxCategory::Hybrid1300To1500 => {
                (ExciseSchedule::PerUnit(dec!(3450)), dec!(5500000), dec!(0.8))
            }
            TaxCategory::Petrol1300To1500 => {
                (ExciseSchedule::PerUnit(dec!(4450)), dec!(5000000), dec!(1.0))
            }
            TaxCategory::Hev50To100OneYear => {
                (ExciseSchedule::PerUnit(dec!(40970)), dec!(6000000), dec!(0.6))
            }
            TaxCategory::Hev50To100ThreeYear => {
                (ExciseSchedule::PerUnit(dec!(43440)), dec!(6000000), dec!(0.6))
            }
        };

        TaxRules {
            excise,
            cid_rate: dec!(0.20),
            surcharge_rate: dec!(0.50),
            vat_rate: dec!(0.18),
            luxury_threshold,
            luxury_rate,
        }
    }
}

impl fmt::Display for TaxCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TaxCategory {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        TaxCategory::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| PricingError::UnknownTaxCategory(s.to_string()))
    }
}

/// Excise duty as a function of engine capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExciseSchedule {
    /// Flat duty regardless of capacity.
    Fixed(Decimal),
    /// Capacity times a per-cc (or per-kW) rate.
    PerUnit(Decimal),
    /// Flat duty up to `max_capacity`, per-unit rate above it.
    SmallEngine {
        max_capacity: Decimal,
        fixed: Decimal,
        per_unit: Decimal,
    },
}

impl ExciseSchedule {
    /// `None` when the duty overflows.
    pub fn duty(&self, capacity: Decimal) -> Option<Decimal> {
        match *self {
            ExciseSchedule::Fixed(amount) => Some(amount),
            ExciseSchedule::PerUnit(rate) => capacity.checked_mul(rate),
            ExciseSchedule::SmallEngine {
                max_capacity,
                fixed,
                per_unit,
            } => {
                if capacity <= max_capacity {
                    Some(fixed)
                } else {
                    capacity.checked_mul(per_unit)
                }
            }
        }
    }
}

/// Rate constants for one tax category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRules {
    pub excise: ExciseSchedule,
    /// Customs import duty, fraction of CIF
    pub cid_rate: Decimal,
    /// Fraction of CID
    pub surcharge_rate: Decimal,
    pub vat_rate: Decimal,
    pub luxury_threshold: Decimal,
    pub luxury_rate: Decimal,
}

/// Named tax components, LKR rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxComponents {
    pub excise_duty: Decimal,
    pub cid: Decimal,
    pub surcharge: Decimal,
    pub vat: Decimal,
    pub vehicle_emission_levy: Decimal,
    pub fixed_charge: Decimal,
    pub luxury_tax: Decimal,
}

impl TaxComponents {
    /// Components as `(display name, amount)` in presentation order.
    pub fn named(&self) -> [(&'static str, Decimal); 7] {
        [
            ("Excise Duty", self.excise_duty),
            ("CID (20% of CIF)", self.cid),
            ("SUR (50% of CID)", self.surcharge),
            ("VAT (18%)", self.vat),
            ("Vehicle Emission Levy", self.vehicle_emission_levy),
            ("COM/EXM/SEL", self.fixed_charge),
            ("Luxury Tax", self.luxury_tax),
        ]
    }
}

/// Result of a single tax evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxBreakdown {
    pub cif: Decimal,
    pub tax_category: TaxCategory,
    pub capacity: Decimal,
    pub rules: TaxRules,
    pub components: TaxComponents,
    pub total_tax: Decimal,
    pub total_with_cif: Decimal,
}

/// Compute customs tax on an LKR CIF value.
///
/// All components are computed unrounded, the total is taken over the
/// unrounded values and everything is then rounded to cents.
/// `total_with_cif` is always `cif + total_tax` on the rounded figures.
pub fn vehicle_tax(
    cif: Decimal,
    tax_category: TaxCategory,
    capacity: Decimal,
) -> Result<TaxBreakdown, PricingError> {
    let cif = ensure_non_negative("CIF", cif)?;
    let capacity = ensure_non_negative("Capacity", capacity)?;
    let rules = tax_category.rules();

    let overflow = || PricingError::Overflow("Vehicle tax");

    let excise_duty = rules.excise.duty(capacity).ok_or_else(overflow)?;
    let cid = cif.checked_mul(rules.cid_rate).ok_or_else(overflow)?;
    let surcharge = cid.checked_mul(rules.surcharge_rate).ok_or_else(overflow)?;
    let vat_base = checked_sum([
        cif.checked_mul(VAT_CIF_UPLIFT),
        Some(excise_duty),
        Some(cid),
        Some(surcharge),
    ]);
    let vat = vat_base
        .and_then(|base| base.checked_mul(rules.vat_rate))
        .ok_or_else(overflow)?;
    let luxury_tax = if cif > rules.luxury_threshold {
        (cif - rules.luxury_threshold)
            .checked_mul(rules.luxury_rate)
            .ok_or_else(overflow)?
    } else {
        Decimal::ZERO
    };

    let total_tax = checked_sum([
        Some(luxury_tax),
        Some(excise_duty),
        Some(cid),
        Some(surcharge),
        Some(vat),
        Some(VEHICLE_EMISSION_LEVY),
        Some(FIXED_CHARGE),
    ])
    .map(|total| round_money(total, 2))
    .ok_or_else(overflow)?;
    let cif = round_money(cif, 2);
    let total_with_cif = cif.checked_add(total_tax).ok_or_else(overflow)?;

    debug!(
        tax_category = tax_category.key(),
        %cif,
        %capacity,
        %total_tax,
        "vehicle tax computed"
    );

    Ok(TaxBreakdown {
        cif,
        tax_category,
        capacity,
        rules,
        components: TaxComponents {
            excise_duty: round_money(excise_duty, 2),
            cid: round_money(cid, 2),
            surcharge: round_money(surcharge, 2),
            vat: round_money(vat, 2),
            vehicle_emission_levy: VEHICLE_EMISSION_LEVY,
            fixed_charge: FIXED_CHARGE,
            luxury_tax: round_money(luxury_tax, 2),
        },
        total_tax,
        total_with_cif,
    })
}

/// [`vehicle_tax`] keyed by a category string; unknown keys use the fallback category.
pub fn vehicle_tax_for_key(
    cif: Decimal,
    tax_category: &str,
    capacity: Decimal,
) -> Result<TaxBreakdown, PricingError> {
    vehicle_tax(cif, TaxCategory::resolve(tax_category), capacity)
}

/// Declared customs value converted to its FOB equivalent.
pub fn declared_fob_equivalent(declared_tax_base: Decimal) -> Decimal {
    declared_tax_base / DECLARED_VAT_DIVISOR * DECLARED_ALLOWANCE_FACTOR
}

/// LKR CIF value that customs tax is assessed on.
///
/// Whichever is greater of the computed FOB and the declared value's FOB
/// equivalent, plus shipping, converted at `yen_rate`.
pub fn tax_basis(
    fob: Decimal,
    shipping: Decimal,
    declared_tax_base: Option<Decimal>,
    yen_rate: Decimal,
) -> Result<Decimal, PricingError> {
    let fob = ensure_non_negative("FOB", fob)?;
    let shipping = ensure_non_negative("Shipping", shipping)?;
    let yen_rate = ensure_non_negative("Exchange rate", yen_rate)?;

    let declared = declared_tax_base
        .map(|base| ensure_non_negative("Tax base", base))
        .transpose()?
        .map(declared_fob_equivalent);

    let assessed_fob = match declared {
        Some(declared) if declared > fob => {
            debug!(%declared, %fob, "declared value exceeds computed FOB");
            declared
        }
        _ => fob,
    };

    assessed_fob
        .checked_add(shipping)
        .and_then(|cif| cif.checked_mul(yen_rate))
        .ok_or(PricingError::Overflow("Tax basis"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_unit() {
        assert_eq!(TaxCategory::Hev50To100OneYear.capacity_unit(), "kW");
        assert_eq!(TaxCategory::Hev50To100ThreeYear.capacity_unit(), "kW");
        assert_eq!(TaxCategory::PetrolUnder1000.capacity_unit(), "cc");
        assert_eq!(TaxCategory::Hybrid1300To1500.capacity_unit(), "cc");
    }

    #[test]
    fn test_category_keys_round_trip() {
        for category in TaxCategory::ALL {
            assert_eq!(category.key().parse::<TaxCategory>().unwrap(), category);
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.key()));
        }
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        assert_eq!(TaxCategory::resolve("diesel_3000"), TaxCategory::PetrolUnder1000);
        assert_eq!(TaxCategory::resolve(" HYBRID_1300_1500 "), TaxCategory::Hybrid1300To1500);
    }

    #[test]
    fn test_small_engine_excise_step() {
        let rules = TaxCategory::PetrolUnder1000.rules();
        assert_eq!(rules.excise.duty(dec!(660)), Some(dec!(1992000)));
        assert_eq!(rules.excise.duty(dec!(661)), Some(dec!(1619450)));
        assert_eq!(rules.excise.duty(dec!(996)), Some(dec!(2440200)));
    }

    #[test]
    fn test_fixed_and_per_unit_excise() {
        assert_eq!(
            TaxCategory::HybridUnder1000.rules().excise.duty(dec!(998)),
            Some(dec!(1810900))
        );
        assert_eq!(
            TaxCategory::Hybrid1300To1500.rules().excise.duty(dec!(1496)),
            Some(dec!(5161200))
        );
        assert_eq!(
            TaxCategory::Hev50To100OneYear.rules().excise.duty(dec!(78)),
            Some(dec!(3195660))
        );
    }

    #[test]
    fn test_vehicle_tax_hybrid_1300_1500() {
        let tax = vehicle_tax(dec!(4000000), TaxCategory::Hybrid1300To1500, dec!(1496)).unwrap();

        // excise 1496 * 3450
        assert_eq!(tax.components.excise_duty, dec!(5161200));
        assert_eq!(tax.components.cid, dec!(800000));
        assert_eq!(tax.components.surcharge, dec!(400000));
        // (4,400,000 + 5,161,200 + 800,000 + 400,000) * 0.18
        assert_eq!(tax.components.vat, dec!(1937016));
        assert_eq!(tax.components.luxury_tax, dec!(0));
        assert_eq!(tax.components.vehicle_emission_levy, dec!(15000));
        assert_eq!(tax.components.fixed_charge, dec!(1750));
        assert_eq!(tax.total_tax, dec!(8314966));
        assert_eq!(tax.total_with_cif, dec!(12314966));
    }

    #[test]
    fn test_vehicle_tax_with_luxury_and_rounding() {
        let tax = vehicle_tax(dec!(6000000.555), TaxCategory::PetrolUnder1000, dec!(660)).unwrap();
        assert_eq!(tax.cif, dec!(6000000.56));
        // (6,000,000.555 - 5,000,000) * 1.0
        assert_eq!(tax.components.luxury_tax, dec!(1000000.56));
        assert_eq!(tax.components.cid, dec!(1200000.11));
        assert_eq!(tax.total_with_cif, tax.cif + tax.total_tax);
    }

    #[test]
    fn test_luxury_threshold_boundary() {
        let category = TaxCategory::Hybrid1000To1300;
        let threshold = category.rules().luxury_threshold;

        let below = vehicle_tax(threshold - dec!(1), category, dec!(1200)).unwrap();
        let at = vehicle_tax(threshold, category, dec!(1200)).unwrap();
        let above = vehicle_tax(threshold + dec!(1), category, dec!(1200)).unwrap();

        assert_eq!(below.components.luxury_tax, Decimal::ZERO);
        assert_eq!(at.components.luxury_tax, Decimal::ZERO);
        assert_eq!(above.components.luxury_tax, dec!(0.80));
    }

    #[test]
    fn test_vehicle_tax_rejects_negative_inputs() {
        assert!(matches!(
            vehicle_tax(dec!(-1), TaxCategory::PetrolUnder1000, dec!(660)),
            Err(PricingError::InvalidAmount { field: "CIF", .. })
        ));
        assert!(matches!(
            vehicle_tax(dec!(1), TaxCategory::PetrolUnder1000, dec!(-660)),
            Err(PricingError::InvalidAmount { field: "Capacity", .. })
        ));
    }

    #[test]
    fn test_vehicle_tax_for_unknown_key_matches_fallback() {
        let unknown = vehicle_tax_for_key(dec!(3500000), "rotary_wankel", dec!(1300)).unwrap();
        let explicit = vehicle_tax(dec!(3500000), TaxCategory::FALLBACK, dec!(1300)).unwrap();
        assert_eq!(unknown, explicit);
    }

    #[test]
    fn test_named_components_order() {
        let tax = vehicle_tax(dec!(1000000), TaxCategory::Petrol1300To1500, dec!(1496)).unwrap();
        let names: Vec<_> = tax.components.named().iter().map(|(n, _)| *n).collect();
        assert_eq!(names[0], "Excise Duty");
        assert_eq!(names[6], "Luxury Tax");
    }

    // ==================== tax_basis tests ====================

    #[test]
    fn test_tax_basis_uses_computed_fob_when_greater() {
        // declared 1,100,000 -> 850,000 FOB equivalent
        let basis = tax_basis(dec!(1000000), dec!(103000), Some(dec!(1100000)), dec!(2)).unwrap();
        assert_eq!(basis, dec!(2206000));
    }

    #[test]
    fn test_tax_basis_uses_declared_value_when_greater() {
        // declared 2,200,000 -> 1,700,000 FOB equivalent
        let basis = tax_basis(dec!(1000000), dec!(103000), Some(dec!(2200000)), dec!(2)).unwrap();
        assert_eq!(basis, dec!(3606000));
    }

    #[test]
    fn test_tax_basis_without_declared_value() {
        let basis = tax_basis(dec!(1500000), dec!(129000), None, dec!(2.1)).unwrap();
        assert_eq!(basis, dec!(3420900));
    }

    #[test]
    fn test_tax_basis_equal_values_keep_fob() {
        let basis = tax_basis(dec!(850000), dec!(0), Some(dec!(1100000)), dec!(1)).unwrap();
        assert_eq!(basis, dec!(850000));
    }

    #[test]
    fn test_vehicle_tax_overflow_is_error() {
        let err = vehicle_tax(Decimal::MAX, TaxCategory::PetrolUnder1000, dec!(660)).unwrap_err();
        assert_eq!(err, PricingError::Overflow("Vehicle tax"));

        let err =
            vehicle_tax(dec!(1), TaxCategory::Hev50To100ThreeYear, Decimal::MAX).unwrap_err();
        assert_eq!(err, PricingError::Overflow("Vehicle tax"));

        assert_eq!(
            TaxCategory::Petrol1300To1500.rules().excise.duty(Decimal::MAX),
            None
        );
    }

    #[test]
    fn test_tax_basis_overflow_is_error() {
        assert_eq!(
            tax_basis(Decimal::MAX, dec!(1), None, dec!(2.1)).unwrap_err(),
            PricingError::Overflow("Tax basis")
        );
        assert!(tax_basis(dec!(1), dec!(1), None, Decimal::MAX).is_err());
    }
}
