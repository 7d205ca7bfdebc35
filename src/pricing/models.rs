//! Preset vehicle variants.
//!
//! Typical tax category, declared customs value, capacity and winning bid per
//! model grade. Only used to fill in quote requests; none of these figures
//! take part in the tax rules themselves.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::tax::TaxCategory::{
    self, Hev50To100OneYear, Hybrid1000To1300, Hybrid1300To1500, Petrol1000To1300,
    Petrol1300To1500, PetrolUnder1000,
};

/// Tax category used when neither the request nor a preset supplies one.
pub const DEFAULT_TAX_CATEGORY: TaxCategory = TaxCategory::Hybrid1300To1500;
pub const DEFAULT_CAPACITY: Decimal = dec!(1500);
pub const DEFAULT_WINNING_BID: Decimal = dec!(2000000);

/// One grade of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VehicleVariant {
    pub label: &'static str,
    pub tax_category: TaxCategory,
    /// Declared customs value, VAT inclusive (JPY)
    pub tax_base: Decimal,
    pub capacity: Decimal,
    pub winning_bid: Decimal,
}

/// Presets for a model name as used by the shipping table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VehicleDefaults {
    pub model: &'static str,
    pub variants: &'static [VehicleVariant],
}

const fn variant(
    label: &'static str,
    tax_category: TaxCategory,
    tax_base: Decimal,
    capacity: Decimal,
    winning_bid: Decimal,
) -> VehicleVariant {
    VehicleVariant {
        label,
        tax_category,
        tax_base,
        capacity,
        winning_bid,
    }
}

pub const VEHICLE_DEFAULTS: &[VehicleDefaults] = &[
    // ¥103,000 shipping
    VehicleDefaults {
        model: "Wagon R",
        variants: &[
            variant("HYBRID ZX", PetrolUnder1000, dec!(1736900), dec!(660), dec!(1500000)),
            variant("ZL", PetrolUnder1000, dec!(1457500), dec!(660), dec!(1445000)),
            variant("CUSTOM ZX", PetrolUnder1000, dec!(1551000), dec!(660), dec!(1400000)),
            variant("HYBRID FX-S", PetrolUnder1000, dec!(1200000), dec!(660), dec!(1150000)),
            variant("PETROL FX", PetrolUnder1000, dec!(1150000), dec!(660), dec!(1000000)),
        ],
    },
    VehicleDefaults {
        model: "Alto",
        variants: &[
            variant("A", PetrolUnder1000, dec!(1142900), dec!(660), dec!(850000)),
            variant("L", PetrolUnder1000, dec!(1197900), dec!(660), dec!(850000)),
            variant("L Upgrade", PetrolUnder1000, dec!(1379400), dec!(660), dec!(950000)),
            variant("HYBRID S", PetrolUnder1000, dec!(1350800), dec!(660), dec!(950000)),
            variant("HYBRID X", PetrolUnder1000, dec!(1519100), dec!(660), dec!(1000000)),
        ],
    },
    VehicleDefaults {
        model: "Mira",
        variants: &[
            variant("G SA3", PetrolUnder1000, dec!(1320000), dec!(660), dec!(1250000)),
            variant("X SA3", PetrolUnder1000, dec!(1179200), dec!(660), dec!(1000000)),
            variant("L SA3", PetrolUnder1000, dec!(1025200), dec!(660), dec!(850000)),
            variant("B SA3", PetrolUnder1000, dec!(992200), dec!(660), dec!(750000)),
        ],
    },
    VehicleDefaults {
        model: "Move",
        variants: &[
            variant("L", PetrolUnder1000, dec!(1358500), dec!(660), dec!(1000000)),
            variant("X", PetrolUnder1000, dec!(1490500), dec!(660), dec!(1250000)),
            variant("G", PetrolUnder1000, dec!(1716000), dec!(660), dec!(1300000)),
            variant("RS", PetrolUnder1000, dec!(1897500), dec!(660), dec!(1550000)),
        ],
    },
    VehicleDefaults {
        model: "Nissan Dayz",
        variants: &[
            variant("S", PetrolUnder1000, dec!(1437700), dec!(660), dec!(950000)),
            variant("X", PetrolUnder1000, dec!(1478400), dec!(660), dec!(1250000)),
            variant("Highway Star X", PetrolUnder1000, dec!(1698400), dec!(660), dec!(1300000)),
            variant(
                "Highway Star X ProPilot Edition",
                PetrolUnder1000,
                dec!(1798500),
                dec!(660),
                dec!(1550000),
            ),
            variant("Highway Star G Turbo", PetrolUnder1000, dec!(1838100), dec!(660), dec!(1300000)),
            variant(
                "Highway Star G Turbo ProPilot Edition",
                PetrolUnder1000,
                dec!(1929400),
                dec!(660),
                dec!(1550000),
            ),
        ],
    },
    VehicleDefaults {
        model: "EK Wagon",
        variants: &[
            variant("M", PetrolUnder1000, dec!(1468500), dec!(660), dec!(900000)),
            variant("G", PetrolUnder1000, dec!(1551000), dec!(660), dec!(1100000)),
        ],
    },
    VehicleDefaults {
        model: "Yaris",
        variants: &[
            variant("X 1.0L", PetrolUnder1000, dec!(1657700), dec!(996), dec!(1450000)),
            variant("G 1.0L", PetrolUnder1000, dec!(1820500), dec!(996), dec!(1600000)),
        ],
    },
    VehicleDefaults {
        model: "TAFT",
        variants: &[
            variant("X", PetrolUnder1000, dec!(1419000), dec!(660), dec!(1100000)),
            variant("X Turbo", PetrolUnder1000, dec!(1512500), dec!(660), dec!(1250000)),
            variant("G", PetrolUnder1000, dec!(1606000), dec!(660), dec!(1300000)),
            variant("G 'Chrome Venture'", PetrolUnder1000, dec!(1672000), dec!(660), dec!(1450000)),
            variant("G 'Dark Chrome Venture'", PetrolUnder1000, dec!(1677500), dec!(660), dec!(1450000)),
            variant("G Turbo", PetrolUnder1000, dec!(1688500), dec!(660), dec!(1450000)),
            variant("G Turbo 'Chrome Venture'", PetrolUnder1000, dec!(1754500), dec!(660), dec!(1500000)),
            variant(
                "G Turbo 'Dark Chrome Venture'",
                PetrolUnder1000,
                dec!(1760000),
                dec!(660),
                dec!(1500000),
            ),
        ],
    },
    // ¥109,000 shipping
    VehicleDefaults {
        model: "Fit HV",
        variants: &[
            variant("Basic", Hybrid1300To1500, dec!(2208800), dec!(1496), dec!(1300000)),
            variant("Home", Hybrid1300To1500, dec!(2404600), dec!(1496), dec!(1620000)),
            variant("RS", Hybrid1300To1500, dec!(2616900), dec!(1496), dec!(1800000)),
            variant("Crosstar", Hybrid1300To1500, dec!(2710400), dec!(1496), dec!(1800000)),
            variant("LUXE", Hybrid1300To1500, dec!(2719200), dec!(1496), dec!(2000000)),
        ],
    },
    VehicleDefaults {
        model: "X bee",
        variants: &[
            variant("Hybrid MX", PetrolUnder1000, dec!(2212100), dec!(996), dec!(1600000)),
            variant("Hybrid MZ", PetrolUnder1000, dec!(2388100), dec!(996), dec!(1700000)),
        ],
    },
    VehicleDefaults {
        model: "Hustler",
        variants: &[
            variant("Hybrid G", PetrolUnder1000, dec!(1518000), dec!(660), dec!(1400000)),
            variant("Hybrid X", PetrolUnder1000, dec!(1672000), dec!(660), dec!(1500000)),
        ],
    },
    VehicleDefaults {
        model: "Aqua",
        variants: &[
            variant("X", Hybrid1300To1500, dec!(2486000), dec!(1496), dec!(1700000)),
            variant("G", Hybrid1300To1500, dec!(2654300), dec!(1496), dec!(2000000)),
            variant("Z", Hybrid1300To1500, dec!(2824800), dec!(1496), dec!(2200000)),
        ],
    },
    VehicleDefaults {
        model: "Swift",
        variants: &[
            variant("XG", Petrol1000To1300, dec!(1727000), dec!(1196), dec!(1200000)),
            variant("Hybrid MX", Petrol1000To1300, dec!(1922800), dec!(1196), dec!(1450000)),
            variant("Hybrid MZ", Petrol1000To1300, dec!(2167000), dec!(1196), dec!(1700000)),
        ],
    },
    VehicleDefaults {
        model: "Note",
        variants: &[variant("X 2WD", Hybrid1000To1300, dec!(2328700), dec!(1196), dec!(1825000))],
    },
    // ¥114,000 shipping
    VehicleDefaults {
        model: "Raize",
        variants: &[
            variant("X 1.0L", PetrolUnder1000, dec!(1800700), dec!(996), dec!(1800000)),
            variant("G 1.0L", PetrolUnder1000, dec!(1958000), dec!(996), dec!(2000000)),
            variant("Z 1.0L", PetrolUnder1000, dec!(2152700), dec!(996), dec!(2500000)),
            variant("G 1.2L HV", Hev50To100OneYear, dec!(2263800), dec!(78), dec!(2100000)),
            variant("Z 1.2L HV", Hev50To100OneYear, dec!(2442000), dec!(78), dec!(2500000)),
        ],
    },
    VehicleDefaults {
        model: "Rocky",
        variants: &[
            variant("L 1.0L", PetrolUnder1000, dec!(1761100), dec!(996), dec!(1600000)),
            variant("X 1.0L", PetrolUnder1000, dec!(1910700), dec!(996), dec!(1800000)),
            variant("Premium G 1.0L", PetrolUnder1000, dec!(2171400), dec!(996), dec!(2000000)),
            variant("X HEV 1.2L", Hev50To100OneYear, dec!(2216500), dec!(78), dec!(2100000)),
            variant("Premium G HEV 1.2L", Hev50To100OneYear, dec!(2460700), dec!(78), dec!(2500000)),
        ],
    },
    VehicleDefaults {
        model: "Roomy",
        variants: &[
            variant("X", PetrolUnder1000, dec!(1742400), dec!(996), dec!(1250000)),
            variant("Custom G", PetrolUnder1000, dec!(2118600), dec!(996), dec!(1400000)),
            variant("Custom GT (Turbo)", PetrolUnder1000, dec!(2257200), dec!(996), dec!(1600000)),
        ],
    },
    // ¥119,000 shipping
    VehicleDefaults {
        model: "Axio",
        variants: &[
            variant("EX", Petrol1300To1500, dec!(2279200), dec!(1496), dec!(1800000)),
            variant("HYBRID EX", Hybrid1300To1500, dec!(3077800), dec!(1496), dec!(2500000)),
        ],
    },
    // ¥129,000 shipping
    VehicleDefaults {
        model: "Vezel HV",
        variants: &[
            variant("e:HEV X HuNT", Hybrid1300To1500, dec!(3108600), dec!(1496), dec!(2500000)),
            variant("e:HEV Z", Hybrid1300To1500, dec!(3268100), dec!(1496), dec!(3000000)),
            variant("e:HEV Z Play", Hybrid1300To1500, dec!(3699300), dec!(1496), dec!(3500000)),
            variant("e:HEV RS", Hybrid1300To1500, dec!(3748800), dec!(1496), dec!(3400000)),
        ],
    },
    VehicleDefaults {
        model: "Yaris Cross",
        variants: &[variant("Yaris Cross", Hybrid1300To1500, dec!(129444), dec!(1496), dec!(2800000))],
    },
    // ¥135,000 shipping
    VehicleDefaults {
        model: "Leaf",
        variants: &[variant("Leaf", Hev50To100OneYear, dec!(135000), dec!(60), dec!(1800000))],
    },
    VehicleDefaults {
        model: "Honda WR-V",
        variants: &[variant("Honda WR-V", Petrol1300To1500, dec!(135000), dec!(1500), dec!(1900000))],
    },
    // ¥140,000 shipping
    VehicleDefaults {
        model: "Corolla cross",
        variants: &[variant("Corolla cross", Hybrid1300To1500, dec!(144444), dec!(1878), dec!(3500000))],
    },
    // ¥155,000 shipping
    VehicleDefaults {
        model: "CR-V",
        variants: &[variant("CR-V", Petrol1300To1500, dec!(156666), dec!(2000), dec!(2900000))],
    },
];

/// Presets for a model, matched case-insensitively.
pub fn vehicle_defaults(model: &str) -> Option<&'static VehicleDefaults> {
    let model = model.trim();
    VEHICLE_DEFAULTS
        .iter()
        .find(|d| d.model.eq_ignore_ascii_case(model))
}

/// Variants of a model, empty when the model has no presets.
pub fn vehicle_variants(model: &str) -> &'static [VehicleVariant] {
    vehicle_defaults(model).map(|d| d.variants).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::shipping::{shipping_info, ShippingSelector};

    #[test]
    fn test_every_preset_model_has_exact_shipping() {
        for defaults in VEHICLE_DEFAULTS {
            let info = shipping_info(&ShippingSelector::from(defaults.model)).unwrap();
            assert!(info.note.is_none(), "{} should match exactly", defaults.model);
            assert!(!defaults.variants.is_empty());
        }
    }

    #[test]
    fn test_vehicle_variants_lookup() {
        let variants = vehicle_variants("aqua");
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[1].label, "G");
        assert_eq!(variants[1].tax_category, TaxCategory::Hybrid1300To1500);
        assert_eq!(variants[1].tax_base, dec!(2654300));
        assert_eq!(variants[1].capacity, dec!(1496));
        assert_eq!(variants[1].winning_bid, dec!(2000000));
    }

    #[test]
    fn test_hev_presets_use_kilowatts() {
        let raize = vehicle_variants("Raize");
        let hev: Vec<_> = raize
            .iter()
            .filter(|v| v.tax_category == TaxCategory::Hev50To100OneYear)
            .collect();
        assert_eq!(hev.len(), 2);
        assert!(hev.iter().all(|v| v.capacity == dec!(78)));
    }

    #[test]
    fn test_unknown_model_has_no_variants() {
        assert!(vehicle_variants("Delorean").is_empty());
        assert!(vehicle_defaults("Delorean").is_none());
    }
}
