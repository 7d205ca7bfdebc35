//! Freight charges by shipping category.
//!
//! A model name resolves to a category by exact (case-insensitive) name first,
//! then by substring in either direction. Unmatched names fall back to the
//! Vezel category rather than failing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use super::services::PricingError;

/// Freight bracket with the models shipped at that rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingCategory {
    pub code: u8,
    /// JPY
    pub charge: Decimal,
    pub models: &'static [&'static str],
}

pub const SHIPPING_CATEGORIES: [ShippingCategory; 14] = [
    ShippingCategory {
        code: 1,
        charge: dec!(103000),
        models: &["Alto", "Mira", "EK Wagon", "Wagon R", "Move", "Nissan Dayz", "TAFT", "Yaris"],
    },
    ShippingCategory {
        code: 2,
        charge: dec!(109000),
        models: &["Fit HV", "X bee", "Hustler", "Aqua", "Swift", "Note"],
    },
    ShippingCategory {
        code: 3,
        charge: dec!(114000),
        models: &["Raize", "Rocky", "Roomy"],
    },
    ShippingCategory {
        code: 4,
        charge: dec!(119000),
        models: &["Fielder", "Axio", "Other sedan"],
    },
    ShippingCategory {
        code: 5,
        charge: dec!(124000),
        models: &["Sienta HV", "Freed HV"],
    },
    ShippingCategory {
        code: 6,
        charge: dec!(129000),
        models: &["C-HR", "Vezel HV", "Yaris Cross"],
    },
    ShippingCategory {
        code: 7,
        charge: dec!(135000),
        models: &["Leaf", "Honda WR-V", "Audi Q3"],
    },
    ShippingCategory {
        code: 8,
        charge: dec!(140000),
        models: &["Corolla cross"],
    },
    ShippingCategory {
        code: 9,
        charge: dec!(145000),
        models: &["Eclips cross", "Honda ZR-V"],
    },
    ShippingCategory {
        code: 10,
        charge: dec!(150000),
        models: &["Voxy HV", "Noah HV", "X-trail"],
    },
    ShippingCategory {
        code: 11,
        charge: dec!(155000),
        models: &["CR-V", "Step Wagon"],
    },
    ShippingCategory {
        code: 12,
        charge: dec!(166000),
        models: &["HIACE V", "NISSAN CARAVAN"],
    },
    ShippingCategory {
        code: 13,
        charge: dec!(176000),
        models: &["ALPHARD", "VELLFIRE"],
    },
    ShippingCategory {
        code: 14,
        charge: dec!(186000),
        models: &["Land Cruiser Prado"],
    },
];

/// Category used when a model name matches nothing.
pub const DEFAULT_SHIPPING_CODE: u8 = 6;
const DEFAULT_MODEL: &str = "Vezel";

/// Look up a shipping category by its code.
pub fn shipping_category(code: u8) -> Option<&'static ShippingCategory> {
    SHIPPING_CATEGORIES.iter().find(|c| c.code == code)
}

/// What a shipping lookup is keyed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShippingSelector {
    Code(i64),
    Model(String),
}

impl ShippingSelector {
    /// Build a selector from loosely typed JSON input.
    ///
    /// Strings and whole numbers are accepted; `3.0` is code 3.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PricingError> {
        match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(ShippingSelector::Code)
                .ok_or(PricingError::InvalidShippingSelector),
            serde_json::Value::String(s) => Ok(ShippingSelector::Model(s.clone())),
            _ => Err(PricingError::InvalidShippingSelector),
        }
    }

    /// Command line form: all-digit input is a code, anything else a model name.
    pub fn parse_arg(arg: &str) -> Self {
        let trimmed = arg.trim();
        match trimmed.parse::<i64>() {
            Ok(code) if trimmed.chars().all(|c| c.is_ascii_digit()) => ShippingSelector::Code(code),
            _ => ShippingSelector::Model(arg.to_string()),
        }
    }
}

impl From<&str> for ShippingSelector {
    fn from(model: &str) -> Self {
        ShippingSelector::Model(model.to_string())
    }
}

impl From<u8> for ShippingSelector {
    fn from(code: u8) -> Self {
        ShippingSelector::Code(i64::from(code))
    }
}

/// How a model name was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingNote {
    PartialMatch,
    DefaultFallback,
}

impl ShippingNote {
    pub fn message(self) -> &'static str {
        match self {
            ShippingNote::PartialMatch => "Partial match found",
            ShippingNote::DefaultFallback => "Model not found, using default (Vezel)",
        }
    }
}

/// Result of a shipping lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingInfo {
    pub code: u8,
    pub charge: Decimal,
    pub models: Vec<String>,
    pub model: Option<String>,
    pub note: Option<ShippingNote>,
}

impl ShippingInfo {
    fn from_category(
        category: &ShippingCategory,
        model: Option<String>,
        note: Option<ShippingNote>,
    ) -> Self {
        Self {
            code: category.code,
            charge: category.charge,
            models: category.models.iter().map(|m| m.to_string()).collect(),
            model,
            note,
        }
    }

    /// Charge formatted for display, e.g. `¥103,000`.
    pub fn charge_formatted(&self) -> String {
        crate::report::format_yen(self.charge)
    }
}

/// Resolve freight charge and category for a code or model name.
pub fn shipping_info(selector: &ShippingSelector) -> Result<ShippingInfo, PricingError> {
    match selector {
        ShippingSelector::Code(code) => u8::try_from(*code)
            .ok()
            .and_then(shipping_category)
            .map(|category| ShippingInfo::from_category(category, None, None))
            .ok_or(PricingError::InvalidShippingCode(*code)),
        ShippingSelector::Model(input) => shipping_info_for_model(input),
    }
}

fn shipping_info_for_model(input: &str) -> Result<ShippingInfo, PricingError> {
    let model = input.trim();
    let wanted = model.to_lowercase();

    let exact = SHIPPING_CATEGORIES
        .iter()
        .find(|c| c.models.iter().any(|m| m.to_lowercase() == wanted));
    if let Some(category) = exact {
        return Ok(ShippingInfo::from_category(category, Some(model.to_string()), None));
    }

    let mut matching_codes: Vec<u8> = Vec::new();
    for category in &SHIPPING_CATEGORIES {
        let hit = category.models.iter().any(|m| {
            let known = m.to_lowercase();
            known.contains(&wanted) || wanted.contains(&known)
        });
        if hit && !matching_codes.contains(&category.code) {
            matching_codes.push(category.code);
        }
    }

    match matching_codes.as_slice() {
        [code] => {
            debug!(model, code, "partial shipping model match");
            let category = shipping_category(*code).ok_or(PricingError::InvalidShippingCode(i64::from(*code)))?;
            Ok(ShippingInfo::from_category(
                category,
                Some(model.to_string()),
                Some(ShippingNote::PartialMatch),
            ))
        }
        [] => {
            warn!(model, default_code = DEFAULT_SHIPPING_CODE, "model not found, using default shipping");
            let category = shipping_category(DEFAULT_SHIPPING_CODE)
                .ok_or(PricingError::InvalidShippingCode(i64::from(DEFAULT_SHIPPING_CODE)))?;
            Ok(ShippingInfo::from_category(
                category,
                Some(DEFAULT_MODEL.to_string()),
                Some(ShippingNote::DefaultFallback),
            ))
        }
        _ => Err(PricingError::AmbiguousModel {
            input: input.to_string(),
            codes: matching_codes,
        }),
    }
}
