//! Runtime configuration from the environment.
//!
//! `.env` is loaded first when present; real environment variables win.

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{AppError, Result};

/// Calculator settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Default LKR per JPY
    pub yen_rate: Decimal,
    /// Default clearing charges, LKR
    pub clearing_charges: Decimal,
    /// Fraction of the LC amount charged by the bank
    pub bank_commission_rate: Decimal,
    /// Added to the exchange rate when converting the TT amount
    pub tt_rate_spread: Decimal,
    pub company_name: String,
    pub company_address: String,
    pub company_phone: String,
    pub quote_validity_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            yen_rate: dec!(2.10),
            clearing_charges: dec!(100000),
            bank_commission_rate: dec!(0.005),
            tt_rate_spread: dec!(0.01),
            company_name: "DNM AUTO".to_string(),
            company_address: "Newtown, Embilipitiya | School Lane, Rukmalgama, Kottawa"
                .to_string(),
            company_phone: "077 847 2900 | 071 346 6099".to_string(),
            quote_validity_days: 7,
        }
    }
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(AppError::Config(format!("failed to read .env: {}", e)));
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            yen_rate: parse_var(&lookup, "LANDED_COST_YEN_RATE", defaults.yen_rate)?,
            clearing_charges: parse_var(
                &lookup,
                "LANDED_COST_CLEARING_CHARGES",
                defaults.clearing_charges,
            )?,
            bank_commission_rate: parse_var(
                &lookup,
                "LANDED_COST_BANK_COMMISSION_RATE",
                defaults.bank_commission_rate,
            )?,
            tt_rate_spread: parse_var(&lookup, "LANDED_COST_TT_RATE_SPREAD", defaults.tt_rate_spread)?,
            company_name: lookup("LANDED_COST_COMPANY_NAME").unwrap_or(defaults.company_name),
            company_address: lookup("LANDED_COST_COMPANY_ADDRESS")
                .unwrap_or(defaults.company_address),
            company_phone: lookup("LANDED_COST_COMPANY_PHONE").unwrap_or(defaults.company_phone),
            quote_validity_days: parse_var(
                &lookup,
                "LANDED_COST_QUOTE_VALIDITY_DAYS",
                defaults.quote_validity_days,
            )?,
        };

        if config.yen_rate <= Decimal::ZERO {
            return Err(AppError::Config(
                "LANDED_COST_YEN_RATE must be greater than zero".to_string(),
            ));
        }
        if config.bank_commission_rate.is_sign_negative() || config.tt_rate_spread.is_sign_negative() {
            return Err(AppError::Config(
                "commission rate and TT spread cannot be negative".to_string(),
            ));
        }

        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{} has invalid value '{}': {}", key, raw, e))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("LANDED_COST_YEN_RATE", "2.05"),
            ("LANDED_COST_CLEARING_CHARGES", "125000"),
            ("LANDED_COST_COMPANY_NAME", "Test Motors"),
            ("LANDED_COST_QUOTE_VALIDITY_DAYS", "14"),
        ]))
        .unwrap();
        assert_eq!(config.yen_rate, dec!(2.05));
        assert_eq!(config.clearing_charges, dec!(125000));
        assert_eq!(config.company_name, "Test Motors");
        assert_eq!(config.quote_validity_days, 14);
        assert_eq!(config.bank_commission_rate, dec!(0.005));
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup_from(&[("LANDED_COST_YEN_RATE", "cheap")])).unwrap_err();
        assert!(err.to_string().contains("LANDED_COST_YEN_RATE"));

        assert!(Config::from_lookup(lookup_from(&[("LANDED_COST_YEN_RATE", "0")])).is_err());
        assert!(
            Config::from_lookup(lookup_from(&[("LANDED_COST_TT_RATE_SPREAD", "-0.01")])).is_err()
        );
    }
}
