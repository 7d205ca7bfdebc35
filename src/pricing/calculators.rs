//! Core fee calculation functions.
//!
//! Pure functions for auction fee, handling charge and discount voucher
//! schedules - no reference to the exchange rate or tax rules.
//! Every bracket figure below is a contractual amount in JPY.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::services::PricingError;

/// Round to specified decimal places, halves away from zero.
///
/// Matches how the quotation figures have always been presented
/// (`1.005` becomes `1.01`, `-2.5` becomes `-3`).
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use landed_cost::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// assert_eq!(round_money(dec!(1.235), 2), dec!(1.24));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Reject negative monetary or capacity inputs.
pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, PricingError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PricingError::InvalidAmount { field, value });
    }
    Ok(value)
}

/// Sum of amounts, `None` when one is missing or the total overflows.
pub(crate) fn checked_sum<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount?))
}

/// How a bracket limit compares against the amount being looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpperBound {
    /// `amount < limit`
    Exclusive,
    /// `amount <= limit`
    Inclusive,
}

/// Step table of `(limit, charge)` pairs in ascending limit order.
#[derive(Debug, Clone, Copy)]
pub struct StepSchedule {
    bound: UpperBound,
    brackets: &'static [(Decimal, Decimal)],
}

impl StepSchedule {
    pub const fn new(bound: UpperBound, brackets: &'static [(Decimal, Decimal)]) -> Self {
        Self { bound, brackets }
    }

    /// Charge of the first bracket that contains `amount`, `None` above the top limit.
    pub fn lookup(&self, amount: Decimal) -> Option<Decimal> {
        self.brackets
            .iter()
            .find(|(limit, _)| match self.bound {
                UpperBound::Exclusive => amount < *limit,
                UpperBound::Inclusive => amount <= *limit,
            })
            .map(|(_, charge)| *charge)
    }
}

// ==================== Auction fee ====================

const AUCTION_FEE: StepSchedule = StepSchedule::new(
    UpperBound::Exclusive,
    &[
        (dec!(1500000), dec!(300000)),
        (dec!(2000000), dec!(350000)),
        (dec!(2500000), dec!(400000)),
        (dec!(3000000), dec!(450000)),
    ],
);

const AUCTION_FEE_ABOVE_TOP: Decimal = dec!(500000);

/// Auction deposit charged for a winning bid.
///
/// Brackets use strictly-less-than bounds, so a bid of exactly 1,500,000
/// already pays the second bracket.
pub fn auction_fee(winning_bid: Decimal) -> Result<Decimal, PricingError> {
    let bid = ensure_non_negative("Winning bid", winning_bid)?;
    Ok(AUCTION_FEE.lookup(bid).unwrap_or(AUCTION_FEE_ABOVE_TOP))
}

/// Human readable bracket name for the auction fee.
pub fn auction_fee_bracket(winning_bid: Decimal) -> &'static str {
    if winning_bid < dec!(1500000) {
        "Under ¥1.5M"
    } else if winning_bid < dec!(2000000) {
        "¥1.5M - ¥2M"
    } else if winning_bid < dec!(2500000) {
        "¥2M - ¥2.5M"
    } else if winning_bid < dec!(3000000) {
        "¥2.5M - ¥3M"
    } else {
        "Over ¥3M"
    }
}

// ==================== Handling charge ====================

/// Exporter whose handling schedule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "ExporterRepr")]
pub enum Exporter {
    /// Handling plus freight forwarding, linear excess above ¥3M.
    #[default]
    Autocom,
    /// FOB schedule with warranty surcharge and a discount voucher.
    Icm,
}

impl Exporter {
    pub fn code(self) -> u8 {
        match self {
            Exporter::Autocom => 1,
            Exporter::Icm => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Exporter::Autocom => "AUTOCOM",
            Exporter::Icm => "ICM",
        }
    }
}

impl fmt::Display for Exporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for Exporter {
    type Error = PricingError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Exporter::Autocom),
            2 => Ok(Exporter::Icm),
            other => Err(PricingError::InvalidExporter(other.to_string())),
        }
    }
}

impl FromStr for Exporter {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "autocom" => Ok(Exporter::Autocom),
            "2" | "icm" | "fob" => Ok(Exporter::Icm),
            _ => Err(PricingError::InvalidExporter(s.to_string())),
        }
    }
}

/// Wire form accepted for an exporter: numeric code or name.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExporterRepr {
    Code(i64),
    Name(String),
}

impl TryFrom<ExporterRepr> for Exporter {
    type Error = PricingError;

    fn try_from(repr: ExporterRepr) -> Result<Self, Self::Error> {
        match repr {
            ExporterRepr::Code(code) => Exporter::try_from(code),
            ExporterRepr::Name(name) => name.parse(),
        }
    }
}

const AUTOCOM_HANDLING: StepSchedule = StepSchedule::new(
    UpperBound::Inclusive,
    &[
        (dec!(1000000), dec!(217000)),
        (dec!(1500000), dec!(227000)),
        (dec!(2000000), dec!(247000)),
        (dec!(2500000), dec!(267000)),
        (dec!(3000000), dec!(287000)),
    ],
);

const AUTOCOM_EXCESS_BASE: Decimal = dec!(287000);
const AUTOCOM_EXCESS_FROM: Decimal = dec!(3000000);
const AUTOCOM_EXCESS_STEP: Decimal = dec!(500000);
const AUTOCOM_EXCESS_INCREMENT: Decimal = dec!(20000);

const ICM_HANDLING: StepSchedule = StepSchedule::new(
    UpperBound::Inclusive,
    &[
        (dec!(1000000), dec!(155000)),
        (dec!(1500000), dec!(165000)),
        (dec!(2000000), dec!(170000)),
        (dec!(2500000), dec!(185000)),
        (dec!(3000000), dec!(195000)),
        (dec!(3500000), dec!(210000)),
        (dec!(4000000), dec!(220000)),
        (dec!(4500000), dec!(240000)),
        (dec!(5000000), dec!(255000)),
        (dec!(5500000), dec!(270000)),
        (dec!(6000000), dec!(280000)),
        (dec!(6500000), dec!(295000)),
        (dec!(7000000), dec!(305000)),
        (dec!(7500000), dec!(320000)),
        (dec!(8000000), dec!(330000)),
        (dec!(8500000), dec!(345000)),
        (dec!(9000000), dec!(355000)),
        (dec!(9500000), dec!(370000)),
        (dec!(10000000), dec!(380000)),
        (dec!(12000000), dec!(450000)),
    ],
);

/// Warranty cost added to every ICM handling charge.
pub const ICM_WARRANTY_SURCHARGE: Decimal = dec!(3000);

/// Handling charge for a winning bid under the given exporter's schedule.
///
/// AUTOCOM bids above ¥3M pay `287,000 + ceil(excess / 500,000) * 20,000`.
/// ICM bids above ¥12M are not allowed; the bracket charge falls to zero and
/// only the warranty surcharge remains.
pub fn handling_charge(winning_bid: Decimal, exporter: Exporter) -> Result<Decimal, PricingError> {
    let bid = ensure_non_negative("Winning bid", winning_bid)?;

    let charge = match exporter {
        Exporter::Autocom => match AUTOCOM_HANDLING.lookup(bid) {
            Some(charge) => charge,
            None => {
                let steps = ((bid - AUTOCOM_EXCESS_FROM) / AUTOCOM_EXCESS_STEP).ceil();
                steps
                    .checked_mul(AUTOCOM_EXCESS_INCREMENT)
                    .and_then(|excess| excess.checked_add(AUTOCOM_EXCESS_BASE))
                    .ok_or(PricingError::Overflow("Handling charge"))?
            }
        },
        Exporter::Icm => {
            let fob = ICM_HANDLING.lookup(bid).unwrap_or_else(|| {
                warn!(
                    winning_bid = %bid,
                    "bid above the ICM schedule, handling bracket charge is zero"
                );
                Decimal::ZERO
            });
            fob + ICM_WARRANTY_SURCHARGE
        }
    };

    Ok(charge)
}

/// Human readable bracket name for the handling charge.
pub fn handling_fee_bracket(winning_bid: Decimal) -> &'static str {
    if winning_bid <= dec!(1000000) {
        "Under ¥1M"
    } else if winning_bid <= dec!(1500000) {
        "¥1M - ¥1.5M"
    } else if winning_bid <= dec!(2000000) {
        "¥1.5M - ¥2M"
    } else if winning_bid <= dec!(2500000) {
        "¥2M - ¥2.5M"
    } else if winning_bid <= dec!(3000000) {
        "¥2.5M - ¥3M"
    } else {
        "Over ¥3M"
    }
}

// ==================== Discount voucher ====================

const DISCOUNT_VOUCHER: StepSchedule = StepSchedule::new(
    UpperBound::Inclusive,
    &[
        (dec!(1000000), dec!(80000)),
        (dec!(1500000), dec!(90000)),
        (dec!(2000000), dec!(95000)),
        (dec!(2500000), dec!(105000)),
        (dec!(3000000), dec!(115000)),
        (dec!(3500000), dec!(130000)),
        (dec!(4000000), dec!(140000)),
        (dec!(4500000), dec!(160000)),
        (dec!(5000000), dec!(170000)),
        (dec!(5500000), dec!(180000)),
        (dec!(6000000), dec!(190000)),
        (dec!(6500000), dec!(205000)),
        (dec!(7000000), dec!(215000)),
        (dec!(7500000), dec!(230000)),
        (dec!(8000000), dec!(240000)),
        (dec!(8500000), dec!(250000)),
        (dec!(9000000), dec!(260000)),
        (dec!(9500000), dec!(270000)),
        (dec!(10000000), dec!(280000)),
        (dec!(12000000), dec!(300000)),
    ],
);

/// Maximum discount voucher allowed for an auction price.
///
/// Returns `None` for prices below 1 and `Some(0)` above the top bracket.
pub fn max_discount_voucher(auction_price: Decimal) -> Option<Decimal> {
    if auction_price < Decimal::ONE {
        return None;
    }
    Some(DISCOUNT_VOUCHER.lookup(auction_price).unwrap_or(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(3));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(-2.5), 0), dec!(-3));
        assert_eq!(round_money(dec!(1.005), 2), dec!(1.01));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
        assert_eq!(round_money(dec!(999999.995), 2), dec!(1000000.00));
    }

    // ==================== auction_fee tests ====================

    #[test]
    fn test_auction_fee_first_bracket() {
        assert_eq!(auction_fee(dec!(0)).unwrap(), dec!(300000));
        assert_eq!(auction_fee(dec!(850000)).unwrap(), dec!(300000));
        assert_eq!(auction_fee(dec!(1499999)).unwrap(), dec!(300000));
    }

    #[test]
    fn test_auction_fee_boundaries_are_exclusive() {
        assert_eq!(auction_fee(dec!(1500000)).unwrap(), dec!(350000));
        assert_eq!(auction_fee(dec!(2000000)).unwrap(), dec!(400000));
        assert_eq!(auction_fee(dec!(2500000)).unwrap(), dec!(450000));
        assert_eq!(auction_fee(dec!(2999999.99)).unwrap(), dec!(450000));
        assert_eq!(auction_fee(dec!(3000000)).unwrap(), dec!(500000));
        assert_eq!(auction_fee(dec!(25000000)).unwrap(), dec!(500000));
    }

    #[test]
    fn test_auction_fee_negative_bid() {
        let err = auction_fee(dec!(-1)).unwrap_err();
        assert_eq!(err.to_string(), "Winning bid must be a positive number");
    }

    #[test]
    fn test_auction_fee_bracket_labels() {
        assert_eq!(auction_fee_bracket(dec!(1499999)), "Under ¥1.5M");
        assert_eq!(auction_fee_bracket(dec!(1500000)), "¥1.5M - ¥2M");
        assert_eq!(auction_fee_bracket(dec!(3000000)), "Over ¥3M");
    }

    // ==================== handling_charge tests ====================

    #[test]
    fn test_autocom_brackets_are_inclusive() {
        let h = |bid| handling_charge(bid, Exporter::Autocom).unwrap();
        assert_eq!(h(dec!(1000000)), dec!(217000));
        assert_eq!(h(dec!(1000001)), dec!(227000));
        assert_eq!(h(dec!(1500000)), dec!(227000));
        assert_eq!(h(dec!(2000000)), dec!(247000));
        assert_eq!(h(dec!(2500000)), dec!(267000));
        assert_eq!(h(dec!(3000000)), dec!(287000));
    }

    #[test]
    fn test_autocom_excess_above_three_million() {
        let h = |bid| handling_charge(bid, Exporter::Autocom).unwrap();
        // ceil(1 / 500000) = 1 step
        assert_eq!(h(dec!(3000001)), dec!(307000));
        assert_eq!(h(dec!(3500000)), dec!(307000));
        // ceil(500001 / 500000) = 2 steps
        assert_eq!(h(dec!(3500001)), dec!(327000));
        assert_eq!(h(dec!(5000000)), dec!(367000));
    }

    #[test]
    fn test_icm_schedule_adds_warranty() {
        let h = |bid| handling_charge(bid, Exporter::Icm).unwrap();
        assert_eq!(h(dec!(0)), dec!(158000));
        assert_eq!(h(dec!(1000000)), dec!(158000));
        assert_eq!(h(dec!(1000001)), dec!(168000));
        assert_eq!(h(dec!(6200000)), dec!(298000));
        assert_eq!(h(dec!(10000000)), dec!(383000));
        assert_eq!(h(dec!(10000001)), dec!(453000));
        assert_eq!(h(dec!(12000000)), dec!(453000));
    }

    #[test]
    fn test_icm_above_top_bracket_keeps_only_warranty() {
        assert_eq!(
            handling_charge(dec!(12000001), Exporter::Icm).unwrap(),
            ICM_WARRANTY_SURCHARGE
        );
    }

    #[test]
    fn test_handling_negative_bid() {
        assert!(matches!(
            handling_charge(dec!(-5), Exporter::Icm),
            Err(PricingError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_handling_fee_bracket_labels() {
        assert_eq!(handling_fee_bracket(dec!(1000000)), "Under ¥1M");
        assert_eq!(handling_fee_bracket(dec!(1000001)), "¥1M - ¥1.5M");
        assert_eq!(handling_fee_bracket(dec!(3000001)), "Over ¥3M");
    }

    // ==================== Exporter tests ====================

    #[test]
    fn test_exporter_parsing() {
        assert_eq!("1".parse::<Exporter>().unwrap(), Exporter::Autocom);
        assert_eq!("AUTOCOM".parse::<Exporter>().unwrap(), Exporter::Autocom);
        assert_eq!("icm".parse::<Exporter>().unwrap(), Exporter::Icm);
        assert_eq!(Exporter::try_from(2).unwrap(), Exporter::Icm);
        assert!("3".parse::<Exporter>().is_err());
    }

    #[test]
    fn test_exporter_serde() {
        let e: Exporter = serde_json::from_str("2").unwrap();
        assert_eq!(e, Exporter::Icm);
        let e: Exporter = serde_json::from_str("\"autocom\"").unwrap();
        assert_eq!(e, Exporter::Autocom);
        assert_eq!(serde_json::to_string(&Exporter::Icm).unwrap(), "\"ICM\"");
        assert!(serde_json::from_str::<Exporter>("7").is_err());
    }

    // ==================== max_discount_voucher tests ====================

    #[test]
    fn test_voucher_brackets() {
        assert_eq!(max_discount_voucher(dec!(1)), Some(dec!(80000)));
        assert_eq!(max_discount_voucher(dec!(1000000)), Some(dec!(80000)));
        assert_eq!(max_discount_voucher(dec!(1000001)), Some(dec!(90000)));
        assert_eq!(max_discount_voucher(dec!(4200000)), Some(dec!(160000)));
        assert_eq!(max_discount_voucher(dec!(12000000)), Some(dec!(300000)));
    }

    #[test]
    fn test_voucher_above_top_is_zero() {
        assert_eq!(max_discount_voucher(dec!(12000001)), Some(Decimal::ZERO));
    }

    #[test]
    fn test_voucher_invalid_price_is_none() {
        assert_eq!(max_discount_voucher(dec!(0)), None);
        assert_eq!(max_discount_voucher(dec!(0.5)), None);
        assert_eq!(max_discount_voucher(dec!(-100)), None);
    }
}
