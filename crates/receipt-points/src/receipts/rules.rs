//! The fixed set of point rules. Each rule is a pure function of the receipt; a field
//! that fails to parse costs that rule its points and nothing else.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Item, Receipt};

const ROUND_DOLLAR_POINTS: u32 = 50;
const QUARTER_MULTIPLE_POINTS: u32 = 25;
const POINTS_PER_ITEM_PAIR: u32 = 5;
const ODD_DAY_POINTS: u32 = 6;
const AFTERNOON_POINTS: u32 = 10;
const AFTERNOON_HOURS: std::ops::Range<u32> = 14..16;

/// Names the individual scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    AlphanumericRetailer,
    RoundDollarTotal,
    QuarterMultipleTotal,
    ItemPairs,
    DescriptionLength,
    OddPurchaseDay,
    AfternoonPurchase,
}

impl RuleKind {
    pub const ALL: [RuleKind; 7] = [
        RuleKind::AlphanumericRetailer,
        RuleKind::RoundDollarTotal,
        RuleKind::QuarterMultipleTotal,
        RuleKind::ItemPairs,
        RuleKind::DescriptionLength,
        RuleKind::OddPurchaseDay,
        RuleKind::AfternoonPurchase,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::AlphanumericRetailer => "alphanumeric_retailer",
            RuleKind::RoundDollarTotal => "round_dollar_total",
            RuleKind::QuarterMultipleTotal => "quarter_multiple_total",
            RuleKind::ItemPairs => "item_pairs",
            RuleKind::DescriptionLength => "description_length",
            RuleKind::OddPurchaseDay => "odd_purchase_day",
            RuleKind::AfternoonPurchase => "afternoon_purchase",
        }
    }

    pub fn evaluate(&self, receipt: &Receipt) -> u32 {
        match self {
            RuleKind::AlphanumericRetailer => alphanumeric_retailer(receipt),
            RuleKind::RoundDollarTotal => round_dollar_total(receipt),
            RuleKind::QuarterMultipleTotal => quarter_multiple_total(receipt),
            RuleKind::ItemPairs => item_pairs(receipt),
            RuleKind::DescriptionLength => description_length(receipt),
            RuleKind::OddPurchaseDay => odd_purchase_day(receipt),
            RuleKind::AfternoonPurchase => afternoon_purchase(receipt),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scoring rule '{0}'")]
pub struct RuleKindParseError(pub String);

impl FromStr for RuleKind {
    type Err = RuleKindParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| RuleKindParseError(value.to_string()))
    }
}

/// A rule paired with its switch. The switch is read on every evaluation.
#[derive(Debug)]
pub(crate) struct ScoringRule {
    kind: RuleKind,
    enabled: AtomicBool,
}

impl ScoringRule {
    pub(crate) fn new(kind: RuleKind, enabled: bool) -> Self {
        Self {
            kind,
            enabled: AtomicBool::new(enabled),
        }
    }

    pub(crate) fn kind(&self) -> RuleKind {
        self.kind
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub(crate) fn evaluate(&self, receipt: &Receipt) -> u32 {
        self.kind.evaluate(receipt)
    }
}

/// One point per `[A-Z0-9]` character of the upper-cased retailer name.
pub(crate) fn alphanumeric_retailer(receipt: &Receipt) -> u32 {
    let count = receipt
        .retailer
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

pub(crate) fn round_dollar_total(receipt: &Receipt) -> u32 {
    match parse_amount("total", &receipt.total) {
        Some(total) if total.fraction().is_zero() => ROUND_DOLLAR_POINTS,
        _ => 0,
    }
}

/// Cents after the decimal point, truncated to whole cents, must be 0, 25, 50 or 75.
pub(crate) fn quarter_multiple_total(receipt: &Receipt) -> u32 {
    let Some(total) = parse_amount("total", &receipt.total) else {
        return 0;
    };

    let cents = (total.fraction() * Decimal::ONE_HUNDRED).trunc();
    if (cents % Decimal::from(25)).is_zero() {
        QUARTER_MULTIPLE_POINTS
    } else {
        0
    }
}

pub(crate) fn item_pairs(receipt: &Receipt) -> u32 {
    let pairs = u32::try_from(receipt.items.len() / 2).unwrap_or(u32::MAX);
    pairs.saturating_mul(POINTS_PER_ITEM_PAIR)
}

pub(crate) fn description_length(receipt: &Receipt) -> u32 {
    receipt
        .items
        .iter()
        .map(description_length_points)
        .fold(0, u32::saturating_add)
}

/// `ceil(price * 0.2)` when the trimmed description length is a multiple of three.
pub(crate) fn description_length_points(item: &Item) -> u32 {
    let trimmed = item.short_description.trim();
    if trimmed.chars().count() % 3 != 0 {
        return 0;
    }

    match parse_amount("price", &item.price) {
        Some(Amount::Exact(price)) => {
            let points = (price * Decimal::new(2, 1)).ceil();
            if points.is_sign_positive() && !points.is_zero() {
                points.to_u32().unwrap_or(u32::MAX)
            } else {
                0
            }
        }
        Some(Amount::Oversized { .. }) => u32::MAX,
        None => 0,
    }
}

pub(crate) fn odd_purchase_day(receipt: &Receipt) -> u32 {
    match NaiveDate::parse_from_str(&receipt.purchase_date, "%Y-%m-%d") {
        Ok(date) if date.day() % 2 == 1 => ODD_DAY_POINTS,
        Ok(_) => 0,
        Err(err) => {
            debug!(value = %receipt.purchase_date, %err, "purchase date unparseable; no odd-day points");
            0
        }
    }
}

/// Whole-hour window: 14:00 through 15:59.
pub(crate) fn afternoon_purchase(receipt: &Receipt) -> u32 {
    match NaiveTime::parse_from_str(&receipt.purchase_time, "%H:%M") {
        Ok(time) if AFTERNOON_HOURS.contains(&time.hour()) => AFTERNOON_POINTS,
        Ok(_) => 0,
        Err(err) => {
            debug!(value = %receipt.purchase_time, %err, "purchase time unparseable; no afternoon points");
            0
        }
    }
}

/// A parsed monetary amount. Plain digit strings too wide for `Decimal` keep only
/// their fractional part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Amount {
    Exact(Decimal),
    Oversized { fraction: Decimal },
}

impl Amount {
    fn fraction(&self) -> Decimal {
        match self {
            Amount::Exact(amount) => amount.fract(),
            Amount::Oversized { fraction } => *fraction,
        }
    }
}

fn parse_amount(field: &'static str, raw: &str) -> Option<Amount> {
    let err = match raw.parse::<Decimal>() {
        Ok(amount) => return Some(Amount::Exact(amount)),
        Err(err) => err,
    };

    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, "0"));
    if !is_digits(whole) || !is_digits(fraction) {
        debug!(field, value = raw, %err, "amount unparseable; rule contributes 0");
        return None;
    }

    match format!("0.{fraction}").parse::<Decimal>() {
        Ok(fraction) if whole.trim_start_matches('0').is_empty() => Some(Amount::Exact(fraction)),
        Ok(fraction) => Some(Amount::Oversized { fraction }),
        Err(err) => {
            debug!(field, value = raw, %err, "amount fraction unparseable; rule contributes 0");
            None
        }
    }
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
