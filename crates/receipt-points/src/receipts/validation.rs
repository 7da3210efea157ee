use chrono::NaiveDate;
use regex::Regex;
use tracing::warn;

use super::domain::Receipt;

/// Reasons a receipt is turned away before scoring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReceiptViolation {
    #[error("retailer name is invalid: {0:?}")]
    Retailer(String),
    #[error("purchase date is invalid: {0:?}")]
    PurchaseDate(String),
    #[error("purchase time is invalid: {0:?}")]
    PurchaseTime(String),
    #[error("total is invalid: {0:?}")]
    Total(String),
    #[error("receipt has no items")]
    NoItems,
    #[error("item {index} short description is invalid: {value:?}")]
    ItemDescription { index: usize, value: String },
    #[error("item {index} price is invalid: {value:?}")]
    ItemPrice { index: usize, value: String },
}

/// Failure to turn caller input into an acceptable receipt.
#[derive(Debug, thiserror::Error)]
pub enum ReceiptInputError {
    #[error("receipt could not be decoded: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("receipt failed {violations} validation check(s)")]
    Rejected { violations: usize },
}

/// Field-level format checks gating which receipts get scored.
#[derive(Debug, Clone)]
pub struct ReceiptValidator {
    retailer: Regex,
    purchase_time: Regex,
    amount: Regex,
    description: Regex,
}

impl ReceiptValidator {
    pub fn new() -> Self {
        Self {
            retailer: compile(r"^[A-Za-z0-9_ \t\n\f\r\-&]+$"),
            purchase_time: compile(r"^([01][0-9]|2[0-3]):[0-5][0-9]$"),
            amount: compile(r"^[0-9]+\.[0-9]{2}$"),
            description: compile(r"^[A-Za-z0-9_ \t\n\f\r\-]+$"),
        }
    }

    pub fn is_acceptable(&self, receipt: &Receipt) -> bool {
        let violations = self.violations(receipt);
        if violations.is_empty() {
            return true;
        }

        warn!(count = violations.len(), ?violations, "receipt rejected");
        false
    }

    /// Every failed check, in field order.
    pub fn violations(&self, receipt: &Receipt) -> Vec<ReceiptViolation> {
        let mut violations = Vec::new();

        if !self.retailer.is_match(&receipt.retailer) {
            violations.push(ReceiptViolation::Retailer(receipt.retailer.clone()));
        }

        if NaiveDate::parse_from_str(&receipt.purchase_date, "%Y-%m-%d").is_err() {
            violations.push(ReceiptViolation::PurchaseDate(
                receipt.purchase_date.clone(),
            ));
        }

        if !self.purchase_time.is_match(&receipt.purchase_time) {
            violations.push(ReceiptViolation::PurchaseTime(
                receipt.purchase_time.clone(),
            ));
        }

        if !self.amount.is_match(&receipt.total) {
            violations.push(ReceiptViolation::Total(receipt.total.clone()));
        }

        if receipt.items.is_empty() {
            violations.push(ReceiptViolation::NoItems);
        }

        for (index, item) in receipt.items.iter().enumerate() {
            if !self.description.is_match(&item.short_description) {
                violations.push(ReceiptViolation::ItemDescription {
                    index,
                    value: item.short_description.clone(),
                });
            }
            if !self.amount.is_match(&item.price) {
                violations.push(ReceiptViolation::ItemPrice {
                    index,
                    value: item.price.clone(),
                });
            }
        }

        violations
    }
}

impl Default for ReceiptValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("receipt pattern is a valid regex literal")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipts::domain::Item;

    fn receipt() -> Receipt {
        Receipt {
            retailer: "M&M Corner Market".to_string(),
            purchase_date: "2022-03-20".to_string(),
            purchase_time: "14:33".to_string(),
            items: vec![Item {
                short_description: "Gatorade".to_string(),
                price: "2.25".to_string(),
            }],
            total: "2.25".to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_receipts() {
        let validator = ReceiptValidator::new();
        assert!(validator.is_acceptable(&receipt()));
        assert!(validator.violations(&receipt()).is_empty());
    }

    #[test]
    fn reports_every_failed_field() {
        let validator = ReceiptValidator::new();
        let mut bad = receipt();
        bad.retailer = String::new();
        bad.purchase_date = "not A Date".to_string();
        bad.purchase_time = "words".to_string();
        bad.items = vec![
            Item {
                short_description: String::new(),
                price: "FREE!".to_string(),
            },
            receipt().items[0].clone(),
        ];

        let violations = validator.violations(&bad);
        assert_eq!(
            violations,
            vec![
                ReceiptViolation::Retailer(String::new()),
                ReceiptViolation::PurchaseDate("not A Date".to_string()),
                ReceiptViolation::PurchaseTime("words".to_string()),
                ReceiptViolation::ItemDescription {
                    index: 0,
                    value: String::new()
                },
                ReceiptViolation::ItemPrice {
                    index: 0,
                    value: "FREE!".to_string()
                },
            ]
        );
        assert!(!validator.is_acceptable(&bad));
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        let validator = ReceiptValidator::new();
        let mut bad = receipt();
        bad.purchase_date = "2022-17-01".to_string();
        assert!(!validator.is_acceptable(&bad));
    }

    #[test]
    fn purchase_time_must_be_a_24_hour_clock_reading() {
        let validator = ReceiptValidator::new();
        for (time, ok) in [("00:00", true), ("23:59", true), ("24:00", false), ("9:15", false)] {
            let mut candidate = receipt();
            candidate.purchase_time = time.to_string();
            assert_eq!(validator.is_acceptable(&candidate), ok, "time {time}");
        }
    }

    #[test]
    fn amounts_need_exactly_two_decimal_places() {
        let validator = ReceiptValidator::new();
        for (total, ok) in [
            ("9.00", true),
            ("9", false),
            ("9.0", false),
            ("-9.00", false),
            ("\u{0669}.00", false),
        ] {
            let mut candidate = receipt();
            candidate.total = total.to_string();
            assert_eq!(validator.is_acceptable(&candidate), ok, "total {total}");
        }
    }

    #[test]
    fn requires_at_least_one_item() {
        let validator = ReceiptValidator::new();
        let mut bad = receipt();
        bad.items.clear();
        assert_eq!(validator.violations(&bad), vec![ReceiptViolation::NoItems]);
    }

    #[test]
    fn only_ascii_whitespace_separates_words() {
        let validator = ReceiptValidator::new();

        let mut tabbed = receipt();
        tabbed.retailer = "Corner\tMarket".to_string();
        assert!(validator.is_acceptable(&tabbed));

        let mut wide = receipt();
        wide.retailer = "Target\u{00A0}\u{3000}".to_string();
        assert_eq!(
            validator.violations(&wide),
            vec![ReceiptViolation::Retailer("Target\u{00A0}\u{3000}".to_string())]
        );

        let mut em_space = receipt();
        em_space.items[0].short_description = "ab\u{2003}".to_string();
        assert!(!validator.is_acceptable(&em_space));
    }

    #[test]
    fn ampersand_allowed_for_retailer_only() {
        let validator = ReceiptValidator::new();
        let mut bad = receipt();
        bad.items[0].short_description = "Salt & Pepper".to_string();
        assert_eq!(validator.violations(&bad).len(), 1);
    }
}
