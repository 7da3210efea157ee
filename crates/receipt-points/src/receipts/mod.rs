//! Receipt intake and loyalty-point scoring.
//!
//! A submitted receipt is parked in the [`ScoreStore`] as pending, scored off the request
//! path by the [`ScoringRuleEngine`], and then read back by identifier through
//! [`ReceiptProcessor::get_score`].

pub mod domain;
pub mod engine;
pub mod processor;
pub mod router;
pub mod rules;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{IdGenerator, Item, Receipt, ReceiptId, UuidGenerator};
pub use engine::{RuleContribution, ScoringRuleEngine};
pub use processor::{ReceiptProcessor, ScoreLookup};
pub use router::receipt_router;
pub use rules::{RuleKind, RuleKindParseError};
pub use store::{InMemoryScoreStore, ScoreState, ScoreStore};
pub use validation::{ReceiptInputError, ReceiptValidator, ReceiptViolation};
