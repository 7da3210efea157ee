use serde::{Deserialize, Serialize};

use super::domain::Receipt;
use super::rules::{RuleKind, ScoringRule};

/// Points a single enabled rule awarded, so totals can be audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleContribution {
    pub rule: RuleKind,
    pub points: u32,
}

/// Stateless evaluator summing the enabled rules. Rule switches may be flipped while the
/// engine is shared; each scoring call reads them afresh.
#[derive(Debug)]
pub struct ScoringRuleEngine {
    rules: Vec<ScoringRule>,
}

impl ScoringRuleEngine {
    /// All seven rules, enabled.
    pub fn standard() -> Self {
        Self::with_disabled(&[])
    }

    pub fn with_disabled(disabled: &[RuleKind]) -> Self {
        let rules = RuleKind::ALL
            .into_iter()
            .map(|kind| ScoringRule::new(kind, !disabled.contains(&kind)))
            .collect();
        Self { rules }
    }

    pub fn set_enabled(&self, kind: RuleKind, enabled: bool) {
        if let Some(rule) = self.rules.iter().find(|rule| rule.kind() == kind) {
            rule.set_enabled(enabled);
        }
    }

    pub fn is_enabled(&self, kind: RuleKind) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.kind() == kind && rule.is_enabled())
    }

    pub fn total(&self, receipt: &Receipt) -> u32 {
        self.rules
            .iter()
            .filter(|rule| rule.is_enabled())
            .map(|rule| rule.evaluate(receipt))
            .fold(0, u32::saturating_add)
    }

    pub fn breakdown(&self, receipt: &Receipt) -> Vec<RuleContribution> {
        self.rules
            .iter()
            .filter(|rule| rule.is_enabled())
            .map(|rule| RuleContribution {
                rule: rule.kind(),
                points: rule.evaluate(receipt),
            })
            .collect()
    }
}

impl Default for ScoringRuleEngine {
    fn default() -> Self {
        Self::standard()
    }
}
