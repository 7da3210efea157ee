use clap::Args;
use receipt_points::config::AppConfig;
use receipt_points::error::AppError;
use receipt_points::receipts::{
    Receipt, ReceiptInputError, ReceiptValidator, RuleContribution, ScoringRuleEngine,
};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to a receipt JSON document
    pub(crate) path: PathBuf,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let raw = fs::read_to_string(&args.path)?;
    let receipt = Receipt::from_json(&raw)?;

    let validator = ReceiptValidator::new();
    let violations = validator.violations(&receipt);
    if !violations.is_empty() {
        println!("Receipt {} is invalid", args.path.display());
        for violation in &violations {
            println!("- {violation}");
        }
        return Err(ReceiptInputError::Rejected {
            violations: violations.len(),
        }
        .into());
    }

    let engine = ScoringRuleEngine::with_disabled(&config.scoring.disabled_rules);
    let breakdown = engine.breakdown(&receipt);
    print!("{}", render_breakdown(&receipt, &breakdown));

    Ok(())
}

fn render_breakdown(receipt: &Receipt, breakdown: &[RuleContribution]) -> String {
    let mut out = format!(
        "Receipt from {} on {} at {} ({} items, total {})\n",
        receipt.retailer,
        receipt.purchase_date,
        receipt.purchase_time,
        receipt.items.len(),
        receipt.total
    );

    for contribution in breakdown {
        out.push_str(&format!(
            "- {:<24} {:>4}\n",
            contribution.rule.name(),
            contribution.points
        ));
    }

    let total: u32 = breakdown.iter().map(|c| c.points).sum();
    out.push_str(&format!("Total points: {total}\n"));
    out
}
