//! The budget ledger: validation and totalling of per-item breakdowns.
//!
//! Pure functions with no side effects, invoked by sub-event creation, POC
//! acceptance, and after-event reconciliation. All amounts are normalized to
//! two decimal places with half-up rounding before comparison; mismatches are
//! exact after rounding, there is no tolerance band.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One line of a sub-event's itemized budget breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub description: String,
    pub amount: Decimal,
}

/// One funding source. Inflows carry an independent total and are never
/// cross-checked against the outflow breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflowItem {
    pub description: String,
    pub amount: Decimal,
}

/// Evidentiary attachment for a budget. The URL is an opaque string returned
/// by the upload endpoint; nothing beyond non-emptiness is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPhoto {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Normalize an amount to two decimal places, rounding half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum of all item amounts, normalized.
pub fn total(items: &[BudgetItem]) -> Decimal {
    round2(items.iter().map(|item| item.amount).sum())
}

/// Validate an itemized breakdown against its declared head total.
///
/// Fails if the head is not positive, the breakdown is empty, any line has a
/// blank description or non-positive amount, or the rounded sum does not
/// exactly equal the rounded head.
pub fn validate_breakdown(head: Decimal, items: &[BudgetItem]) -> Result<(), CoreError> {
    if head <= Decimal::ZERO {
        return Err(CoreError::Validation(
            "Budget head must be greater than zero".into(),
        ));
    }
    if items.is_empty() {
        return Err(CoreError::Validation(
            "Please add at least one budget line item".into(),
        ));
    }

    let mut sum = Decimal::ZERO;
    for item in items {
        if item.description.trim().is_empty() {
            return Err(CoreError::Validation(
                "Each budget line needs a description".into(),
            ));
        }
        if item.amount <= Decimal::ZERO {
            return Err(CoreError::Validation(
                "Budget line amounts must be positive".into(),
            ));
        }
        sum += round2(item.amount);
    }

    if sum != round2(head) {
        return Err(CoreError::Validation(
            "Budget breakdown must add up to the budget head.".into(),
        ));
    }

    Ok(())
}

/// Validate funding sources. Same per-line rules as the outflow breakdown,
/// but with no head to reconcile against.
pub fn validate_inflows(items: &[InflowItem]) -> Result<(), CoreError> {
    for item in items {
        if item.description.trim().is_empty() {
            return Err(CoreError::Validation(
                "Each inflow line needs a description".into(),
            ));
        }
        if item.amount <= Decimal::ZERO {
            return Err(CoreError::Validation(
                "Inflow amounts must be positive".into(),
            ));
        }
    }
    Ok(())
}

/// Validate photo attachments: every entry must carry a URL.
pub fn validate_photos(photos: &[BudgetPhoto]) -> Result<(), CoreError> {
    if photos.iter().any(|p| p.url.trim().is_empty()) {
        return Err(CoreError::Validation(
            "Budget photos must have a URL".into(),
        ));
    }
    Ok(())
}
