//! After-event reconciliation: actual expenses, invoices, and budget variance
//! recorded per sub-event once the parent event is APPROVED.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget::round2;
use crate::error::CoreError;

/// One actual-expense line, with its supporting invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfterEventItem {
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

/// An uploaded invoice attached to an expense line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub url: String,
    pub description: String,
}

/// A photo from the event itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfterEventImage {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// How the actual spend compared to the sanctioned budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AfterEventBudgetStatus {
    Over,
    Under,
    On,
}

impl AfterEventBudgetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AfterEventBudgetStatus::Over => "OVER",
            AfterEventBudgetStatus::Under => "UNDER",
            AfterEventBudgetStatus::On => "ON",
        }
    }
}

impl fmt::Display for AfterEventBudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AfterEventBudgetStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OVER" => Ok(AfterEventBudgetStatus::Over),
            "UNDER" => Ok(AfterEventBudgetStatus::Under),
            "ON" => Ok(AfterEventBudgetStatus::On),
            other => Err(CoreError::Validation(format!(
                "Unknown after-event budget status: {other}"
            ))),
        }
    }
}

/// Validate an after-event submission and return the normalized variance
/// delta to store.
///
/// OVER/UNDER require a positive delta; ON or an absent status force the
/// delta to null regardless of what was sent.
pub fn validate_after_event(
    items: &[AfterEventItem],
    status: Option<AfterEventBudgetStatus>,
    delta: Option<Decimal>,
) -> Result<Option<Decimal>, CoreError> {
    if items.is_empty() {
        return Err(CoreError::Validation(
            "Please add at least one actual-expense line".into(),
        ));
    }
    for item in items {
        if item.description.trim().is_empty() {
            return Err(CoreError::Validation(
                "Each expense line needs a description".into(),
            ));
        }
        if item.amount <= Decimal::ZERO {
            return Err(CoreError::Validation(
                "Expense amounts must be positive".into(),
            ));
        }
        for invoice in &item.invoices {
            if invoice.url.trim().is_empty() {
                return Err(CoreError::Validation("Invoices must have a URL".into()));
            }
            if invoice.description.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Each invoice needs a description".into(),
                ));
            }
        }
    }

    match status {
        Some(AfterEventBudgetStatus::Over) | Some(AfterEventBudgetStatus::Under) => match delta {
            Some(d) if d > Decimal::ZERO => Ok(Some(round2(d))),
            _ => Err(CoreError::Validation(
                "A positive budget delta is required when over or under budget".into(),
            )),
        },
        Some(AfterEventBudgetStatus::On) | None => Ok(None),
    }
}
