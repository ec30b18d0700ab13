use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::BankId;

use super::{ComparisonReport, ComparisonResult};

/// one offer as handed to the text-summary generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub bank_id: BankId,
    pub bank_name: String,
    pub fixed_rate: Rate,
    pub floating_rate: Rate,
    pub monthly_payment: Option<Money>,
    pub total_interest: Money,
    pub total_cost: Money,
}

impl From<&ComparisonResult> for SummaryEntry {
    fn from(result: &ComparisonResult) -> Self {
        Self {
            bank_id: result.bank_id.clone(),
            bank_name: result.bank_name.clone(),
            fixed_rate: result.fixed_rate,
            floating_rate: result.floating_rate,
            monthly_payment: result.first_monthly_payment(),
            total_interest: result.total_interest,
            total_cost: result.total_cost,
        }
    }
}

/// plain-data input for the natural-language summary collaborator
///
/// Numbers are passed through unformatted; wording and localisation belong to
/// the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPayload {
    pub top: Vec<SummaryEntry>,
    pub best: SummaryEntry,
    pub worst: SummaryEntry,
    pub cost_spread: Money,
    pub cost_spread_percent: Decimal,
    pub offers_compared: usize,
}

impl SummaryPayload {
    pub fn from_report(report: &ComparisonReport, top_n: usize) -> Self {
        Self {
            top: report.top(top_n).iter().map(SummaryEntry::from).collect(),
            best: report.best().into(),
            worst: report.worst().into(),
            cost_spread: report.cost_spread(),
            cost_spread_percent: report.cost_spread_percent(),
            offers_compared: report.results().len(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
