use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{BankId, PaymentConvention};

use super::ComparisonResult;

/// row handed to the persistence collaborator for a saved comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub id: Uuid,
    pub bank_id: BankId,
    pub loan_amount: Money,
    pub tenure_months: u32,
    pub payment_method: PaymentConvention,
    pub monthly_payment_fixed: Money,
    /// falls back to the fixed payment when the loan never leaves the promotion
    pub monthly_payment_float: Money,
    pub total_interest: Money,
    pub early_repayment_year: Option<u32>,
    pub early_repayment_fee: Money,
    pub total_cost: Money,
    pub created_at: DateTime<Utc>,
}

impl ComparisonRecord {
    pub fn from_result(result: &ComparisonResult, time: &SafeTimeProvider) -> Self {
        let fixed = result.monthly_payment_fixed;
        let floating = result.monthly_payment_floating;

        Self {
            id: Uuid::new_v4(),
            bank_id: result.bank_id.clone(),
            loan_amount: result.terms.principal,
            tenure_months: result.terms.tenure_months,
            payment_method: result.terms.payment_convention,
            monthly_payment_fixed: fixed.unwrap_or(Money::ZERO),
            monthly_payment_float: floating.or(fixed).unwrap_or(Money::ZERO),
            total_interest: result.total_interest,
            early_repayment_year: result.terms.early_repayment_year(),
            early_repayment_fee: result.early_repayment_fee,
            total_cost: result.total_cost,
            created_at: time.now(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
