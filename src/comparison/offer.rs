use serde::{Deserialize, Serialize};

use crate::amortization::{fee_rate_for_year, loan_year_of_month, EarlyRepayment, LoanRequest};
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::{BankId, LoanType, PaymentConvention};

/// what the borrower asked for, shared by every offer in a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub tenure_months: u32,
    pub payment_convention: PaymentConvention,
    /// month at which the borrower intends to settle the loan in full
    pub early_repayment_month: Option<u32>,
}

impl LoanTerms {
    pub fn new(principal: Money, tenure_months: u32, payment_convention: PaymentConvention) -> Self {
        Self {
            principal,
            tenure_months,
            payment_convention,
            early_repayment_month: None,
        }
    }

    pub fn with_early_repayment_month(mut self, month: u32) -> Self {
        self.early_repayment_month = Some(month);
        self
    }

    /// settle at the end of loan year `year`
    pub fn with_early_repayment_year(mut self, year: u32) -> Self {
        self.early_repayment_month = Some(year.saturating_mul(12));
        self
    }

    pub fn early_repayment_year(&self) -> Option<u32> {
        self.early_repayment_month.map(loan_year_of_month)
    }
}

/// promotional rate valid for tenures from `min_tenure` months upward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTier {
    pub fixed_rate: Rate,
    pub fixed_months: u32,
    pub min_tenure: u32,
}

/// early repayment penalty for a payoff in loan year `year`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyRepaymentFee {
    pub year: u32,
    pub fee_rate: Rate,
}

/// a bank's published rates for one loan product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RateSheet {
    pub rate_tiers: Vec<RateTier>,
    pub floating_rate: Rate,
    #[serde(default)]
    pub early_repayment_fees: Vec<EarlyRepaymentFee>,
}

impl RateSheet {
    /// tier with the largest `min_tenure` not above `tenure_months`,
    /// falling back to the tier with the smallest `min_tenure`
    pub fn select_tier(&self, tenure_months: u32) -> Option<&RateTier> {
        let mut eligible: Option<&RateTier> = None;
        let mut lowest: Option<&RateTier> = None;

        for tier in &self.rate_tiers {
            if tier.min_tenure <= tenure_months
                && eligible.map_or(true, |best| tier.min_tenure > best.min_tenure)
            {
                eligible = Some(tier);
            }
            if lowest.map_or(true, |low| tier.min_tenure < low.min_tenure) {
                lowest = Some(tier);
            }
        }

        eligible.or(lowest)
    }

    /// penalty rate for settling in `loan_year`
    pub fn fee_rate_for_year(&self, loan_year: u32) -> Rate {
        fee_rate_for_year(
            self.early_repayment_fees.iter().map(|fee| (fee.year, &fee.fee_rate)),
            loan_year,
        )
    }
}

/// one candidate bank offer in a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankOffer {
    pub bank_id: BankId,
    pub bank_name: String,
    pub loan_type: Option<LoanType>,
    pub terms: LoanTerms,
    pub rate_sheet: RateSheet,
}

impl BankOffer {
    pub fn new(
        bank_id: impl Into<BankId>,
        bank_name: impl Into<String>,
        terms: LoanTerms,
        rate_sheet: RateSheet,
    ) -> Self {
        Self {
            bank_id: bank_id.into(),
            bank_name: bank_name.into(),
            loan_type: None,
            terms,
            rate_sheet,
        }
    }

    pub fn with_loan_type(mut self, loan_type: LoanType) -> Self {
        self.loan_type = Some(loan_type);
        self
    }

    /// resolve the rate sheet against the borrower's terms
    ///
    /// Fails with `NoApplicableRate` when the sheet has no tiers at all.
    pub fn to_request(&self) -> Result<LoanRequest> {
        let tenure = self.terms.tenure_months;
        let tier = self
            .rate_sheet
            .select_tier(tenure)
            .ok_or_else(|| LoanError::NoApplicableRate {
                bank_id: self.bank_id.clone(),
            })?;

        let early_repayment = self.terms.early_repayment_month.map(|month| {
            let fee_rate = self.rate_sheet.fee_rate_for_year(loan_year_of_month(month));
            EarlyRepayment::new(month, fee_rate)
        });

        Ok(LoanRequest {
            principal: self.terms.principal,
            tenure_months: tenure,
            fixed_rate: tier.fixed_rate,
            // a promotion longer than the loan covers the whole loan
            fixed_months: tier.fixed_months.min(tenure),
            floating_rate: self.rate_sheet.floating_rate,
            payment_convention: self.terms.payment_convention,
            early_repayment,
        })
    }
}
