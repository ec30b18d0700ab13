pub mod offer;
pub mod parallel;
pub mod record;
pub mod summary;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::amortization::{compute_amortization_with, ScheduleEntry};
use crate::config::ComparisonConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::{BankId, LoanType};

pub use offer::{BankOffer, EarlyRepaymentFee, LoanTerms, RateSheet, RateTier};
pub use parallel::maybe_parallel_map;
pub use record::ComparisonRecord;
pub use summary::{SummaryEntry, SummaryPayload};

/// one priced offer, bank identity plus the flattened loan summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub bank_id: BankId,
    pub bank_name: String,
    pub loan_type: Option<LoanType>,
    pub terms: LoanTerms,
    pub fixed_rate: Rate,
    pub fixed_months: u32,
    pub floating_rate: Rate,
    pub early_repayment_fee_rate: Rate,
    pub monthly_payment_fixed: Option<Money>,
    pub monthly_payment_floating: Option<Money>,
    pub total_interest: Money,
    pub early_repayment_fee: Money,
    pub total_cost: Money,
    pub schedule: Vec<ScheduleEntry>,
}

impl ComparisonResult {
    pub fn first_monthly_payment(&self) -> Option<Money> {
        self.monthly_payment_fixed.or(self.monthly_payment_floating)
    }
}

/// offer excluded from a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedOffer {
    pub bank_id: BankId,
    pub bank_name: String,
    pub reason: LoanError,
}

/// ranked comparison, never empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    results: Vec<ComparisonResult>,
    dropped: Vec<DroppedOffer>,
    cost_spread: Money,
    cost_spread_percent: Decimal,
    summary_top_n: usize,
}

impl ComparisonReport {
    fn new(
        mut results: Vec<ComparisonResult>,
        dropped: Vec<DroppedOffer>,
        summary_top_n: usize,
    ) -> Result<Self> {
        if results.is_empty() {
            return Err(LoanError::EmptyOfferSet);
        }

        // stable: equal costs keep offer order
        results.sort_by(|a, b| a.total_cost.cmp(&b.total_cost));

        let best = results[0].total_cost;
        let worst = results[results.len() - 1].total_cost;
        let cost_spread = worst - best;
        let cost_spread_percent = if best.is_zero() {
            Decimal::ZERO
        } else {
            cost_spread.as_decimal() / best.as_decimal() * Decimal::ONE_HUNDRED
        };

        Ok(Self {
            results,
            dropped,
            cost_spread,
            cost_spread_percent,
            summary_top_n,
        })
    }

    /// results ascending by total cost
    pub fn results(&self) -> &[ComparisonResult] {
        &self.results
    }

    /// offers excluded for lack of an applicable rate
    pub fn dropped(&self) -> &[DroppedOffer] {
        &self.dropped
    }

    /// cheapest offer
    pub fn best(&self) -> &ComparisonResult {
        &self.results[0]
    }

    /// costliest offer
    pub fn worst(&self) -> &ComparisonResult {
        &self.results[self.results.len() - 1]
    }

    /// worst.total_cost - best.total_cost
    pub fn cost_spread(&self) -> Money {
        self.cost_spread
    }

    /// cost_spread as a percentage of best.total_cost
    pub fn cost_spread_percent(&self) -> Decimal {
        self.cost_spread_percent
    }

    /// the `n` cheapest results
    pub fn top(&self, n: usize) -> &[ComparisonResult] {
        &self.results[..n.min(self.results.len())]
    }

    /// payload for the summary generator, top slice sized by the report's configuration
    pub fn summary_payload(&self) -> SummaryPayload {
        SummaryPayload::from_report(self, self.summary_top_n)
    }

    pub fn into_results(self) -> Vec<ComparisonResult> {
        self.results
    }
}

enum OfferOutcome {
    Priced(ComparisonResult),
    Dropped(DroppedOffer),
    Failed(LoanError),
}

/// rank offers with the default configuration
pub fn compare_offers(offers: &[BankOffer]) -> Result<ComparisonReport> {
    compare_offers_with(offers, &ComparisonConfig::default())
}

/// rank offers by total cost
pub fn compare_offers_with(offers: &[BankOffer], config: &ComparisonConfig) -> Result<ComparisonReport> {
    if offers.is_empty() {
        return Err(LoanError::EmptyOfferSet);
    }
    config.validate()?;

    let outcomes = maybe_parallel_map(offers, config, |offer| price_offer(offer, config));

    let mut results = Vec::with_capacity(offers.len());
    let mut dropped = Vec::new();
    for outcome in outcomes {
        match outcome {
            OfferOutcome::Priced(result) => results.push(result),
            OfferOutcome::Dropped(offer) => dropped.push(offer),
            OfferOutcome::Failed(err) => return Err(err),
        }
    }

    let report = ComparisonReport::new(results, dropped, config.summary_top_n)?;
    debug!(
        offers = offers.len(),
        ranked = report.results().len(),
        dropped = report.dropped().len(),
        best = %report.best().bank_id,
        cost_spread = %report.cost_spread(),
        "ranked offers"
    );
    Ok(report)
}

fn price_offer(offer: &BankOffer, config: &ComparisonConfig) -> OfferOutcome {
    let request = match offer.to_request() {
        Ok(request) => request,
        Err(reason @ LoanError::NoApplicableRate { .. }) => {
            return OfferOutcome::Dropped(DroppedOffer {
                bank_id: offer.bank_id.clone(),
                bank_name: offer.bank_name.clone(),
                reason,
            });
        }
        Err(err) => return OfferOutcome::Failed(err),
    };

    match compute_amortization_with(&request, config) {
        Ok(summary) => OfferOutcome::Priced(ComparisonResult {
            bank_id: offer.bank_id.clone(),
            bank_name: offer.bank_name.clone(),
            loan_type: offer.loan_type,
            terms: offer.terms.clone(),
            fixed_rate: request.fixed_rate,
            fixed_months: request.fixed_months,
            floating_rate: request.floating_rate,
            early_repayment_fee_rate: request
                .early_repayment
                .map(|early| early.fee_rate)
                .unwrap_or(Rate::ZERO),
            monthly_payment_fixed: summary.monthly_payment_fixed,
            monthly_payment_floating: summary.monthly_payment_floating,
            total_interest: summary.total_interest,
            early_repayment_fee: summary.early_repayment_fee,
            total_cost: summary.total_cost,
            schedule: summary.schedule,
        }),
        Err(err) => OfferOutcome::Failed(err),
    }
}
