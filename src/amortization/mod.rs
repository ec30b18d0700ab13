pub mod annuity;
pub mod early_repayment;
pub mod schedule;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ComparisonConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::{PaymentConvention, RatePeriod};

pub use annuity::annuity_payment;
pub use early_repayment::{fee_rate_for_year, loan_year_of_month, EarlyRepayment};
pub use schedule::ScheduleEntry;

/// longest tenure accepted (100 years)
pub const MAX_TENURE_MONTHS: u32 = 1_200;

/// loan parameters for a single bank/rate combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: Money,
    pub tenure_months: u32,
    /// annual rate during the promotional period
    pub fixed_rate: Rate,
    /// length of the promotional period, within `[0, tenure_months]`
    pub fixed_months: u32,
    /// annual rate after the promotional period
    pub floating_rate: Rate,
    pub payment_convention: PaymentConvention,
    pub early_repayment: Option<EarlyRepayment>,
}

impl LoanRequest {
    pub fn builder() -> LoanRequestBuilder {
        LoanRequestBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(LoanError::invalid_input(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if self.tenure_months == 0 {
            return Err(LoanError::invalid_input("tenure must be at least one month"));
        }
        if self.tenure_months > MAX_TENURE_MONTHS {
            return Err(LoanError::invalid_input(format!(
                "tenure of {} months exceeds {}",
                self.tenure_months, MAX_TENURE_MONTHS
            )));
        }
        if self.fixed_months > self.tenure_months {
            return Err(LoanError::invalid_input(format!(
                "fixed period of {} months exceeds tenure of {} months",
                self.fixed_months, self.tenure_months
            )));
        }
        if self.fixed_rate.is_negative() || self.floating_rate.is_negative() {
            return Err(LoanError::invalid_input("interest rates must not be negative"));
        }
        if let Some(early) = &self.early_repayment {
            if early.month == 0 {
                return Err(LoanError::invalid_input("early repayment month must be at least 1"));
            }
            if early.fee_rate.is_negative() {
                return Err(LoanError::invalid_input("early repayment fee must not be negative"));
            }
        }
        Ok(())
    }

    /// month the loan is settled early, if that happens within the tenure
    pub fn payoff_month(&self) -> Option<u32> {
        self.early_repayment
            .map(|early| early.month)
            .filter(|month| *month <= self.tenure_months)
    }

    /// months that actually run before the schedule ends
    pub fn effective_tenure(&self) -> u32 {
        self.payoff_month().unwrap_or(self.tenure_months)
    }

    /// rate window and annual rate in force for a 1-indexed month
    pub fn rate_for_month(&self, month: u32) -> (RatePeriod, Rate) {
        if month <= self.fixed_months {
            (RatePeriod::Fixed, self.fixed_rate)
        } else {
            (RatePeriod::Floating, self.floating_rate)
        }
    }
}

/// builder for loan requests
#[derive(Debug, Clone, Default)]
pub struct LoanRequestBuilder {
    principal: Option<Money>,
    tenure_months: Option<u32>,
    fixed_rate: Option<Rate>,
    fixed_months: u32,
    floating_rate: Option<Rate>,
    payment_convention: Option<PaymentConvention>,
    early_repayment: Option<EarlyRepayment>,
}

impl LoanRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn tenure_months(mut self, months: u32) -> Self {
        self.tenure_months = Some(months);
        self
    }

    /// promotional rate and its length in months
    pub fn fixed(mut self, rate: Rate, months: u32) -> Self {
        self.fixed_rate = Some(rate);
        self.fixed_months = months;
        self
    }

    pub fn floating_rate(mut self, rate: Rate) -> Self {
        self.floating_rate = Some(rate);
        self
    }

    pub fn payment_convention(mut self, convention: PaymentConvention) -> Self {
        self.payment_convention = Some(convention);
        self
    }

    pub fn early_repayment(mut self, early: EarlyRepayment) -> Self {
        self.early_repayment = Some(early);
        self
    }

    pub fn build(self) -> Result<LoanRequest> {
        let principal = self
            .principal
            .ok_or_else(|| LoanError::invalid_input("principal is required"))?;
        let tenure_months = self
            .tenure_months
            .ok_or_else(|| LoanError::invalid_input("tenure is required"))?;
        let floating_rate = self
            .floating_rate
            .ok_or_else(|| LoanError::invalid_input("floating rate is required"))?;

        let request = LoanRequest {
            principal,
            tenure_months,
            fixed_rate: self.fixed_rate.unwrap_or(Rate::ZERO),
            fixed_months: self.fixed_months,
            floating_rate,
            payment_convention: self
                .payment_convention
                .unwrap_or(PaymentConvention::DecliningBalance),
            early_repayment: self.early_repayment,
        };
        request.validate()?;
        Ok(request)
    }
}

/// totals and schedule for one loan request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub principal: Money,
    pub payment_convention: PaymentConvention,
    /// payment during the promotional period, `None` if no installment falls in it
    pub monthly_payment_fixed: Option<Money>,
    /// payment after the promotional period, `None` if no installment falls in it
    pub monthly_payment_floating: Option<Money>,
    pub total_interest: Money,
    pub early_repayment_fee: Money,
    /// principal + total_interest + early_repayment_fee
    pub total_cost: Money,
    /// balance settled by the early repayment
    pub balance_at_payoff: Option<Money>,
    pub schedule: Vec<ScheduleEntry>,
}

impl LoanSummary {
    /// first payment the borrower makes, whichever period it falls in
    pub fn first_monthly_payment(&self) -> Option<Money> {
        self.monthly_payment_fixed.or(self.monthly_payment_floating)
    }

    pub fn installments(&self) -> usize {
        self.schedule.len()
    }

    /// principal repaid through regular installments
    pub fn principal_repaid(&self) -> Money {
        self.schedule.iter().map(|entry| entry.principal_paid).sum()
    }
}

/// compute the schedule and totals for a loan, rounding to whole currency units
pub fn compute_amortization(request: &LoanRequest) -> Result<LoanSummary> {
    compute_amortization_with(request, &ComparisonConfig::default())
}

/// compute the schedule and totals for a loan with explicit rounding settings
pub fn compute_amortization_with(
    request: &LoanRequest,
    config: &ComparisonConfig,
) -> Result<LoanSummary> {
    request.validate()?;

    let outcome = schedule::build_schedule(request);
    let dp = config.currency_decimals;

    let early_repayment_fee = match (&request.early_repayment, outcome.payoff_balance) {
        (Some(early), Some(balance)) => early.fee_on(balance),
        _ => Money::ZERO,
    }
    .round_currency(dp);
    let total_interest = outcome.total_interest.round_currency(dp);
    let total_cost = request.principal + total_interest + early_repayment_fee;

    debug!(
        principal = %request.principal,
        tenure_months = request.tenure_months,
        convention = %request.payment_convention,
        installments = outcome.entries.len(),
        total_interest = %total_interest,
        early_repayment_fee = %early_repayment_fee,
        total_cost = %total_cost,
        "computed amortization"
    );

    Ok(LoanSummary {
        principal: request.principal,
        payment_convention: request.payment_convention,
        monthly_payment_fixed: outcome.payment_fixed.map(|p| p.round_currency(dp)),
        monthly_payment_floating: outcome.payment_floating.map(|p| p.round_currency(dp)),
        total_interest,
        early_repayment_fee,
        total_cost,
        balance_at_payoff: outcome.payoff_balance.map(|b| b.round_currency(dp)),
        schedule: outcome.entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn scenario_request() -> LoanRequestBuilder {
        LoanRequest::builder()
            .principal(Money::from_major(500_000_000))
            .tenure_months(60)
            .fixed(Rate::from_percent(dec!(8)), 12)
            .floating_rate(Rate::from_percent(dec!(10)))
            .payment_convention(PaymentConvention::DecliningBalance)
    }

    fn simple_request(principal: i64, annual_percent: Decimal, tenure: u32) -> LoanRequest {
        LoanRequest::builder()
            .principal(Money::from_major(principal))
            .tenure_months(tenure)
            .floating_rate(Rate::from_percent(annual_percent))
            .build()
            .unwrap()
    }

    #[test]
    fn test_fixed_then_floating_scenario() {
        let summary = compute_amortization(&scenario_request().build().unwrap()).unwrap();

        assert_eq!(summary.installments(), 60);
        assert_eq!(summary.monthly_payment_fixed, Some(Money::from_major(10_138_197)));
        assert_eq!(summary.monthly_payment_floating, Some(Money::from_major(10_532_572)));
        assert_eq!(summary.total_interest, Money::from_major(127_221_839));
        assert_eq!(summary.early_repayment_fee, Money::ZERO);
        assert_eq!(summary.total_cost, Money::from_major(627_221_839));
        assert_eq!(
            summary.total_cost,
            summary.principal + summary.total_interest + summary.early_repayment_fee
        );

        // months 13..60 are repriced on the month 12 balance over 48 months
        let boundary = summary.schedule[11].remaining_balance;
        let repriced = annuity_payment(boundary, Rate::from_percent(dec!(10)), 48);
        assert_eq!(summary.monthly_payment_floating, Some(repriced.round_currency(0)));
        assert_eq!(summary.schedule[12].rate, Rate::from_percent(dec!(10)));
    }

    #[test]
    fn test_early_repayment_scenario() {
        let request = scenario_request()
            .early_repayment(EarlyRepayment::new(36, Rate::from_percent(dec!(1.5))))
            .build()
            .unwrap();
        let summary = compute_amortization(&request).unwrap();

        // month 36 settles the loan rather than producing an installment
        assert_eq!(summary.installments(), 35);
        assert_eq!(summary.schedule.last().map(|e| e.month), Some(35));

        let balance_after_35 = summary.schedule[34].remaining_balance;
        assert_eq!(
            summary.early_repayment_fee,
            (balance_after_35 * dec!(0.015)).round_currency(0)
        );
        assert_eq!(summary.early_repayment_fee, Money::from_major(3_552_135));
        assert_eq!(summary.balance_at_payoff, Some(balance_after_35.round_currency(0)));
        assert_eq!(summary.total_interest, Money::from_major(100_716_540));
        assert_eq!(
            summary.total_cost,
            summary.principal + summary.total_interest + summary.early_repayment_fee
        );

        // repaid principal plus the settled balance covers the loan
        let settled = summary.principal_repaid() + balance_after_35;
        assert!((settled - summary.principal).abs() < Money::ONE);

        // truncation does not change the level payments
        assert_eq!(summary.monthly_payment_fixed, Some(Money::from_major(10_138_197)));
        assert_eq!(summary.monthly_payment_floating, Some(Money::from_major(10_532_572)));
    }

    #[test]
    fn test_early_repayment_beyond_tenure_is_ignored() {
        let request = scenario_request()
            .early_repayment(EarlyRepayment::new(72, Rate::from_percent(dec!(2))))
            .build()
            .unwrap();
        let summary = compute_amortization(&request).unwrap();

        assert_eq!(summary.installments(), 60);
        assert_eq!(summary.early_repayment_fee, Money::ZERO);
        assert_eq!(summary.balance_at_payoff, None);
        assert_eq!(summary.total_cost, Money::from_major(627_221_839));
    }

    #[test]
    fn test_no_fixed_period() {
        let summary = compute_amortization(&simple_request(100_000_000, dec!(12), 12)).unwrap();
        assert_eq!(summary.monthly_payment_fixed, None);
        assert!(summary.monthly_payment_floating.is_some());
        assert!(summary
            .schedule
            .iter()
            .all(|entry| entry.period == RatePeriod::Floating));
    }

    #[test]
    fn test_fixed_period_covers_whole_tenure() {
        let request = LoanRequest::builder()
            .principal(Money::from_major(100_000_000))
            .tenure_months(24)
            .fixed(Rate::from_percent(dec!(7)), 24)
            .floating_rate(Rate::from_percent(dec!(11)))
            .build()
            .unwrap();
        let summary = compute_amortization(&request).unwrap();

        assert!(summary.monthly_payment_fixed.is_some());
        assert_eq!(summary.monthly_payment_floating, None);
        assert!(summary
            .schedule
            .iter()
            .all(|entry| entry.rate == Rate::from_percent(dec!(7))));
    }

    #[test]
    fn test_payoff_inside_fixed_period_reports_no_floating_payment() {
        let request = scenario_request()
            .early_repayment(EarlyRepayment::in_year(1, Rate::from_percent(dec!(3))))
            .build()
            .unwrap();
        let summary = compute_amortization(&request).unwrap();

        assert_eq!(summary.installments(), 11);
        assert!(summary.monthly_payment_fixed.is_some());
        assert_eq!(summary.monthly_payment_floating, None);
    }

    #[test]
    fn test_zero_rate_pays_straight_principal() {
        let summary = compute_amortization(&simple_request(120_000_000, dec!(0), 60)).unwrap();

        assert_eq!(summary.monthly_payment_floating, Some(Money::from_major(2_000_000)));
        assert_eq!(summary.total_interest, Money::ZERO);
        for entry in &summary.schedule {
            assert_eq!(entry.interest_paid, Money::ZERO);
            assert_eq!(entry.principal_paid, Money::from_major(2_000_000));
        }
        assert_eq!(summary.total_cost, Money::from_major(120_000_000));
    }

    #[test]
    fn test_equal_principal_totals() {
        let request = LoanRequest::builder()
            .principal(Money::from_major(120_000_000))
            .tenure_months(12)
            .floating_rate(Rate::from_percent(dec!(12)))
            .payment_convention(PaymentConvention::EqualPrincipal)
            .build()
            .unwrap();
        let summary = compute_amortization(&request).unwrap();

        // interest is 1% of 120M, 110M, ..., 10M = 1% of 780M
        assert_eq!(summary.total_interest, Money::from_major(7_800_000));
        assert_eq!(summary.monthly_payment_floating, Some(Money::from_major(11_200_000)));
        assert_eq!(summary.total_cost, Money::from_major(127_800_000));
        assert_eq!(summary.principal_repaid(), Money::from_major(120_000_000));
    }

    #[test]
    fn test_currency_decimals_from_config() {
        let config = ComparisonConfig {
            currency_decimals: 2,
            ..ComparisonConfig::default()
        };
        let summary = compute_amortization_with(&simple_request(1_000, dec!(10), 7), &config).unwrap();
        let payment = summary.monthly_payment_floating.unwrap();
        assert_eq!(payment, payment.round_dp(2));
        assert!(payment.as_decimal().scale() <= 2);
    }

    #[test]
    fn test_invalid_inputs() {
        let base = simple_request(1_000_000, dec!(10), 12);

        let mut request = base.clone();
        request.principal = Money::ZERO;
        assert!(matches!(compute_amortization(&request), Err(LoanError::InvalidInput { .. })));

        let mut request = base.clone();
        request.principal = Money::from_major(-5);
        assert!(matches!(compute_amortization(&request), Err(LoanError::InvalidInput { .. })));

        let mut request = base.clone();
        request.tenure_months = 0;
        assert!(matches!(compute_amortization(&request), Err(LoanError::InvalidInput { .. })));

        let mut request = base.clone();
        request.fixed_months = 13;
        assert!(matches!(compute_amortization(&request), Err(LoanError::InvalidInput { .. })));

        let mut request = base.clone();
        request.floating_rate = Rate::from_percent(dec!(-1));
        assert!(matches!(compute_amortization(&request), Err(LoanError::InvalidInput { .. })));

        let mut request = base;
        request.early_repayment = Some(EarlyRepayment::new(0, Rate::ZERO));
        assert!(matches!(compute_amortization(&request), Err(LoanError::InvalidInput { .. })));
    }

    #[test]
    fn test_builder_requires_core_fields() {
        let err = LoanRequest::builder().tenure_months(12).build().unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { .. }));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_declining_balance_repays_principal(
            principal in 10_000_000i64..5_000_000_000,
            rate_bp in 0u32..2_500,
            tenure in 1u32..361,
            fixed_months in 0u32..61,
        ) {
            let fixed_months = fixed_months.min(tenure);
            let request = LoanRequest::builder()
                .principal(Money::from_major(principal))
                .tenure_months(tenure)
                .fixed(Rate::from_decimal(Decimal::new(i64::from(rate_bp), 4)), fixed_months)
                .floating_rate(Rate::from_decimal(Decimal::new(i64::from(rate_bp) + 150, 4)))
                .build()
                .unwrap();
            let summary = compute_amortization(&request).unwrap();

            prop_assert_eq!(summary.installments(), tenure as usize);
            prop_assert!((summary.principal_repaid() - summary.principal).abs() <= Money::ONE);
            prop_assert_eq!(summary.schedule[tenure as usize - 1].remaining_balance, Money::ZERO);
            prop_assert!(summary.schedule.iter().all(|e| !e.remaining_balance.is_negative()));
            prop_assert_eq!(
                summary.total_cost,
                summary.principal + summary.total_interest + summary.early_repayment_fee
            );
        }

        #[test]
        fn prop_total_cost_identity_with_early_repayment(
            principal in 10_000_000i64..5_000_000_000,
            rate_bp in 0u32..2_500,
            tenure in 1u32..361,
            payoff in 1u32..400,
            fee_bp in 0u32..500,
            equal_principal in proptest::bool::ANY,
        ) {
            let convention = if equal_principal {
                PaymentConvention::EqualPrincipal
            } else {
                PaymentConvention::DecliningBalance
            };
            let request = LoanRequest::builder()
                .principal(Money::from_major(principal))
                .tenure_months(tenure)
                .floating_rate(Rate::from_decimal(Decimal::new(i64::from(rate_bp), 4)))
                .payment_convention(convention)
                .early_repayment(EarlyRepayment::new(payoff, Rate::from_decimal(Decimal::new(i64::from(fee_bp), 4))))
                .build()
                .unwrap();
            let summary = compute_amortization(&request).unwrap();

            prop_assert_eq!(
                summary.total_cost,
                summary.principal + summary.total_interest + summary.early_repayment_fee
            );
            let expected_installments = if payoff <= tenure { payoff - 1 } else { tenure };
            prop_assert_eq!(summary.installments() as u32, expected_installments);
        }

        #[test]
        fn prop_longer_tenure_lowers_payment_and_raises_interest(
            principal in 10_000_000i64..5_000_000_000,
            rate_bp in 100u32..2_500,
            tenure in 12u32..360,
        ) {
            let annual = Decimal::new(i64::from(rate_bp), 2);
            let shorter = compute_amortization(&simple_request(principal, annual, tenure)).unwrap();
            let longer = compute_amortization(&simple_request(principal, annual, tenure + 1)).unwrap();

            prop_assert!(longer.monthly_payment_floating < shorter.monthly_payment_floating);
            prop_assert!(longer.total_interest > shorter.total_interest);
        }
    }
}
