use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::decimal::{Money, Rate};
use crate::types::{PaymentConvention, RatePeriod};

use super::annuity::annuity_payment;
use super::LoanRequest;

/// one month of the amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub month: u32,
    pub period: RatePeriod,
    /// annual rate in force this month
    pub rate: Rate,
    pub payment: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    /// balance after this month's payment, never negative
    pub remaining_balance: Money,
}

/// unrounded schedule with the figures the summary is built from
#[derive(Debug, Clone)]
pub(crate) struct ScheduleOutcome {
    pub entries: Vec<ScheduleEntry>,
    pub payment_fixed: Option<Money>,
    pub payment_floating: Option<Money>,
    pub total_interest: Money,
    /// balance outstanding immediately before the payoff month
    pub payoff_balance: Option<Money>,
}

/// walk the months of a validated request
pub(crate) fn build_schedule(request: &LoanRequest) -> ScheduleOutcome {
    let tenure = request.tenure_months;
    let payoff_month = request.payoff_month();
    // the payoff month itself settles the loan and is not a regular installment
    let last_installment = payoff_month.map_or(tenure, |month| month - 1);

    let mut walker = ScheduleWalker::new(request, last_installment);
    for month in 1..=last_installment {
        walker.step(month);
    }

    let payoff_balance = payoff_month.map(|_| walker.balance);

    ScheduleOutcome {
        entries: walker.entries,
        payment_fixed: walker.payment_fixed,
        payment_floating: walker.payment_floating,
        total_interest: walker.total_interest,
        payoff_balance,
    }
}

struct ScheduleWalker<'a> {
    request: &'a LoanRequest,
    balance: Money,
    /// level payment of the current declining-balance segment
    segment_payment: Money,
    /// constant principal installment for equal-principal loans
    principal_installment: Money,
    payment_fixed: Option<Money>,
    payment_floating: Option<Money>,
    total_interest: Money,
    entries: Vec<ScheduleEntry>,
}

impl<'a> ScheduleWalker<'a> {
    fn new(request: &'a LoanRequest, last_installment: u32) -> Self {
        Self {
            request,
            balance: request.principal,
            segment_payment: Money::ZERO,
            principal_installment: request.principal / Decimal::from(request.tenure_months),
            payment_fixed: None,
            payment_floating: None,
            total_interest: Money::ZERO,
            entries: Vec::with_capacity(last_installment as usize),
        }
    }

    fn step(&mut self, month: u32) {
        let (period, rate) = self.request.rate_for_month(month);
        let is_period_start = month == 1 || month == self.request.fixed_months + 1;

        if is_period_start && self.request.payment_convention == PaymentConvention::DecliningBalance {
            self.reprice(period, rate, month);
        }

        let interest = self.balance.monthly_interest(rate.monthly_rate());
        let principal = if month == self.request.tenure_months {
            // final installment settles whatever residue is left
            self.balance
        } else {
            let scheduled = match self.request.payment_convention {
                PaymentConvention::DecliningBalance => self.segment_payment - interest,
                PaymentConvention::EqualPrincipal => self.principal_installment,
            };
            scheduled.min(self.balance)
        };
        let payment = principal + interest;

        if is_period_start {
            let reported = match self.request.payment_convention {
                PaymentConvention::DecliningBalance => self.segment_payment,
                PaymentConvention::EqualPrincipal => payment,
            };
            match period {
                RatePeriod::Fixed => self.payment_fixed = Some(reported),
                RatePeriod::Floating => self.payment_floating = Some(reported),
            }
        }

        self.balance = (self.balance - principal).max(Money::ZERO);
        self.total_interest += interest;

        self.entries.push(ScheduleEntry {
            month,
            period,
            rate,
            payment,
            principal_paid: principal,
            interest_paid: interest,
            remaining_balance: self.balance,
        });
    }

    /// fresh annuity on the current balance over the rest of the original tenure
    fn reprice(&mut self, period: RatePeriod, rate: Rate, month: u32) {
        let remaining_months = self.request.tenure_months - (month - 1);
        self.segment_payment = annuity_payment(self.balance, rate, remaining_months);
        trace!(
            month,
            ?period,
            %rate,
            remaining_months,
            balance = %self.balance,
            payment = %self.segment_payment,
            "repriced declining-balance segment"
        );
    }
}
