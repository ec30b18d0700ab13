use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

const MONTHS_PER_YEAR: u32 = 12;

/// full prepayment of the loan at a given month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyRepayment {
    /// month at which the outstanding balance is settled (1-indexed)
    pub month: u32,
    /// penalty rate applied to the balance outstanding at `month`
    pub fee_rate: Rate,
}

impl EarlyRepayment {
    pub fn new(month: u32, fee_rate: Rate) -> Self {
        Self { month, fee_rate }
    }

    /// settle at the end of loan year `year`
    pub fn in_year(year: u32, fee_rate: Rate) -> Self {
        Self {
            month: year.saturating_mul(MONTHS_PER_YEAR),
            fee_rate,
        }
    }

    /// loan year the payoff month falls in
    pub fn loan_year(&self) -> u32 {
        loan_year_of_month(self.month)
    }

    /// penalty charged on the outstanding balance
    pub fn fee_on(&self, outstanding_balance: Money) -> Money {
        outstanding_balance.percentage(self.fee_rate.as_percentage())
    }
}

/// 1-indexed loan year of a 1-indexed month (months 1..=12 are year 1)
pub fn loan_year_of_month(month: u32) -> u32 {
    month.saturating_sub(1) / MONTHS_PER_YEAR + 1
}

/// fee percentage for a payoff in `loan_year` from a (year, percent) schedule
///
/// Only an entry for exactly `loan_year` applies; years without one carry no fee.
pub fn fee_rate_for_year<'a, I>(schedule: I, loan_year: u32) -> Rate
where
    I: IntoIterator<Item = (u32, &'a Rate)>,
{
    schedule
        .into_iter()
        .find(|(year, _)| *year == loan_year)
        .map(|(_, rate)| *rate)
        .unwrap_or(Rate::ZERO)
}
