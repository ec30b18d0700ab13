use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};

/// level monthly payment that amortizes `balance` over `months` at `annual_rate`
///
/// PMT = B * r * (1 + r)^n / ((1 + r)^n - 1), with r the monthly rate.
/// A zero rate degenerates to straight division.
pub fn annuity_payment(balance: Money, annual_rate: Rate, months: u32) -> Money {
    if months == 0 {
        return balance;
    }

    let r = annual_rate.monthly_rate().as_decimal();

    if r.is_zero() {
        return balance / Decimal::from(months);
    }

    match compound_factor(r, months) {
        Some(compound) => {
            let denominator = compound - Decimal::ONE;
            if denominator.is_zero() {
                // rate below Decimal resolution
                return balance / Decimal::from(months);
            }
            balance * (r * (compound / denominator))
        }
        // (1 + r)^n beyond Decimal range: r * f / (f - 1) has converged to r
        None => balance.monthly_interest(Rate::from_decimal(r)),
    }
}

/// (1 + r)^n by repeated multiplication, `None` on overflow
pub(crate) fn compound_factor(r: Decimal, n: u32) -> Option<Decimal> {
    let base = Decimal::ONE + r;
    let mut compound = Decimal::ONE;
    for _ in 0..n {
        compound = compound.checked_mul(base)?;
    }
    Some(compound)
}
