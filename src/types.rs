use serde::{Deserialize, Serialize};
use std::fmt;

/// identifier of a bank as supplied by the data layer
pub type BankId = String;

/// payment convention for a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentConvention {
    /// level annuity payment, interest charged on the shrinking balance
    #[serde(rename = "reducing_balance")]
    DecliningBalance,
    /// constant principal installment, total payment declines over time
    #[serde(rename = "equal_installment")]
    EqualPrincipal,
}

impl fmt::Display for PaymentConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentConvention::DecliningBalance => write!(f, "reducing_balance"),
            PaymentConvention::EqualPrincipal => write!(f, "equal_installment"),
        }
    }
}

/// loan product categories offered by banks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    /// secured by the purchased property
    HomeLoan,
    /// unsecured consumer credit
    ConsumerLoan,
}

/// which rate window a month falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatePeriod {
    Fixed,
    Floating,
}
