pub mod amortization;
pub mod comparison;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod types;

// re-export key types
pub use amortization::{
    annuity_payment, compute_amortization, compute_amortization_with, EarlyRepayment,
    LoanRequest, LoanRequestBuilder, LoanSummary, ScheduleEntry,
};
pub use comparison::{
    compare_offers, compare_offers_with, BankOffer, ComparisonRecord, ComparisonReport,
    ComparisonResult, DroppedOffer, EarlyRepaymentFee, LoanTerms, RateSheet, RateTier,
    SummaryEntry, SummaryPayload,
};
pub use config::ComparisonConfig;
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use types::{BankId, LoanType, PaymentConvention, RatePeriod};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
