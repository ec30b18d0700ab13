use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanError {
    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
    },

    #[error("no offers to compare")]
    EmptyOfferSet,

    #[error("no applicable rate for bank {bank_id}")]
    NoApplicableRate {
        bank_id: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl LoanError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
