use serde::{Deserialize, Serialize};

use crate::errors::{LoanError, Result};

/// comparison configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// decimals kept when summary amounts are rounded (0 = whole units)
    pub currency_decimals: u32,
    /// how many top results are handed to the summary generator
    pub summary_top_n: usize,
    /// allow evaluating offers on the rayon pool
    pub parallel: bool,
    /// minimum offer count before parallel evaluation kicks in
    pub parallel_threshold: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            currency_decimals: 0,
            summary_top_n: 3,
            parallel: true,
            parallel_threshold: 8,
        }
    }
}

impl ComparisonConfig {
    /// configuration that always evaluates offers on the calling thread
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// parse from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ComparisonConfig =
            serde_json::from_str(json).map_err(|e| LoanError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Decimal supports at most 28 fractional digits
        if self.currency_decimals > 28 {
            return Err(LoanError::InvalidConfiguration {
                message: format!("currency_decimals {} exceeds 28", self.currency_decimals),
            });
        }
        if self.summary_top_n == 0 {
            return Err(LoanError::InvalidConfiguration {
                message: "summary_top_n must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn should_parallelize(&self, offer_count: usize) -> bool {
        self.parallel && offer_count >= self.parallel_threshold
    }
}
