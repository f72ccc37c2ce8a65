//! Clinical calculators.
//!
//! Every calculator is a pure function of its explicit inputs plus the
//! immutable reference data:
//!
//! - [`fluids`]: dehydration deficit, maintenance, GI losses, 24h plan
//! - [`dextrose`]: C1·V1 = C2·V2 dilution and peripheral-line safety
//! - [`drugs`]: bolus and CRI dosing from the formulary

pub mod dextrose;
pub mod drugs;
pub mod fluids;

pub use dextrose::required_stock_volume;
pub use drugs::DoseCalculator;
pub use fluids::deficit;

use thiserror::Error;

use crate::dosage::ParseError;

/// Calculation errors. All are per-calculation and recoverable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Not found: {subject}")]
    NotFound {
        subject: String,
        /// Close formulary names, best first
        suggestions: Vec<String>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Infeasible: {0}")]
    Infeasible(String),
}

impl CalcError {
    pub fn not_found(subject: impl Into<String>) -> Self {
        Self::NotFound {
            subject: subject.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn infeasible(msg: impl Into<String>) -> Self {
        Self::Infeasible(msg.into())
    }
}

pub type CalcResult<T> = Result<T, CalcError>;

/// Check that a weight is a finite number > 0.
pub(crate) fn require_weight(weight_kg: f64) -> CalcResult<()> {
    if weight_kg.is_finite() && weight_kg > 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid_input(format!(
            "weight must be greater than 0 kg, got {}",
            weight_kg
        )))
    }
}
