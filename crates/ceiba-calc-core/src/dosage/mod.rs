//! Dosage string parsing.
//!
//! Grammar:
//! - concentration: `<number> <mass>/<volume>` (e.g., "50 mcg/ml")
//! - dose range: `<number>[-<number>] <unit>` (e.g., "2-10 mcg/kg/hr", "0.2 mg/kg")

mod parser;

pub use parser::*;

use thiserror::Error;

/// Errors for strings that do not match the dosage grammar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Empty dosage string")]
    Empty,

    #[error("Missing unit in '{0}'")]
    MissingUnit(String),

    #[error("Invalid number '{value}' in '{input}'")]
    InvalidNumber { input: String, value: String },

    #[error("Invalid unit '{unit}' in '{input}'")]
    InvalidUnit { input: String, unit: String },

    #[error("Invalid range in '{0}'")]
    InvalidRange(String),
}

pub type ParseResult<T> = Result<T, ParseError>;
