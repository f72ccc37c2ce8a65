//! Clinical report export.
//!
//! A [`ClinicalReport`] is assembled from structured calculation results and
//! sealed with a SHA-256 fingerprint. Renderers turn it into documents.

mod render;
mod report;

pub use render::*;
pub use report::*;

use thiserror::Error;

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
