//! Clinical guideline constants loaded from reference data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maximum dextrose concentration (%) for peripheral lines when the
/// guideline document does not set one.
pub const DEFAULT_PERIPHERAL_MAX_DEXTROSE_PERCENT: f64 = 7.5;

/// Source label used when the guideline document has none.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// All clinical constants used by the calculators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicalConstants {
    pub fluids: FluidConstants,
    pub dextrose: DextroseGuideline,
}

/// Fluid therapy constants (`fluids.json`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FluidConstants {
    /// Maintenance rate per species key ("dog", "cat")
    pub maintenance: BTreeMap<String, MaintenanceRate>,
    pub gi_losses: GiLossTable,
}

/// Maintenance requirement in ml/kg/day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceRate {
    pub min: f64,
    pub max: f64,
}

/// Estimated GI losses per symptom.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GiLossTable {
    pub vomit: GiLossRate,
    pub diarrhea: GiLossRate,
}

/// Loss estimate in ml/kg.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GiLossRate {
    pub min_ml_per_kg: f64,
    pub max_ml_per_kg: f64,
}

/// Guideline document (`guidelines.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GuidelineDocument {
    #[serde(default)]
    pub dextrose: DextroseGuideline,
}

/// Dextrose peripheral-line guideline with provenance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DextroseGuideline {
    #[serde(default)]
    pub peripheral_max_concentration_percent: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
}

impl DextroseGuideline {
    /// Configured maximum, or the 7.5% default when unset, zero, negative or
    /// not finite.
    pub fn max_concentration_percent(&self) -> f64 {
        self.peripheral_max_concentration_percent
            .filter(|max| max.is_finite() && *max > 0.0)
            .unwrap_or(DEFAULT_PERIPHERAL_MAX_DEXTROSE_PERCENT)
    }

    /// Guideline source, or "unknown".
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(UNKNOWN_SOURCE)
    }
}
