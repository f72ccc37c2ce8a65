//! Structured calculation results shared by the calculators and the report.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// A min/max volume pair in ml.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct VolumeRange {
    pub min: f64,
    pub max: f64,
}

impl VolumeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range with both ends equal.
    pub fn point(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Divide both ends by a positive divisor.
    pub fn per(&self, divisor: f64) -> Self {
        Self::new(self.min / divisor, self.max / divisor)
    }
}

impl Add for VolumeRange {
    type Output = VolumeRange;

    fn add(self, rhs: VolumeRange) -> VolumeRange {
        VolumeRange::new(self.min + rhs.min, self.max + rhs.max)
    }
}

/// 24-hour fluid therapy plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FluidPlan {
    pub weight_kg: f64,
    /// Dehydration deficit (ml), added once
    pub deficit_ml: f64,
    /// Maintenance over 24h (ml)
    pub maintenance: VolumeRange,
    /// Estimated GI losses over 24h (ml)
    pub gi_losses: VolumeRange,
    /// deficit + maintenance + GI losses (ml)
    pub total: VolumeRange,
    /// total / 24 (ml/h)
    pub hourly_rate: VolumeRange,
    /// hourly rate / weight (ml/kg/h)
    pub per_kg_hourly_rate: VolumeRange,
}

/// Result of a peripheral-line safety check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafetyCheck {
    pub safe: bool,
    /// Empty when safe
    pub message: String,
}

/// Dextrose dilution recipe. Only exists for feasible requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DilutionPlan {
    /// C1: stock dextrose concentration (%)
    pub stock_concentration_percent: f64,
    /// V2: final volume (ml)
    pub final_volume_ml: f64,
    /// C2: final concentration (%)
    pub final_concentration_percent: f64,
    /// V1: stock volume to draw (ml)
    pub stock_volume_ml: f64,
    /// V2 - V1: base fluid to add (ml)
    pub base_fluid_ml: f64,
    pub safety: SafetyCheck,
}

/// Bolus dose for one drug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BolusResult {
    pub drug: String,
    /// Total dose in `unit`'s mass unit, from the minimum of the range
    pub dose_total: f64,
    /// Dose unit of the range (e.g., "mg/kg")
    pub unit: String,
    /// Volume to administer (ml)
    pub volume_ml: f64,
    pub warning: String,
}

impl BolusResult {
    /// Mass unit of `dose_total` (e.g., "mg" for a "mg/kg" range).
    pub fn mass_unit(&self) -> &str {
        self.unit.split('/').next().unwrap_or(&self.unit)
    }
}

/// Continuous-rate infusion for one drug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CriResult {
    pub drug: String,
    /// Dose selected by the user, in `unit`
    pub selected_dose: f64,
    /// Native CRI unit (e.g., "mcg/kg/hr")
    pub unit: String,
    /// Selected dose normalised to per kg per minute
    pub dose_per_kg_per_min: f64,
    /// Drug mass per hour
    pub mass_per_hour: f64,
    /// Infusion rate (ml/h)
    pub rate_ml_per_hr: f64,
    /// Whether the selected dose lies in the reference CRI range
    pub within_range: bool,
    pub warning: String,
}

/// Combined bolus and CRI plan for one drug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugPlan {
    pub drug: String,
    /// Present when the drug has bolus data
    pub bolus: Option<BolusResult>,
    /// Present when the drug has CRI data
    pub cri: Option<CriResult>,
}
