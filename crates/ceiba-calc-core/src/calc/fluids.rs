//! Fluid therapy calculator.
//!
//! The 24h plan adds the dehydration deficit once on top of the 24h
//! maintenance and GI-loss ranges.

use tracing::debug;

use super::{require_weight, CalcError, CalcResult};
use crate::models::{FluidConstants, FluidPlan, PatientInput, VolumeRange};

/// Hours the plan is spread over.
const PLAN_HOURS: f64 = 24.0;

/// Dehydration deficit in ml: `weight (kg) × dehydration (%) × 10`.
///
/// Returns 0 for non-positive weights and negative percentages.
pub fn deficit(weight_kg: f64, dehydration_percent: f64) -> f64 {
    if weight_kg.is_nan() || dehydration_percent.is_nan() {
        return 0.0;
    }
    if weight_kg <= 0.0 || dehydration_percent < 0.0 {
        return 0.0;
    }
    weight_kg * dehydration_percent * 10.0
}

impl FluidConstants {
    /// Maintenance over 24h (ml) for a species key such as "dog".
    ///
    /// Unknown species and non-positive weights give `{0, 0}`.
    pub fn maintenance(&self, species: &str, weight_kg: f64) -> VolumeRange {
        let rate = match self.maintenance.get(&species.to_lowercase()) {
            Some(rate) => rate,
            None => return VolumeRange::default(),
        };
        if weight_kg.is_nan() || weight_kg <= 0.0 {
            return VolumeRange::default();
        }
        VolumeRange::new(rate.min * weight_kg, rate.max * weight_kg)
    }

    /// Estimated GI losses (ml). Each flag adds its own contribution.
    pub fn gi_losses(&self, weight_kg: f64, vomiting: bool, diarrhea: bool) -> VolumeRange {
        let mut losses = VolumeRange::default();
        if vomiting {
            let rate = &self.gi_losses.vomit;
            losses = losses
                + VolumeRange::new(rate.min_ml_per_kg * weight_kg, rate.max_ml_per_kg * weight_kg);
        }
        if diarrhea {
            let rate = &self.gi_losses.diarrhea;
            losses = losses
                + VolumeRange::new(rate.min_ml_per_kg * weight_kg, rate.max_ml_per_kg * weight_kg);
        }
        losses
    }
}

impl FluidPlan {
    /// Build the 24h plan for a patient.
    pub fn compute(constants: &FluidConstants, patient: &PatientInput) -> CalcResult<Self> {
        require_weight(patient.weight_kg)?;

        let dehydration = patient.dehydration_percent.unwrap_or(0.0);
        if !dehydration.is_finite() || dehydration < 0.0 {
            return Err(CalcError::invalid_input(format!(
                "dehydration must be 0% or more, got {}",
                dehydration
            )));
        }

        let weight_kg = patient.weight_kg;
        let deficit_ml = deficit(weight_kg, dehydration);
        let maintenance = constants.maintenance(patient.species.as_str(), weight_kg);
        let gi_losses = constants.gi_losses(weight_kg, patient.has_vomiting, patient.has_diarrhea);

        let total = VolumeRange::point(deficit_ml) + maintenance + gi_losses;
        let hourly_rate = total.per(PLAN_HOURS);
        let per_kg_hourly_rate = hourly_rate.per(weight_kg);

        debug!(
            weight_kg,
            species = %patient.species,
            deficit_ml,
            total_min = total.min,
            total_max = total.max,
            "computed fluid plan"
        );

        Ok(Self {
            weight_kg,
            deficit_ml,
            maintenance,
            gi_losses,
            total,
            hourly_rate,
            per_kg_hourly_rate,
        })
    }
}
