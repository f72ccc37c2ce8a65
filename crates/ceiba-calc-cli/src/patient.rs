//! Patient flags shared by the calculation commands.

use anyhow::{Context, Result};
use ceiba_calc_core::{PatientInput, SessionSnapshot, Species};
use clap::Args;

/// Patient flags. Any flag left out is taken from the saved session.
#[derive(Args, Debug, Clone, Default)]
pub struct PatientArgs {
    /// Body weight in kg
    #[arg(short, long)]
    pub weight: Option<f64>,

    /// Species: dog or cat
    #[arg(short, long)]
    pub species: Option<Species>,

    /// Estimated dehydration (%)
    #[arg(short, long)]
    pub dehydration: Option<f64>,

    /// Patient is vomiting (`--vomiting=false` to clear a saved flag)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub vomiting: Option<bool>,

    /// Patient has diarrhea (`--diarrhea=false` to clear a saved flag)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub diarrhea: Option<bool>,

    /// Patient identifier printed on reports
    #[arg(long)]
    pub patient_id: Option<String>,
}

impl PatientArgs {
    /// Merge the flags over the saved session.
    ///
    /// Returns the patient id and the calculation input. Weight is the only
    /// value with no default.
    pub fn resolve(&self, saved: Option<&SessionSnapshot>) -> Result<(Option<String>, PatientInput)> {
        let weight_kg = self
            .weight
            .or_else(|| saved.and_then(|s| s.weight_kg))
            .context("no weight given and none saved; pass --weight <KG>")?;

        let input = PatientInput {
            weight_kg,
            species: self
                .species
                .or_else(|| saved.map(|s| s.species))
                .unwrap_or_default(),
            dehydration_percent: self
                .dehydration
                .or_else(|| saved.and_then(|s| s.dehydration_percent)),
            has_vomiting: self
                .vomiting
                .or_else(|| saved.map(|s| s.has_vomiting))
                .unwrap_or(false),
            has_diarrhea: self
                .diarrhea
                .or_else(|| saved.map(|s| s.has_diarrhea))
                .unwrap_or(false),
        };

        let patient_id = self
            .patient_id
            .clone()
            .or_else(|| saved.and_then(|s| s.patient_id.clone()));

        Ok((patient_id, input))
    }
}
