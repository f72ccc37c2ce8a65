//! Drug bolus and CRI calculator.
//!
//! Concentration and dose are assumed to share a mass unit (mcg or mg); no
//! mass conversion happens here.

use tracing::debug;

use super::{require_weight, CalcError, CalcResult};
use crate::models::{BolusResult, CriResult, DrugPlan, Species, TimeBase};
use crate::reference::Formulary;

/// Minutes per hour, used to move CRI doses between time bases.
const MINUTES_PER_HOUR: f64 = 60.0;

/// Bolus and CRI calculator over a formulary.
pub struct DoseCalculator<'a> {
    formulary: &'a Formulary,
}

impl<'a> DoseCalculator<'a> {
    /// Create a new calculator.
    pub fn new(formulary: &'a Formulary) -> Self {
        Self { formulary }
    }

    /// Bolus dose and volume.
    ///
    /// The total dose always uses the minimum of the bolus range.
    pub fn bolus(&self, drug_name: &str, weight_kg: f64, species: Species) -> CalcResult<BolusResult> {
        let drug = self.formulary.get(drug_name)?;
        let range = drug
            .bolus_range()
            .ok_or_else(|| CalcError::not_found(format!("bolus data for '{}'", drug.name)))??;
        require_weight(weight_kg)?;
        let concentration = drug.parsed_concentration()?;

        let dose_total = range.min * weight_kg;
        let volume_ml = dose_total / concentration.value;

        debug!(drug = %drug.name, weight_kg, dose_total, volume_ml, "computed bolus");

        Ok(BolusResult {
            drug: drug.name.clone(),
            dose_total,
            unit: range.unit,
            volume_ml,
            warning: drug.warning_for(species),
        })
    }

    /// CRI infusion rate for a user-selected dose in the drug's native CRI unit.
    pub fn cri(
        &self,
        drug_name: &str,
        weight_kg: f64,
        selected_dose: f64,
        species: Species,
    ) -> CalcResult<CriResult> {
        let drug = self.formulary.get(drug_name)?;
        let range = drug
            .cri_range()
            .ok_or_else(|| CalcError::not_found(format!("CRI data for '{}'", drug.name)))??;
        require_weight(weight_kg)?;
        if !(selected_dose.is_finite() && selected_dose > 0.0) {
            return Err(CalcError::invalid_input(format!(
                "CRI dose must be greater than 0, got {}",
                selected_dose
            )));
        }
        let concentration = drug.parsed_concentration()?;

        let dose_per_kg_per_min = match range.time_base() {
            TimeBase::PerHour => selected_dose / MINUTES_PER_HOUR,
            TimeBase::PerMinute | TimeBase::None => selected_dose,
        };
        let mass_per_min = weight_kg * dose_per_kg_per_min;
        let mass_per_hour = mass_per_min * MINUTES_PER_HOUR;
        let rate_ml_per_hr = mass_per_hour / concentration.value;

        debug!(
            drug = %drug.name,
            weight_kg,
            selected_dose,
            unit = %range.unit,
            rate_ml_per_hr,
            "computed CRI"
        );

        Ok(CriResult {
            drug: drug.name.clone(),
            selected_dose,
            within_range: range.contains(selected_dose),
            unit: range.unit,
            dose_per_kg_per_min,
            mass_per_hour,
            rate_ml_per_hr,
            warning: drug.warning_for(species),
        })
    }

    /// Bolus and CRI, each computed when the drug has data for it.
    ///
    /// `selected_dose` is only used for the CRI. Fails with `NotFound` when
    /// the drug has neither.
    pub fn plan(
        &self,
        drug_name: &str,
        weight_kg: f64,
        selected_dose: f64,
        species: Species,
    ) -> CalcResult<DrugPlan> {
        let drug = self.formulary.get(drug_name)?;
        let bolus = match drug.bolus {
            Some(_) => Some(self.bolus(drug_name, weight_kg, species)?),
            None => None,
        };
        let cri = match drug.cri {
            Some(_) => Some(self.cri(drug_name, weight_kg, selected_dose, species)?),
            None => None,
        };
        if bolus.is_none() && cri.is_none() {
            return Err(CalcError::not_found(format!("dosing data for '{}'", drug.name)));
        }

        Ok(DrugPlan {
            drug: drug.name.clone(),
            bolus,
            cri,
        })
    }
}
