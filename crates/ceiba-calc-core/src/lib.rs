//! CeibaCalc Core Library
//!
//! Veterinary clinical calculator: fluid therapy, dextrose dilution and drug
//! bolus/CRI dosing, with a last-session store and a fingerprinted clinical
//! report.
//!
//! # Architecture
//!
//! ```text
//!   Reference data (drugs.json, fluids.json, guidelines.json)
//!                           │
//!                     [ReferenceData]
//!                           │
//!   PatientInput ──► Calculators (fluids / dextrose / drugs)
//!                           │
//!                  structured results
//!                           │
//!              ┌────────────┴────────────┐
//!              ▼                         ▼
//!      ClinicalReport              Last session
//!   (SHA-256 fingerprint)        (single SQLite row)
//!              │
//!     Text / JSON renderers
//! ```
//!
//! # Core Principle
//!
//! **Every failure is per-calculation.** Malformed reference strings, unknown
//! drugs, invalid input and infeasible dilutions are explicit errors; nothing
//! is reported as a zero-valued or NaN result.
//!
//! # Modules
//!
//! - [`dosage`]: concentration and dose-range string parser
//! - [`calc`]: fluid, dextrose and drug calculators
//! - [`reference`]: formulary and clinical constants
//! - [`models`]: domain types (DrugRecord, PatientInput, FluidPlan, etc.)
//! - [`db`]: SQLite last-session store
//! - [`export`]: clinical report and renderers

pub mod calc;
pub mod db;
pub mod dosage;
pub mod export;
pub mod models;
pub mod reference;

// Re-export commonly used types
pub use calc::{CalcError, DoseCalculator};
pub use db::Database;
pub use dosage::{parse_concentration, parse_dose_range, ParseError};
pub use export::{ClinicalReport, JsonRenderer, ReportPatient, ReportRenderer, TextRenderer};
pub use models::{
    BolusResult, CriResult, DilutionPlan, DoseRange, DrugPlan, DrugRecord, FluidPlan,
    PatientInput, SessionSnapshot, Species, VolumeRange,
};
pub use reference::{Formulary, ReferenceData};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CeibaCalcError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Infeasible: {0}")]
    Infeasible(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<CalcError> for CeibaCalcError {
    fn from(e: CalcError) -> Self {
        match e {
            CalcError::Parse(e) => CeibaCalcError::ParseError(e.to_string()),
            CalcError::NotFound {
                subject,
                suggestions,
            } => {
                if suggestions.is_empty() {
                    CeibaCalcError::NotFound(subject)
                } else {
                    CeibaCalcError::NotFound(format!(
                        "{} (did you mean: {}?)",
                        subject,
                        suggestions.join(", ")
                    ))
                }
            }
            CalcError::InvalidInput(msg) => CeibaCalcError::InvalidInput(msg),
            CalcError::Infeasible(msg) => CeibaCalcError::Infeasible(msg),
        }
    }
}

impl From<db::DbError> for CeibaCalcError {
    fn from(e: db::DbError) -> Self {
        CeibaCalcError::DatabaseError(e.to_string())
    }
}

impl From<export::ExportError> for CeibaCalcError {
    fn from(e: export::ExportError) -> Self {
        CeibaCalcError::SerializationError(e.to_string())
    }
}

impl From<reference::ReferenceError> for CeibaCalcError {
    fn from(e: reference::ReferenceError) -> Self {
        CeibaCalcError::SerializationError(e.to_string())
    }
}

impl From<models::UnknownSpecies> for CeibaCalcError {
    fn from(e: models::UnknownSpecies) -> Self {
        CeibaCalcError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for CeibaCalcError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        CeibaCalcError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create the session database at the given path, with the built-in
/// reference data.
#[uniffi::export]
pub fn open_calculator(db_path: String) -> Result<Arc<CeibaCalcCore>, CeibaCalcError> {
    let db = Database::open(&db_path)?;
    CeibaCalcCore::new(db)
}

/// Calculator backed by an in-memory session database (for testing).
#[uniffi::export]
pub fn open_calculator_in_memory() -> Result<Arc<CeibaCalcCore>, CeibaCalcError> {
    let db = Database::open_in_memory()?;
    CeibaCalcCore::new(db)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Reference data plus a thread-safe session store, for FFI.
#[derive(uniffi::Object)]
pub struct CeibaCalcCore {
    reference: ReferenceData,
    db: Arc<Mutex<Database>>,
}

impl CeibaCalcCore {
    fn new(db: Database) -> Result<Arc<Self>, CeibaCalcError> {
        Ok(Arc::new(Self {
            reference: ReferenceData::builtin()?,
            db: Arc::new(Mutex::new(db)),
        }))
    }

    fn drug_plan(
        &self,
        drug_name: &str,
        weight_kg: f64,
        selected_dose: f64,
        species: Species,
    ) -> Result<DrugPlan, CeibaCalcError> {
        let calculator = DoseCalculator::new(&self.reference.formulary);
        Ok(calculator.plan(drug_name, weight_kg, selected_dose, species)?)
    }
}

#[uniffi::export]
impl CeibaCalcCore {
    // =========================================================================
    // Reference Data
    // =========================================================================

    /// Drugs in formulary order.
    pub fn list_drugs(&self) -> Vec<FfiDrugSummary> {
        self.reference
            .formulary
            .iter()
            .map(FfiDrugSummary::from)
            .collect()
    }

    /// Native CRI unit of a drug (e.g., "mcg/kg/hr").
    pub fn cri_unit(&self, drug_name: String) -> Result<String, CeibaCalcError> {
        let drug = self.reference.formulary.get(&drug_name)?;
        drug.cri_unit()
            .ok_or_else(|| CeibaCalcError::NotFound(format!("CRI data for '{}'", drug.name)))
    }

    // =========================================================================
    // Calculators
    // =========================================================================

    /// 24h fluid therapy plan.
    pub fn compute_fluids(&self, patient: FfiPatientInput) -> Result<FfiFluidPlan, CeibaCalcError> {
        let input = PatientInput::try_from(patient)?;
        let plan = FluidPlan::compute(&self.reference.constants.fluids, &input)?;
        Ok(plan.into())
    }

    /// Dextrose dilution recipe with peripheral-line safety check.
    pub fn compute_dilution(
        &self,
        request: FfiDilutionRequest,
    ) -> Result<FfiDilutionPlan, CeibaCalcError> {
        let plan = DilutionPlan::compute(
            &self.reference.constants.dextrose,
            request.stock_concentration_percent,
            request.final_volume_ml,
            request.final_concentration_percent,
        )?;
        Ok(plan.into())
    }

    /// Bolus and CRI for one drug, each when the drug has data for it.
    pub fn compute_drug(
        &self,
        request: FfiDrugRequest,
        species: String,
    ) -> Result<FfiDrugPlan, CeibaCalcError> {
        let species: Species = species.parse()?;
        let plan = self.drug_plan(
            &request.drug_name,
            request.weight_kg,
            request.selected_dose,
            species,
        )?;
        Ok(plan.into())
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Overwrite the last session with a patient input.
    pub fn save_session(
        &self,
        patient_id: Option<String>,
        patient: FfiPatientInput,
    ) -> Result<FfiSessionSnapshot, CeibaCalcError> {
        let input = PatientInput::try_from(patient)?;
        let snapshot = SessionSnapshot::from_input(patient_id, &input);
        let db = self.db.lock()?;
        db.save_session(&snapshot)?;
        Ok(snapshot.into())
    }

    /// The last session, if one was saved.
    pub fn load_session(&self) -> Result<Option<FfiSessionSnapshot>, CeibaCalcError> {
        let db = self.db.lock()?;
        let snapshot = db.load_session()?;
        Ok(snapshot.map(|s| s.into()))
    }

    /// Forget the last session. Returns whether one existed.
    pub fn clear_session(&self) -> Result<bool, CeibaCalcError> {
        let db = self.db.lock()?;
        Ok(db.clear_session()?)
    }

    // =========================================================================
    // Report
    // =========================================================================

    /// Recompute the requested sections and render the printable report.
    ///
    /// Every section uses the patient's weight. Fails without producing a
    /// report if any section fails, including infeasible dilutions.
    pub fn render_text_report(&self, request: FfiReportRequest) -> Result<String, CeibaCalcError> {
        let input = PatientInput::try_from(request.patient)?;
        let mut builder = ClinicalReport::builder(ReportPatient {
            id: request.patient_id,
            species: input.species,
            weight_kg: input.weight_kg,
        });

        if request.include_fluids {
            builder = builder.fluids(FluidPlan::compute(&self.reference.constants.fluids, &input)?);
        }
        if let Some(dilution) = request.dilution {
            builder = builder.dextrose(DilutionPlan::compute(
                &self.reference.constants.dextrose,
                dilution.stock_concentration_percent,
                dilution.final_volume_ml,
                dilution.final_concentration_percent,
            )?);
        }
        if let Some(drug) = request.drug {
            builder = builder.drug(self.drug_plan(
                &drug.drug_name,
                input.weight_kg,
                drug.selected_dose,
                input.species,
            )?);
        }

        let report = builder.build()?;
        Ok(export::render_text(&report)?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient input. `species` is "dog" or "cat".
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientInput {
    pub weight_kg: f64,
    pub species: String,
    pub dehydration_percent: Option<f64>,
    pub has_vomiting: bool,
    pub has_diarrhea: bool,
}

impl TryFrom<FfiPatientInput> for PatientInput {
    type Error = CeibaCalcError;

    fn try_from(input: FfiPatientInput) -> Result<Self, Self::Error> {
        Ok(PatientInput {
            weight_kg: input.weight_kg,
            species: input.species.parse()?,
            dehydration_percent: input.dehydration_percent,
            has_vomiting: input.has_vomiting,
            has_diarrhea: input.has_diarrhea,
        })
    }
}

/// FFI-safe formulary entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugSummary {
    pub name: String,
    pub concentration: String,
    pub has_bolus: bool,
    pub cri_unit: Option<String>,
    pub warning: String,
}

impl From<&DrugRecord> for FfiDrugSummary {
    fn from(drug: &DrugRecord) -> Self {
        Self {
            name: drug.name.clone(),
            concentration: drug.concentration.clone(),
            has_bolus: drug.bolus.is_some(),
            cri_unit: drug.cri_unit(),
            warning: drug.warning.clone(),
        }
    }
}

/// FFI-safe min/max volume.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVolumeRange {
    pub min: f64,
    pub max: f64,
}

impl From<VolumeRange> for FfiVolumeRange {
    fn from(range: VolumeRange) -> Self {
        Self {
            min: range.min,
            max: range.max,
        }
    }
}

/// FFI-safe fluid plan.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFluidPlan {
    pub weight_kg: f64,
    pub deficit_ml: f64,
    pub maintenance: FfiVolumeRange,
    pub gi_losses: FfiVolumeRange,
    pub total: FfiVolumeRange,
    pub hourly_rate: FfiVolumeRange,
    pub per_kg_hourly_rate: FfiVolumeRange,
}

impl From<FluidPlan> for FfiFluidPlan {
    fn from(plan: FluidPlan) -> Self {
        Self {
            weight_kg: plan.weight_kg,
            deficit_ml: plan.deficit_ml,
            maintenance: plan.maintenance.into(),
            gi_losses: plan.gi_losses.into(),
            total: plan.total.into(),
            hourly_rate: plan.hourly_rate.into(),
            per_kg_hourly_rate: plan.per_kg_hourly_rate.into(),
        }
    }
}

/// FFI-safe dilution request (C1, V2, C2).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDilutionRequest {
    pub stock_concentration_percent: f64,
    pub final_volume_ml: f64,
    pub final_concentration_percent: f64,
}

/// FFI-safe dilution plan.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDilutionPlan {
    pub stock_volume_ml: f64,
    pub base_fluid_ml: f64,
    pub safe: bool,
    pub safety_message: String,
}

impl From<DilutionPlan> for FfiDilutionPlan {
    fn from(plan: DilutionPlan) -> Self {
        Self {
            stock_volume_ml: plan.stock_volume_ml,
            base_fluid_ml: plan.base_fluid_ml,
            safe: plan.safety.safe,
            safety_message: plan.safety.message,
        }
    }
}

/// FFI-safe drug request. `selected_dose` is in the drug's native CRI unit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugRequest {
    pub drug_name: String,
    pub weight_kg: f64,
    pub selected_dose: f64,
}

/// FFI-safe bolus result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBolus {
    pub dose_total: f64,
    pub mass_unit: String,
    pub volume_ml: f64,
    pub warning: String,
}

impl From<BolusResult> for FfiBolus {
    fn from(bolus: BolusResult) -> Self {
        Self {
            dose_total: bolus.dose_total,
            mass_unit: bolus.mass_unit().to_string(),
            volume_ml: bolus.volume_ml,
            warning: bolus.warning,
        }
    }
}

/// FFI-safe CRI result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCri {
    pub selected_dose: f64,
    pub unit: String,
    pub dose_per_kg_per_min: f64,
    pub rate_ml_per_hr: f64,
    pub within_range: bool,
    pub warning: String,
}

impl From<CriResult> for FfiCri {
    fn from(cri: CriResult) -> Self {
        Self {
            selected_dose: cri.selected_dose,
            unit: cri.unit,
            dose_per_kg_per_min: cri.dose_per_kg_per_min,
            rate_ml_per_hr: cri.rate_ml_per_hr,
            within_range: cri.within_range,
            warning: cri.warning,
        }
    }
}

/// FFI-safe drug plan.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugPlan {
    pub drug: String,
    pub bolus: Option<FfiBolus>,
    pub cri: Option<FfiCri>,
}

impl From<DrugPlan> for FfiDrugPlan {
    fn from(plan: DrugPlan) -> Self {
        Self {
            drug: plan.drug,
            bolus: plan.bolus.map(|b| b.into()),
            cri: plan.cri.map(|c| c.into()),
        }
    }
}

/// FFI-safe last-session snapshot.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSessionSnapshot {
    pub patient_id: Option<String>,
    pub species: String,
    pub weight_kg: Option<f64>,
    pub dehydration_percent: Option<f64>,
    pub has_vomiting: bool,
    pub has_diarrhea: bool,
    pub saved_at: String,
}

impl From<SessionSnapshot> for FfiSessionSnapshot {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            patient_id: snapshot.patient_id,
            species: snapshot.species.to_string(),
            weight_kg: snapshot.weight_kg,
            dehydration_percent: snapshot.dehydration_percent,
            has_vomiting: snapshot.has_vomiting,
            has_diarrhea: snapshot.has_diarrhea,
            saved_at: snapshot.saved_at,
        }
    }
}

/// FFI-safe drug section of a report. The weight comes from the patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReportDrug {
    pub drug_name: String,
    pub selected_dose: f64,
}

/// FFI-safe report request. Absent sections are left out of the report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReportRequest {
    pub patient_id: Option<String>,
    pub patient: FfiPatientInput,
    pub include_fluids: bool,
    pub dilution: Option<FfiDilutionRequest>,
    pub drug: Option<FfiReportDrug>,
}
