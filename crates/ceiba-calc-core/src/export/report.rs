//! Structured clinical report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ExportResult;
use crate::models::{DilutionPlan, DrugPlan, FluidPlan, Species};

/// Patient identification printed on the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportPatient {
    /// Free-text patient identifier
    pub id: Option<String>,
    pub species: Species,
    pub weight_kg: f64,
}

/// Report content covered by the fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportBody {
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    pub patient: ReportPatient,
    pub fluids: Option<FluidPlan>,
    pub dextrose: Option<DilutionPlan>,
    pub drug: Option<DrugPlan>,
}

/// A clinical report built from structured calculation results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicalReport {
    #[serde(flatten)]
    pub body: ReportBody,
    /// Hex SHA-256 of the JSON-serialised body
    pub fingerprint: String,
}

/// Builder for [`ClinicalReport`].
pub struct ReportBuilder {
    body: ReportBody,
}

impl ReportBuilder {
    pub fn fluids(mut self, plan: FluidPlan) -> Self {
        self.body.fluids = Some(plan);
        self
    }

    pub fn dextrose(mut self, plan: DilutionPlan) -> Self {
        self.body.dextrose = Some(plan);
        self
    }

    pub fn drug(mut self, plan: DrugPlan) -> Self {
        self.body.drug = Some(plan);
        self
    }

    /// Override the generation timestamp (reports are otherwise stamped "now").
    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.body.generated_at = at;
        self
    }

    /// Seal the report with its fingerprint.
    pub fn build(self) -> ExportResult<ClinicalReport> {
        let fingerprint = fingerprint(&self.body)?;
        Ok(ClinicalReport {
            body: self.body,
            fingerprint,
        })
    }
}

impl ClinicalReport {
    /// Start a report for a patient.
    pub fn builder(patient: ReportPatient) -> ReportBuilder {
        ReportBuilder {
            body: ReportBody {
                report_id: uuid::Uuid::new_v4().to_string(),
                generated_at: Utc::now(),
                patient,
                fluids: None,
                dextrose: None,
                drug: None,
            },
        }
    }

    /// Check that the body still matches the fingerprint.
    pub fn verify(&self) -> ExportResult<bool> {
        Ok(fingerprint(&self.body)? == self.fingerprint)
    }

    /// Suggested file name: `CeibaCalc_Report_<patient>_<YYYY-MM-DD>.<ext>`.
    pub fn file_name(&self, extension: &str) -> String {
        let patient = self
            .body
            .patient
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(sanitize_file_component)
            .unwrap_or_else(|| "patient".to_string());

        format!(
            "CeibaCalc_Report_{}_{}.{}",
            patient,
            self.body.generated_at.format("%Y-%m-%d"),
            extension
        )
    }
}

fn fingerprint(body: &ReportBody) -> ExportResult<String> {
    let json = serde_json::to_vec(body)?;
    Ok(hex::encode(Sha256::digest(&json)))
}

fn sanitize_file_component(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
