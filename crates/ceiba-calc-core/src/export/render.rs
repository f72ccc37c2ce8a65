//! Report renderers.
//!
//! Renderers consume the structured [`ClinicalReport`]; none of them parse
//! text produced by another renderer.

use std::fmt::Write;

use super::{ClinicalReport, ExportResult};
use crate::models::{DilutionPlan, DrugPlan, FluidPlan, VolumeRange};

/// Turns a report into a document.
pub trait ReportRenderer {
    /// File extension of the produced document.
    fn extension(&self) -> &'static str;

    /// Render the report.
    fn render(&self, report: &ClinicalReport) -> ExportResult<Vec<u8>>;
}

/// Pretty-printed JSON document.
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, report: &ClinicalReport) -> ExportResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(report)?)
    }
}

/// Plain-text printable report.
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, report: &ClinicalReport) -> ExportResult<Vec<u8>> {
        Ok(render_text(report)?.into_bytes())
    }
}

/// Render the text report as a `String`.
pub fn render_text(report: &ClinicalReport) -> ExportResult<String> {
    let body = &report.body;
    let mut out = String::new();

    writeln!(out, "CeibaCalc Clinical Report")?;
    writeln!(out, "Generated: {}", body.generated_at.format("%Y-%m-%d %H:%M UTC"))?;
    writeln!(out, "Report ID: {}", body.report_id)?;
    writeln!(out)?;

    writeln!(out, "1. Patient")?;
    writeln!(out, "- Patient ID: {}", body.patient.id.as_deref().unwrap_or("N/A"))?;
    writeln!(out, "- Species: {}", body.patient.species)?;
    writeln!(out, "- Weight: {:.2} kg", body.patient.weight_kg)?;
    writeln!(out)?;

    if let Some(plan) = &body.fluids {
        write_fluids(&mut out, plan)?;
    }
    if let Some(plan) = &body.dextrose {
        write_dextrose(&mut out, plan)?;
    }
    if let Some(plan) = &body.drug {
        write_drug(&mut out, plan)?;
    }

    writeln!(out, "Responsible technician signature: ______________________")?;
    writeln!(out, "Fingerprint (SHA-256): {}", report.fingerprint)?;

    Ok(out)
}

fn write_fluids(out: &mut String, plan: &FluidPlan) -> std::fmt::Result {
    writeln!(out, "2. Fluid Therapy Plan (24h)")?;
    writeln!(out, "- Deficit to correct: {:.2} ml", plan.deficit_ml)?;
    writeln!(out, "- Maintenance (24h): {} ml", range(&plan.maintenance))?;
    writeln!(out, "- Estimated GI losses (24h): {} ml", range(&plan.gi_losses))?;
    writeln!(out, "- Total volume (24h): {} ml", range(&plan.total))?;
    writeln!(out, "- Rate: {} ml/h", range(&plan.hourly_rate))?;
    writeln!(out, "- Rate: {} ml/kg/h", range(&plan.per_kg_hourly_rate))?;
    writeln!(out)
}

fn write_dextrose(out: &mut String, plan: &DilutionPlan) -> std::fmt::Result {
    writeln!(out, "3. Dextrose Solution")?;
    writeln!(
        out,
        "- To prepare {:.2} ml at {}%:",
        plan.final_volume_ml, plan.final_concentration_percent
    )?;
    writeln!(
        out,
        "- Dextrose {}%: {:.2} ml",
        plan.stock_concentration_percent, plan.stock_volume_ml
    )?;
    writeln!(out, "- Base fluid (e.g. LRS): {:.2} ml", plan.base_fluid_ml)?;
    if !plan.safety.safe {
        writeln!(out, "{}", plan.safety.message)?;
    }
    writeln!(out)
}

fn write_drug(out: &mut String, plan: &DrugPlan) -> std::fmt::Result {
    writeln!(out, "4. Analgesia Plan - {}", plan.drug)?;
    if let Some(bolus) = &plan.bolus {
        writeln!(out, "Bolus:")?;
        writeln!(out, "- Total dose: {:.2} {}", bolus.dose_total, bolus.mass_unit())?;
        writeln!(out, "- Volume to administer: {:.2} ml", bolus.volume_ml)?;
    }
    writeln!(out, "CRI:")?;
    match &plan.cri {
        Some(cri) => {
            writeln!(out, "- Selected dose: {} {}", cri.selected_dose, cri.unit)?;
            if !cri.within_range {
                writeln!(out, "- Selected dose is outside the reference range")?;
            }
            writeln!(out, "- Infusion rate: {:.2} ml/h", cri.rate_ml_per_hr)?;
        }
        None => writeln!(out, "- No CRI data for {}", plan.drug)?,
    }

    // Bolus and CRI carry the same drug warning; print it once.
    let warning = plan
        .cri
        .as_ref()
        .map(|cri| cri.warning.as_str())
        .or_else(|| plan.bolus.as_ref().map(|bolus| bolus.warning.as_str()))
        .unwrap_or_default();
    if !warning.is_empty() {
        writeln!(out, "{}", warning)?;
    }
    writeln!(out)
}

fn range(r: &VolumeRange) -> String {
    format!("{:.2} - {:.2}", r.min, r.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BolusResult, CriResult, SafetyCheck, Species};
    use crate::export::ReportPatient;

    fn report() -> ClinicalReport {
        ClinicalReport::builder(ReportPatient {
            id: Some("Luna".into()),
            species: Species::Cat,
            weight_kg: 4.0,
        })
        .dextrose(DilutionPlan {
            stock_concentration_percent: 50.0,
            final_volume_ml: 250.0,
            final_concentration_percent: 10.0,
            stock_volume_ml: 50.0,
            base_fluid_ml: 200.0,
            safety: SafetyCheck {
                safe: false,
                message: "ALERT (source: Test): too concentrated".into(),
            },
        })
        .drug(DrugPlan {
            drug: "Lidocaine".into(),
            bolus: Some(BolusResult {
                drug: "Lidocaine".into(),
                dose_total: 4.0,
                unit: "mg/kg".into(),
                volume_ml: 0.2,
                warning: "ALERT: Cats are sensitive.".into(),
            }),
            cri: Some(CriResult {
                drug: "Lidocaine".into(),
                selected_dose: 2.0,
                unit: "mg/kg/hr".into(),
                dose_per_kg_per_min: 2.0 / 60.0,
                mass_per_hour: 8.0,
                rate_ml_per_hr: 0.4,
                within_range: true,
                warning: "ALERT: Cats are sensitive.".into(),
            }),
        })
        .build()
        .unwrap()
    }

    #[test]
    fn test_text_report_sections() {
        let report = report();
        let text = render_text(&report).unwrap();

        assert!(text.contains("- Patient ID: Luna"));
        assert!(text.contains("- Species: cat"));
        assert!(text.contains("- Weight: 4.00 kg"));
        assert!(!text.contains("2. Fluid Therapy Plan"));
        assert!(text.contains("3. Dextrose Solution"));
        assert!(text.contains("- Base fluid (e.g. LRS): 200.00 ml"));
        assert!(text.contains("ALERT (source: Test)"));
        assert!(text.contains("4. Analgesia Plan - Lidocaine"));
        assert!(text.contains("- Total dose: 4.00 mg"));
        assert!(text.contains("- Infusion rate: 0.40 ml/h"));
        assert_eq!(text.matches("ALERT: Cats are sensitive.").count(), 1);
        assert!(text.ends_with(&format!("Fingerprint (SHA-256): {}\n", report.fingerprint)));
    }

    #[test]
    fn test_bolus_only_plan_keeps_warning() {
        let report = ClinicalReport::builder(ReportPatient {
            id: None,
            species: Species::Cat,
            weight_kg: 4.0,
        })
        .drug(DrugPlan {
            drug: "Methadone".into(),
            bolus: Some(BolusResult {
                drug: "Methadone".into(),
                dose_total: 0.4,
                unit: "mg/kg".into(),
                volume_ml: 0.04,
                warning: "ALERT: Bolus only.".into(),
            }),
            cri: None,
        })
        .build()
        .unwrap();
        let text = render_text(&report).unwrap();

        assert!(text.contains("4. Analgesia Plan - Methadone"));
        assert!(text.contains("- Total dose: 0.40 mg"));
        assert!(text.contains("- Volume to administer: 0.04 ml"));
        assert!(text.contains("- No CRI data for Methadone"));
        assert!(!text.contains("- Infusion rate"));
        assert!(text.contains("ALERT: Bolus only."));
    }

    #[test]
    fn test_renderers() {
        let report = report();

        let text = TextRenderer.render(&report).unwrap();
        assert_eq!(TextRenderer.extension(), "txt");
        assert!(String::from_utf8(text).unwrap().starts_with("CeibaCalc Clinical Report"));

        let json = JsonRenderer.render(&report).unwrap();
        assert_eq!(JsonRenderer.extension(), "json");
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["fingerprint"], report.fingerprint.as_str());
        assert_eq!(value["patient"]["species"], "cat");
        assert_eq!(value["drug"]["cri"]["unit"], "mg/kg/hr");
    }
}
