//! End-to-end tests for the session store, reference loading and reports.

use std::fs;

use ceiba_calc_core::export::{render_text, ReportPatient};
use ceiba_calc_core::models::UNKNOWN_SOURCE;
use ceiba_calc_core::reference::{ReferenceError, DRUGS_FILE, FLUIDS_FILE, GUIDELINES_FILE};
use ceiba_calc_core::{
    ClinicalReport, Database, DilutionPlan, DoseCalculator, FluidPlan, JsonRenderer, PatientInput,
    ReferenceData, ReportRenderer, SessionSnapshot, Species,
};
use tempfile::TempDir;

#[test]
fn test_session_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ceiba.db");

    let mut input = PatientInput::new(7.2, Species::Cat);
    input.dehydration_percent = Some(8.0);
    input.has_vomiting = true;
    let snapshot = SessionSnapshot::from_input(Some("Nala".into()), &input);

    {
        let db = Database::open(&path).unwrap();
        db.save_session(&snapshot).unwrap();
    }

    let db = Database::open(&path).unwrap();
    let loaded = db.load_session().unwrap().unwrap();
    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.to_input(), Some(input));
}

#[test]
fn test_session_never_grows() {
    let db = Database::open_in_memory().unwrap();

    for weight in [3.0, 4.0, 5.0] {
        let snapshot = SessionSnapshot::from_input(None, &PatientInput::new(weight, Species::Dog));
        db.save_session(&snapshot).unwrap();
    }

    let count: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM last_session", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(db.load_session().unwrap().unwrap().weight_kg, Some(5.0));
}

#[test]
fn test_full_report() {
    let reference = ReferenceData::builtin().unwrap();

    let mut input = PatientInput::new(4.0, Species::Cat);
    input.dehydration_percent = Some(5.0);
    input.has_diarrhea = true;

    let fluids = FluidPlan::compute(&reference.constants.fluids, &input).unwrap();
    let dextrose = DilutionPlan::compute(&reference.constants.dextrose, 50.0, 250.0, 10.0).unwrap();
    let drug = DoseCalculator::new(&reference.formulary)
        .plan("Lidocaine", input.weight_kg, 2.0, input.species)
        .unwrap();

    let report = ClinicalReport::builder(ReportPatient {
        id: Some("Luna".into()),
        species: input.species,
        weight_kg: input.weight_kg,
    })
    .fluids(fluids)
    .dextrose(dextrose)
    .drug(drug)
    .build()
    .unwrap();

    let text = render_text(&report).unwrap();
    let sections = [
        "1. Patient",
        "2. Fluid Therapy Plan (24h)",
        "3. Dextrose Solution",
        "4. Analgesia Plan - Lidocaine",
    ];
    let mut last = 0;
    for section in sections {
        let at = text.find(section).unwrap_or_else(|| panic!("missing section {}", section));
        assert!(at >= last, "section {} out of order", section);
        last = at;
    }
    assert!(text.contains("- Deficit to correct: 200.00 ml"));
    assert!(text.contains("exceeds the recommended maximum"));
    assert!(text.contains("ALERT: Cats are highly sensitive"));
    assert!(text.contains(&report.fingerprint));

    let json = JsonRenderer.render(&report).unwrap();
    let parsed: ClinicalReport = serde_json::from_slice(&json).unwrap();
    assert_eq!(parsed, report);
    assert!(parsed.verify().unwrap());
}

fn write_reference(dir: &TempDir, drugs: &str, guidelines: &str) {
    fs::write(dir.path().join(DRUGS_FILE), drugs).unwrap();
    fs::write(
        dir.path().join(FLUIDS_FILE),
        r#"{
            "maintenance": {"dog": {"min": 50, "max": 60}, "cat": {"min": 40, "max": 50}},
            "gi_losses": {
                "vomit": {"min_ml_per_kg": 20, "max_ml_per_kg": 40},
                "diarrhea": {"min_ml_per_kg": 30, "max_ml_per_kg": 50}
            }
        }"#,
    )
    .unwrap();
    fs::write(dir.path().join(GUIDELINES_FILE), guidelines).unwrap();
}

#[test]
fn test_load_dir_with_defaults() {
    let dir = TempDir::new().unwrap();
    write_reference(
        &dir,
        r#"[{"name": "Butorphanol", "concentration": "10 mg/ml", "bolus": "0.2-0.4 mg/kg"}]"#,
        "{}",
    );

    let reference = ReferenceData::load_dir(dir.path()).unwrap();
    assert_eq!(reference.formulary.names(), vec!["Butorphanol"]);
    assert_eq!(
        reference.constants.fluids.maintenance("dog", 10.0).min,
        500.0
    );

    let guideline = &reference.constants.dextrose;
    assert_eq!(guideline.max_concentration_percent(), 7.5);
    let check = guideline.validate_peripheral_safety(10.0);
    assert!(!check.safe);
    assert!(check.message.contains(UNKNOWN_SOURCE));
}

#[test]
fn test_load_dir_rejects_duplicates() {
    let dir = TempDir::new().unwrap();
    write_reference(
        &dir,
        r#"[
            {"name": "Ketamine", "concentration": "100 mg/ml"},
            {"name": "KETAMINE", "concentration": "50 mg/ml"}
        ]"#,
        "{}",
    );

    assert!(matches!(
        ReferenceData::load_dir(dir.path()),
        Err(ReferenceError::DuplicateDrug(_))
    ));
}
