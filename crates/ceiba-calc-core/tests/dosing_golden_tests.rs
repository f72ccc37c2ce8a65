//! Golden tests for the calculators against the built-in reference data.
//!
//! Expected values are worked by hand from the bundled formulary and
//! clinical constants.

use ceiba_calc_core::models::PatientInput;
use ceiba_calc_core::{CalcError, DilutionPlan, DoseCalculator, FluidPlan, ReferenceData, Species};

const EPSILON: f64 = 1e-9;

fn reference() -> ReferenceData {
    ReferenceData::builtin().expect("built-in reference data loads")
}

fn assert_close(actual: f64, expected: f64, id: &str, what: &str) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "Case {}: {} mismatch - expected {}, got {}",
        id,
        what,
        expected,
        actual
    );
}

/// Bolus test case.
struct BolusCase {
    id: &'static str,
    drug: &'static str,
    species: Species,
    weight_kg: f64,
    expected_dose: f64,
    expected_unit: &'static str,
    expected_volume_ml: f64,
    expected_alert: bool,
}

fn get_bolus_cases() -> Vec<BolusCase> {
    vec![
        BolusCase {
            id: "fentanyl-dog",
            drug: "Fentanyl",
            species: Species::Dog,
            weight_kg: 10.0,
            expected_dose: 20.0,
            expected_unit: "mcg/kg",
            expected_volume_ml: 0.4,
            expected_alert: false,
        },
        BolusCase {
            id: "lidocaine-cat",
            drug: "lidocaine",
            species: Species::Cat,
            weight_kg: 4.0,
            expected_dose: 4.0,
            expected_unit: "mg/kg",
            expected_volume_ml: 0.2,
            expected_alert: true,
        },
        BolusCase {
            id: "lidocaine-dog",
            drug: "LIDOCAINE",
            species: Species::Dog,
            weight_kg: 20.0,
            expected_dose: 20.0,
            expected_unit: "mg/kg",
            expected_volume_ml: 1.0,
            expected_alert: false,
        },
        BolusCase {
            id: "ketamine-dog",
            drug: "Ketamine",
            species: Species::Dog,
            weight_kg: 20.0,
            expected_dose: 10.0,
            expected_unit: "mg/kg",
            expected_volume_ml: 0.1,
            expected_alert: false,
        },
        BolusCase {
            id: "dexmedetomidine-dog",
            drug: "Dexmedetomidine",
            species: Species::Dog,
            weight_kg: 15.0,
            expected_dose: 15.0,
            expected_unit: "mcg/kg",
            expected_volume_ml: 0.03,
            expected_alert: false,
        },
        BolusCase {
            id: "methadone-cat",
            drug: " Methadone ",
            species: Species::Cat,
            weight_kg: 5.0,
            expected_dose: 0.5,
            expected_unit: "mg/kg",
            expected_volume_ml: 0.05,
            expected_alert: false,
        },
    ]
}

#[test]
fn test_bolus_golden_cases() {
    let reference = reference();
    let calculator = DoseCalculator::new(&reference.formulary);

    for case in get_bolus_cases() {
        let bolus = calculator
            .bolus(case.drug, case.weight_kg, case.species)
            .unwrap_or_else(|e| panic!("Case {}: unexpected error {}", case.id, e));

        assert_close(bolus.dose_total, case.expected_dose, case.id, "dose");
        assert_close(bolus.volume_ml, case.expected_volume_ml, case.id, "volume");
        assert_eq!(bolus.unit, case.expected_unit, "Case {}: unit mismatch", case.id);
        assert_eq!(
            bolus.warning.starts_with("ALERT: "),
            case.expected_alert,
            "Case {}: alert mismatch in '{}'",
            case.id,
            bolus.warning
        );
    }
}

/// CRI test case.
struct CriCase {
    id: &'static str,
    drug: &'static str,
    weight_kg: f64,
    dose: f64,
    expected_unit: &'static str,
    expected_rate_ml_per_hr: f64,
}

fn get_cri_cases() -> Vec<CriCase> {
    vec![
        CriCase {
            id: "fentanyl-reference",
            drug: "Fentanyl",
            weight_kg: 10.0,
            dose: 5.0,
            expected_unit: "mcg/kg/hr",
            expected_rate_ml_per_hr: 1.0,
        },
        CriCase {
            id: "lidocaine-dog",
            drug: "Lidocaine",
            weight_kg: 20.0,
            dose: 2.0,
            expected_unit: "mg/kg/hr",
            expected_rate_ml_per_hr: 2.0,
        },
        CriCase {
            id: "ketamine-dog",
            drug: "ketamine",
            weight_kg: 25.0,
            dose: 0.6,
            expected_unit: "mg/kg/hr",
            expected_rate_ml_per_hr: 0.15,
        },
        CriCase {
            id: "dexmedetomidine-cat",
            drug: "Dexmedetomidine",
            weight_kg: 4.0,
            dose: 1.0,
            expected_unit: "mcg/kg/hr",
            expected_rate_ml_per_hr: 0.008,
        },
        CriCase {
            id: "morphine-dog",
            drug: "Morphine",
            weight_kg: 10.0,
            dose: 0.2,
            expected_unit: "mg/kg/hr",
            expected_rate_ml_per_hr: 0.2,
        },
    ]
}

#[test]
fn test_cri_golden_cases() {
    let reference = reference();
    let calculator = DoseCalculator::new(&reference.formulary);

    for case in get_cri_cases() {
        let cri = calculator
            .cri(case.drug, case.weight_kg, case.dose, Species::Dog)
            .unwrap_or_else(|e| panic!("Case {}: unexpected error {}", case.id, e));

        assert_close(cri.rate_ml_per_hr, case.expected_rate_ml_per_hr, case.id, "rate");
        assert_eq!(cri.unit, case.expected_unit, "Case {}: unit mismatch", case.id);
        assert!(cri.within_range, "Case {}: dose should be within range", case.id);
    }
}

/// Fluid plan test case.
struct FluidCase {
    id: &'static str,
    species: Species,
    weight_kg: f64,
    dehydration_percent: Option<f64>,
    vomiting: bool,
    diarrhea: bool,
    expected_deficit_ml: f64,
    expected_total: (f64, f64),
}

fn get_fluid_cases() -> Vec<FluidCase> {
    vec![
        FluidCase {
            id: "dog-dehydrated-vomiting",
            species: Species::Dog,
            weight_kg: 10.0,
            dehydration_percent: Some(5.0),
            vomiting: true,
            diarrhea: false,
            expected_deficit_ml: 500.0,
            expected_total: (1100.0, 1500.0),
        },
        FluidCase {
            id: "cat-diarrhea-only",
            species: Species::Cat,
            weight_kg: 4.0,
            dehydration_percent: None,
            vomiting: false,
            diarrhea: true,
            expected_deficit_ml: 0.0,
            expected_total: (280.0, 400.0),
        },
        FluidCase {
            id: "dog-both-losses",
            species: Species::Dog,
            weight_kg: 20.0,
            dehydration_percent: Some(8.0),
            vomiting: true,
            diarrhea: true,
            expected_deficit_ml: 1600.0,
            expected_total: (3400.0, 4600.0),
        },
        FluidCase {
            id: "cat-maintenance-only",
            species: Species::Cat,
            weight_kg: 3.0,
            dehydration_percent: Some(0.0),
            vomiting: false,
            diarrhea: false,
            expected_deficit_ml: 0.0,
            expected_total: (120.0, 150.0),
        },
    ]
}

#[test]
fn test_fluid_golden_cases() {
    let reference = reference();

    for case in get_fluid_cases() {
        let mut input = PatientInput::new(case.weight_kg, case.species);
        input.dehydration_percent = case.dehydration_percent;
        input.has_vomiting = case.vomiting;
        input.has_diarrhea = case.diarrhea;

        let plan = FluidPlan::compute(&reference.constants.fluids, &input)
            .unwrap_or_else(|e| panic!("Case {}: unexpected error {}", case.id, e));

        assert_close(plan.deficit_ml, case.expected_deficit_ml, case.id, "deficit");
        assert_close(plan.total.min, case.expected_total.0, case.id, "total min");
        assert_close(plan.total.max, case.expected_total.1, case.id, "total max");
        assert_close(plan.hourly_rate.max, case.expected_total.1 / 24.0, case.id, "hourly max");
        assert_close(
            plan.per_kg_hourly_rate.min,
            case.expected_total.0 / 24.0 / case.weight_kg,
            case.id,
            "per-kg hourly min",
        );
    }
}

/// Dextrose dilution test case: (C1, V2, C2) → (V1, base, safe).
struct DilutionCase {
    id: &'static str,
    stock_percent: f64,
    final_volume_ml: f64,
    final_percent: f64,
    expected_stock_ml: f64,
    expected_base_ml: f64,
    expected_safe: bool,
}

fn get_dilution_cases() -> Vec<DilutionCase> {
    vec![
        DilutionCase {
            id: "five-percent-bag",
            stock_percent: 50.0,
            final_volume_ml: 500.0,
            final_percent: 5.0,
            expected_stock_ml: 50.0,
            expected_base_ml: 450.0,
            expected_safe: true,
        },
        DilutionCase {
            id: "at-threshold",
            stock_percent: 50.0,
            final_volume_ml: 100.0,
            final_percent: 7.5,
            expected_stock_ml: 15.0,
            expected_base_ml: 85.0,
            expected_safe: true,
        },
        DilutionCase {
            id: "above-threshold",
            stock_percent: 50.0,
            final_volume_ml: 250.0,
            final_percent: 10.0,
            expected_stock_ml: 50.0,
            expected_base_ml: 200.0,
            expected_safe: false,
        },
        DilutionCase {
            id: "zero-final",
            stock_percent: 50.0,
            final_volume_ml: 500.0,
            final_percent: 0.0,
            expected_stock_ml: 0.0,
            expected_base_ml: 500.0,
            expected_safe: true,
        },
    ]
}

#[test]
fn test_dilution_golden_cases() {
    let reference = reference();
    let guideline = &reference.constants.dextrose;

    for case in get_dilution_cases() {
        let plan = DilutionPlan::compute(
            guideline,
            case.stock_percent,
            case.final_volume_ml,
            case.final_percent,
        )
        .unwrap_or_else(|e| panic!("Case {}: unexpected error {}", case.id, e));

        assert_close(plan.stock_volume_ml, case.expected_stock_ml, case.id, "stock volume");
        assert_close(plan.base_fluid_ml, case.expected_base_ml, case.id, "base volume");
        assert_eq!(plan.safety.safe, case.expected_safe, "Case {}: safety mismatch", case.id);
        if !case.expected_safe {
            assert!(
                plan.safety.message.contains("AAHA/AAFP"),
                "Case {}: message should name the source",
                case.id
            );
        }
    }
}

#[test]
fn test_unknown_drug_any_casing() {
    let reference = reference();
    let calculator = DoseCalculator::new(&reference.formulary);

    for name in ["Unknown", "UNKNOWN", "unknown"] {
        assert!(matches!(
            calculator.bolus(name, 10.0, Species::Dog),
            Err(CalcError::NotFound { .. })
        ));
        assert!(matches!(
            calculator.cri(name, 10.0, 5.0, Species::Dog),
            Err(CalcError::NotFound { .. })
        ));
    }
}

#[test]
fn test_misspelled_drug_gets_suggestion() {
    let reference = reference();
    let calculator = DoseCalculator::new(&reference.formulary);

    match calculator.bolus("Morfine", 10.0, Species::Dog) {
        Err(CalcError::NotFound { suggestions, .. }) => {
            assert_eq!(suggestions.first().map(String::as_str), Some("Morphine"));
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_methadone_plan_is_bolus_only() {
    let reference = reference();
    let calculator = DoseCalculator::new(&reference.formulary);

    assert!(matches!(
        calculator.cri("Methadone", 10.0, 0.2, Species::Dog),
        Err(CalcError::NotFound { .. })
    ));

    // 10 kg × 0.1 mg/kg = 1 mg; 1 mg / 10 mg/ml = 0.1 ml
    let plan = calculator.plan("Methadone", 10.0, 0.2, Species::Dog).unwrap();
    assert!(plan.cri.is_none());
    let bolus = plan.bolus.unwrap();
    assert_close(bolus.dose_total, 1.0, "methadone", "bolus dose");
    assert_close(bolus.volume_ml, 0.1, "methadone", "bolus volume");
    assert!(bolus.warning.contains("not recommended as a CRI"));
}

#[test]
fn test_infeasible_dilution() {
    let reference = reference();

    assert!(matches!(
        DilutionPlan::compute(&reference.constants.dextrose, 5.0, 500.0, 10.0),
        Err(CalcError::Infeasible(_))
    ));
    assert!(matches!(
        DilutionPlan::compute(&reference.constants.dextrose, 0.0, 500.0, 5.0),
        Err(CalcError::InvalidInput(_))
    ));
}

#[test]
fn test_non_positive_weight_rejected() {
    let reference = reference();

    for weight in [0.0, -3.0, f64::NAN] {
        let input = PatientInput::new(weight, Species::Dog);
        assert!(matches!(
            FluidPlan::compute(&reference.constants.fluids, &input),
            Err(CalcError::InvalidInput(_))
        ));
    }
}
