//! Terminal output for calculation results.

use ceiba_calc_core::models::{BolusResult, SessionSnapshot};
use ceiba_calc_core::{DilutionPlan, DrugPlan, FluidPlan, Formulary, VolumeRange};

fn range(r: &VolumeRange) -> String {
    format!("{:.2} - {:.2}", r.min, r.max)
}

pub fn print_fluids(plan: &FluidPlan) {
    println!("Fluid therapy plan (24h), {:.2} kg", plan.weight_kg);
    println!("  Deficit:       {:.2} ml", plan.deficit_ml);
    println!("  Maintenance:   {} ml", range(&plan.maintenance));
    println!("  GI losses:     {} ml", range(&plan.gi_losses));
    println!("  Total:         {} ml", range(&plan.total));
    println!("  Rate:          {} ml/h", range(&plan.hourly_rate));
    println!("  Rate per kg:   {} ml/kg/h", range(&plan.per_kg_hourly_rate));
}

pub fn print_dilution(plan: &DilutionPlan) {
    println!(
        "To prepare {:.2} ml of {}% dextrose:",
        plan.final_volume_ml, plan.final_concentration_percent
    );
    println!(
        "  Dextrose {}%:   {:.2} ml",
        plan.stock_concentration_percent, plan.stock_volume_ml
    );
    println!("  Base fluid:     {:.2} ml", plan.base_fluid_ml);
    if !plan.safety.safe {
        println!("{}", plan.safety.message);
    }
}

pub fn print_bolus(bolus: &BolusResult) {
    println!("Bolus ({}):", bolus.drug);
    println!("  Total dose:  {:.2} {}", bolus.dose_total, bolus.mass_unit());
    println!("  Volume:      {:.2} ml", bolus.volume_ml);
    if !bolus.warning.is_empty() {
        println!("{}", bolus.warning);
    }
}

pub fn print_drug_plan(plan: &DrugPlan) {
    if let Some(bolus) = &plan.bolus {
        print_bolus(bolus);
    }
    let Some(cri) = &plan.cri else {
        println!("CRI ({}): no CRI data", plan.drug);
        return;
    };
    println!("CRI ({}):", cri.drug);
    println!("  Selected dose:  {} {}", cri.selected_dose, cri.unit);
    if !cri.within_range {
        println!("  Selected dose is outside the reference range");
    }
    println!("  Infusion rate:  {:.2} ml/h", cri.rate_ml_per_hr);
    if plan.bolus.is_none() && !cri.warning.is_empty() {
        println!("{}", cri.warning);
    }
}

pub fn print_formulary(formulary: &Formulary) {
    for drug in formulary.iter() {
        let cri_unit = drug.cri_unit().unwrap_or_else(|| "-".to_string());
        println!("{:<18} {:<14} CRI: {}", drug.name, drug.concentration, cri_unit);
    }
}

pub fn print_session(snapshot: Option<&SessionSnapshot>) {
    let Some(s) = snapshot else {
        println!("No saved session.");
        return;
    };
    println!("Last session (saved {})", s.saved_at);
    println!("  Patient ID:   {}", s.patient_id.as_deref().unwrap_or("-"));
    println!("  Species:      {}", s.species);
    match s.weight_kg {
        Some(w) => println!("  Weight:       {:.2} kg", w),
        None => println!("  Weight:       -"),
    }
    match s.dehydration_percent {
        Some(d) => println!("  Dehydration:  {}%", d),
        None => println!("  Dehydration:  -"),
    }
    println!("  Vomiting:     {}", s.has_vomiting);
    println!("  Diarrhea:     {}", s.has_diarrhea);
}
