//! ceiba - command-line front end for the CeibaCalc calculator.
//!
//! Every successful patient calculation overwrites the saved last session;
//! patient flags left out of a command are filled in from it.

mod logging;
mod output;
mod patient;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ceiba_calc_core::{
    CalcError, ClinicalReport, Database, DilutionPlan, DoseCalculator, FluidPlan, JsonRenderer,
    PatientInput, ReferenceData, ReportPatient, ReportRenderer, SessionSnapshot, TextRenderer,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

use crate::patient::PatientArgs;

#[derive(Parser, Debug)]
#[command(name = "ceiba")]
#[command(about = "CeibaCalc - veterinary fluid, dextrose and CRI calculator")]
#[command(long_about = "CeibaCalc - veterinary fluid, dextrose and CRI calculator

Examples:
  ceiba fluids -w 10 -s dog -d 5 --vomiting      # 24h fluid plan
  ceiba dextrose --stock 50 --volume 500 --final 5
  ceiba drug Fentanyl --dose 5                   # bolus + CRI, saved patient
  ceiba report --fluids --drug Fentanyl --dose 5 # printable report
  ceiba session show                             # last saved patient")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Directory with drugs.json, fluids.json and guidelines.json (default: built-in data)
    #[arg(long = "data-dir", env = "CEIBA_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Last-session database file
    #[arg(long, env = "CEIBA_DB", default_value = "ceiba.db", global = true)]
    db: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 24h fluid therapy plan
    Fluids {
        #[command(flatten)]
        patient: PatientArgs,
    },

    /// Dextrose dilution recipe (C1·V1 = C2·V2)
    Dextrose {
        /// Stock dextrose concentration (%)
        #[arg(long)]
        stock: f64,

        /// Final volume (ml)
        #[arg(long)]
        volume: f64,

        /// Final dextrose concentration (%)
        #[arg(long = "final")]
        final_percent: f64,
    },

    /// Bolus and CRI for one drug
    Drug {
        /// Drug name (case-insensitive)
        name: String,

        /// CRI dose in the drug's native unit; bolus only when omitted
        #[arg(long)]
        dose: Option<f64>,

        #[command(flatten)]
        patient: PatientArgs,
    },

    /// List formulary drugs
    Drugs,

    /// Write a clinical report
    Report {
        #[command(flatten)]
        patient: PatientArgs,

        /// Include the fluid therapy plan
        #[arg(long)]
        fluids: bool,

        /// Include a dextrose dilution
        #[arg(long, num_args = 3, value_names = ["STOCK_PCT", "VOLUME_ML", "FINAL_PCT"])]
        dextrose: Option<Vec<f64>>,

        /// Include the analgesia plan for a drug
        #[arg(long, requires = "dose")]
        drug: Option<String>,

        /// CRI dose for --drug, in the drug's native unit
        #[arg(long)]
        dose: Option<f64>,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Output directory
        #[arg(short = 'o', long = "output", default_value = ".")]
        output_dir: PathBuf,

        /// Print the report instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Manage the saved last session
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(Subcommand, Debug)]
enum SessionCommands {
    /// Show the saved session
    Show,
    /// Forget the saved session
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    fn renderer(self) -> Box<dyn ReportRenderer> {
        match self {
            ReportFormat::Text => Box::new(TextRenderer),
            ReportFormat::Json => Box::new(JsonRenderer),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let reference = load_reference(cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Fluids { patient } => {
            let db = open_db(&cli.db)?;
            let (patient_id, input) = resolve_patient(&db, &patient)?;
            let plan = FluidPlan::compute(&reference.constants.fluids, &input).map_err(calc_error)?;
            save_session(&db, patient_id, &input)?;

            if cli.json {
                print_json(&plan)?;
            } else {
                output::print_fluids(&plan);
            }
        }

        Commands::Dextrose {
            stock,
            volume,
            final_percent,
        } => {
            let plan = DilutionPlan::compute(&reference.constants.dextrose, stock, volume, final_percent)
                .map_err(calc_error)?;

            if cli.json {
                print_json(&plan)?;
            } else {
                output::print_dilution(&plan);
            }
        }

        Commands::Drug {
            name,
            dose,
            patient,
        } => {
            let db = open_db(&cli.db)?;
            let (patient_id, input) = resolve_patient(&db, &patient)?;
            let calculator = DoseCalculator::new(&reference.formulary);

            match dose {
                Some(dose) => {
                    let plan = calculator
                        .plan(&name, input.weight_kg, dose, input.species)
                        .map_err(calc_error)?;
                    save_session(&db, patient_id, &input)?;
                    if cli.json {
                        print_json(&plan)?;
                    } else {
                        output::print_drug_plan(&plan);
                    }
                }
                None => {
                    let bolus = calculator
                        .bolus(&name, input.weight_kg, input.species)
                        .map_err(calc_error)?;
                    save_session(&db, patient_id, &input)?;
                    if cli.json {
                        print_json(&bolus)?;
                    } else {
                        output::print_bolus(&bolus);
                    }
                }
            }
        }

        Commands::Drugs => {
            if cli.json {
                let drugs: Vec<_> = reference.formulary.iter().collect();
                print_json(&drugs)?;
            } else {
                output::print_formulary(&reference.formulary);
            }
        }

        Commands::Report {
            patient,
            fluids,
            dextrose,
            drug,
            dose,
            format,
            output_dir,
            stdout,
        } => {
            let db = open_db(&cli.db)?;
            let (patient_id, input) = resolve_patient(&db, &patient)?;
            let report = build_report(
                &reference,
                patient_id.clone(),
                &input,
                fluids,
                dextrose.as_deref(),
                drug.as_deref().zip(dose),
            )?;
            save_session(&db, patient_id, &input)?;

            let renderer = format.renderer();
            let bytes = renderer.render(&report).context("Failed to render report")?;

            if stdout {
                print!("{}", String::from_utf8_lossy(&bytes));
            } else {
                fs::create_dir_all(&output_dir)
                    .with_context(|| format!("Failed to create {}", output_dir.display()))?;
                let path = output_dir.join(report.file_name(renderer.extension()));
                fs::write(&path, &bytes)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!(path = %path.display(), fingerprint = %report.fingerprint, "wrote report");
                println!("Report written to {}", path.display());
            }
        }

        Commands::Session { command } => {
            let db = open_db(&cli.db)?;
            match command {
                SessionCommands::Show => {
                    let snapshot = db.load_session().context("Failed to load session")?;
                    if cli.json {
                        print_json(&snapshot)?;
                    } else {
                        output::print_session(snapshot.as_ref());
                    }
                }
                SessionCommands::Clear => {
                    if db.clear_session().context("Failed to clear session")? {
                        println!("Session cleared.");
                    } else {
                        println!("No saved session.");
                    }
                }
            }
        }
    }

    Ok(())
}

fn load_reference(data_dir: Option<&Path>) -> Result<ReferenceData> {
    match data_dir {
        Some(dir) => ReferenceData::load_dir(dir)
            .with_context(|| format!("Failed to load reference data from {}", dir.display())),
        None => ReferenceData::builtin().context("Failed to load built-in reference data"),
    }
}

fn open_db(path: &Path) -> Result<Database> {
    debug!(path = %path.display(), "opening session database");
    Database::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn resolve_patient(db: &Database, args: &PatientArgs) -> Result<(Option<String>, PatientInput)> {
    let saved = db.load_session().context("Failed to load session")?;
    args.resolve(saved.as_ref())
}

fn save_session(db: &Database, patient_id: Option<String>, input: &PatientInput) -> Result<()> {
    let snapshot = SessionSnapshot::from_input(patient_id, input);
    db.save_session(&snapshot).context("Failed to save session")
}

fn build_report(
    reference: &ReferenceData,
    patient_id: Option<String>,
    input: &PatientInput,
    fluids: bool,
    dextrose: Option<&[f64]>,
    drug: Option<(&str, f64)>,
) -> Result<ClinicalReport> {
    if !fluids && dextrose.is_none() && drug.is_none() {
        bail!("nothing to report; pass --fluids, --dextrose or --drug");
    }

    let mut builder = ClinicalReport::builder(ReportPatient {
        id: patient_id,
        species: input.species,
        weight_kg: input.weight_kg,
    });

    if fluids {
        let plan = FluidPlan::compute(&reference.constants.fluids, input).map_err(calc_error)?;
        builder = builder.fluids(plan);
    }
    if let Some(&[stock, volume, final_percent]) = dextrose {
        let plan = DilutionPlan::compute(&reference.constants.dextrose, stock, volume, final_percent)
            .map_err(calc_error)?;
        builder = builder.dextrose(plan);
    }
    if let Some((name, dose)) = drug {
        let plan = DoseCalculator::new(&reference.formulary)
            .plan(name, input.weight_kg, dose, input.species)
            .map_err(calc_error)?;
        builder = builder.drug(plan);
    }

    builder.build().context("Failed to seal report")
}

/// Turn a calculation error into a user-facing message, with suggestions
/// for unknown drug names.
fn calc_error(e: CalcError) -> anyhow::Error {
    if let CalcError::NotFound { suggestions, .. } = &e {
        if !suggestions.is_empty() {
            return anyhow::anyhow!("{} (did you mean: {}?)", e, suggestions.join(", "));
        }
    }
    anyhow::Error::new(e)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
