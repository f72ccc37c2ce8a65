//! Static reference data: drug formulary and clinical constants.
//!
//! Loaded once, never mutated. Three JSON documents:
//!
//! - `drugs.json`: array of [`DrugRecord`]
//! - `fluids.json`: maintenance and GI-loss constants
//! - `guidelines.json`: dextrose peripheral-line guideline

mod formulary;

pub use formulary::*;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::models::{ClinicalConstants, DrugRecord, FluidConstants, GuidelineDocument};

pub const DRUGS_FILE: &str = "drugs.json";
pub const FLUIDS_FILE: &str = "fluids.json";
pub const GUIDELINES_FILE: &str = "guidelines.json";

const BUILTIN_DRUGS: &str = include_str!("../../assets/drugs.json");
const BUILTIN_FLUIDS: &str = include_str!("../../assets/fluids.json");
const BUILTIN_GUIDELINES: &str = include_str!("../../assets/guidelines.json");

/// Reference data errors.
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {document}: {source}")]
    Json {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate drug name: {0}")]
    DuplicateDrug(String),
}

pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Formulary plus clinical constants.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub formulary: Formulary,
    pub constants: ClinicalConstants,
}

impl ReferenceData {
    /// Reference data bundled with the crate.
    pub fn builtin() -> ReferenceResult<Self> {
        Self::from_json(BUILTIN_DRUGS, BUILTIN_FLUIDS, BUILTIN_GUIDELINES)
    }

    /// Load `drugs.json`, `fluids.json` and `guidelines.json` from a directory.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> ReferenceResult<Self> {
        let dir = dir.as_ref();
        let drugs = read_document(&dir.join(DRUGS_FILE))?;
        let fluids = read_document(&dir.join(FLUIDS_FILE))?;
        let guidelines = read_document(&dir.join(GUIDELINES_FILE))?;

        let data = Self::from_json(&drugs, &fluids, &guidelines)?;
        info!(dir = %dir.display(), drugs = data.formulary.len(), "loaded reference data");
        Ok(data)
    }

    /// Parse the three JSON documents.
    pub fn from_json(drugs: &str, fluids: &str, guidelines: &str) -> ReferenceResult<Self> {
        let records: Vec<DrugRecord> =
            serde_json::from_str(drugs).map_err(|source| ReferenceError::Json {
                document: DRUGS_FILE,
                source,
            })?;
        let fluids: FluidConstants =
            serde_json::from_str(fluids).map_err(|source| ReferenceError::Json {
                document: FLUIDS_FILE,
                source,
            })?;
        let guidelines: GuidelineDocument =
            serde_json::from_str(guidelines).map_err(|source| ReferenceError::Json {
                document: GUIDELINES_FILE,
                source,
            })?;

        Ok(Self {
            formulary: Formulary::from_records(records)?,
            constants: ClinicalConstants {
                fluids,
                dextrose: guidelines.dextrose,
            },
        })
    }
}

fn read_document(path: &Path) -> ReferenceResult<String> {
    fs::read_to_string(path).map_err(|source| ReferenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}
