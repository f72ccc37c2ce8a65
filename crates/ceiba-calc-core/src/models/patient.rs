//! Patient models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported patient species.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    #[default]
    #[serde(alias = "canine", alias = "perro")]
    Dog,
    #[serde(alias = "feline", alias = "gato")]
    Cat,
}

impl Species {
    /// Key used in the clinical constants tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognised species names.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown species: {0}")]
pub struct UnknownSpecies(pub String);

impl FromStr for Species {
    type Err = UnknownSpecies;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dog" | "canine" | "perro" => Ok(Species::Dog),
            "cat" | "feline" | "gato" => Ok(Species::Cat),
            _ => Err(UnknownSpecies(s.to_string())),
        }
    }
}

/// Per-calculation patient input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientInput {
    /// Body weight in kg, must be > 0
    pub weight_kg: f64,
    pub species: Species,
    /// Estimated dehydration (%), treated as 0 when absent
    pub dehydration_percent: Option<f64>,
    pub has_vomiting: bool,
    pub has_diarrhea: bool,
}

impl PatientInput {
    /// Create an input with no dehydration and no GI losses.
    pub fn new(weight_kg: f64, species: Species) -> Self {
        Self {
            weight_kg,
            species,
            dehydration_percent: None,
            has_vomiting: false,
            has_diarrhea: false,
        }
    }
}

/// Last-session snapshot. Holds patient-input fields only, never results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    /// Free-text patient identifier used on reports
    pub patient_id: Option<String>,
    pub species: Species,
    pub weight_kg: Option<f64>,
    pub dehydration_percent: Option<f64>,
    pub has_vomiting: bool,
    pub has_diarrhea: bool,
    /// Save timestamp (RFC 3339)
    pub saved_at: String,
}

impl SessionSnapshot {
    /// Capture a patient input as the new last session.
    pub fn from_input(patient_id: Option<String>, input: &PatientInput) -> Self {
        Self {
            patient_id,
            species: input.species,
            weight_kg: Some(input.weight_kg),
            dehydration_percent: input.dehydration_percent,
            has_vomiting: input.has_vomiting,
            has_diarrhea: input.has_diarrhea,
            saved_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Rebuild a patient input. Requires a saved weight.
    pub fn to_input(&self) -> Option<PatientInput> {
        Some(PatientInput {
            weight_kg: self.weight_kg?,
            species: self.species,
            dehydration_percent: self.dehydration_percent,
            has_vomiting: self.has_vomiting,
            has_diarrhea: self.has_diarrhea,
        })
    }
}
