//! Formulary drug records and parsed dosage values.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Species;
use crate::dosage::{parse_concentration, parse_dose_range, ParseResult};

/// Prefix added to a drug warning when the patient belongs to the drug's
/// sensitive species.
pub const ALERT_PREFIX: &str = "ALERT: ";

/// A single drug in the reference formulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugRecord {
    /// Drug name - unique, matched case-insensitively
    pub name: String,
    /// Stock concentration (e.g., "50 mcg/ml")
    pub concentration: String,
    /// Bolus dose range (e.g., "2-5 mcg/kg")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bolus: Option<String>,
    /// CRI dose range (e.g., "2-10 mcg/kg/hr")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cri: Option<String>,
    /// Free-text clinical warning
    #[serde(default)]
    pub warning: String,
    /// Species that needs an escalated warning for this drug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitive_species: Option<Species>,
}

/// Parsed stock concentration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Concentration {
    /// Amount of drug per volume unit, always > 0
    pub value: f64,
    /// Mass unit (e.g., "mcg", "mg")
    pub mass_unit: String,
    /// Volume unit (e.g., "ml")
    pub volume_unit: String,
}

/// Parsed dose range. A single value parses to `min == max`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoseRange {
    pub min: f64,
    pub max: f64,
    /// Dose unit (e.g., "mg/kg", "mcg/kg/hr")
    pub unit: String,
}

/// Time basis of a dose unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeBase {
    PerHour,
    PerMinute,
    /// Not a rate (bolus doses)
    None,
}

impl DrugRecord {
    /// Create a new drug record with required fields.
    pub fn new(name: String, concentration: String) -> Self {
        Self {
            name,
            concentration,
            bolus: None,
            cri: None,
            warning: String::new(),
            sensitive_species: None,
        }
    }

    /// Parse the stock concentration.
    pub fn parsed_concentration(&self) -> ParseResult<Concentration> {
        parse_concentration(&self.concentration)
    }

    /// Parse the bolus range, if the record has one.
    pub fn bolus_range(&self) -> Option<ParseResult<DoseRange>> {
        self.bolus.as_deref().map(parse_dose_range)
    }

    /// Parse the CRI range, if the record has one.
    pub fn cri_range(&self) -> Option<ParseResult<DoseRange>> {
        self.cri.as_deref().map(parse_dose_range)
    }

    /// Native CRI unit label shown next to the dose input.
    pub fn cri_unit(&self) -> Option<String> {
        self.cri_range()?.ok().map(|range| range.unit)
    }

    /// Check if the given species needs the escalated warning.
    pub fn is_sensitive_for(&self, species: Species) -> bool {
        self.sensitive_species == Some(species)
    }

    /// Warning text for a patient of the given species.
    pub fn warning_for(&self, species: Species) -> String {
        if self.is_sensitive_for(species) {
            format!("{}{}", ALERT_PREFIX, self.warning)
        } else {
            self.warning.clone()
        }
    }
}

impl DoseRange {
    /// Time basis signalled by the unit suffix.
    pub fn time_base(&self) -> TimeBase {
        if self.unit.ends_with("/hr") {
            TimeBase::PerHour
        } else if self.unit.ends_with("/min") {
            TimeBase::PerMinute
        } else {
            TimeBase::None
        }
    }

    /// Check if a dose lies inside the range (inclusive).
    pub fn contains(&self, dose: f64) -> bool {
        dose >= self.min && dose <= self.max
    }

    /// Mass unit the dose is expressed in (the part before the first '/').
    pub fn mass_unit(&self) -> &str {
        self.unit.split('/').next().unwrap_or(&self.unit)
    }
}

impl fmt::Display for Concentration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.value, self.mass_unit, self.volume_unit)
    }
}

impl fmt::Display for DoseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{} {}", self.min, self.unit)
        } else {
            write!(f, "{}-{} {}", self.min, self.max, self.unit)
        }
    }
}
