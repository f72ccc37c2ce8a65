//! Drug formulary with case-insensitive lookup.

use std::collections::HashSet;

use strsim::jaro_winkler;
use tracing::warn;

use super::{ReferenceError, ReferenceResult};
use crate::calc::{CalcError, CalcResult};
use crate::models::DrugRecord;

/// Minimum similarity for a name to be suggested.
const MIN_SUGGESTION_SIMILARITY: f64 = 0.8;

/// Maximum number of suggestions returned with a lookup miss.
const MAX_SUGGESTIONS: usize = 3;

/// Immutable list of drug records, in file order.
#[derive(Debug, Clone, Default)]
pub struct Formulary {
    drugs: Vec<DrugRecord>,
}

impl Formulary {
    /// Build a formulary. Names must be unique ignoring case.
    pub fn from_records(drugs: Vec<DrugRecord>) -> ReferenceResult<Self> {
        let mut seen = HashSet::new();
        for drug in &drugs {
            if !seen.insert(drug.name.trim().to_lowercase()) {
                return Err(ReferenceError::DuplicateDrug(drug.name.clone()));
            }
            check_record(drug);
        }
        Ok(Self { drugs })
    }

    /// Case-insensitive exact match on the trimmed name.
    pub fn find(&self, name: &str) -> Option<&DrugRecord> {
        let wanted = name.trim().to_lowercase();
        self.drugs
            .iter()
            .find(|drug| drug.name.trim().to_lowercase() == wanted)
    }

    /// Like [`find`](Self::find), but a miss is a `NotFound` error with suggestions.
    pub fn get(&self, name: &str) -> CalcResult<&DrugRecord> {
        self.find(name).ok_or_else(|| CalcError::NotFound {
            subject: format!("drug '{}'", name.trim()),
            suggestions: self.suggest(name),
        })
    }

    /// Formulary names that look like `name`, best match first.
    pub fn suggest(&self, name: &str) -> Vec<String> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &str)> = self
            .drugs
            .iter()
            .map(|drug| (jaro_winkler(&wanted, &drug.name.to_lowercase()), drug.name.as_str()))
            .filter(|(score, _)| *score >= MIN_SUGGESTION_SIMILARITY)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Drug names in file order.
    pub fn names(&self) -> Vec<&str> {
        self.drugs.iter().map(|drug| drug.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrugRecord> {
        self.drugs.iter()
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }
}

/// Log records whose strings do not parse or whose dose and concentration
/// mass units differ. Such records still load; the calculators assume the
/// units match and do not convert.
fn check_record(drug: &DrugRecord) {
    let concentration = match drug.parsed_concentration() {
        Ok(c) => c,
        Err(e) => {
            warn!(drug = %drug.name, error = %e, "malformed concentration in formulary");
            return;
        }
    };

    let ranges = [("bolus", drug.bolus_range()), ("cri", drug.cri_range())];
    for (kind, range) in ranges {
        match range {
            Some(Ok(range)) if range.mass_unit() != concentration.mass_unit => {
                warn!(
                    drug = %drug.name,
                    kind,
                    dose_unit = %range.unit,
                    concentration_unit = %concentration.mass_unit,
                    "dose and concentration mass units differ"
                );
            }
            Some(Err(e)) => {
                warn!(drug = %drug.name, kind, error = %e, "malformed dose range in formulary");
            }
            _ => {}
        }
    }
}
