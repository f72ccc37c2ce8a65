//! Concentration and dose-range parsers.

use super::{ParseError, ParseResult};
use crate::models::{Concentration, DoseRange};

/// Parse a stock concentration such as "50 mcg/ml".
pub fn parse_concentration(input: &str) -> ParseResult<Concentration> {
    let (value, unit) = split_value_unit(input)?;

    let value = parse_number(input, value)?;
    if value <= 0.0 {
        return Err(ParseError::InvalidNumber {
            input: input.to_string(),
            value: value.to_string(),
        });
    }

    let invalid_unit = || ParseError::InvalidUnit {
        input: input.to_string(),
        unit: unit.to_string(),
    };
    let (mass_unit, volume_unit) = unit.split_once('/').ok_or_else(invalid_unit)?;
    if mass_unit.is_empty() || volume_unit.is_empty() || volume_unit.contains('/') {
        return Err(invalid_unit());
    }

    Ok(Concentration {
        value,
        mass_unit: mass_unit.to_string(),
        volume_unit: volume_unit.to_string(),
    })
}

/// Parse a dose range such as "2-10 mcg/kg/hr". A single number gives `min == max`.
///
/// A `-` right after an exponent marker belongs to the number, so "1e-3 mg/kg"
/// is a single dose.
pub fn parse_dose_range(input: &str) -> ParseResult<DoseRange> {
    let (range, unit) = split_value_unit(input)?;

    let separators: Vec<usize> = range
        .char_indices()
        .filter(|&(i, c)| c == '-' && !range[..i].ends_with(|p: char| p == 'e' || p == 'E'))
        .map(|(i, _)| i)
        .collect();
    let (min, max) = match separators.as_slice() {
        [] => {
            let value = parse_number(input, range)?;
            (value, value)
        }
        [at] => (
            parse_number(input, &range[..*at])?,
            parse_number(input, &range[*at + 1..])?,
        ),
        _ => return Err(ParseError::InvalidRange(input.to_string())),
    };

    if min < 0.0 || min > max {
        return Err(ParseError::InvalidRange(input.to_string()));
    }

    Ok(DoseRange {
        min,
        max,
        unit: unit.to_string(),
    })
}

/// Split "<value> <unit>" on whitespace. Extra tokens are rejected.
fn split_value_unit(input: &str) -> ParseResult<(&str, &str)> {
    let mut parts = input.split_whitespace();
    let value = parts.next().ok_or(ParseError::Empty)?;
    let unit = parts
        .next()
        .ok_or_else(|| ParseError::MissingUnit(input.trim().to_string()))?;

    if let Some(extra) = parts.next() {
        return Err(ParseError::InvalidUnit {
            input: input.to_string(),
            unit: extra.to_string(),
        });
    }

    Ok((value, unit))
}

/// Parse a finite number.
fn parse_number(input: &str, value: &str) -> ParseResult<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            input: input.to_string(),
            value: value.to_string(),
        })
}
