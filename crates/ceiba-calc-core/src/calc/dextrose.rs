//! Dextrose dilution calculator.

use tracing::debug;

use super::{CalcError, CalcResult};
use crate::models::{DextroseGuideline, DilutionPlan, SafetyCheck};

/// Stock volume V1 (ml) for `C1·V1 = C2·V2`.
///
/// Returns 0 when `c1 <= 0`, `c2 < 0` or `v2 < 0`. The stock concentration
/// must be strictly positive; the final concentration and volume may be 0.
pub fn required_stock_volume(c1: f64, v2: f64, c2: f64) -> f64 {
    if c1 <= 0.0 || c2 < 0.0 || v2 < 0.0 {
        return 0.0;
    }
    (c2 * v2) / c1
}

impl DextroseGuideline {
    /// Check a final concentration (%) against the peripheral-line maximum.
    pub fn validate_peripheral_safety(&self, final_concentration_percent: f64) -> SafetyCheck {
        let max = self.max_concentration_percent();
        if final_concentration_percent > max {
            return SafetyCheck {
                safe: false,
                message: format!(
                    "ALERT (source: {}): dextrose concentration ({}%) exceeds the recommended maximum for a peripheral line ({}%).",
                    self.source(),
                    final_concentration_percent,
                    max
                ),
            };
        }
        SafetyCheck {
            safe: true,
            message: String::new(),
        }
    }
}

impl DilutionPlan {
    /// Build a dilution recipe.
    ///
    /// * `c1` - stock concentration (%)
    /// * `v2` - final volume (ml)
    /// * `c2` - final concentration (%)
    pub fn compute(guideline: &DextroseGuideline, c1: f64, v2: f64, c2: f64) -> CalcResult<Self> {
        if !(c1.is_finite() && v2.is_finite() && c2.is_finite()) {
            return Err(CalcError::invalid_input(
                "dextrose concentrations and volume must be numbers",
            ));
        }
        if c1 <= 0.0 {
            return Err(CalcError::invalid_input(format!(
                "stock concentration must be greater than 0%, got {}",
                c1
            )));
        }
        if c2 < 0.0 || v2 < 0.0 {
            return Err(CalcError::invalid_input(
                "final concentration and volume must not be negative",
            ));
        }
        if c2 > c1 {
            return Err(CalcError::infeasible(format!(
                "requested concentration ({}%) exceeds stock concentration ({}%)",
                c2, c1
            )));
        }

        let stock_volume_ml = required_stock_volume(c1, v2, c2);
        let safety = guideline.validate_peripheral_safety(c2);

        debug!(c1, v2, c2, stock_volume_ml, safe = safety.safe, "computed dextrose dilution");

        Ok(Self {
            stock_concentration_percent: c1,
            final_volume_ml: v2,
            final_concentration_percent: c2,
            stock_volume_ml,
            base_fluid_ml: v2 - stock_volume_ml,
            safety,
        })
    }
}
