use crate::error::{ensure_finite, FarmSightError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationDecision {
    pub date: NaiveDate,
    pub recommend_irrigate: bool,
    /// The configured event amount when irrigation is recommended, else 0.
    pub irrigation_mm: f64,
}

/// Threshold settings for the irrigation rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrigationParameters {
    pub field_capacity_mm: f64,
    /// Fraction of field capacity below which irrigation is recommended, in (0, 1).
    pub threshold_frac: f64,
    pub irrigation_amount_mm: f64,
}

impl IrrigationParameters {
    pub fn new(field_capacity_mm: f64, threshold_frac: f64, irrigation_amount_mm: f64) -> Self {
        Self {
            field_capacity_mm,
            threshold_frac,
            irrigation_amount_mm,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("field_capacity_mm", self.field_capacity_mm)?;
        ensure_finite("threshold_frac", self.threshold_frac)?;
        ensure_finite("irrigation_amount_mm", self.irrigation_amount_mm)?;

        if self.threshold_frac <= 0.0 || self.threshold_frac >= 1.0 {
            return Err(FarmSightError::invalid_input(format!(
                "threshold_frac must be within (0, 1), got {}",
                self.threshold_frac
            )));
        }
        if self.irrigation_amount_mm < 0.0 {
            return Err(FarmSightError::invalid_input(format!(
                "irrigation_amount_mm must be >= 0, got {}",
                self.irrigation_amount_mm
            )));
        }
        Ok(())
    }

    pub fn threshold_mm(&self) -> f64 {
        self.field_capacity_mm * self.threshold_frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_mm_scales_field_capacity() {
        let p = IrrigationParameters::new(120.0, 0.5, 25.0);
        assert!((p.threshold_mm() - 60.0).abs() < 1e-12);
    }

    #[test]
    fn threshold_frac_is_open_interval() {
        for frac in [0.0, 1.0, 1.5, -0.2] {
            assert!(
                IrrigationParameters::new(100.0, frac, 20.0)
                    .validate()
                    .is_err(),
                "threshold_frac {} should be rejected",
                frac
            );
        }
        assert!(IrrigationParameters::new(100.0, 0.01, 20.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn negative_amount_rejected_zero_allowed() {
        assert!(IrrigationParameters::new(100.0, 0.5, -1.0)
            .validate()
            .is_err());
        assert!(IrrigationParameters::new(100.0, 0.5, 0.0).validate().is_ok());
    }
}
