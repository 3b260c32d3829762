use crate::error::{ensure_finite, FarmSightError, Result};
use serde::{Deserialize, Serialize};

/// Static bucket and crop parameters for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilParameters {
    pub field_capacity_mm: f64,
    pub wilting_point_mm: f64,
    pub crop_coefficient_kc: f64,
    /// Fraction of field capacity used to seed the first day's moisture.
    pub initial_fraction: f64,
}

impl SoilParameters {
    pub fn new(
        field_capacity_mm: f64,
        wilting_point_mm: f64,
        crop_coefficient_kc: f64,
        initial_fraction: f64,
    ) -> Self {
        Self {
            field_capacity_mm,
            wilting_point_mm,
            crop_coefficient_kc,
            initial_fraction,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("field_capacity_mm", self.field_capacity_mm)?;
        ensure_finite("wilting_point_mm", self.wilting_point_mm)?;
        ensure_finite("crop_coefficient_kc", self.crop_coefficient_kc)?;
        ensure_finite("initial_fraction", self.initial_fraction)?;

        if self.wilting_point_mm < 0.0 {
            return Err(FarmSightError::invalid_input(format!(
                "wilting_point_mm must be >= 0, got {}",
                self.wilting_point_mm
            )));
        }
        if self.field_capacity_mm <= self.wilting_point_mm {
            return Err(FarmSightError::invalid_input(format!(
                "field_capacity_mm ({}) must exceed wilting_point_mm ({})",
                self.field_capacity_mm, self.wilting_point_mm
            )));
        }
        if !(0.0..=1.0).contains(&self.initial_fraction) {
            return Err(FarmSightError::invalid_input(format!(
                "initial_fraction must be within [0, 1], got {}",
                self.initial_fraction
            )));
        }
        if self.crop_coefficient_kc < 0.0 {
            return Err(FarmSightError::invalid_input(format!(
                "crop_coefficient_kc must be >= 0, got {}",
                self.crop_coefficient_kc
            )));
        }
        Ok(())
    }

    pub fn initial_moisture_mm(&self) -> f64 {
        self.field_capacity_mm * self.initial_fraction
    }

    /// Water held between wilting point and field capacity.
    pub fn available_water_mm(&self) -> f64 {
        self.field_capacity_mm - self.wilting_point_mm
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthStage {
    Initial,
    #[default]
    Mid,
    Late,
}

impl GrowthStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Initial => "Initial",
            GrowthStage::Mid => "Mid-season",
            GrowthStage::Late => "Late season",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "initial" | "init" => Some(GrowthStage::Initial),
            "mid" | "mid-season" | "midseason" => Some(GrowthStage::Mid),
            "late" | "late season" | "late-season" => Some(GrowthStage::Late),
            _ => None,
        }
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Crop coefficients per growth stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KcValues {
    pub initial: f64,
    pub mid: f64,
    pub late: f64,
}

impl KcValues {
    pub fn for_stage(&self, stage: GrowthStage) -> f64 {
        match stage {
            GrowthStage::Initial => self.initial,
            GrowthStage::Mid => self.mid,
            GrowthStage::Late => self.late,
        }
    }
}

impl Default for KcValues {
    fn default() -> Self {
        Self {
            initial: 0.4,
            mid: 1.15,
            late: 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SoilParameters {
        SoilParameters::new(100.0, 30.0, 1.0, 0.8)
    }

    #[test]
    fn valid_parameters_pass() {
        assert!(params().validate().is_ok());
        assert!((params().initial_moisture_mm() - 80.0).abs() < 1e-12);
        assert!((params().available_water_mm() - 70.0).abs() < 1e-12);
    }

    #[test]
    fn field_capacity_must_exceed_wilting_point() {
        let mut p = params();
        p.field_capacity_mm = 30.0;
        assert!(matches!(
            p.validate(),
            Err(FarmSightError::InvalidInput(_))
        ));
    }

    #[test]
    fn initial_fraction_bounds() {
        let mut p = params();
        p.initial_fraction = 1.01;
        assert!(p.validate().is_err());
        p.initial_fraction = -0.1;
        assert!(p.validate().is_err());
        p.initial_fraction = 0.0;
        assert!(p.validate().is_ok());
        p.initial_fraction = 1.0;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn negative_kc_and_wilting_point_rejected() {
        let mut p = params();
        p.crop_coefficient_kc = -0.1;
        assert!(p.validate().is_err());

        let mut p = params();
        p.wilting_point_mm = -1.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn non_finite_parameters_rejected() {
        let mut p = params();
        p.field_capacity_mm = f64::INFINITY;
        assert!(p.validate().is_err());
    }

    #[test]
    fn growth_stage_from_str() {
        assert_eq!(GrowthStage::from_str("mid"), Some(GrowthStage::Mid));
        assert_eq!(GrowthStage::from_str("Initial"), Some(GrowthStage::Initial));
        assert_eq!(GrowthStage::from_str("late-season"), Some(GrowthStage::Late));
        assert_eq!(GrowthStage::from_str("harvest"), None);
    }

    #[test]
    fn kc_values_select_stage() {
        let kc = KcValues {
            initial: 0.3,
            mid: 1.2,
            late: 0.7,
        };
        assert_eq!(kc.for_stage(GrowthStage::Initial), 0.3);
        assert_eq!(kc.for_stage(GrowthStage::Mid), 1.2);
        assert_eq!(kc.for_stage(GrowthStage::Late), 0.7);
    }
}
