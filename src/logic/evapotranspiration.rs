use crate::error::{ensure_finite, Result};

/// Strategy for daily reference evapotranspiration (ETo, mm/day).
pub trait ReferenceEt: Send + Sync {
    fn name(&self) -> &'static str;

    /// ETo for one day. Never negative; non-finite inputs are rejected.
    fn reference_et(&self, tmin_c: f64, tmax_c: f64, tmean_c: f64) -> Result<f64>;
}

/// Temperature-only Hargreaves variant without the extraterrestrial radiation term.
///
/// `ETo = coefficient * sqrt(max(0, tmax - tmin)) * (tmean + temperature_offset_c)`,
/// floored at zero. This is an approximation, not an agronomic reference method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplifiedHargreaves {
    pub coefficient: f64,
    pub temperature_offset_c: f64,
}

impl Default for SimplifiedHargreaves {
    fn default() -> Self {
        Self {
            coefficient: 0.0023,
            temperature_offset_c: 17.8,
        }
    }
}

impl ReferenceEt for SimplifiedHargreaves {
    fn name(&self) -> &'static str {
        "simplified_hargreaves"
    }

    fn reference_et(&self, tmin_c: f64, tmax_c: f64, tmean_c: f64) -> Result<f64> {
        ensure_finite("tmin_c", tmin_c)?;
        ensure_finite("tmax_c", tmax_c)?;
        ensure_finite("tmean_c", tmean_c)?;

        // Inverted min/max collapses to a zero range instead of a NaN root.
        let td = (tmax_c - tmin_c).max(0.0);
        let eto = self.coefficient * td.sqrt() * (tmean_c + self.temperature_offset_c);
        Ok(eto.max(0.0))
    }
}

/// ETo with the default simplified Hargreaves coefficients.
pub fn estimate_eto(tmin_c: f64, tmax_c: f64, tmean_c: f64) -> Result<f64> {
    SimplifiedHargreaves::default().reference_et(tmin_c, tmax_c, tmean_c)
}
