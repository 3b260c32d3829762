use super::evapotranspiration::{ReferenceEt, SimplifiedHargreaves};
use crate::error::{FarmSightError, Result};
use crate::models::{sorted_by_date, DailyBalanceRecord, DailyWeatherRecord, SoilParameters};

/// Single-bucket daily soil water balance.
///
/// Each day: `sm += rain - Kc * ETo`, anything above field capacity drains away,
/// and the result is clamped to `[wilting point, field capacity]`. Moisture is
/// carried from one day to the next, so days are processed strictly in date order.
pub struct WaterBalanceModel<E: ReferenceEt = SimplifiedHargreaves> {
    estimator: E,
}

impl WaterBalanceModel<SimplifiedHargreaves> {
    pub fn new() -> Self {
        Self {
            estimator: SimplifiedHargreaves::default(),
        }
    }
}

impl Default for WaterBalanceModel<SimplifiedHargreaves> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ReferenceEt> WaterBalanceModel<E> {
    pub fn with_estimator(estimator: E) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Advance one day from `moisture_mm` and return that day's record.
    pub fn step(
        &self,
        moisture_mm: f64,
        day: &DailyWeatherRecord,
        soil: &SoilParameters,
    ) -> Result<DailyBalanceRecord> {
        day.validate()?;

        let eto = self
            .estimator
            .reference_et(day.tmin_c, day.tmax_c, day.tmean_c)?;
        let etc = soil.crop_coefficient_kc * eto;

        let mut sm = moisture_mm + day.rain_mm - etc;
        let drainage = (sm - soil.field_capacity_mm).max(0.0);
        sm -= drainage;
        let sm = sm.max(soil.wilting_point_mm).min(soil.field_capacity_mm);

        Ok(DailyBalanceRecord {
            date: day.date,
            soil_moisture_mm: sm,
            etc_mm: etc,
            eto_mm: eto,
            rain_mm: day.rain_mm,
            drainage_mm: drainage,
        })
    }

    /// Run the bucket over a weather series, one output record per distinct date.
    pub fn run(
        &self,
        weather: &[DailyWeatherRecord],
        soil: &SoilParameters,
    ) -> Result<Vec<DailyBalanceRecord>> {
        soil.validate()?;

        let days = sorted_by_date(weather);
        let (_, records) = days.iter().try_fold(
            (soil.initial_moisture_mm(), Vec::with_capacity(days.len())),
            |(moisture, mut records), day| {
                let record = self.step(moisture, day, soil)?;
                let next = record.soil_moisture_mm;
                records.push(record);
                Ok::<_, FarmSightError>((next, records))
            },
        )?;

        tracing::debug!(
            "Water balance ({}) simulated {} day(s)",
            self.estimator.name(),
            records.len()
        );
        Ok(records)
    }
}

/// Run the water balance with the default ETo estimator.
pub fn run_water_balance(
    weather: &[DailyWeatherRecord],
    soil: &SoilParameters,
) -> Result<Vec<DailyBalanceRecord>> {
    WaterBalanceModel::new().run(weather, soil)
}
