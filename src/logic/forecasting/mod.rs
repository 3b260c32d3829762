//! Forward projection of a single daily series.
//!
//! Two interchangeable [`Forecaster`]s share one contract: given a cleaned
//! series and a horizon, return exactly `horizon` points dated on the days
//! after the last observation. [`ForecastEstimator`] picks the additive
//! seasonal model when there is enough data and falls back to a rolling mean
//! otherwise, so callers always get the same shape back.

pub mod rolling_mean;
pub mod seasonal;

pub use rolling_mean::RollingMeanForecaster;
pub use seasonal::AdditiveSeasonalModel;

use crate::error::{FarmSightError, Result};
use crate::models::{Forecast, ForecastMethod, ForecastPoint, SeriesPoint};
use chrono::{Days, NaiveDate};

/// Primary path needs strictly more observations than this.
pub const MIN_PRIMARY_OBSERVATIONS: usize = 20;

pub trait Forecaster: Send + Sync {
    fn method(&self) -> ForecastMethod;

    /// `series` is non-empty, sorted, finite and has unique dates; `horizon >= 1`.
    fn forecast(&self, series: &[SeriesPoint], horizon: usize) -> Result<Vec<ForecastPoint>>;
}

/// Drop non-finite values, sort by date and keep the last value per date.
pub fn clean_series(series: &[SeriesPoint]) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = series
        .iter()
        .copied()
        .filter(|p| p.value.is_finite())
        .collect();
    points.sort_by_key(|p| p.date);

    let mut out: Vec<SeriesPoint> = Vec::with_capacity(points.len());
    for point in points {
        match out.last_mut() {
            Some(prev) if prev.date == point.date => *prev = point,
            _ => out.push(point),
        }
    }
    out
}

/// `horizon` consecutive days starting the day after `last`.
pub fn future_dates(last: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon as u64)
        .map(|i| {
            last.checked_add_days(Days::new(i)).ok_or_else(|| {
                FarmSightError::invalid_input(format!(
                    "forecast horizon of {} days from {} is out of the calendar range",
                    horizon, last
                ))
            })
        })
        .collect()
}

pub struct ForecastEstimator {
    primary: Option<Box<dyn Forecaster>>,
    fallback: RollingMeanForecaster,
}

impl ForecastEstimator {
    /// Seasonal model as primary, rolling mean over `rolling_window` days as fallback.
    pub fn new(rolling_window: usize) -> Result<Self> {
        Ok(Self::fallback_only(rolling_window)?
            .with_primary(Box::new(AdditiveSeasonalModel::default())))
    }

    /// Estimator without a statistical model; always uses the rolling mean.
    pub fn fallback_only(rolling_window: usize) -> Result<Self> {
        Ok(Self {
            primary: None,
            fallback: RollingMeanForecaster::new(rolling_window)?,
        })
    }

    pub fn with_primary(mut self, primary: Box<dyn Forecaster>) -> Self {
        self.primary = Some(primary);
        self
    }

    pub fn forecast(&self, series: &[SeriesPoint], horizon: usize) -> Result<Forecast> {
        if horizon == 0 {
            return Err(FarmSightError::invalid_input(
                "forecast horizon must be at least 1 day",
            ));
        }

        let cleaned = clean_series(series);
        if cleaned.is_empty() {
            return Err(FarmSightError::invalid_input(
                "cannot forecast an empty series (no finite observations)",
            ));
        }

        if let Some(primary) = self.primary.as_ref() {
            if cleaned.len() > MIN_PRIMARY_OBSERVATIONS {
                match primary.forecast(&cleaned, horizon) {
                    Ok(points) if points.len() == horizon => {
                        tracing::debug!(
                            "{} forecast from {} observations",
                            primary.method(),
                            cleaned.len()
                        );
                        return Ok(Forecast {
                            method: primary.method(),
                            points,
                        });
                    }
                    Ok(points) => {
                        tracing::warn!(
                            "{} returned {} points for a {} day horizon; using {}",
                            primary.method(),
                            points.len(),
                            horizon,
                            self.fallback.method()
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            "{} forecast failed ({}); using {}",
                            primary.method(),
                            e,
                            self.fallback.method()
                        );
                    }
                }
            }
        }

        let points = self.fallback.forecast(&cleaned, horizon)?;
        tracing::debug!(
            "{} forecast from {} observations",
            self.fallback.method(),
            cleaned.len()
        );
        Ok(Forecast {
            method: self.fallback.method(),
            points,
        })
    }
}

/// Forecast `horizon_days` ahead, preferring the seasonal model.
pub fn forecast_series(
    series: &[SeriesPoint],
    horizon_days: usize,
    rolling_window: usize,
) -> Result<Vec<ForecastPoint>> {
    Ok(ForecastEstimator::new(rolling_window)?
        .forecast(series, horizon_days)?
        .points)
}
