use super::{future_dates, Forecaster};
use crate::error::{FarmSightError, Result};
use crate::models::{ForecastMethod, ForecastPoint, SeriesPoint};
use chrono::{Datelike, NaiveDate};
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;

const WEEK_DAYS: f64 = 7.0;
const YEAR_DAYS: f64 = 365.25;

/// Additive trend + seasonality model fitted by regularised least squares.
///
/// `y(t) = a + b*t + weekly(t) + yearly(t)` where `t` is time scaled to `[0, 1]`
/// over the observed span and each seasonal term is a Fourier series in the
/// calendar day. Gaussian priors on the coefficients become ridge penalties,
/// which keeps the normal equations solvable for irregular or sparse sampling.
///
/// Daily seasonality is accepted for configuration parity but a series with
/// one sample per day cannot resolve a sub-daily cycle; it collapses into the
/// intercept and adds no terms.
#[derive(Debug, Clone, PartialEq)]
pub struct AdditiveSeasonalModel {
    pub daily_seasonality: bool,
    /// Fourier order of the weekly term; 0 disables it.
    pub weekly_order: usize,
    /// Fourier order of the yearly term; 0 disables it.
    pub yearly_order: usize,
    pub seasonality_prior_scale: f64,
    pub trend_prior_scale: f64,
}

impl Default for AdditiveSeasonalModel {
    fn default() -> Self {
        Self {
            daily_seasonality: true,
            weekly_order: 3,
            yearly_order: 0,
            seasonality_prior_scale: 10.0,
            trend_prior_scale: 5.0,
        }
    }
}

/// Coefficients and scaling of a fitted model.
#[derive(Debug, Clone)]
pub struct FittedModel {
    model: AdditiveSeasonalModel,
    start: NaiveDate,
    span_days: f64,
    y_scale: f64,
    beta: DVector<f64>,
}

impl FittedModel {
    pub fn predict(&self, date: NaiveDate) -> f64 {
        let x = self.model.features(date, self.start, self.span_days);
        self.beta.dot(&DVector::from_vec(x)) * self.y_scale
    }
}

impl AdditiveSeasonalModel {
    fn n_features(&self) -> usize {
        2 + 2 * self.weekly_order + 2 * self.yearly_order
    }

    fn features(&self, date: NaiveDate, start: NaiveDate, span_days: f64) -> Vec<f64> {
        let t = (date - start).num_days() as f64 / span_days;
        // Phase from a fixed calendar origin so weekday terms line up across fits.
        let day = date.num_days_from_ce() as f64;

        let mut x = Vec::with_capacity(self.n_features());
        x.push(1.0);
        x.push(t);
        push_fourier(&mut x, day, WEEK_DAYS, self.weekly_order);
        push_fourier(&mut x, day, YEAR_DAYS, self.yearly_order);
        x
    }

    fn penalties(&self) -> Vec<f64> {
        let seasonal = 1.0 / (self.seasonality_prior_scale * self.seasonality_prior_scale);
        let mut d = vec![1e-9, 1.0 / (self.trend_prior_scale * self.trend_prior_scale)];
        d.resize(self.n_features(), seasonal);
        d
    }

    pub fn fit(&self, series: &[SeriesPoint]) -> Result<FittedModel> {
        let (first, last) = match (series.first(), series.last()) {
            (Some(f), Some(l)) => (f.date, l.date),
            _ => {
                return Err(FarmSightError::invalid_input(
                    "cannot fit a seasonal model to an empty series",
                ))
            }
        };
        let span_days = (last - first).num_days() as f64;
        if span_days <= 0.0 {
            return Err(FarmSightError::InvalidData(
                "seasonal model needs observations on more than one day".into(),
            ));
        }

        let y_scale = series
            .iter()
            .map(|p| p.value.abs())
            .fold(0.0_f64, f64::max);
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };

        let p = self.n_features();
        let rows: Vec<Vec<f64>> = series
            .iter()
            .map(|pt| self.features(pt.date, first, span_days))
            .collect();
        let x = DMatrix::from_fn(series.len(), p, |i, j| rows[i][j]);
        let y = DVector::from_iterator(series.len(), series.iter().map(|pt| pt.value / y_scale));

        let xt = x.transpose();
        let mut normal = &xt * &x;
        for (j, penalty) in self.penalties().into_iter().enumerate() {
            normal[(j, j)] += penalty;
        }
        let rhs = &xt * &y;

        let beta = normal
            .cholesky()
            .ok_or_else(|| {
                FarmSightError::InvalidData("seasonal model normal equations are singular".into())
            })?
            .solve(&rhs);

        if beta.iter().any(|b| !b.is_finite()) {
            return Err(FarmSightError::InvalidData(
                "seasonal model produced non-finite coefficients".into(),
            ));
        }

        Ok(FittedModel {
            model: self.clone(),
            start: first,
            span_days,
            y_scale,
            beta,
        })
    }
}

fn push_fourier(x: &mut Vec<f64>, day: f64, period: f64, order: usize) {
    for k in 1..=order {
        let angle = 2.0 * PI * k as f64 * day / period;
        x.push(angle.sin());
        x.push(angle.cos());
    }
}

impl Forecaster for AdditiveSeasonalModel {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::Seasonal
    }

    fn forecast(&self, series: &[SeriesPoint], horizon: usize) -> Result<Vec<ForecastPoint>> {
        let fitted = self.fit(series)?;
        let last = series
            .last()
            .map(|p| p.date)
            .ok_or_else(|| FarmSightError::invalid_input("cannot forecast an empty series"))?;

        Ok(future_dates(last, horizon)?
            .into_iter()
            .map(|date| ForecastPoint {
                date,
                yhat: fitted.predict(date),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
    }

    fn series_from(n: i64, f: impl Fn(i64, NaiveDate) -> f64) -> Vec<SeriesPoint> {
        (0..n)
            .map(|i| {
                let d = start() + Duration::days(i);
                SeriesPoint::new(d, f(i, d))
            })
            .collect()
    }

    #[test]
    fn extrapolates_linear_trend() {
        let series = series_from(40, |i, _| 2.0 + 0.5 * i as f64);
        let out = AdditiveSeasonalModel::default().forecast(&series, 3).unwrap();

        assert_eq!(out.len(), 3);
        for (k, p) in out.iter().enumerate() {
            let expected = 2.0 + 0.5 * (40 + k) as f64;
            assert!(
                (p.yhat - expected).abs() < 0.5,
                "day {}: expected {}, got {}",
                k,
                expected,
                p.yhat
            );
        }
    }

    #[test]
    fn reproduces_weekly_pattern() {
        let pattern = [0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0];
        let weekday = |d: NaiveDate| d.weekday().num_days_from_monday() as usize;
        let series = series_from(56, |_, d| 5.0 + pattern[weekday(d)]);
        let out = AdditiveSeasonalModel::default().forecast(&series, 7).unwrap();

        for p in &out {
            let expected = 5.0 + pattern[weekday(p.date)];
            assert!(
                (p.yhat - expected).abs() < 0.05,
                "{}: expected {}, got {}",
                p.date,
                expected,
                p.yhat
            );
        }
    }

    #[test]
    fn constant_series_stays_constant() {
        let series = series_from(25, |_, _| 0.7);
        let out = AdditiveSeasonalModel::default().forecast(&series, 5).unwrap();
        for p in &out {
            assert!((p.yhat - 0.7).abs() < 1e-3);
        }
    }

    #[test]
    fn all_zero_series_forecasts_zero() {
        let series = series_from(25, |_, _| 0.0);
        let out = AdditiveSeasonalModel::default().forecast(&series, 2).unwrap();
        assert!(out.iter().all(|p| p.yhat.abs() < 1e-9));
    }

    #[test]
    fn sparse_same_weekday_samples_still_solve() {
        // Weekly sampling makes every weekly term collinear with the intercept.
        let series: Vec<SeriesPoint> = (0..30)
            .map(|i| SeriesPoint::new(start() + Duration::days(7 * i), 10.0 + i as f64))
            .collect();
        let out = AdditiveSeasonalModel::default().forecast(&series, 3).unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|p| p.yhat.is_finite()));
    }

    #[test]
    fn single_day_span_is_rejected() {
        let series = vec![SeriesPoint::new(start(), 1.0)];
        assert!(AdditiveSeasonalModel::default().fit(&series).is_err());
    }

    #[test]
    fn yearly_terms_extend_feature_count() {
        let model = AdditiveSeasonalModel {
            yearly_order: 10,
            ..Default::default()
        };
        assert_eq!(model.n_features(), 2 + 6 + 20);
        assert_eq!(model.penalties().len(), model.n_features());
    }
}
