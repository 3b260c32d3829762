use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation of a daily series (temperature, vegetation index, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A projected value for a day after the last observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub yhat: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    #[default]
    Seasonal,
    RollingMean,
}

impl ForecastMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::Seasonal => "Additive seasonal",
            ForecastMethod::RollingMean => "Rolling mean",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "seasonal" | "additive" | "additive seasonal" => Some(ForecastMethod::Seasonal),
            "rolling_mean" | "rollingmean" | "rolling mean" | "rolling" => {
                Some(ForecastMethod::RollingMean)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Forecast output together with the path that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub method: ForecastMethod,
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_method_from_str() {
        assert_eq!(
            ForecastMethod::from_str("seasonal"),
            Some(ForecastMethod::Seasonal)
        );
        assert_eq!(
            ForecastMethod::from_str("rolling_mean"),
            Some(ForecastMethod::RollingMean)
        );
        assert_eq!(
            ForecastMethod::from_str("Rolling Mean"),
            Some(ForecastMethod::RollingMean)
        );
        assert_eq!(ForecastMethod::from_str("arima"), None);
    }

    #[test]
    fn forecast_method_round_trip() {
        for method in [ForecastMethod::Seasonal, ForecastMethod::RollingMean] {
            let debug_str = format!("{:?}", method);
            assert_eq!(
                ForecastMethod::from_str(&debug_str),
                Some(method),
                "Round-trip failed for {:?}",
                method
            );
        }
    }
}
