use crate::config::{OpenWeatherMapConfig, SiteConfig};
use crate::error::{FarmSightError, Result};
use crate::models::DailyWeatherRecord;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeMap;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    api_key: String,
    latitude: f64,
    longitude: f64,
}

// OpenWeatherMap API response structures
#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
    #[serde(default)]
    rain: Option<OwmPrecipitation>,
    #[serde(default)]
    snow: Option<OwmPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    #[serde(default)]
    temp_min: Option<f64>,
    #[serde(default)]
    temp_max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmPrecipitation {
    #[serde(rename = "3h", default)]
    three_hour: f64,
}

/// Running aggregate of the 3-hour slots that fall on one day.
#[derive(Debug, Default)]
struct DayAccumulator {
    low: Option<f64>,
    high: Option<f64>,
    temp_sum: f64,
    slots: usize,
    precipitation_mm: f64,
}

impl DayAccumulator {
    fn add(&mut self, item: &OwmForecastItem) {
        let low = item.main.temp_min.unwrap_or(item.main.temp);
        let high = item.main.temp_max.unwrap_or(item.main.temp);
        self.low = Some(self.low.map_or(low, |l| l.min(low)));
        self.high = Some(self.high.map_or(high, |h| h.max(high)));
        self.temp_sum += item.main.temp;
        self.slots += 1;

        // Combine rain and snow (water equivalent)
        let rain_mm = item.rain.as_ref().map(|r| r.three_hour).unwrap_or(0.0);
        let snow_mm = item.snow.as_ref().map(|s| s.three_hour).unwrap_or(0.0);
        self.precipitation_mm += rain_mm + snow_mm;
    }

    fn finish(self, date: NaiveDate) -> Option<DailyWeatherRecord> {
        let (low, high) = (self.low?, self.high?);
        Some(
            DailyWeatherRecord::new(date, low, high)
                .with_tmean(self.temp_sum / self.slots.max(1) as f64)
                .with_rain(self.precipitation_mm),
        )
    }
}

impl OpenWeatherMapClient {
    pub fn new(config: &OpenWeatherMapConfig, site: &SiteConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            latitude: site.latitude,
            longitude: site.longitude,
        }
    }

    /// Fetch the 5-day/3-hour forecast aggregated to daily weather records
    pub async fn fetch_daily(&self) -> Result<Vec<DailyWeatherRecord>> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, self.latitude, self.longitude, self.api_key
        );

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                FarmSightError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FarmSightError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        let owm_response: OwmForecastResponse = response.json().await.map_err(|e| {
            FarmSightError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })?;

        let days = aggregate_daily(&owm_response.list);
        tracing::info!(
            "OpenWeatherMap returned {} slot(s) covering {} day(s)",
            owm_response.list.len(),
            days.len()
        );
        Ok(days)
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, self.latitude, self.longitude, self.api_key
        );

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                FarmSightError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        Ok(response.status().is_success())
    }
}

fn aggregate_daily(items: &[OwmForecastItem]) -> Vec<DailyWeatherRecord> {
    let mut by_date: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    for item in items {
        let Some(timestamp) = DateTime::from_timestamp(item.dt, 0) else {
            tracing::warn!("Skipping forecast slot with invalid timestamp {}", item.dt);
            continue;
        };
        by_date
            .entry(timestamp.date_naive())
            .or_default()
            .add(item);
    }

    by_date
        .into_iter()
        .filter_map(|(date, acc)| acc.finish(date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "list": [
            {"dt": 1717200000, "main": {"temp": 24.0, "temp_min": 22.0, "temp_max": 25.0}},
            {"dt": 1717210800, "main": {"temp": 30.0}, "rain": {"3h": 1.5}},
            {"dt": 1717221600, "main": {"temp": 27.0}, "rain": {"3h": 0.5}, "snow": {"3h": 0.2}},
            {"dt": 1717286400, "main": {"temp": 20.0}}
        ],
        "city": {"name": "Bengaluru"}
    }"#;

    #[test]
    fn aggregates_slots_per_day() {
        let response: OwmForecastResponse = serde_json::from_str(SAMPLE).unwrap();
        let days = aggregate_daily(&response.list);

        assert_eq!(days.len(), 2);
        let first = &days[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(first.tmin_c, 22.0);
        assert_eq!(first.tmax_c, 30.0);
        assert!((first.tmean_c - 27.0).abs() < 1e-12);
        assert!((first.rain_mm - 2.2).abs() < 1e-12);

        let second = &days[1];
        assert_eq!(second.tmin_c, 20.0);
        assert_eq!(second.tmax_c, 20.0);
        assert_eq!(second.rain_mm, 0.0);
    }

    #[test]
    fn empty_forecast_gives_no_days() {
        assert!(aggregate_daily(&[]).is_empty());
    }

    #[test]
    fn client_uses_site_coordinates() {
        let client = OpenWeatherMapClient::new(
            &OpenWeatherMapConfig {
                api_key: "test_key".into(),
                enabled: true,
            },
            &SiteConfig {
                name: "Test".into(),
                latitude: 12.97,
                longitude: 77.59,
            },
        );
        assert_eq!(client.latitude, 12.97);
        assert_eq!(client.longitude, 77.59);
    }
}
