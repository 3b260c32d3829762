use crate::error::{FarmSightError, Result};
use crate::models::{sorted_by_date, DailyWeatherRecord, SeriesPoint};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// MODIS vegetation indices are stored as integers scaled by 10000.
const MODIS_SCALE_FACTOR: f64 = 0.0001;

#[derive(Debug, Deserialize)]
struct WeatherRow {
    date: NaiveDate,
    tmin_c: f64,
    tmax_c: f64,
    #[serde(default)]
    tmean_c: Option<f64>,
    #[serde(default)]
    rain_mm: Option<f64>,
}

/// Load a `date,tmin_c,tmax_c[,tmean_c][,rain_mm]` CSV file.
pub fn load_weather_csv(path: &Path) -> Result<Vec<DailyWeatherRecord>> {
    let file = std::fs::File::open(path).map_err(|e| {
        FarmSightError::DataSourceUnavailable(format!("{}: {}", path.display(), e))
    })?;
    let records = read_weather_csv(file)?;
    tracing::debug!(
        "Loaded {} weather day(s) from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

pub fn read_weather_csv<R: Read>(reader: R) -> Result<Vec<DailyWeatherRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let records = rdr
        .deserialize::<WeatherRow>()
        .map(|row| -> Result<DailyWeatherRecord> {
            let row = row?;
            Ok(DailyWeatherRecord::from_parts(
                row.date,
                row.tmin_c,
                row.tmax_c,
                row.tmean_c,
                row.rain_mm,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(sorted_by_date(&records))
}

/// Load one numeric column of a CSV with a `date` column as a daily series.
///
/// Rows whose value is empty or not a number are skipped.
pub fn load_series_csv(path: &Path, column: &str) -> Result<Vec<SeriesPoint>> {
    let file = std::fs::File::open(path).map_err(|e| {
        FarmSightError::DataSourceUnavailable(format!("{}: {}", path.display(), e))
    })?;
    read_series_csv(file, column)
}

pub fn read_series_csv<R: Read>(reader: R, column: &str) -> Result<Vec<SeriesPoint>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_idx = column_index(&headers, "date")?;
    let value_idx = column_index(&headers, column)?;

    let mut points = Vec::new();
    let mut skipped = 0usize;
    for row in rdr.records() {
        let row = row?;
        let date = row
            .get(date_idx)
            .map(parse_date)
            .transpose()?
            .ok_or_else(|| FarmSightError::InvalidData("row without a date".into()))?;

        match row.get(value_idx).and_then(|v| v.parse::<f64>().ok()) {
            Some(value) if value.is_finite() => points.push(SeriesPoint::new(date, value)),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} row(s) without a numeric '{}'", skipped, column);
    }
    points.sort_by_key(|p| p.date);
    Ok(points)
}

/// Load a `date,ndvi` file, rescaling raw MODIS integer values to [-1, 1].
pub fn load_ndvi_csv(path: &Path) -> Result<Vec<SeriesPoint>> {
    Ok(rescale_modis(load_series_csv(path, "ndvi")?))
}

pub fn rescale_modis(points: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
    if points.iter().any(|p| p.value.abs() > 1.5) {
        tracing::debug!("NDVI values look like raw MODIS integers; applying scale factor");
        points
            .into_iter()
            .map(|p| SeriesPoint::new(p.date, p.value * MODIS_SCALE_FACTOR))
            .collect()
    } else {
        points
    }
}

/// Project one weather column (`tmin_c`, `tmax_c`, `tmean_c`, `rain_mm`) as a series.
pub fn series_from_weather(
    records: &[DailyWeatherRecord],
    column: &str,
) -> Result<Vec<SeriesPoint>> {
    let pick: fn(&DailyWeatherRecord) -> f64 = match column {
        "tmin_c" => |r: &DailyWeatherRecord| r.tmin_c,
        "tmax_c" => |r: &DailyWeatherRecord| r.tmax_c,
        "tmean_c" => |r: &DailyWeatherRecord| r.tmean_c,
        "rain_mm" => |r: &DailyWeatherRecord| r.rain_mm,
        other => {
            return Err(FarmSightError::invalid_input(format!(
                "unknown weather column '{}'",
                other
            )))
        }
    };

    Ok(records
        .iter()
        .map(|r| SeriesPoint::new(r.date, pick(r)))
        .collect())
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| FarmSightError::InvalidData(format!("missing '{}' column", name)))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    // Accept plain dates and timestamps such as "2024-01-01 00:00:00".
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| FarmSightError::InvalidData(format!("bad date '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn weather_csv_with_optional_columns() {
        let data = "date,tmin_c,tmax_c,rain_mm\n\
                    2024-01-02,12.0,28.0,\n\
                    2024-01-01,10.0,30.0,4.5\n";
        let records = read_weather_csv(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, date(1, 1));
        assert_eq!(records[0].rain_mm, 4.5);
        assert_eq!(records[0].tmean_c, 20.0);
        assert_eq!(records[1].rain_mm, 0.0);
    }

    #[test]
    fn weather_csv_keeps_supplied_mean() {
        let data = "date,tmin_c,tmax_c,tmean_c\n2024-01-01,10.0,30.0,17.5\n";
        let records = read_weather_csv(data.as_bytes()).unwrap();
        assert_eq!(records[0].tmean_c, 17.5);
        assert_eq!(records[0].rain_mm, 0.0);
    }

    #[test]
    fn weather_csv_rejects_bad_numbers() {
        let data = "date,tmin_c,tmax_c\n2024-01-01,cold,30.0\n";
        assert!(matches!(
            read_weather_csv(data.as_bytes()),
            Err(FarmSightError::Csv(_))
        ));
    }

    #[test]
    fn series_csv_skips_missing_values_and_sorts() {
        let data = "date,ndvi,quality\n\
                    2024-02-01,0.61,good\n\
                    2024-01-15,,cloud\n\
                    2024-01-01 00:00:00,0.55,good\n";
        let points = read_series_csv(data.as_bytes(), "ndvi").unwrap();
        assert_eq!(
            points,
            vec![
                SeriesPoint::new(date(1, 1), 0.55),
                SeriesPoint::new(date(2, 1), 0.61),
            ]
        );
    }

    #[test]
    fn series_csv_requires_columns() {
        let data = "day,ndvi\n2024-01-01,0.5\n";
        assert!(read_series_csv(data.as_bytes(), "ndvi").is_err());
        let data = "date,evi\n2024-01-01,0.5\n";
        assert!(read_series_csv(data.as_bytes(), "ndvi").is_err());
    }

    #[test]
    fn raw_modis_values_are_rescaled() {
        let points = vec![
            SeriesPoint::new(date(1, 1), 6500.0),
            SeriesPoint::new(date(1, 17), 7000.0),
        ];
        let scaled = rescale_modis(points);
        assert!((scaled[0].value - 0.65).abs() < 1e-12);
        assert!((scaled[1].value - 0.70).abs() < 1e-12);

        let already = vec![SeriesPoint::new(date(1, 1), 0.65)];
        assert_eq!(rescale_modis(already.clone()), already);
    }

    #[test]
    fn weather_columns_project_to_series() {
        let records = vec![DailyWeatherRecord::new(date(1, 1), 10.0, 20.0).with_rain(3.0)];
        let tmean = series_from_weather(&records, "tmean_c").unwrap();
        assert_eq!(tmean[0].value, 15.0);
        let rain = series_from_weather(&records, "rain_mm").unwrap();
        assert_eq!(rain[0].value, 3.0);
        assert!(series_from_weather(&records, "humidity").is_err());
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "date,ndvi").unwrap();
        writeln!(file, "2024-03-01,0.4").unwrap();
        writeln!(file, "2024-03-17,0.5").unwrap();

        let points = load_ndvi_csv(file.path()).unwrap();
        assert_eq!(points.len(), 2);
        assert!(load_weather_csv(Path::new("/nonexistent/weather.csv")).is_err());
    }
}
