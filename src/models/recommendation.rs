use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Advisory,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Advisory => "Advisory",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Advisory => "→",
            Severity::Warning => "⚠",
            Severity::Critical => "!",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: String,
}

impl DataPoint {
    pub fn new(label: &str, value: impl std::fmt::Display) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// Human-facing wording of one irrigation decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub date: NaiveDate,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub data_points: Vec<DataPoint>,
    pub suggested_action: Option<String>,
}

impl Recommendation {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            severity,
            title: title.into(),
            description: description.into(),
            data_points: Vec::new(),
            suggested_action: None,
        }
    }

    pub fn with_data_point(mut self, label: &str, value: impl std::fmt::Display) -> Self {
        self.data_points.push(DataPoint::new(label, value));
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.suggested_action = Some(action.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_by_urgency() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Advisory);
        assert!(Severity::Advisory > Severity::Info);
    }

    #[test]
    fn recommendation_builder_pattern() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 2).unwrap();
        let rec = Recommendation::new(
            "irrigation_threshold",
            date,
            Severity::Warning,
            "Irrigate",
            "Soil is dry",
        )
        .with_data_point("Soil Moisture", "41.0 mm")
        .with_action("Apply 25 mm");

        assert_eq!(rec.id, "irrigation_threshold");
        assert_eq!(rec.date, date);
        assert_eq!(rec.data_points.len(), 1);
        assert_eq!(rec.data_points[0].label, "Soil Moisture");
        assert_eq!(rec.suggested_action, Some("Apply 25 mm".to_string()));
    }
}
