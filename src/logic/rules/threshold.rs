use super::IrrigationRule;
use crate::error::{ensure_finite, Result};
use crate::models::{
    DailyBalanceRecord, IrrigationDecision, IrrigationParameters, Recommendation, Severity,
};

/// Threshold irrigation rule - irrigate whenever moisture drops below a fraction of field capacity
///
/// Conditions:
/// - soil_moisture_mm < field_capacity_mm * threshold_frac
///
/// There is no hysteresis: every day is judged on its own, so a day just above
/// the threshold may be followed by another recommendation as soon as the
/// soil dries again.
///
/// Severity levels:
/// - Advisory: below threshold
/// - Warning: below the midpoint between wilting point and threshold
/// - Critical: at the wilting point
pub struct ThresholdRule {
    params: IrrigationParameters,
}

impl ThresholdRule {
    pub fn new(params: IrrigationParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &IrrigationParameters {
        &self.params
    }

    fn severity(&self, moisture_mm: f64, wilting_point_mm: f64) -> Severity {
        let threshold = self.params.threshold_mm();
        let midpoint = (wilting_point_mm + threshold) / 2.0;

        if moisture_mm <= wilting_point_mm {
            Severity::Critical
        } else if moisture_mm < midpoint {
            Severity::Warning
        } else {
            Severity::Advisory
        }
    }
}

impl IrrigationRule for ThresholdRule {
    fn id(&self) -> &'static str {
        "irrigation_threshold"
    }

    fn name(&self) -> &'static str {
        "Moisture Threshold"
    }

    fn decide(&self, record: &DailyBalanceRecord) -> Result<IrrigationDecision> {
        let moisture = ensure_finite("soil_moisture_mm", record.soil_moisture_mm)?;
        let recommend = moisture < self.params.threshold_mm();

        Ok(IrrigationDecision {
            date: record.date,
            recommend_irrigate: recommend,
            irrigation_mm: if recommend {
                self.params.irrigation_amount_mm
            } else {
                0.0
            },
        })
    }

    fn describe(
        &self,
        record: &DailyBalanceRecord,
        decision: &IrrigationDecision,
        wilting_point_mm: f64,
    ) -> Option<Recommendation> {
        if !decision.recommend_irrigate {
            return None;
        }

        let severity = self.severity(record.soil_moisture_mm, wilting_point_mm);
        let threshold = self.params.threshold_mm();

        let title = match severity {
            Severity::Critical => "Irrigation Urgently Needed",
            Severity::Warning => "Irrigation Recommended",
            _ => "Consider Irrigation",
        };

        let description = format!(
            "Simulated soil moisture is {:.1} mm, below the {:.1} mm threshold \
             ({:.0}% of field capacity).",
            record.soil_moisture_mm,
            threshold,
            self.params.threshold_frac * 100.0
        );

        let action = match severity {
            Severity::Critical => format!(
                "Irrigate today with {:.1} mm. The crop is at the wilting point.",
                decision.irrigation_mm
            ),
            Severity::Warning => format!(
                "Irrigate within a day with {:.1} mm.",
                decision.irrigation_mm
            ),
            _ => format!(
                "Plan an irrigation event of {:.1} mm unless rain is expected.",
                decision.irrigation_mm
            ),
        };

        Some(
            Recommendation::new(self.id(), record.date, severity, title, description)
                .with_data_point("Soil Moisture", format!("{:.1} mm", record.soil_moisture_mm))
                .with_data_point("Threshold", format!("{:.1} mm", threshold))
                .with_data_point("Crop ET", format!("{:.2} mm", record.etc_mm))
                .with_action(action),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(moisture: f64) -> DailyBalanceRecord {
        DailyBalanceRecord {
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            soil_moisture_mm: moisture,
            etc_mm: 3.0,
            eto_mm: 3.0,
            rain_mm: 0.0,
            drainage_mm: 0.0,
        }
    }

    fn rule() -> ThresholdRule {
        ThresholdRule::new(IrrigationParameters::new(100.0, 0.5, 25.0)).unwrap()
    }

    #[test]
    fn below_threshold_recommends_configured_amount() {
        let d = rule().decide(&record(40.0)).unwrap();
        assert!(d.recommend_irrigate);
        assert_eq!(d.irrigation_mm, 25.0);
    }

    #[test]
    fn above_threshold_does_not_recommend() {
        let d = rule().decide(&record(60.0)).unwrap();
        assert!(!d.recommend_irrigate);
        assert_eq!(d.irrigation_mm, 0.0);
    }

    #[test]
    fn exactly_at_threshold_does_not_recommend() {
        let d = rule().decide(&record(50.0)).unwrap();
        assert!(!d.recommend_irrigate);
    }

    #[test]
    fn nan_moisture_is_rejected() {
        assert!(rule().decide(&record(f64::NAN)).is_err());
    }

    #[test]
    fn severity_grades_by_dryness() {
        let r = rule();
        // wilting point 30, threshold 50, midpoint 40
        let cases = [
            (45.0, Severity::Advisory),
            (35.0, Severity::Warning),
            (30.0, Severity::Critical),
        ];
        for (moisture, expected) in cases {
            let rec = record(moisture);
            let d = r.decide(&rec).unwrap();
            let recommendation = r.describe(&rec, &d, 30.0).unwrap();
            assert_eq!(recommendation.severity, expected, "moisture {}", moisture);
        }
    }

    #[test]
    fn no_description_without_recommendation() {
        let r = rule();
        let rec = record(70.0);
        let d = r.decide(&rec).unwrap();
        assert!(r.describe(&rec, &d, 30.0).is_none());
    }
}
