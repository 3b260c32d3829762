use super::{IrrigationRule, ThresholdRule};
use crate::error::Result;
use crate::models::{DailyBalanceRecord, IrrigationDecision, IrrigationParameters, Recommendation};

pub struct IrrigationEngine {
    rule: Box<dyn IrrigationRule>,
    wilting_point_mm: f64,
}

impl IrrigationEngine {
    /// Engine backed by the moisture threshold rule.
    pub fn new(params: IrrigationParameters) -> Result<Self> {
        Ok(Self::with_rule(Box::new(ThresholdRule::new(params)?)))
    }

    pub fn with_rule(rule: Box<dyn IrrigationRule>) -> Self {
        Self {
            rule,
            wilting_point_mm: 0.0,
        }
    }

    /// Wilting point used to grade recommendation severity.
    pub fn with_wilting_point(mut self, wilting_point_mm: f64) -> Self {
        self.wilting_point_mm = wilting_point_mm;
        self
    }

    /// One decision per record, same order and dates.
    pub fn decide(&self, balance: &[DailyBalanceRecord]) -> Result<Vec<IrrigationDecision>> {
        balance.iter().map(|r| self.rule.decide(r)).collect()
    }

    /// Decisions plus a graded recommendation for every day that needs water.
    pub fn evaluate(
        &self,
        balance: &[DailyBalanceRecord],
    ) -> Result<(Vec<IrrigationDecision>, Vec<Recommendation>)> {
        let decisions = self.decide(balance)?;
        let recommendations = balance
            .iter()
            .zip(&decisions)
            .filter_map(|(record, decision)| {
                self.rule
                    .describe(record, decision, self.wilting_point_mm)
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "Rule '{}' recommended irrigation on {} of {} day(s)",
            self.rule.name(),
            recommendations.len(),
            decisions.len()
        );
        Ok((decisions, recommendations))
    }

    pub fn rule_id(&self) -> &'static str {
        self.rule.id()
    }
}

/// Per-day irrigation decisions from a simulated moisture series.
pub fn recommend_irrigation(
    balance: &[DailyBalanceRecord],
    field_capacity_mm: f64,
    threshold_frac: f64,
    irrigation_amount_mm: f64,
) -> Result<Vec<IrrigationDecision>> {
    let params = IrrigationParameters::new(field_capacity_mm, threshold_frac, irrigation_amount_mm);
    IrrigationEngine::new(params)?.decide(balance)
}
