pub mod engine;
pub mod threshold;

pub use engine::{recommend_irrigation, IrrigationEngine};
pub use threshold::ThresholdRule;

use crate::error::Result;
use crate::models::{DailyBalanceRecord, IrrigationDecision, Recommendation};

/// Trait for per-day irrigation rules
pub trait IrrigationRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Decide for a single simulated day. Must not depend on other days.
    fn decide(&self, record: &DailyBalanceRecord) -> Result<IrrigationDecision>;

    /// Describe a positive decision for display, if the rule has something to say
    fn describe(
        &self,
        record: &DailyBalanceRecord,
        decision: &IrrigationDecision,
        wilting_point_mm: f64,
    ) -> Option<Recommendation>;
}
