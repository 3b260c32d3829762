pub mod calculations;
pub mod evapotranspiration;
pub mod forecasting;
pub mod rules;
pub mod water_balance;

pub use evapotranspiration::{estimate_eto, ReferenceEt, SimplifiedHargreaves};
pub use forecasting::{forecast_series, ForecastEstimator, Forecaster};
pub use rules::{recommend_irrigation, IrrigationEngine};
pub use water_balance::{run_water_balance, WaterBalanceModel};
