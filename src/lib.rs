//! Daily soil water balance, threshold irrigation decisions and short-range
//! forecasting for a single crop field.

pub mod cli;
pub mod config;
pub mod datasources;
pub mod error;
pub mod logic;
pub mod models;
pub mod output;

pub use error::{FarmSightError, Result};
pub use logic::{estimate_eto, forecast_series, recommend_irrigation, run_water_balance};
