use crate::error::{FarmSightError, Result};
use crate::models::{
    ForecastMethod, GrowthStage, IrrigationParameters, KcValues, SoilParameters,
};
use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub site: SiteConfig,
    pub soil: SoilConfig,
    #[serde(default)]
    pub crop: CropConfig,
    pub irrigation: IrrigationConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub data: DataConfig,
    pub openweathermap: Option<OpenWeatherMapConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SoilConfig {
    pub field_capacity_mm: f64,
    pub wilting_point_mm: f64,
    #[serde(default = "default_initial_fraction")]
    pub initial_fraction: f64,
}

fn default_initial_fraction() -> f64 {
    0.8
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CropConfig {
    #[serde(default)]
    pub kc_values: KcValues,
    #[serde(default)]
    pub stage: GrowthStage,
}

impl CropConfig {
    pub fn kc(&self) -> f64 {
        self.kc_values.for_stage(self.stage)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IrrigationConfig {
    pub threshold_frac: f64,
    pub amount_mm: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastConfig {
    #[serde(default = "default_forecast_days")]
    pub horizon_days: usize,
    #[serde(default = "default_forecast_days")]
    pub rolling_window_days: usize,
    #[serde(default)]
    pub model: ForecastMethod,
}

fn default_forecast_days() -> usize {
    7
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_forecast_days(),
            rolling_window_days: default_forecast_days(),
            model: ForecastMethod::Seasonal,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DataConfig {
    pub weather_csv: Option<PathBuf>,
    pub ndvi_csv: Option<PathBuf>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(FarmSightError::Config(format!(
                "Config file not found at {:?}. Run `farmsight init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| FarmSightError::Config(format!("Failed to read config: {}", e)))?;

        let config = Self::from_yaml(&config_str)?;
        tracing::debug!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }

    /// Parse YAML after `${VAR}` substitution and validate every parameter.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| FarmSightError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/farmsight/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FarmSightError::Config("Cannot determine config directory".into()))?
            .join("farmsight");
        Ok(config_dir.join("config.yaml"))
    }

    /// Check every model parameter before a run starts.
    pub fn validate(&self) -> Result<()> {
        self.soil_parameters()
            .validate()
            .and_then(|_| self.irrigation_parameters().validate())
            .map_err(|e| FarmSightError::Config(e.to_string()))?;

        if self.forecast.horizon_days == 0 {
            return Err(FarmSightError::Config(
                "forecast.horizon_days must be at least 1".into(),
            ));
        }
        if self.forecast.rolling_window_days == 0 {
            return Err(FarmSightError::Config(
                "forecast.rolling_window_days must be at least 1".into(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.site.latitude)
            || !(-180.0..=180.0).contains(&self.site.longitude)
        {
            return Err(FarmSightError::Config(format!(
                "site coordinates out of range: ({}, {})",
                self.site.latitude, self.site.longitude
            )));
        }
        Ok(())
    }

    pub fn soil_parameters(&self) -> SoilParameters {
        SoilParameters::new(
            self.soil.field_capacity_mm,
            self.soil.wilting_point_mm,
            self.crop.kc(),
            self.soil.initial_fraction,
        )
    }

    pub fn irrigation_parameters(&self) -> IrrigationParameters {
        IrrigationParameters::new(
            self.soil.field_capacity_mm,
            self.irrigation.threshold_frac,
            self.irrigation.amount_mm,
        )
    }

    /// Enabled OpenWeatherMap settings with a non-empty key.
    pub fn openweathermap(&self) -> Option<&OpenWeatherMapConfig> {
        self.openweathermap
            .as_ref()
            .filter(|c| c.enabled && !c.api_key.is_empty())
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        let defaults = Config::default();

        println!();
        println!("Let's set up FarmSight!");
        println!();

        // --- Site ---
        println!("Site");
        let name: String = Input::new()
            .with_prompt("  Field name")
            .default(defaults.site.name.clone())
            .interact_text()
            .map_err(|e| FarmSightError::Config(format!("Input error: {}", e)))?;

        let latitude: f64 = Input::new()
            .with_prompt("  Latitude")
            .default(defaults.site.latitude)
            .interact_text()
            .map_err(|e| FarmSightError::Config(format!("Input error: {}", e)))?;

        let longitude: f64 = Input::new()
            .with_prompt("  Longitude")
            .default(defaults.site.longitude)
            .interact_text()
            .map_err(|e| FarmSightError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- Soil ---
        println!("Soil bucket");
        let field_capacity_mm: f64 = Input::new()
            .with_prompt("  Field capacity (mm)")
            .default(defaults.soil.field_capacity_mm)
            .interact_text()
            .map_err(|e| FarmSightError::Config(format!("Input error: {}", e)))?;

        let wilting_point_mm: f64 = Input::new()
            .with_prompt("  Wilting point (mm)")
            .default(defaults.soil.wilting_point_mm)
            .interact_text()
            .map_err(|e| FarmSightError::Config(format!("Input error: {}", e)))?;

        let stage: String = Input::new()
            .with_prompt("  Crop stage (initial, mid, late)")
            .default("mid".into())
            .interact_text()
            .map_err(|e| FarmSightError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- Irrigation ---
        println!("Irrigation");
        let threshold_frac: f64 = Input::new()
            .with_prompt("  Moisture threshold (fraction of field capacity)")
            .default(defaults.irrigation.threshold_frac)
            .interact_text()
            .map_err(|e| FarmSightError::Config(format!("Input error: {}", e)))?;

        let amount_mm: f64 = Input::new()
            .with_prompt("  Irrigation per event (mm)")
            .default(defaults.irrigation.amount_mm)
            .interact_text()
            .map_err(|e| FarmSightError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- OpenWeatherMap (optional) ---
        println!("OpenWeatherMap (leave API key blank to skip)");
        let owm_api_key: String = Password::new()
            .with_prompt("  API key")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| FarmSightError::Config(format!("Input error: {}", e)))?;

        let openweathermap = if owm_api_key.is_empty() {
            None
        } else {
            Some(OpenWeatherMapConfig {
                api_key: owm_api_key,
                enabled: true,
            })
        };

        println!();

        let config = Config {
            site: SiteConfig {
                name,
                latitude,
                longitude,
            },
            soil: SoilConfig {
                field_capacity_mm,
                wilting_point_mm,
                initial_fraction: default_initial_fraction(),
            },
            crop: CropConfig {
                kc_values: KcValues::default(),
                stage: GrowthStage::from_str(&stage).unwrap_or_default(),
            },
            irrigation: IrrigationConfig {
                threshold_frac,
                amount_mm,
            },
            forecast: ForecastConfig::default(),
            data: DataConfig::default(),
            openweathermap,
        };
        config.validate()?;

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| FarmSightError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# FarmSight Configuration\n# Generated by `farmsight init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| FarmSightError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig {
                name: "FarmSight".into(),
                latitude: 12.97,
                longitude: 77.59,
            },
            soil: SoilConfig {
                field_capacity_mm: 120.0,
                wilting_point_mm: 40.0,
                initial_fraction: default_initial_fraction(),
            },
            crop: CropConfig::default(),
            irrigation: IrrigationConfig {
                threshold_frac: 0.5,
                amount_mm: 25.0,
            },
            forecast: ForecastConfig::default(),
            data: DataConfig::default(),
            openweathermap: None,
        }
    }
}
