//! Configuration management.
//!
//! Settings are loaded from TOML files in the `config/` directory and cover
//! the knobs the hosting tool exposes: the mission time handed to the external
//! simulator, the iteration ceiling for a simulation run, and the grid layout
//! used by the reorganize operation. Statistical criterion thresholds are
//! fixed constants of the convergence evaluator, not configuration.

use crate::error::{AppResult, FaultTreeError};
use config::Config;
use serde::{Deserialize, Serialize};

/// Top-level tool settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Log filter passed to the tracing subscriber by the hosting application.
    pub log_level: String,
    pub simulation: SimulationSettings,
    pub layout: LayoutSettings,
}

/// Parameters forwarded to the external Monte-Carlo simulator.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SimulationSettings {
    /// Mission time in hours; the horizon the simulator evaluates over.
    pub mission_time: f64,
    /// Iteration ceiling after which a run reports `MaxIterationsReached`.
    pub max_iterations: u64,
}

/// Grid parameters for the reorganize layout transform.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LayoutSettings {
    /// Distance between neighboring grid cells, in diagram units.
    pub grid_spacing: f64,
    /// X coordinate of the grid center.
    pub origin_x: f64,
    /// Y coordinate of the grid center.
    pub origin_y: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            simulation: SimulationSettings {
                mission_time: 1000.0,
                max_iterations: 100_000,
            },
            layout: LayoutSettings {
                grid_spacing: 160.0,
                origin_x: 400.0,
                origin_y: 300.0,
            },
        }
    }
}

impl Settings {
    /// Loads settings from `config/{name}.toml`, falling back to
    /// `config/default.toml` when no name is given.
    pub fn new(config_name: Option<&str>) -> AppResult<Self> {
        let config_path = format!("config/{}", config_name.unwrap_or("default"));
        let s = Config::builder()
            .add_source(config::File::with_name(&config_path))
            .build()
            .map_err(FaultTreeError::Config)?;

        let settings: Settings = s.try_deserialize().map_err(FaultTreeError::Config)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from an in-memory TOML string.
    ///
    /// Used by hosts that embed their configuration instead of shipping a
    /// `config/` directory, and by tests.
    pub fn from_toml_str(raw: &str) -> AppResult<Self> {
        let settings: Settings = toml::from_str(raw)
            .map_err(|e| FaultTreeError::Configuration(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Semantic validation beyond what deserialization checks.
    pub fn validate(&self) -> AppResult<()> {
        if !self.simulation.mission_time.is_finite() || self.simulation.mission_time <= 0.0 {
            return Err(FaultTreeError::Configuration(
                "simulation.mission_time must be a positive, finite number".to_string(),
            ));
        }
        if self.simulation.max_iterations == 0 {
            return Err(FaultTreeError::Configuration(
                "simulation.max_iterations must be greater than 0".to_string(),
            ));
        }
        if !self.layout.grid_spacing.is_finite() || self.layout.grid_spacing <= 0.0 {
            return Err(FaultTreeError::Configuration(
                "layout.grid_spacing must be a positive, finite number".to_string(),
            ));
        }
        Ok(())
    }
}
