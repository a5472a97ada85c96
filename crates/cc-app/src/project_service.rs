//! Config loading, saving, validation, and introspection.

use std::path::Path;

use cc_project::schema::{ClimateConfig, ControlDef, InitialValueDef, RangeDef};

use crate::error::{AppError, AppResult};

/// Summary of a control for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSummary {
    pub name: String,
    pub range: String,
    pub initial: String,
    pub history_capacity: usize,
}

/// Summary of a config for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSummary {
    pub name: String,
    pub controls: Vec<ControlSummary>,
    pub task_count: usize,
}

/// Load and validate a config. The format is picked by extension
/// (`.json`, otherwise YAML).
pub fn load_config(path: &Path) -> AppResult<ClimateConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: ClimateConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| AppError::Project(format!("Failed to parse config JSON: {}", e)))?,
        _ => serde_yaml::from_str(&content)
            .map_err(|e| AppError::Project(format!("Failed to parse config YAML: {}", e)))?,
    };

    validate_config(&config)?;
    Ok(config)
}

/// Save a config as YAML.
pub fn save_config(path: &Path, config: &ClimateConfig) -> AppResult<()> {
    cc_project::save_yaml(path, config)?;
    Ok(())
}

pub fn validate_config(config: &ClimateConfig) -> AppResult<()> {
    cc_project::validate_config(config)?;
    Ok(())
}

pub fn summarize(config: &ClimateConfig) -> ConfigSummary {
    ConfigSummary {
        name: config.name.clone(),
        controls: config.controls.iter().map(summarize_control).collect(),
        task_count: config.tasks.len(),
    }
}

fn summarize_control(control: &ControlDef) -> ControlSummary {
    let range = match &control.range {
        RangeDef::Continuous { min, max } => format!("continuous [{min}, {max}]"),
        RangeDef::Discrete { min, max } => format!("levels {min}..={max}"),
        RangeDef::Enumerated { variants } => format!("one of {}", variants.join("/")),
    };
    let initial = match &control.initial {
        InitialValueDef::Number(v) => v.to_string(),
        InitialValueDef::Label(label) => label.clone(),
    };
    ControlSummary {
        name: control.name.clone(),
        range,
        initial,
        history_capacity: control.history_capacity,
    }
}
