//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Version written by this crate and the newest one it reads.
pub const CONFIG_VERSION: u32 = 1;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClimateConfig {
    pub version: u32,
    pub name: String,
    /// Base seed for the controls' random sources. Each control gets
    /// `seed + index`; without a seed they are seeded from entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub controls: Vec<ControlDef>,
    #[serde(default)]
    pub tasks: Vec<TaskDef>,
    #[serde(default)]
    pub renderer: RendererDef,
}

impl ClimateConfig {
    pub fn control(&self, name: &str) -> Option<&ControlDef> {
        self.controls.iter().find(|c| c.name == name)
    }

    pub fn task(&self, name: &str) -> Option<&TaskDef> {
        self.tasks.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlDef {
    pub name: String,
    pub range: RangeDef,
    pub initial: InitialValueDef,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub behavior: BehaviorDef,
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RangeDef {
    Continuous { min: f64, max: f64 },
    Discrete { min: i64, max: i64 },
    Enumerated { variants: Vec<String> },
}

/// Initial value: a number for continuous/discrete ranges (or a variant
/// index), or a variant label for enumerated ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum InitialValueDef {
    Number(f64),
    Label(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum BehaviorDef {
    #[default]
    Hold,
    Step {
        delta: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reset_to: Option<f64>,
    },
    Approach {
        target: f64,
        tau_s: f64,
        rate_limit: f64,
    },
    Random,
    Jitter {
        amplitude: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskDef {
    pub name: String,
    pub targets: Vec<String>,
    pub period_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ticks: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RendererDef {
    #[serde(default)]
    pub trigger: TriggerDef,
    #[serde(default)]
    pub format: FormatDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum TriggerDef {
    Periodic { period_ms: u64 },
    OnNotify { max_wait_ms: u64 },
}

impl Default for TriggerDef {
    fn default() -> Self {
        Self::OnNotify { max_wait_ms: 1000 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormatDef {
    #[default]
    Text,
    Json,
}
