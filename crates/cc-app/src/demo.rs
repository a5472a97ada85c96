//! Built-in demonstration config: a thermostat cycling through its range,
//! a fan, and an operating mode.

use cc_project::schema::{
    BehaviorDef, CONFIG_VERSION, ClimateConfig, ControlDef, FormatDef, InitialValueDef, RangeDef,
    RendererDef, TaskDef, TriggerDef,
};

pub fn demo_config() -> ClimateConfig {
    ClimateConfig {
        version: CONFIG_VERSION,
        name: "Climate Control Demo".to_string(),
        seed: None,
        controls: vec![
            ControlDef {
                name: "temp".to_string(),
                range: RangeDef::Continuous {
                    min: 15.0,
                    max: 30.0,
                },
                initial: InitialValueDef::Number(24.0),
                history_capacity: 10,
                unit: Some("°C".to_string()),
                behavior: BehaviorDef::Step {
                    delta: 1.0,
                    reset_to: Some(18.0),
                },
            },
            ControlDef {
                name: "fan".to_string(),
                range: RangeDef::Discrete { min: 0, max: 5 },
                initial: InitialValueDef::Number(2.0),
                history_capacity: 10,
                unit: None,
                behavior: BehaviorDef::Random,
            },
            ControlDef {
                name: "mode".to_string(),
                range: RangeDef::Enumerated {
                    variants: vec!["AC".to_string(), "Heater".to_string(), "Auto".to_string()],
                },
                initial: InitialValueDef::Label("AC".to_string()),
                history_capacity: 5,
                unit: None,
                behavior: BehaviorDef::Random,
            },
        ],
        tasks: vec![
            TaskDef {
                name: "temperature".to_string(),
                targets: vec!["temp".to_string()],
                period_ms: 2000,
                max_ticks: None,
            },
            TaskDef {
                name: "airflow".to_string(),
                targets: vec!["fan".to_string(), "mode".to_string()],
                period_ms: 3000,
                max_ticks: None,
            },
        ],
        renderer: RendererDef {
            trigger: TriggerDef::OnNotify { max_wait_ms: 1000 },
            format: FormatDef::Text,
            title: None,
        },
    }
}
