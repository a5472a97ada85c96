//! Configuration validation logic.

use std::collections::HashSet;

use cc_core::ControlName;

use crate::schema::{
    BehaviorDef, CONFIG_VERSION, ClimateConfig, ControlDef, InitialValueDef, RangeDef,
    RendererDef, TaskDef, TriggerDef,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_config(config: &ClimateConfig) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > CONFIG_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    let mut control_names = HashSet::new();
    for control in &config.controls {
        if !control_names.insert(control.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: control.name.clone(),
                context: "controls".to_string(),
            });
        }
        validate_control(control)?;
    }

    let mut task_names = HashSet::new();
    for task in &config.tasks {
        if !task_names.insert(task.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: task.name.clone(),
                context: "tasks".to_string(),
            });
        }
        validate_task(task, &control_names)?;
    }

    validate_renderer(&config.renderer)
}

fn validate_control(control: &ControlDef) -> Result<(), ValidationError> {
    if let Err(e) = ControlName::new(&control.name) {
        return Err(invalid("control name", &control.name, e.to_string()));
    }
    let field = |what: &str| format!("controls.{}.{what}", control.name);

    if control.history_capacity == 0 {
        return Err(invalid(field("history_capacity"), 0, "must be at least 1"));
    }

    validate_range(&control.range, &field("range"))?;
    validate_initial(&control.range, &control.initial, &field("initial"))?;
    validate_behavior(&control.behavior, &field("behavior"))
}

fn validate_range(range: &RangeDef, field: &str) -> Result<(), ValidationError> {
    match range {
        RangeDef::Continuous { min, max } => {
            if !min.is_finite() || !max.is_finite() {
                return Err(invalid(field, format!("[{min}, {max}]"), "bounds must be finite"));
            }
            if min > max {
                return Err(invalid(field, format!("[{min}, {max}]"), "min exceeds max"));
            }
        }
        RangeDef::Discrete { min, max } => {
            if min > max {
                return Err(invalid(field, format!("[{min}, {max}]"), "min exceeds max"));
            }
        }
        RangeDef::Enumerated { variants } => {
            if variants.is_empty() {
                return Err(invalid(field, "[]", "needs at least one variant"));
            }
            let mut seen = HashSet::new();
            for v in variants {
                if !seen.insert(v.as_str()) {
                    return Err(ValidationError::DuplicateId {
                        id: v.clone(),
                        context: field.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn validate_initial(
    range: &RangeDef,
    initial: &InitialValueDef,
    field: &str,
) -> Result<(), ValidationError> {
    match (range, initial) {
        (RangeDef::Continuous { min, max }, InitialValueDef::Number(v)) => {
            if !(min..=max).contains(&v) {
                return Err(invalid(field, v, format!("outside [{min}, {max}]")));
            }
        }
        (RangeDef::Discrete { min, max }, InitialValueDef::Number(v)) => {
            if v.fract() != 0.0 {
                return Err(invalid(field, v, "discrete level must be a whole number"));
            }
            if !(*min as f64..=*max as f64).contains(v) {
                return Err(invalid(field, v, format!("outside [{min}, {max}]")));
            }
        }
        (RangeDef::Enumerated { variants }, InitialValueDef::Label(label)) => {
            if !variants.contains(label) {
                return Err(ValidationError::MissingReference {
                    id: label.clone(),
                    context: field.to_string(),
                });
            }
        }
        (RangeDef::Enumerated { variants }, InitialValueDef::Number(v)) => {
            if v.fract() != 0.0 || *v < 0.0 || *v >= variants.len() as f64 {
                return Err(invalid(field, v, "not a variant index"));
            }
        }
        (_, InitialValueDef::Label(label)) => {
            return Err(invalid(field, label, "labels only apply to enumerated ranges"));
        }
    }
    Ok(())
}

fn validate_behavior(behavior: &BehaviorDef, field: &str) -> Result<(), ValidationError> {
    match behavior {
        BehaviorDef::Hold | BehaviorDef::Random => Ok(()),
        BehaviorDef::Step { delta, reset_to } => {
            if !delta.is_finite() {
                return Err(invalid(field, delta, "step delta must be finite"));
            }
            if let Some(r) = reset_to.filter(|r| !r.is_finite()) {
                return Err(invalid(field, r, "reset_to must be finite"));
            }
            Ok(())
        }
        BehaviorDef::Approach {
            target,
            tau_s,
            rate_limit,
        } => {
            if !target.is_finite() {
                return Err(invalid(field, target, "target must be finite"));
            }
            if !(*tau_s > 0.0) || !tau_s.is_finite() {
                return Err(invalid(field, tau_s, "tau_s must be positive"));
            }
            if !(*rate_limit > 0.0) || !rate_limit.is_finite() {
                return Err(invalid(field, rate_limit, "rate_limit must be positive"));
            }
            Ok(())
        }
        BehaviorDef::Jitter { amplitude } => {
            if !(*amplitude >= 0.0) || !amplitude.is_finite() {
                return Err(invalid(field, amplitude, "amplitude must be non-negative"));
            }
            Ok(())
        }
    }
}

fn validate_task(task: &TaskDef, control_names: &HashSet<&str>) -> Result<(), ValidationError> {
    if task.targets.is_empty() {
        return Err(invalid(
            format!("tasks.{}.targets", task.name),
            "[]",
            "task needs at least one target",
        ));
    }
    if task.period_ms == 0 {
        return Err(invalid(
            format!("tasks.{}.period_ms", task.name),
            0,
            "period must be positive",
        ));
    }
    for target in &task.targets {
        if !control_names.contains(target.as_str()) {
            return Err(ValidationError::MissingReference {
                id: target.clone(),
                context: format!("task '{}' targets", task.name),
            });
        }
    }
    Ok(())
}

fn validate_renderer(renderer: &RendererDef) -> Result<(), ValidationError> {
    match renderer.trigger {
        TriggerDef::Periodic { period_ms: 0 } => Err(invalid(
            "renderer.trigger.period_ms",
            0,
            "period must be positive",
        )),
        TriggerDef::OnNotify { max_wait_ms: 0 } => Err(invalid(
            "renderer.trigger.max_wait_ms",
            0,
            "wait must be positive",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp() -> ControlDef {
        ControlDef {
            name: "temp".to_string(),
            range: RangeDef::Continuous {
                min: 16.0,
                max: 30.0,
            },
            initial: InitialValueDef::Number(22.0),
            history_capacity: 10,
            unit: Some("°C".to_string()),
            behavior: BehaviorDef::Step {
                delta: 1.0,
                reset_to: None,
            },
        }
    }

    #[test]
    fn initial_must_fit_the_range() {
        let mut c = temp();
        c.initial = InitialValueDef::Number(35.0);
        assert!(matches!(
            validate_control(&c),
            Err(ValidationError::InvalidValue { .. })
        ));

        c.initial = InitialValueDef::Label("AC".to_string());
        assert!(validate_control(&c).is_err());
    }

    #[test]
    fn discrete_initial_must_be_whole() {
        let range = RangeDef::Discrete { min: 0, max: 5 };
        assert!(validate_initial(&range, &InitialValueDef::Number(2.0), "f").is_ok());
        assert!(validate_initial(&range, &InitialValueDef::Number(2.5), "f").is_err());
        assert!(validate_initial(&range, &InitialValueDef::Number(6.0), "f").is_err());
    }

    #[test]
    fn enumerated_initial_accepts_label_or_index() {
        let range = RangeDef::Enumerated {
            variants: vec!["AC".into(), "Heater".into(), "Auto".into()],
        };
        assert!(validate_initial(&range, &InitialValueDef::Label("Auto".into()), "m").is_ok());
        assert!(validate_initial(&range, &InitialValueDef::Number(1.0), "m").is_ok());
        assert!(matches!(
            validate_initial(&range, &InitialValueDef::Label("Fan".into()), "m"),
            Err(ValidationError::MissingReference { .. })
        ));
        assert!(validate_initial(&range, &InitialValueDef::Number(3.0), "m").is_err());
    }

    #[test]
    fn duplicate_variants_rejected() {
        let range = RangeDef::Enumerated {
            variants: vec!["AC".into(), "AC".into()],
        };
        assert!(matches!(
            validate_range(&range, "m"),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn bad_behavior_parameters_rejected() {
        let approach = BehaviorDef::Approach {
            target: 20.0,
            tau_s: 0.0,
            rate_limit: 1.0,
        };
        assert!(validate_behavior(&approach, "b").is_err());
        assert!(validate_behavior(&BehaviorDef::Jitter { amplitude: -1.0 }, "b").is_err());
        assert!(validate_behavior(&BehaviorDef::Random, "b").is_ok());
    }

    #[test]
    fn control_name_rules_apply() {
        let mut c = temp();
        c.name = "room temp".to_string();
        assert!(validate_control(&c).is_err());
    }
}
