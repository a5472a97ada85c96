use cc_project::schema::*;
use cc_project::{ValidationError, validate_config};

fn level(name: &str) -> ControlDef {
    ControlDef {
        name: name.to_string(),
        range: RangeDef::Discrete { min: 0, max: 5 },
        initial: InitialValueDef::Number(1.0),
        history_capacity: DEFAULT_HISTORY_CAPACITY,
        unit: None,
        behavior: BehaviorDef::Hold,
    }
}

fn task(name: &str, targets: &[&str]) -> TaskDef {
    TaskDef {
        name: name.to_string(),
        targets: targets.iter().map(|t| t.to_string()).collect(),
        period_ms: 100,
        max_ticks: None,
    }
}

fn base_config() -> ClimateConfig {
    ClimateConfig {
        version: CONFIG_VERSION,
        name: "Validation".to_string(),
        seed: None,
        controls: vec![level("fan"), level("vent")],
        tasks: vec![task("airflow", &["fan", "vent"])],
        renderer: RendererDef::default(),
    }
}

#[test]
fn base_config_is_valid() {
    validate_config(&base_config()).unwrap();
}

#[test]
fn duplicate_control_rejected() {
    let mut config = base_config();
    config.controls.push(level("fan"));

    let err = validate_config(&config).unwrap_err();
    assert_eq!(
        err,
        ValidationError::DuplicateId {
            id: "fan".to_string(),
            context: "controls".to_string(),
        }
    );
}

#[test]
fn duplicate_task_rejected() {
    let mut config = base_config();
    config.tasks.push(task("airflow", &["fan"]));

    assert!(matches!(
        validate_config(&config),
        Err(ValidationError::DuplicateId { ref context, .. }) if context == "tasks"
    ));
}

#[test]
fn unknown_target_rejected() {
    let mut config = base_config();
    config.tasks.push(task("humidify", &["humidity"]));

    assert!(matches!(
        validate_config(&config),
        Err(ValidationError::MissingReference { ref id, .. }) if id == "humidity"
    ));
}

#[test]
fn zero_period_rejected() {
    let mut config = base_config();
    config.tasks[0].period_ms = 0;
    assert!(matches!(
        validate_config(&config),
        Err(ValidationError::InvalidValue { .. })
    ));

    let mut config = base_config();
    config.renderer.trigger = TriggerDef::Periodic { period_ms: 0 };
    assert!(validate_config(&config).is_err());
}

#[test]
fn empty_targets_rejected() {
    let mut config = base_config();
    config.tasks[0].targets.clear();
    assert!(validate_config(&config).is_err());
}

#[test]
fn future_version_rejected() {
    let mut config = base_config();
    config.version = CONFIG_VERSION + 1;
    assert_eq!(
        validate_config(&config),
        Err(ValidationError::UnsupportedVersion {
            version: CONFIG_VERSION + 1
        })
    );
}

#[test]
fn zero_history_capacity_rejected() {
    let mut config = base_config();
    config.controls[0].history_capacity = 0;
    assert!(validate_config(&config).is_err());
}

#[test]
fn inverted_range_rejected() {
    let mut config = base_config();
    config.controls[1].range = RangeDef::Discrete { min: 5, max: 0 };
    assert!(validate_config(&config).is_err());
}

#[test]
fn approach_without_rate_limit_rejected() {
    let mut config = base_config();
    config.controls[0].range = RangeDef::Continuous { min: 0.0, max: 5.0 };
    config.controls[0].behavior = BehaviorDef::Approach {
        target: 2.0,
        tau_s: 1.0,
        rate_limit: 0.0,
    };
    assert!(matches!(
        validate_config(&config),
        Err(ValidationError::InvalidValue { .. })
    ));

    config.controls[0].behavior = BehaviorDef::Approach {
        target: 2.0,
        tau_s: 1.0,
        rate_limit: 0.5,
    };
    validate_config(&config).unwrap();
}
