//! Smoke tests for the cc-app service layer.

use std::path::PathBuf;
use std::time::Duration;

use cc_app::{RunOptions, demo_config, load_config, run_session, summarize};
use cc_project::schema::{BehaviorDef, FormatDef, TaskDef};
use cc_runtime::MemorySink;

fn config_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // go to crates
    path.pop(); // go to repo root
    path.push("configs");
    path.push(name);
    path
}

#[test]
fn bundled_config_loads_and_summarizes() {
    let config = load_config(&config_path("climate.yaml")).expect("Failed to load config");
    let summary = summarize(&config);

    assert_eq!(summary.name, "Living Room Climate");
    assert_eq!(summary.task_count, 2);
    let names: Vec<_> = summary.controls.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["temp", "fan", "mode"]);
    assert_eq!(summary.controls[2].range, "one of AC/Heater/Auto");
}

#[test]
fn missing_file_reports_path() {
    let err = load_config(&config_path("does-not-exist.yaml")).unwrap_err();
    assert!(err.to_string().contains("does-not-exist.yaml"));
}

#[test]
fn timed_session_renders_frames() {
    let mut config = demo_config();
    config.seed = Some(3);
    for task in &mut config.tasks {
        task.period_ms = 10;
    }

    let sink = MemorySink::new();
    let options = RunOptions {
        duration: Some(Duration::from_millis(200)),
        format: None,
    };
    let report = run_session(&config, &options, Box::new(sink.clone()), |_| {}).unwrap();

    assert!(report.total_ticks() > 0);
    assert_eq!(report.total_failures(), 0);
    let last = sink.last().unwrap();
    assert!(last.starts_with("--- Climate Control Status ---"));
    assert!(last.contains("[temp] "));
    assert!(last.contains("[fan] Level "));
    assert!(last.contains("[mode] "));
}

#[test]
fn format_override_switches_to_json() {
    let config = demo_config();
    let sink = MemorySink::new();
    let options = RunOptions {
        duration: Some(Duration::from_millis(20)),
        format: Some(FormatDef::Json),
    };
    run_session(&config, &options, Box::new(sink.clone()), |_| {}).unwrap();

    for frame in sink.frames() {
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["entries"].as_array().unwrap().len(), 3);
    }
}

#[test]
fn untimed_session_stops_on_signal() {
    let config = demo_config();
    let options = RunOptions::default();

    let report = run_session(&config, &options, Box::new(MemorySink::new()), |handle| {
        let shutdown = handle.shutdown_signal();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            shutdown.trigger();
        });
    })
    .unwrap();

    // Initial plus final frame.
    assert!(report.frames_rendered >= 2);
}

#[test]
fn invalid_task_fails_before_start() {
    let mut config = demo_config();
    config.tasks.push(TaskDef {
        name: "humidity".to_string(),
        targets: vec!["humidity".to_string()],
        period_ms: 100,
        max_ticks: None,
    });

    let err = cc_app::compile_runtime(&config, Box::new(MemorySink::new())).unwrap_err();
    assert!(matches!(err, cc_app::AppError::Compile(_)));
}

#[test]
fn loading_rejects_a_config_that_fails_validation() {
    let mut config = demo_config();
    config.controls[0].behavior = BehaviorDef::Approach {
        target: 21.0,
        tau_s: 5.0,
        rate_limit: 0.0,
    };
    // Rejected by the validator and by the compiled behavior alike.
    assert!(cc_app::validate_config(&config).is_err());
    assert!(cc_app::compile_runtime(&config, Box::new(MemorySink::new())).is_err());

    let path = std::env::temp_dir().join("cc_app_zero_rate_limit.yaml");
    std::fs::write(&path, serde_yaml::to_string(&config).unwrap()).unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, cc_app::AppError::Validation(_)), "{err}");
}
