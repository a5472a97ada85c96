use std::path::Path;

#[test]
fn bundled_configs_load_and_validate() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs");
    let configs = ["climate.yaml", "thermostat.json"];

    for name in configs {
        let path = root.join(name);
        let config =
            cc_project::load(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        cc_project::validate_config(&config)
            .unwrap_or_else(|e| panic!("Failed to validate {}: {}", name, e));
        assert!(!config.controls.is_empty());
        assert!(!config.tasks.is_empty());
    }
}

#[test]
fn climate_yaml_fills_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs/climate.yaml");
    let config = cc_project::load_yaml(&path).unwrap();

    assert_eq!(config.seed, Some(42));
    assert_eq!(config.control("temp").unwrap().history_capacity, 10);
    assert_eq!(config.control("mode").unwrap().history_capacity, 5);
    assert_eq!(
        config.control("mode").unwrap().initial,
        cc_project::InitialValueDef::Label("AC".to_string())
    );
    assert_eq!(config.task("airflow").unwrap().targets, ["fan", "mode"]);
    assert_eq!(config.renderer.title, None);
}

#[test]
fn unknown_extension_rejected() {
    let err = cc_project::load(Path::new("climate.toml")).unwrap_err();
    assert!(matches!(err, cc_project::ProjectError::UnknownFormat { .. }));
}
