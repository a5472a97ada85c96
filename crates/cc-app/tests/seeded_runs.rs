//! Seeded configs reproduce the same control values.

use std::sync::Arc;

use cc_app::{compile_registry, compile_scheduler, demo_config};
use cc_controls::ControlValue;

fn values_after_ticks(seed: u64, ticks: usize) -> Vec<ControlValue> {
    let mut config = demo_config();
    config.seed = Some(seed);

    let registry = Arc::new(compile_registry(&config).unwrap());
    let scheduler = compile_scheduler(&config, Arc::clone(&registry)).unwrap();
    for _ in 0..ticks {
        for task in scheduler.task_names() {
            scheduler.tick_once(task).unwrap();
        }
    }
    registry
        .snapshot()
        .entries
        .iter()
        .map(|e| e.value)
        .collect()
}

#[test]
fn same_seed_same_values() {
    assert_eq!(values_after_ticks(11, 25), values_after_ticks(11, 25));
}

#[test]
fn temperature_wraps_to_reset_value() {
    // 24 -> 30 in six steps, then one more tick resets to 18.
    let values = values_after_ticks(5, 7);
    assert_eq!(values[0], ControlValue::Scalar(18.0));
}
