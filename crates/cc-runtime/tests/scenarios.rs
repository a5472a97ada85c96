use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use cc_controls::{
    Control, ControlError, ControlName, ControlState, ControlValue, TickBehavior, TickPeriod,
    ValueRange,
};
use cc_runtime::{ControlRegistry, TaskSpec, UpdateScheduler};

fn scalar_control(name: &str, min: f64, max: f64, init: f64, behavior: TickBehavior) -> Control {
    let state = ControlState::new(
        ControlName::new(name).unwrap(),
        ValueRange::continuous(min, max).unwrap(),
        init.into(),
        10,
    )
    .unwrap();
    Control::new(state, behavior).unwrap()
}

fn climate_registry() -> Arc<ControlRegistry> {
    let registry = Arc::new(ControlRegistry::new());
    registry
        .add(scalar_control(
            "temp",
            16.0,
            30.0,
            22.0,
            TickBehavior::Step {
                delta: 1.0,
                reset_to: None,
            },
        ))
        .unwrap();
    registry
        .add(scalar_control("fan", 0.0, 5.0, 1.0, TickBehavior::Hold))
        .unwrap();
    registry
}

#[test]
fn temperature_saturates_after_twenty_ticks() {
    let registry = climate_registry();
    let mut scheduler = UpdateScheduler::new(Arc::clone(&registry));
    scheduler
        .add_task(TaskSpec::ticking("warm-up", ["temp"], TickPeriod::from_millis(10).unwrap()).unwrap())
        .unwrap();

    for _ in 0..20 {
        scheduler.tick_once("warm-up").unwrap();
    }

    let temp = registry.get("temp").unwrap();
    assert_eq!(temp.current_value(), ControlValue::Scalar(30.0));
    temp.read(|state| {
        assert_eq!(state.history_len(), 10);
        assert_eq!(state.history().last(), Some(&ControlValue::Scalar(30.0)));
        assert!(state.history().all(|v| (16.0..=30.0).contains(&v.as_f64())));
    });
    assert_eq!(scheduler.reports()[0].ticks, 20);
}

#[test]
fn duplicate_add_keeps_single_entry() {
    let registry = climate_registry();
    let err = registry
        .add(scalar_control("temp", 0.0, 100.0, 50.0, TickBehavior::Hold))
        .unwrap_err();

    assert!(matches!(err, ControlError::DuplicateName { .. }));
    let temps = registry
        .names()
        .into_iter()
        .filter(|n| n.as_str() == "temp")
        .count();
    assert_eq!(temps, 1);
}

#[test]
fn remove_twice_is_safe() {
    let registry = climate_registry();
    assert!(registry.remove("fan"));
    assert!(!registry.remove("fan"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn unknown_target_fails_before_start() {
    let registry = climate_registry();
    let mut scheduler = UpdateScheduler::new(registry);
    let err = scheduler
        .add_task(
            TaskSpec::ticking("humid", ["temp", "humidity"], TickPeriod::from_millis(10).unwrap())
                .unwrap(),
        )
        .unwrap_err();

    assert!(matches!(err, ControlError::UnknownControl { ref name, .. } if name == "humidity"));
    assert!(scheduler.task_names().is_empty());
}

#[test]
fn duplicate_task_name_rejected() {
    let registry = climate_registry();
    let mut scheduler = UpdateScheduler::new(registry);
    let period = TickPeriod::from_millis(10).unwrap();
    scheduler
        .add_task(TaskSpec::ticking("t", ["temp"], period).unwrap())
        .unwrap();
    let err = scheduler
        .add_task(TaskSpec::ticking("t", ["fan"], period).unwrap())
        .unwrap_err();
    assert!(matches!(err, ControlError::DuplicateName { .. }));
}

#[test]
fn opposite_declared_orders_do_not_deadlock() {
    let registry = climate_registry();
    let (done_tx, done_rx) = mpsc::channel();

    let workers: Vec<_> = [["fan", "temp"], ["temp", "fan"]]
        .into_iter()
        .map(|names| {
            let registry = Arc::clone(&registry);
            let done_tx = done_tx.clone();
            thread::spawn(move || {
                for _ in 0..2_000 {
                    registry
                        .with_ordered_locks(&names, |locked| {
                            let temp = locked.get("temp").unwrap().current_value().as_f64();
                            let fan = locked.state_mut("fan").unwrap();
                            fan.set_value((temp - 16.0) / 3.0);
                        })
                        .unwrap();
                }
                done_tx.send(()).unwrap();
            })
        })
        .collect();

    for _ in 0..2 {
        done_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("lock-ordered workers should finish without deadlock");
    }
    for w in workers {
        w.join().unwrap();
    }
}

#[test]
fn structural_changes_proceed_while_a_control_is_locked() {
    let registry = climate_registry();
    let (locked_tx, locked_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let holder = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            registry
                .with_ordered_locks(&["temp"], |_| {
                    locked_tx.send(()).unwrap();
                    release_rx.recv_timeout(Duration::from_secs(10)).ok();
                })
                .unwrap();
        })
    };
    locked_rx.recv_timeout(Duration::from_secs(10)).unwrap();

    // "temp" is held; registry structure and other controls stay available.
    registry
        .add(scalar_control("humidity", 0.0, 100.0, 40.0, TickBehavior::Hold))
        .unwrap();
    assert!(registry.contains("humidity"));
    assert_eq!(
        registry.get("fan").unwrap().current_value(),
        ControlValue::Scalar(1.0)
    );

    release_tx.send(()).unwrap();
    holder.join().unwrap();

    let snapshot = registry.snapshot();
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot.get("humidity").unwrap().display, "40.0");
}

#[test]
fn failing_and_panicking_actions_are_contained() {
    let registry = climate_registry();
    let mut scheduler = UpdateScheduler::new(Arc::clone(&registry));
    let period = TickPeriod::from_millis(10).unwrap();
    scheduler
        .add_task(
            TaskSpec::custom("fails", ["temp"], period, |_| {
                Err(ControlError::ActionFailed {
                    what: "sensor offline".to_string(),
                })
            })
            .unwrap(),
        )
        .unwrap();
    scheduler
        .add_task(
            TaskSpec::custom("panics", ["temp", "fan"], period, |_| {
                panic!("actuator exploded");
            })
            .unwrap(),
        )
        .unwrap();

    assert!(matches!(
        scheduler.tick_once("fails"),
        Err(ControlError::ActionFailed { .. })
    ));
    let err = scheduler.tick_once("panics").unwrap_err();
    assert!(err.to_string().contains("actuator exploded"));

    // Locks were released (and recovered from poisoning) after the panic.
    registry
        .with_ordered_locks(&["temp", "fan"], |locked| {
            locked.state_mut("temp").unwrap().set_value(25.0);
        })
        .unwrap();
    assert_eq!(
        registry.get("temp").unwrap().current_value(),
        ControlValue::Scalar(25.0)
    );

    let reports = scheduler.reports();
    assert_eq!(reports[0].failures, 1);
    assert_eq!(reports[1].panics, 1);
}
