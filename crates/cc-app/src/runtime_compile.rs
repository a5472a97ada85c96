//! Runtime compilation of a ClimateConfig into registry, scheduler and renderer.

use std::sync::Arc;
use std::time::Duration;

use cc_controls::{
    Control, ControlName, ControlState, ControlValue, TickBehavior, TickPeriod, ValueRange,
};
use cc_project::schema::{
    BehaviorDef, ClimateConfig, ControlDef, FormatDef, InitialValueDef, RangeDef, RendererDef,
    TaskDef, TriggerDef,
};
use cc_runtime::{
    ControlRegistry, OutputSink, RenderFormat, RenderTrigger, Renderer, Runtime, TaskSpec,
    UpdateScheduler,
};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Compile the whole config into a runtime writing to `sink`.
pub fn compile_runtime(config: &ClimateConfig, sink: Box<dyn OutputSink>) -> AppResult<Runtime> {
    let registry = Arc::new(compile_registry(config)?);
    let scheduler = compile_scheduler(config, registry)?;
    let renderer = compile_renderer(&config.renderer, sink)?;
    Ok(Runtime::new(scheduler, renderer))
}

/// Build a registry holding every configured control, in config order.
///
/// With a config seed, control `i` is seeded with `seed + i`.
pub fn compile_registry(config: &ClimateConfig) -> AppResult<ControlRegistry> {
    let registry = ControlRegistry::new();
    for (index, def) in config.controls.iter().enumerate() {
        let seed = config.seed.map(|s| s.wrapping_add(index as u64));
        registry.add(compile_control(def, seed)?)?;
    }
    debug!(controls = registry.len(), "registry compiled");
    Ok(registry)
}

pub fn compile_control(def: &ControlDef, seed: Option<u64>) -> AppResult<Control> {
    let name = ControlName::new(&def.name).map_err(|e| AppError::Compile(e.to_string()))?;
    let range = compile_range(&def.range)?;
    let initial = initial_value(&range, &def.initial)?;

    let mut state = ControlState::new(name, range, initial, def.history_capacity)?;
    if let Some(unit) = &def.unit {
        state = state.with_unit(unit);
    }

    let control = Control::new(state, compile_behavior(&def.behavior))?;
    Ok(match seed {
        Some(seed) => control.with_seed(seed),
        None => control,
    })
}

pub fn compile_range(def: &RangeDef) -> AppResult<ValueRange> {
    let range = match def {
        RangeDef::Continuous { min, max } => ValueRange::continuous(*min, *max)?,
        RangeDef::Discrete { min, max } => ValueRange::discrete(*min, *max)?,
        RangeDef::Enumerated { variants } => ValueRange::enumerated(variants)?,
    };
    Ok(range)
}

fn initial_value(range: &ValueRange, def: &InitialValueDef) -> AppResult<ControlValue> {
    match (range, def) {
        (ValueRange::Enumerated { .. }, InitialValueDef::Label(label)) => range
            .variant(label)
            .ok_or_else(|| AppError::Compile(format!("Unknown mode label: {}", label))),
        (_, InitialValueDef::Label(label)) => Err(AppError::Compile(format!(
            "Label '{}' given for a numeric range",
            label
        ))),
        (_, InitialValueDef::Number(v)) => Ok(range.sanitize(ControlValue::Scalar(*v))),
    }
}

pub fn compile_behavior(def: &BehaviorDef) -> TickBehavior {
    match def {
        BehaviorDef::Hold => TickBehavior::Hold,
        BehaviorDef::Step { delta, reset_to } => TickBehavior::Step {
            delta: *delta,
            reset_to: *reset_to,
        },
        BehaviorDef::Approach {
            target,
            tau_s,
            rate_limit,
        } => TickBehavior::Approach {
            target: *target,
            tau_s: *tau_s,
            rate_limit: *rate_limit,
        },
        BehaviorDef::Random => TickBehavior::Random,
        BehaviorDef::Jitter { amplitude } => TickBehavior::Jitter {
            amplitude: *amplitude,
        },
    }
}

/// Build a scheduler with one ticking task per configured task.
pub fn compile_scheduler(
    config: &ClimateConfig,
    registry: Arc<ControlRegistry>,
) -> AppResult<UpdateScheduler> {
    let mut scheduler = UpdateScheduler::new(registry);
    for def in &config.tasks {
        scheduler.add_task(compile_task(def)?)?;
    }
    Ok(scheduler)
}

pub fn compile_task(def: &TaskDef) -> AppResult<TaskSpec> {
    let period = TickPeriod::from_millis(def.period_ms)?;
    let spec = TaskSpec::ticking(def.name.clone(), &def.targets, period)?;
    Ok(match def.max_ticks {
        Some(max) => spec.with_max_ticks(max),
        None => spec,
    })
}

pub fn compile_renderer(def: &RendererDef, sink: Box<dyn OutputSink>) -> AppResult<Renderer> {
    let trigger = match def.trigger {
        TriggerDef::Periodic { period_ms } => {
            RenderTrigger::Periodic(TickPeriod::from_millis(period_ms)?)
        }
        TriggerDef::OnNotify { max_wait_ms } => RenderTrigger::OnNotify {
            max_wait: Duration::from_millis(max_wait_ms),
        },
    };

    let mut renderer = Renderer::boxed(sink)
        .with_format(render_format(def.format))
        .with_trigger(trigger);
    if let Some(title) = &def.title {
        renderer = renderer.with_title(title);
    }
    Ok(renderer)
}

pub fn render_format(def: FormatDef) -> RenderFormat {
    match def {
        FormatDef::Text => RenderFormat::Text,
        FormatDef::Json => RenderFormat::Json,
    }
}
