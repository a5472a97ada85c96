//! Tick behaviors: what one scheduled update step does to a control.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};
use crate::state::ControlState;
use crate::value::{ControlValue, ValueRange};

/// One scheduled update step.
///
/// Every variant writes through [`ControlState::set_value`], so results are
/// clamped into the control's range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type")]
pub enum TickBehavior {
    /// Leave the value unchanged.
    #[default]
    Hold,

    /// Add `delta` each tick. When the value already sits on the bound it is
    /// moving toward and `reset_to` is set, jump to `reset_to` instead.
    Step {
        delta: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reset_to: Option<f64>,
    },

    /// First-order approach toward `target` with rate limiting.
    ///
    /// Dynamics: dv/dt = (target - v) / tau_s, clamped to ±rate_limit.
    Approach {
        target: f64,
        tau_s: f64,
        rate_limit: f64,
    },

    /// Uniform draw over the whole range.
    Random,

    /// Uniform perturbation of at most `amplitude` around the current value.
    Jitter { amplitude: f64 },
}

impl TickBehavior {
    /// Check parameters.
    pub fn validate(&self) -> ControlResult<()> {
        match self {
            Self::Hold | Self::Random => Ok(()),
            Self::Step { delta, reset_to } => {
                if !delta.is_finite() {
                    return Err(ControlError::InvalidArg {
                        what: "step delta must be finite",
                    });
                }
                if reset_to.is_some_and(|r| !r.is_finite()) {
                    return Err(ControlError::InvalidArg {
                        what: "step reset_to must be finite",
                    });
                }
                Ok(())
            }
            Self::Approach {
                target,
                tau_s,
                rate_limit,
            } => {
                if !target.is_finite() {
                    return Err(ControlError::InvalidArg {
                        what: "approach target must be finite",
                    });
                }
                if !(*tau_s > 0.0) {
                    return Err(ControlError::InvalidArg {
                        what: "tau must be positive",
                    });
                }
                if !(*rate_limit > 0.0) {
                    return Err(ControlError::InvalidArg {
                        what: "rate_limit must be positive",
                    });
                }
                Ok(())
            }
            Self::Jitter { amplitude } => {
                if !(amplitude.is_finite() && *amplitude >= 0.0) {
                    return Err(ControlError::InvalidArg {
                        what: "jitter amplitude must be finite and non-negative",
                    });
                }
                Ok(())
            }
        }
    }

    /// Apply one step of `dt_s` seconds and return the stored value.
    pub fn apply(&self, state: &mut ControlState, rng: &mut StdRng, dt_s: f64) -> ControlValue {
        let current = state.current_value().as_f64();
        let (lower, upper) = state.range().bounds();

        match self {
            Self::Hold => state.current_value(),
            Self::Step { delta, reset_to } => {
                let at_bound = (*delta >= 0.0 && current >= upper) || (*delta < 0.0 && current <= lower);
                match reset_to {
                    Some(reset) if at_bound => state.set_value(*reset),
                    _ => state.set_value(current + delta),
                }
            }
            Self::Approach {
                target,
                tau_s,
                rate_limit,
            } => {
                let dvdt = ((target - current) / tau_s).clamp(-rate_limit, *rate_limit);
                state.set_value(current + dvdt * dt_s)
            }
            Self::Random => {
                let drawn = draw_uniform(state.range(), rng);
                state.set_value(drawn)
            }
            Self::Jitter { amplitude } => {
                let offset = if *amplitude > 0.0 {
                    amplitude * rng.gen_range(-1.0_f64..=1.0)
                } else {
                    0.0
                };
                state.set_value(current + offset)
            }
        }
    }
}

fn draw_uniform(range: &ValueRange, rng: &mut StdRng) -> ControlValue {
    match range {
        ValueRange::Continuous { min, max } => {
            // Interpolate rather than sample `min..=max`: the span may overflow.
            let u: f64 = rng.gen_range(0.0..=1.0);
            ControlValue::Scalar(min * (1.0 - u) + max * u)
        }
        ValueRange::Discrete { min, max } => ControlValue::Level(rng.gen_range(*min..=*max)),
        ValueRange::Enumerated { variants } => {
            ControlValue::Mode(rng.gen_range(0..variants.len().max(1)))
        }
    }
}
