//! Control value types and valid ranges.

use std::collections::HashSet;

use cc_core::{ensure_finite, saturate};
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Value held by a control.
///
/// The variant matches the [`ValueRange`] the value was sanitized into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ControlValue {
    /// Continuous reading (temperature, humidity).
    Scalar(f64),
    /// Integer level (fan speed).
    Level(i64),
    /// Index into an enumerated set of modes.
    Mode(usize),
}

impl ControlValue {
    /// Numeric view of the value, used by arithmetic tick behaviors.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::Level(v) => *v as f64,
            Self::Mode(i) => *i as f64,
        }
    }

    pub fn as_level_opt(&self) -> Option<i64> {
        match self {
            Self::Level(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for ControlValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<i64> for ControlValue {
    fn from(value: i64) -> Self {
        Self::Level(value)
    }
}

impl Default for ControlValue {
    fn default() -> Self {
        Self::Scalar(0.0)
    }
}

/// Declared valid range of a control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ValueRange {
    /// Real values in `[min, max]`.
    Continuous { min: f64, max: f64 },
    /// Integer levels in `[min, max]`.
    Discrete { min: i64, max: i64 },
    /// One of a fixed list of labels; the value is the label index.
    Enumerated { variants: Vec<String> },
}

impl ValueRange {
    pub fn continuous(min: f64, max: f64) -> ControlResult<Self> {
        let range = Self::Continuous { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn discrete(min: i64, max: i64) -> ControlResult<Self> {
        let range = Self::Discrete { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn enumerated<I, S>(variants: I) -> ControlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let range = Self::Enumerated {
            variants: variants.into_iter().map(Into::into).collect(),
        };
        range.validate()?;
        Ok(range)
    }

    /// Check the range is well formed.
    pub fn validate(&self) -> ControlResult<()> {
        match self {
            Self::Continuous { min, max } => {
                ensure_finite(*min, "range min")?;
                ensure_finite(*max, "range max")?;
                if min > max {
                    return Err(ControlError::InvalidArg {
                        what: "range min must not exceed max",
                    });
                }
            }
            Self::Discrete { min, max } => {
                if min > max {
                    return Err(ControlError::InvalidArg {
                        what: "range min must not exceed max",
                    });
                }
            }
            Self::Enumerated { variants } => {
                if variants.is_empty() {
                    return Err(ControlError::InvalidArg {
                        what: "enumerated range needs at least one variant",
                    });
                }
                let mut seen = HashSet::new();
                if !variants.iter().all(|v| seen.insert(v.as_str())) {
                    return Err(ControlError::InvalidArg {
                        what: "enumerated variants must be unique",
                    });
                }
            }
        }
        Ok(())
    }

    /// Numeric lower and upper bound. Enumerated ranges span the indices.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Self::Continuous { min, max } => (*min, *max),
            Self::Discrete { min, max } => (*min as f64, *max as f64),
            Self::Enumerated { variants } => (0.0, variants.len().saturating_sub(1) as f64),
        }
    }

    /// Clamp any value into this range, converting it to the range's variant.
    pub fn sanitize(&self, value: ControlValue) -> ControlValue {
        match self {
            Self::Continuous { min, max } => {
                ControlValue::Scalar(saturate(value.as_f64(), *min, *max))
            }
            Self::Discrete { min, max } => match value {
                ControlValue::Level(v) => ControlValue::Level(v.clamp(*min, *max)),
                other => {
                    let v = saturate(other.as_f64(), *min as f64, *max as f64).round();
                    ControlValue::Level(v as i64)
                }
            },
            Self::Enumerated { variants } => {
                let last = variants.len().saturating_sub(1);
                match value {
                    ControlValue::Mode(i) => ControlValue::Mode(i.min(last)),
                    other => {
                        let v = saturate(other.as_f64(), 0.0, last as f64).round();
                        ControlValue::Mode(v as usize)
                    }
                }
            }
        }
    }

    /// Whether `value` is already in range and of the matching variant.
    pub fn contains(&self, value: &ControlValue) -> bool {
        self.sanitize(*value) == *value
    }

    /// Look up an enumerated label.
    pub fn variant(&self, label: &str) -> Option<ControlValue> {
        match self {
            Self::Enumerated { variants } => variants
                .iter()
                .position(|v| v == label)
                .map(ControlValue::Mode),
            _ => None,
        }
    }

    /// Human readable form of a value in this range.
    pub fn format(&self, value: &ControlValue) -> String {
        match (self, self.sanitize(*value)) {
            (Self::Enumerated { variants }, ControlValue::Mode(i)) => {
                variants.get(i).cloned().unwrap_or_else(|| format!("#{i}"))
            }
            (_, ControlValue::Level(v)) => format!("Level {v}"),
            (_, sanitized) => format!("{:.1}", sanitized.as_f64()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_clamps_and_maps_nan_to_min() {
        let range = ValueRange::continuous(16.0, 30.0).unwrap();
        assert_eq!(range.sanitize(35.0.into()), ControlValue::Scalar(30.0));
        assert_eq!(range.sanitize(f64::NAN.into()), ControlValue::Scalar(16.0));
        assert_eq!(range.sanitize(ControlValue::Level(20)), ControlValue::Scalar(20.0));
    }

    #[test]
    fn discrete_rounds_scalars() {
        let range = ValueRange::discrete(0, 5).unwrap();
        assert_eq!(range.sanitize(2.6.into()), ControlValue::Level(3));
        assert_eq!(range.sanitize(ControlValue::Level(-4)), ControlValue::Level(0));
        assert_eq!(range.sanitize(ControlValue::Level(9)), ControlValue::Level(5));
    }

    #[test]
    fn enumerated_clamps_index_and_formats_label() {
        let range = ValueRange::enumerated(["AC", "Heater", "Auto"]).unwrap();
        assert_eq!(range.sanitize(ControlValue::Mode(7)), ControlValue::Mode(2));
        assert_eq!(range.variant("Heater"), Some(ControlValue::Mode(1)));
        assert_eq!(range.variant("Fan"), None);
        assert_eq!(range.format(&ControlValue::Mode(0)), "AC");
    }

    #[test]
    fn invalid_ranges_rejected() {
        assert!(ValueRange::continuous(30.0, 16.0).is_err());
        assert!(ValueRange::continuous(f64::NAN, 16.0).is_err());
        assert!(ValueRange::discrete(5, 0).is_err());
        assert!(ValueRange::enumerated(Vec::<String>::new()).is_err());
        assert!(ValueRange::enumerated(["AC", "AC"]).is_err());
    }

    #[test]
    fn contains_checks_variant_and_bounds() {
        let range = ValueRange::discrete(0, 5).unwrap();
        assert!(range.contains(&ControlValue::Level(3)));
        assert!(!range.contains(&ControlValue::Level(6)));
        assert!(!range.contains(&ControlValue::Scalar(3.0)));
    }
}
