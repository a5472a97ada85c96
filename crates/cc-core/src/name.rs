use core::fmt;
use std::borrow::Borrow;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};

/// Name of a control, unique within a registry.
///
/// - `Arc<str>` keeps clones cheap (names travel into snapshots and lock lists)
/// - `Ord` is plain lexicographic byte order; it is the single total order in
///   which control locks are ever acquired together
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct ControlName(Arc<str>);

impl ControlName {
    /// Validate and wrap a name. Empty names and names containing whitespace
    /// or control characters are rejected.
    pub fn new(name: impl AsRef<str>) -> CoreResult<Self> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(CoreError::InvalidName {
                name: name.to_string(),
                reason: "name must not be empty",
            });
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(CoreError::InvalidName {
                name: name.to_string(),
                reason: "name must not contain whitespace or control characters",
            });
        }
        Ok(Self(Arc::from(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ControlName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControlName({})", self.0)
    }
}

impl fmt::Display for ControlName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ControlName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ControlName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ControlName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ControlName {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ControlName> for String {
    fn from(name: ControlName) -> Self {
        name.0.to_string()
    }
}
