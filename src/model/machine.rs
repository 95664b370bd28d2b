//! Machines declared in the `machines` section

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::OptionValue;
use super::serialization::null_as_default;
use crate::constraints::{Constraints, ConstraintsError};

/// Machine identifier as written in the bundle
///
/// Ids are usually small integers, but any string is accepted. Numeric ids
/// sort numerically so that `10` comes after `9`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MachineId(String);

impl MachineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for MachineId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for MachineId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MachineId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A provisioning slot with optional resource constraints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub annotations: BTreeMap<String, OptionValue>,
}

impl Machine {
    /// Machine with the given constraint string
    pub fn with_constraints(constraints: impl Into<String>) -> Self {
        Self {
            constraints: Some(constraints.into()),
            ..Self::default()
        }
    }

    /// Parse the constraint string, if one is set
    pub fn parsed_constraints(&self) -> Option<Result<Constraints, ConstraintsError>> {
        self.constraints.as_deref().map(Constraints::parse)
    }
}
