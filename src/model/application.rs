//! Applications declared in the `applications` section

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::serialization::{
    deserialize_options, deserialize_placement_list, is_false, null_as_default,
};
use crate::charm::{CharmError, CharmRef};
use crate::constraints::{Constraints, ConstraintsError};
use crate::placement::{Placement, PlacementError};

/// A scalar charm option value
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(value) => write!(f, "{value}"),
            OptionValue::Int(value) => write!(f, "{value}"),
            OptionValue::Float(value) => write!(f, "{value}"),
            OptionValue::String(value) => f.write_str(value),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

/// A deployable unit definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Application {
    /// Package reference, resolved by the orchestrator
    pub charm: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,

    /// Absent for subordinate charms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_units: Option<u32>,

    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "deserialize_options"
    )]
    pub options: BTreeMap<String, OptionValue>,

    /// Placement directives, one per unit
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_placement_list"
    )]
    pub to: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub bindings: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub expose: bool,

    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub annotations: BTreeMap<String, OptionValue>,
}

impl Application {
    pub fn new(charm: impl Into<String>) -> Self {
        Self {
            charm: charm.into(),
            ..Self::default()
        }
    }

    /// Number of units the orchestrator will create; 0 for subordinates
    pub fn unit_count(&self) -> u32 {
        self.num_units.unwrap_or(0)
    }

    pub fn is_subordinate(&self) -> bool {
        self.num_units.is_none()
    }

    pub fn charm_ref(&self) -> Result<CharmRef, CharmError> {
        CharmRef::parse(&self.charm)
    }

    /// Parse every `to` directive, keeping the unit index
    pub fn placements(&self) -> impl Iterator<Item = (usize, &str, Result<Placement, PlacementError>)> {
        self.to
            .iter()
            .enumerate()
            .map(|(unit, directive)| (unit, directive.as_str(), Placement::parse(directive)))
    }

    pub fn parsed_constraints(&self) -> Option<Result<Constraints, ConstraintsError>> {
        self.constraints.as_deref().map(Constraints::parse)
    }

    /// Series of the application, falling back to the bundle default
    pub fn effective_series<'a>(&'a self, bundle_series: Option<&'a str>) -> Option<&'a str> {
        self.series.as_deref().or(bundle_series)
    }

    pub fn option(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }
}
