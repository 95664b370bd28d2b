//! Typed model of a charm bundle document
//!
//! A bundle has three sections that matter to the orchestrator:
//! - `machines`: provisioning slots with optional constraints
//! - `applications`: charms, unit counts, options and placement
//! - `relations`: endpoint pairs to be bound together
//!
//! The model is a desired-state snapshot. Nothing here provisions or
//! mutates anything; see [`crate::validate`] for the consistency checks.

pub mod application;
pub mod machine;
pub mod relation;
mod serialization;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub use application::{Application, OptionValue};
pub use machine::{Machine, MachineId};
pub use relation::{Endpoint, EndpointError, Relation};

use crate::placement::Placement;
use serialization::{deserialize_applications, deserialize_machines, null_as_default};

/// Top-level section listing cross-model offers
pub const OFFERS_KEY: &str = "saas";

/// A parsed bundle document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Default series for applications and machines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,

    /// Anchor definitions; aliases are already expanded where referenced
    #[serde(
        default,
        skip_serializing_if = "serde_yaml::Mapping::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub variables: serde_yaml::Mapping,

    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "deserialize_machines"
    )]
    pub machines: BTreeMap<MachineId, Machine>,

    #[serde(
        default,
        alias = "services",
        deserialize_with = "deserialize_applications"
    )]
    pub applications: BTreeMap<String, Application>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub relations: Vec<Relation>,

    /// Top-level sections without a typed field, such as `saas`
    ///
    /// Kept verbatim so that rendering does not lose them.
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// A unit that lands on a declared machine
#[derive(Debug, Clone, PartialEq)]
pub struct UnitPlacement {
    pub application: String,
    pub unit: usize,
    pub placement: Placement,
}

impl UnitPlacement {
    /// Unit name in `application/index` form
    pub fn unit_name(&self) -> String {
        format!("{}/{}", self.application, self.unit)
    }
}

impl Bundle {
    /// Names of the sections in [`Bundle::extra`] the orchestrator does not know
    pub fn unknown_keys(&self) -> Vec<String> {
        self.extra
            .keys()
            .map(|key| match key {
                serde_yaml::Value::String(name) => name.clone(),
                other => serde_yaml::to_string(other)
                    .map(|text| text.trim().to_string())
                    .unwrap_or_default(),
            })
            .filter(|key| key != OFFERS_KEY)
            .collect()
    }

    /// Names of the remote offers consumed through `saas`
    pub fn offers(&self) -> impl Iterator<Item = &str> {
        self.extra
            .get(OFFERS_KEY)
            .and_then(serde_yaml::Value::as_mapping)
            .into_iter()
            .flat_map(|offers| offers.keys())
            .filter_map(serde_yaml::Value::as_str)
    }

    /// True when `name` is an application or a consumed offer
    pub fn is_relatable(&self, name: &str) -> bool {
        self.applications.contains_key(name) || self.offers().any(|offer| offer == name)
    }

    pub fn application(&self, name: &str) -> Option<&Application> {
        self.applications.get(name)
    }

    pub fn machine(&self, id: &str) -> Option<&Machine> {
        self.machines.get(&MachineId::from(id))
    }

    pub fn has_machine(&self, id: &MachineId) -> bool {
        self.machines.contains_key(id)
    }

    /// Relations with `application` on either side
    pub fn relations_of<'a>(&'a self, application: &'a str) -> impl Iterator<Item = &'a Relation> {
        self.relations
            .iter()
            .filter(move |relation| relation.involves(application))
    }

    /// Units grouped by the declared machine that hosts them
    ///
    /// Directives that fail to parse or do not name a machine are skipped.
    pub fn units_by_machine(&self) -> BTreeMap<MachineId, Vec<UnitPlacement>> {
        let mut by_machine: BTreeMap<MachineId, Vec<UnitPlacement>> = BTreeMap::new();
        for (name, app) in &self.applications {
            for (unit, _, placement) in app.placements() {
                let Ok(placement) = placement else {
                    continue;
                };
                let Some(machine) = placement.machine_id().cloned() else {
                    continue;
                };
                by_machine.entry(machine).or_default().push(UnitPlacement {
                    application: name.clone(),
                    unit,
                    placement,
                });
            }
        }
        by_machine
    }

    /// Machine ids named by any placement directive
    pub fn referenced_machines(&self) -> BTreeSet<MachineId> {
        self.units_by_machine().into_keys().collect()
    }

    /// Total units across principal applications
    pub fn unit_count(&self) -> u32 {
        self.applications.values().map(Application::unit_count).sum()
    }
}
