//! Placement directives from an application's `to` list

use std::fmt;
use thiserror::Error;

use crate::model::MachineId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("placement directive is empty")]
    Empty,

    #[error("unknown container type '{0}'")]
    UnknownContainer(String),

    #[error("invalid unit placement '{0}', expected <application>/<index>")]
    InvalidUnit(String),

    #[error("placement '{0}' has no target after ':'")]
    MissingTarget(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Lxd,
    Kvm,
}

impl ContainerKind {
    fn parse(input: &str) -> Option<Self> {
        match input {
            // lxc is the pre-2.0 spelling of lxd
            "lxd" | "lxc" => Some(ContainerKind::Lxd),
            "kvm" => Some(ContainerKind::Kvm),
            _ => None,
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Lxd => f.write_str("lxd"),
            ContainerKind::Kvm => f.write_str("kvm"),
        }
    }
}

/// Where one unit goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Directly on a declared machine
    Machine(MachineId),
    /// In a container, on a declared machine or on a new one
    Container {
        kind: ContainerKind,
        machine: Option<MachineId>,
    },
    /// Next to an existing unit of another application
    Unit { application: String, index: u32 },
    /// On a fresh machine
    New,
}

impl Placement {
    pub fn parse(input: &str) -> Result<Self, PlacementError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PlacementError::Empty);
        }
        if input == "new" {
            return Ok(Placement::New);
        }

        if let Some((kind, target)) = input.split_once(':') {
            let kind = ContainerKind::parse(kind)
                .ok_or_else(|| PlacementError::UnknownContainer(kind.to_string()))?;
            return match target {
                "" => Err(PlacementError::MissingTarget(input.to_string())),
                "new" => Ok(Placement::Container {
                    kind,
                    machine: None,
                }),
                target if target.contains('/') => {
                    // lxd:app/0 puts a container on the unit's machine
                    let (application, index) = parse_unit(target, input)?;
                    Ok(Placement::Unit { application, index })
                }
                target => Ok(Placement::Container {
                    kind,
                    machine: Some(MachineId::from(target)),
                }),
            };
        }

        if let Some(kind) = ContainerKind::parse(input) {
            return Ok(Placement::Container {
                kind,
                machine: None,
            });
        }

        if input.contains('/') {
            let (application, index) = parse_unit(input, input)?;
            return Ok(Placement::Unit { application, index });
        }

        Ok(Placement::Machine(MachineId::from(input)))
    }

    /// The bundle machine this placement points at, if any
    pub fn machine_id(&self) -> Option<&MachineId> {
        match self {
            Placement::Machine(id) => Some(id),
            Placement::Container { machine, .. } => machine.as_ref(),
            Placement::Unit { .. } | Placement::New => None,
        }
    }
}

fn parse_unit(target: &str, input: &str) -> Result<(String, u32), PlacementError> {
    let (application, index) = target
        .split_once('/')
        .ok_or_else(|| PlacementError::InvalidUnit(input.to_string()))?;
    if application.is_empty() {
        return Err(PlacementError::InvalidUnit(input.to_string()));
    }
    let index = index
        .parse()
        .map_err(|_| PlacementError::InvalidUnit(input.to_string()))?;
    Ok((application.to_string(), index))
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Machine(id) => write!(f, "{id}"),
            Placement::Container {
                kind,
                machine: Some(id),
            } => write!(f, "{kind}:{id}"),
            Placement::Container {
                kind,
                machine: None,
            } => write!(f, "{kind}:new"),
            Placement::Unit { application, index } => write!(f, "{application}/{index}"),
            Placement::New => f.write_str("new"),
        }
    }
}
