//! Machine and application constraint strings (`mem=3072M cores=2`)

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintsError {
    #[error("constraint '{0}' is not of the form key=value")]
    Malformed(String),

    #[error("constraint '{key}' has invalid size '{value}'")]
    InvalidSize { key: String, value: String },

    #[error("constraint '{key}' has invalid number '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("constraint '{key}' has invalid boolean '{value}'")]
    InvalidBool { key: String, value: String },

    #[error("constraint '{0}' given more than once")]
    Repeated(String),
}

/// Parsed constraints; sizes are in megabytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    pub mem: Option<u64>,
    pub root_disk: Option<u64>,
    pub root_disk_source: Option<String>,
    pub cores: Option<u64>,
    pub cpu_power: Option<u64>,
    pub arch: Option<String>,
    pub container: Option<String>,
    pub virt_type: Option<String>,
    pub instance_type: Option<String>,
    pub allocate_public_ip: Option<bool>,
    pub tags: Vec<String>,
    pub spaces: Vec<String>,
    pub zones: Vec<String>,
    /// Keys not listed above, kept verbatim
    pub unknown: BTreeMap<String, String>,
}

impl Constraints {
    pub fn parse(input: &str) -> Result<Self, ConstraintsError> {
        let mut constraints = Self::default();
        let mut seen = Vec::new();

        for pair in input.split_whitespace() {
            let (key, value) = pair
                .split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| ConstraintsError::Malformed(pair.to_string()))?;
            if seen.contains(&key) {
                return Err(ConstraintsError::Repeated(key.to_string()));
            }
            seen.push(key);
            constraints.set(key, value)?;
        }

        Ok(constraints)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConstraintsError> {
        match key {
            "mem" => self.mem = Some(parse_size(key, value)?),
            "root-disk" => self.root_disk = Some(parse_size(key, value)?),
            "root-disk-source" => self.root_disk_source = non_empty(value),
            "cores" | "cpu-cores" => self.cores = Some(parse_number(key, value)?),
            "cpu-power" => self.cpu_power = Some(parse_number(key, value)?),
            "arch" => self.arch = non_empty(value),
            "container" => self.container = non_empty(value),
            "virt-type" => self.virt_type = non_empty(value),
            "instance-type" => self.instance_type = non_empty(value),
            "allocate-public-ip" => self.allocate_public_ip = Some(parse_bool(key, value)?),
            "tags" => self.tags = parse_list(value),
            "spaces" => self.spaces = parse_list(value),
            "zones" => self.zones = parse_list(value),
            _ => {
                self.unknown.insert(key.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(arch) = &self.arch {
            parts.push(format!("arch={arch}"));
        }
        if let Some(cores) = self.cores {
            parts.push(format!("cores={cores}"));
        }
        if let Some(power) = self.cpu_power {
            parts.push(format!("cpu-power={power}"));
        }
        if let Some(mem) = self.mem {
            parts.push(format!("mem={}", format_size(mem)));
        }
        if let Some(disk) = self.root_disk {
            parts.push(format!("root-disk={}", format_size(disk)));
        }
        if let Some(source) = &self.root_disk_source {
            parts.push(format!("root-disk-source={source}"));
        }
        if let Some(container) = &self.container {
            parts.push(format!("container={container}"));
        }
        if let Some(virt) = &self.virt_type {
            parts.push(format!("virt-type={virt}"));
        }
        if let Some(instance) = &self.instance_type {
            parts.push(format!("instance-type={instance}"));
        }
        if let Some(public_ip) = self.allocate_public_ip {
            parts.push(format!("allocate-public-ip={public_ip}"));
        }
        for (key, list) in [("tags", &self.tags), ("spaces", &self.spaces), ("zones", &self.zones)] {
            if !list.is_empty() {
                parts.push(format!("{key}={}", list.join(",")));
            }
        }
        for (key, value) in &self.unknown {
            parts.push(format!("{key}={value}"));
        }
        f.write_str(&parts.join(" "))
    }
}

/// Size in megabytes; bare numbers are megabytes
fn parse_size(key: &str, value: &str) -> Result<u64, ConstraintsError> {
    let invalid = || ConstraintsError::InvalidSize {
        key: key.to_string(),
        value: value.to_string(),
    };

    let (number, multiplier) = match value.chars().last() {
        Some('M' | 'm') => (&value[..value.len() - 1], 1.0),
        Some('G' | 'g') => (&value[..value.len() - 1], 1024.0),
        Some('T' | 't') => (&value[..value.len() - 1], 1024.0 * 1024.0),
        Some('P' | 'p') => (&value[..value.len() - 1], 1024.0 * 1024.0 * 1024.0),
        Some(_) => (value, 1.0),
        None => return Err(invalid()),
    };

    let number: f64 = number.parse().map_err(|_| invalid())?;
    if !number.is_finite() || number < 0.0 {
        return Err(invalid());
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok((number * multiplier).ceil() as u64)
}

fn format_size(megabytes: u64) -> String {
    if megabytes >= 1024 && megabytes % 1024 == 0 {
        format!("{}G", megabytes / 1024)
    } else {
        format!("{megabytes}M")
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, ConstraintsError> {
    value.parse().map_err(|_| ConstraintsError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConstraintsError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConstraintsError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
