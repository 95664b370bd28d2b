//! Charm package references
//!
//! The orchestrator resolves references against a store or the local file
//! system. Here they are only checked for shape:
//!
//! - `ch:name`, `name` (Charmhub)
//! - `cs:name`, `cs:~owner/name`, `cs:series/name-7`, `cs:~owner/series/name-7`
//! - `local:series/name`
//! - `./path`, `../path`, `/path` (local charm directory)

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CharmError {
    #[error("charm reference is empty")]
    Empty,

    #[error("unknown charm schema '{0}'")]
    UnknownSchema(String),

    #[error("charm owner in '{0}' must be followed by '/'")]
    MissingOwnerSeparator(String),

    #[error("charm reference '{0}' has too many path segments")]
    TooManySegments(String),

    #[error("invalid charm name '{0}'")]
    InvalidName(String),
}

/// Where a charm is fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Charmhub,
    CharmStore,
    Local,
    Path,
}

impl Schema {
    pub fn prefix(self) -> &'static str {
        match self {
            Schema::Charmhub => "ch",
            Schema::CharmStore => "cs",
            Schema::Local => "local",
            Schema::Path => "",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Charmhub => f.write_str("charmhub"),
            Schema::CharmStore => f.write_str("charm store"),
            Schema::Local => f.write_str("local"),
            Schema::Path => f.write_str("path"),
        }
    }
}

/// A parsed charm reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharmRef {
    pub schema: Schema,
    pub owner: Option<String>,
    pub series: Option<String>,
    pub name: String,
    pub revision: Option<u32>,
    /// Original text for path references
    pub path: Option<String>,
}

impl CharmRef {
    pub fn parse(input: &str) -> Result<Self, CharmError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(CharmError::Empty);
        }

        if input.starts_with("./") || input.starts_with("../") || input.starts_with('/') {
            return Self::parse_path(input);
        }

        let (schema, rest) = match input.split_once(':') {
            Some(("ch", rest)) => (Schema::Charmhub, rest),
            Some(("cs", rest)) => (Schema::CharmStore, rest),
            Some(("local", rest)) => (Schema::Local, rest),
            Some((other, _)) => return Err(CharmError::UnknownSchema(other.to_string())),
            None => (Schema::Charmhub, input),
        };

        let (owner, rest) = match rest.strip_prefix('~') {
            Some(owned) => {
                let (owner, rest) = owned
                    .split_once('/')
                    .ok_or_else(|| CharmError::MissingOwnerSeparator(input.to_string()))?;
                if owner.is_empty() {
                    return Err(CharmError::InvalidName(input.to_string()));
                }
                (Some(owner.to_string()), rest)
            }
            None => (None, rest),
        };

        let segments: Vec<&str> = rest.split('/').collect();
        let (series, name) = match segments.as_slice() {
            [name] => (None, *name),
            [series, name] if !series.is_empty() => (Some((*series).to_string()), *name),
            [_, _] => return Err(CharmError::InvalidName(input.to_string())),
            _ => return Err(CharmError::TooManySegments(input.to_string())),
        };

        let (name, revision) = split_revision(name);
        if !is_valid_name(name) {
            return Err(CharmError::InvalidName(name.to_string()));
        }

        Ok(Self {
            schema,
            owner,
            series,
            name: name.to_string(),
            revision,
            path: None,
        })
    }

    fn parse_path(input: &str) -> Result<Self, CharmError> {
        let name = input
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        if name.is_empty() || name == "." || name == ".." {
            return Err(CharmError::InvalidName(input.to_string()));
        }
        Ok(Self {
            schema: Schema::Path,
            owner: None,
            series: None,
            name: name.to_string(),
            revision: None,
            path: Some(input.to_string()),
        })
    }

    pub fn is_local(&self) -> bool {
        matches!(self.schema, Schema::Local | Schema::Path)
    }
}

impl fmt::Display for CharmRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            return f.write_str(path);
        }
        write!(f, "{}:", self.schema.prefix())?;
        if let Some(owner) = &self.owner {
            write!(f, "~{owner}/")?;
        }
        if let Some(series) = &self.series {
            write!(f, "{series}/")?;
        }
        f.write_str(&self.name)?;
        if let Some(revision) = self.revision {
            write!(f, "-{revision}")?;
        }
        Ok(())
    }
}

/// Split a trailing `-<digits>` revision off a charm name
fn split_revision(name: &str) -> (&str, Option<u32>) {
    if let Some((base, suffix)) = name.rsplit_once('-') {
        if !base.is_empty() && !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(revision) = suffix.parse() {
                return (base, Some(revision));
            }
        }
    }
    (name, None)
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_lowercase()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.ends_with('-')
        && !name.contains("--")
}
