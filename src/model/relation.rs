//! Relations between application endpoints

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from parsing an `application:endpoint` string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("endpoint is empty")]
    Empty,

    #[error("endpoint '{0}' has no application name")]
    MissingApplication(String),

    #[error("endpoint '{0}' has an empty relation name after ':'")]
    MissingName(String),

    #[error("endpoint '{0}' contains whitespace")]
    Whitespace(String),
}

/// One side of a relation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub application: String,
    /// Relation name; `None` lets the orchestrator infer it
    pub name: Option<String>,
}

impl Endpoint {
    pub fn parse(input: &str) -> Result<Self, EndpointError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(EndpointError::Empty);
        }
        if input.contains(char::is_whitespace) {
            return Err(EndpointError::Whitespace(input.to_string()));
        }

        match input.split_once(':') {
            Some((application, _)) if application.is_empty() => {
                Err(EndpointError::MissingApplication(input.to_string()))
            }
            Some((_, name)) if name.is_empty() => {
                Err(EndpointError::MissingName(input.to_string()))
            }
            Some((application, name)) => Ok(Self {
                application: application.to_string(),
                name: Some(name.to_string()),
            }),
            None => Ok(Self {
                application: input.to_string(),
                name: None,
            }),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}:{}", self.application, name),
            None => f.write_str(&self.application),
        }
    }
}

/// A binding between two endpoints, kept as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation(pub String, pub String);

impl Relation {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self(left.into(), right.into())
    }

    /// Parse both sides
    pub fn endpoints(&self) -> Result<(Endpoint, Endpoint), EndpointError> {
        Ok((Endpoint::parse(&self.0)?, Endpoint::parse(&self.1)?))
    }

    /// Application names on both sides, without parsing errors
    pub fn applications(&self) -> (&str, &str) {
        (application_of(&self.0), application_of(&self.1))
    }

    pub fn involves(&self, application: &str) -> bool {
        let (left, right) = self.applications();
        left == application || right == application
    }

    /// The endpoint opposite to `application`, if it takes part
    pub fn peer_of(&self, application: &str) -> Option<&str> {
        let (left, right) = self.applications();
        if left == application {
            Some(self.1.trim())
        } else if right == application {
            Some(self.0.trim())
        } else {
            None
        }
    }

    /// Same pair of endpoints in either orientation
    pub fn same_as(&self, other: &Relation) -> bool {
        let (a, b) = (self.0.trim(), self.1.trim());
        let (c, d) = (other.0.trim(), other.1.trim());
        (a == c && b == d) || (a == d && b == c)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.0.trim(), self.1.trim())
    }
}

fn application_of(endpoint: &str) -> &str {
    let endpoint = endpoint.trim();
    endpoint.split_once(':').map_or(endpoint, |(app, _)| app)
}
