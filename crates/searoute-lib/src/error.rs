use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenient result alias for the sea route library.
pub type Result<T> = std::result::Result<T, Error>;

/// Which end of a voyage an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Origin => f.write_str("origin"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// Stable classification of [`Error`] values, used for API payloads and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidCoordinate,
    Unreachable,
    NoRoute,
    SearchTimeout,
    InvalidRequest,
    Internal,
}

impl ErrorKind {
    /// Snake-case label matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidCoordinate => "invalid_coordinate",
            ErrorKind::Unreachable => "unreachable",
            ErrorKind::NoRoute => "no_route",
            ErrorKind::SearchTimeout => "search_timeout",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a port name could not be found in the registry.
    #[error("unknown port: {name}{}", format_suggestions(.suggestions))]
    PortNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a latitude/longitude pair is outside the valid range.
    #[error("invalid coordinate ({lat}, {lon}): {reason}")]
    InvalidCoordinate { lat: f64, lon: f64, reason: String },

    /// Raised when the origin or destination lies on land or inside a hazard.
    #[error("{endpoint} is unreachable: {reason}")]
    Unreachable { endpoint: Endpoint, reason: String },

    /// Raised when no navigable path connects the two endpoints.
    #[error("no route found between {origin} and {destination}")]
    NoRoute { origin: String, destination: String },

    /// Raised when the search exhausted its expansion or time budget.
    #[error("route search exceeded its budget after {expansions} expansions ({elapsed_ms} ms)")]
    SearchTimeout { expansions: usize, elapsed_ms: u64 },

    /// Raised when duplicate port names are encountered while loading a registry.
    #[error("duplicate port name encountered: {name}")]
    DuplicatePort { name: String },

    /// Raised when a hazard zone fails validation.
    #[error("invalid hazard zone: {message}")]
    InvalidHazard { message: String },

    /// Raised when a vessel profile fails validation.
    #[error("invalid vessel profile: {message}")]
    InvalidVesselProfile { message: String },

    /// Raised when graph or search options are out of range.
    #[error("invalid planner options: {message}")]
    InvalidOptions { message: String },

    /// Raised when a reference dataset could not be parsed.
    #[error("failed to load dataset from {path}: {message}")]
    DataLoad { path: PathBuf, message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Classify the error for API responses and metrics.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::PortNotFound { .. } => ErrorKind::NotFound,
            Error::InvalidCoordinate { .. } => ErrorKind::InvalidCoordinate,
            Error::Unreachable { .. } => ErrorKind::Unreachable,
            Error::NoRoute { .. } => ErrorKind::NoRoute,
            Error::SearchTimeout { .. } => ErrorKind::SearchTimeout,
            Error::InvalidHazard { .. }
            | Error::InvalidVesselProfile { .. }
            | Error::InvalidOptions { .. } => ErrorKind::InvalidRequest,
            Error::DuplicatePort { .. }
            | Error::DataLoad { .. }
            | Error::Io(_)
            | Error::Json(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn invalid_coordinate(lat: f64, lon: f64, reason: impl Into<String>) -> Self {
        Error::InvalidCoordinate {
            lat,
            lon,
            reason: reason.into(),
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_not_found_renders_single_suggestion() {
        let error = Error::PortNotFound {
            name: "Singapor".to_string(),
            suggestions: vec!["Singapore".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "unknown port: Singapor. Did you mean 'Singapore'?"
        );
    }

    #[test]
    fn port_not_found_renders_multiple_suggestions() {
        let error = Error::PortNotFound {
            name: "Long".to_string(),
            suggestions: vec!["Long Beach".to_string(), "Hong Kong".to_string()],
        };
        let message = error.to_string();
        assert!(message.contains("Did you mean one of: 'Long Beach', 'Hong Kong'?"));
    }

    #[test]
    fn port_not_found_without_suggestions_is_plain() {
        let error = Error::PortNotFound {
            name: "Atlantis".to_string(),
            suggestions: Vec::new(),
        };
        assert_eq!(error.to_string(), "unknown port: Atlantis");
    }

    #[test]
    fn kinds_map_to_stable_labels() {
        let unreachable = Error::Unreachable {
            endpoint: Endpoint::Destination,
            reason: "inside hazard".to_string(),
        };
        assert_eq!(unreachable.kind(), ErrorKind::Unreachable);
        assert_eq!(unreachable.kind().as_str(), "unreachable");
        assert!(unreachable.to_string().starts_with("destination is unreachable"));

        let timeout = Error::SearchTimeout {
            expansions: 10,
            elapsed_ms: 3,
        };
        assert_eq!(timeout.kind().to_string(), "search_timeout");

        let duplicate = Error::DuplicatePort {
            name: "Busan".to_string(),
        };
        assert_eq!(duplicate.kind(), ErrorKind::Internal);

        let hazard = Error::InvalidHazard {
            message: "radius must be positive".to_string(),
        };
        assert_eq!(hazard.kind().as_str(), "invalid_request");
    }
}
