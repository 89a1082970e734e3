//! Project status
//!
//! Stored as one of two literal strings. Documents written elsewhere may hold
//! anything, which is kept verbatim as [`StatusValue::Unrecognized`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::lenient;

/// Lifecycle state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ProjectStatus {
    #[default]
    InProgress,
    Finished,
}

impl ProjectStatus {
    /// Every status, in display order
    pub const ALL: [ProjectStatus; 2] = [ProjectStatus::InProgress, ProjectStatus::Finished];

    /// Stored literal
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "En proceso",
            Self::Finished => "Terminado",
        }
    }

    /// Exact match against the stored literals
    pub fn from_stored(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProjectStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Status as read from a stored document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusValue {
    Known(ProjectStatus),
    /// Any other stored value, kept as-is
    Unrecognized(String),
}

impl StatusValue {
    /// Value used when a document has no status key at all
    pub fn missing() -> Self {
        Self::Unrecognized(String::new())
    }

    pub fn from_stored(raw: String) -> Self {
        match ProjectStatus::from_stored(&raw) {
            Some(status) => Self::Known(status),
            None => Self::Unrecognized(raw),
        }
    }

    pub fn known(&self) -> Option<ProjectStatus> {
        match self {
            Self::Known(status) => Some(*status),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.known().is_some()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(status) => status.as_str(),
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl Default for StatusValue {
    fn default() -> Self {
        Self::Known(ProjectStatus::default())
    }
}

impl From<ProjectStatus> for StatusValue {
    fn from(status: ProjectStatus) -> Self {
        Self::Known(status)
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StatusValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient::string(deserializer).map(Self::from_stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_literals() {
        assert_eq!(ProjectStatus::InProgress.as_str(), "En proceso");
        assert_eq!(ProjectStatus::Finished.as_str(), "Terminado");
        assert_eq!(ProjectStatus::default(), ProjectStatus::InProgress);
    }

    #[test]
    fn test_from_stored_is_exact() {
        assert_eq!(ProjectStatus::from_stored("Terminado"), Some(ProjectStatus::Finished));
        assert_eq!(ProjectStatus::from_stored("terminado"), None);
        assert_eq!(ProjectStatus::from_stored("En Proceso"), None);
    }

    #[test]
    fn test_unrecognized_value_is_kept() {
        let value: StatusValue = serde_json::from_str("\"Cancelado\"").unwrap();
        assert_eq!(value, StatusValue::Unrecognized("Cancelado".to_string()));
        assert_eq!(value.known(), None);
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"Cancelado\"");
    }

    #[test]
    fn test_known_value_round_trips() {
        let value: StatusValue = serde_json::from_str("\"En proceso\"").unwrap();
        assert_eq!(value.known(), Some(ProjectStatus::InProgress));
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"En proceso\"");
    }
}
