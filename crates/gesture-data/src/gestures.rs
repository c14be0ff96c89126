//! Ordered Gesture Label Set

use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered set of gesture labels; position defines the one-hot index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct GestureSet {
    labels: Vec<String>,
}

impl GestureSet {
    /// Create a gesture set, rejecting empty, duplicate, or path-like names
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Result<Self, DataError> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(DataError::InvalidGestureSet("no gestures configured".to_string()));
        }

        let mut seen = HashSet::new();
        for label in &labels {
            if label.trim().is_empty() {
                return Err(DataError::InvalidGestureSet("empty gesture name".to_string()));
            }
            if label.contains('/') || label.contains('\\') {
                return Err(DataError::InvalidGestureSet(format!(
                    "gesture name {label:?} contains a path separator"
                )));
            }
            if !seen.insert(label.as_str()) {
                return Err(DataError::InvalidGestureSet(format!(
                    "duplicate gesture {label:?}"
                )));
            }
        }

        Ok(Self { labels })
    }

    /// Number of gestures (width of the one-hot encoding)
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at one-hot index
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// One-hot index of a label
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Iterate `(index, label)` in encoding order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().map(String::as_str).enumerate()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl TryFrom<Vec<String>> for GestureSet {
    type Error = DataError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<GestureSet> for Vec<String> {
    fn from(set: GestureSet) -> Self {
        set.labels
    }
}

impl Default for GestureSet {
    fn default() -> Self {
        Self {
            labels: vec!["punch".to_string(), "flex".to_string()],
        }
    }
}
