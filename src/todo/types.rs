//! Todo payload types.

use serde::{Deserialize, Serialize};

/// A todo item as stored by the upstream service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TodoData {
    /// Assigned by the upstream on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl TodoData {
    pub fn new(title: impl Into<String>, completed: bool) -> Self {
        Self {
            id: None,
            title: title.into(),
            completed,
        }
    }
}
