//! Event categories.

use serde::Deserialize;

/// Category used to group events.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    /// Backend identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// URL slug, also accepted by the event filter.
    pub slug: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
    /// Icon name or emoji.
    #[serde(default)]
    pub icon: String,
}
