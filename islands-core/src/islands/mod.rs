//! Sky-island worlds: per-player dimensions, teams and the protosky pass.

use islands_utils::Identifier;
use uuid::Uuid;

pub mod command;
pub mod dimension_manager;
mod error;
pub mod island_world;
pub mod manager;
pub mod players;
pub mod protosky;
pub mod registry;
pub mod spawn_platform;

pub use error::IslandError;

/// Namespace of every island dimension.
pub const ISLAND_NAMESPACE: &str = "gpislands";

/// Suffix appended to an island's overworld path to name its nether.
pub const NETHER_SUFFIX: &str = "-nether";

/// Returns true if `dimension` belongs to an island.
#[must_use]
pub fn is_island_dimension(dimension: &Identifier) -> bool {
    dimension.is_in_namespace(ISLAND_NAMESPACE)
}

/// A fresh island overworld key, `gpislands:<uuid>`.
#[must_use]
pub fn new_island_key() -> Identifier {
    Identifier::new(ISLAND_NAMESPACE, Uuid::new_v4().to_string())
}

/// The nether paired with an island overworld.
#[must_use]
pub fn nether_key(overworld: &Identifier) -> Identifier {
    Identifier::new(
        overworld.namespace.clone(),
        format!("{}{NETHER_SUFFIX}", overworld.path),
    )
}

/// An island as seen by a player: who owns it and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Island {
    /// The owning player.
    pub owner: Uuid,
    /// The island overworld.
    pub dimension: Identifier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_island_keys() {
        let key = new_island_key();
        assert!(is_island_dimension(&key));
        assert!(key.path.parse::<Uuid>().is_ok());

        let nether = nether_key(&key);
        assert!(is_island_dimension(&nether));
        assert_eq!(nether.path, format!("{}-nether", key.path));
    }

    #[test]
    fn test_other_namespaces() {
        assert!(!is_island_dimension(&Identifier::vanilla_static("overworld")));
        assert!(!is_island_dimension(&Identifier::new_static("gpislandsx", "a")));
    }
}
