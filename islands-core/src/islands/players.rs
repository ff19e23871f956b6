//! Name to uuid lookup for players known to the server.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use uuid::{Builder, Uuid};

/// Players that have joined, keyed by lowercase name.
#[derive(Debug, Default)]
pub struct PlayerDirectory {
    players: RwLock<FxHashMap<String, (Uuid, String)>>,
}

impl PlayerDirectory {
    /// An empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The uuid an offline-mode server assigns to `name`: an MD5 name uuid
    /// of `OfflinePlayer:<name>` with no namespace prefix.
    #[must_use]
    pub fn offline_uuid(name: &str) -> Uuid {
        let digest = md5::compute(format!("OfflinePlayer:{name}"));
        Builder::from_md5_bytes(digest.0).into_uuid()
    }

    /// Registers a player and returns their uuid.
    pub fn join(&self, name: &str) -> Uuid {
        let uuid = Self::offline_uuid(name);
        self.players
            .write()
            .entry(name.to_lowercase())
            .or_insert_with(|| (uuid, name.to_owned()))
            .0
    }

    /// The uuid of a known player. Names are case-insensitive.
    #[must_use]
    pub fn uuid_of(&self, name: &str) -> Option<Uuid> {
        self.players
            .read()
            .get(&name.to_lowercase())
            .map(|(uuid, _)| *uuid)
    }

    /// The name a known player joined with.
    #[must_use]
    pub fn name_of(&self, uuid: Uuid) -> Option<String> {
        self.players
            .read()
            .values()
            .find(|(known, _)| *known == uuid)
            .map(|(_, name)| name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_is_stable() {
        let players = PlayerDirectory::new();
        let uuid = players.join("Alex");
        assert_eq!(players.join("alex"), uuid);
        assert_eq!(players.uuid_of("ALEX"), Some(uuid));
        assert_eq!(players.name_of(uuid).as_deref(), Some("Alex"));
        assert_eq!(players.uuid_of("Steve"), None);
    }

    #[test]
    fn test_offline_uuid_matches_vanilla() {
        let uuid = PlayerDirectory::offline_uuid("Notch");
        assert_eq!(uuid.to_string(), "b50ad385-829d-3141-a216-7e7d7539ba7f");
        assert_eq!(uuid.get_version_num(), 3);
    }
}
