//! Persistent island ownership and team membership.

use std::fs;
use std::path::Path;

use anyhow::Context;
use islands_utils::{BlockPos, Identifier};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One island owned by one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IslandRecord {
    /// The owning player.
    pub owner: Uuid,
    /// The island overworld key. The nether key is derived from it.
    pub dimension: Identifier,
    /// World seed of both island worlds.
    pub seed: i64,
    /// Home set by the owner, if it differs from the platform.
    #[serde(default)]
    pub home: Option<BlockPos>,
}

/// Every island and team, keyed by player.
///
/// A player owns at most one island and belongs to at most one team; team
/// membership is stored as member to owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandRegistry {
    islands: FxHashMap<Uuid, IslandRecord>,
    teams: FxHashMap<Uuid, Uuid>,
}

impl IslandRegistry {
    /// Reads the registry file. A missing file is an empty registry.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("invalid island database {}", path.display()))
    }

    /// Writes the registry, replacing the file atomically.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))
    }

    /// Number of islands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.islands.len()
    }

    /// Returns true if there are no islands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.islands.is_empty()
    }

    /// Every island.
    pub fn islands(&self) -> impl Iterator<Item = &IslandRecord> {
        self.islands.values()
    }

    /// The island `owner` owns.
    #[must_use]
    pub fn owned_by(&self, owner: Uuid) -> Option<&IslandRecord> {
        self.islands.get(&owner)
    }

    /// The island `owner` owns, mutably.
    pub fn owned_by_mut(&mut self, owner: Uuid) -> Option<&mut IslandRecord> {
        self.islands.get_mut(&owner)
    }

    /// The island `player` owns or, failing that, the one whose team they are on.
    #[must_use]
    pub fn island_of(&self, player: Uuid) -> Option<&IslandRecord> {
        self.owned_by(player).or_else(|| {
            self.teams
                .get(&player)
                .and_then(|owner| self.owned_by(*owner))
        })
    }

    /// Records a new island.
    pub fn insert(&mut self, record: IslandRecord) {
        self.islands.insert(record.owner, record);
    }

    /// Removes the island of `owner` and disbands its team.
    pub fn remove(&mut self, owner: Uuid) -> Option<IslandRecord> {
        let record = self.islands.remove(&owner)?;
        self.teams.retain(|_, team_owner| *team_owner != owner);
        Some(record)
    }

    /// Removes `player` from whatever team they are on.
    pub fn leave(&mut self, player: Uuid) -> bool {
        self.teams.remove(&player).is_some()
    }

    /// Hands the island of `owner` to `new_owner`.
    ///
    /// The team follows the island, `new_owner` stops being a member and the
    /// previous owner joins the team.
    pub fn transfer(&mut self, owner: Uuid, new_owner: Uuid) -> bool {
        if owner == new_owner {
            return false;
        }
        let Some(mut record) = self.islands.remove(&owner) else {
            return false;
        };
        record.owner = new_owner;
        self.islands.insert(new_owner, record);

        self.teams.remove(&new_owner);
        for team_owner in self.teams.values_mut() {
            if *team_owner == owner {
                *team_owner = new_owner;
            }
        }
        self.teams.insert(owner, new_owner);
        true
    }

    /// Adds `player` to the team of `owner`.
    pub fn add_member(&mut self, owner: Uuid, player: Uuid) {
        self.teams.insert(player, owner);
    }

    /// Removes `target` from the team of `owner`. Members of other teams are
    /// left alone.
    pub fn remove_member(&mut self, owner: Uuid, target: Uuid) -> bool {
        if self.teams.get(&target) == Some(&owner) {
            self.teams.remove(&target);
            true
        } else {
            false
        }
    }

    /// Members of the team of `owner`, not counting the owner.
    #[must_use]
    pub fn members_of(&self, owner: Uuid) -> Vec<Uuid> {
        let mut members: Vec<Uuid> = self
            .teams
            .iter()
            .filter(|(_, team_owner)| **team_owner == owner)
            .map(|(member, _)| *member)
            .collect();
        members.sort_unstable();
        members
    }

    /// Size of the team of `owner`, not counting the owner.
    #[must_use]
    pub fn team_size(&self, owner: Uuid) -> usize {
        self.teams.values().filter(|team_owner| **team_owner == owner).count()
    }
}
