//! Runtime registry of island worlds and the dimension types they use.

use std::sync::Arc;

use islands_utils::Identifier;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::dimension::DimensionType;
use crate::islands::island_world::IslandWorld;

/// Adds, removes and links island worlds while the server runs.
pub struct DimensionManager {
    dimension_types: FxHashMap<Identifier, DimensionType>,
    worlds: RwLock<FxHashMap<Identifier, Arc<IslandWorld>>>,
    nether_links: RwLock<FxHashMap<Identifier, Identifier>>,
}

impl DimensionManager {
    /// A manager knowing the island overworld and nether types.
    #[must_use]
    pub fn new() -> Self {
        let mut manager = Self {
            dimension_types: FxHashMap::default(),
            worlds: RwLock::new(FxHashMap::default()),
            nether_links: RwLock::new(FxHashMap::default()),
        };
        manager.add_dimension_type(DimensionType::island_overworld());
        manager.add_dimension_type(DimensionType::island_nether());
        manager
    }

    /// Registers a dimension type under its id.
    pub fn add_dimension_type(&mut self, dimension_type: DimensionType) {
        self.dimension_types
            .insert(dimension_type.id.clone(), dimension_type);
    }

    /// A registered dimension type.
    #[must_use]
    pub fn dimension_type(&self, id: &Identifier) -> Option<&DimensionType> {
        self.dimension_types.get(id)
    }

    /// Adds a world under its key, replacing any world with the same key.
    pub fn add_world(&self, world: IslandWorld) -> Arc<IslandWorld> {
        let world = Arc::new(world);
        let key = world.key().clone();
        if self
            .worlds
            .write()
            .insert(key.clone(), Arc::clone(&world))
            .is_some()
        {
            log::warn!("Replaced already loaded world {key}");
        }
        log::info!("Added world {key}");
        world
    }

    /// The world with this key.
    #[must_use]
    pub fn get_world(&self, key: &Identifier) -> Option<Arc<IslandWorld>> {
        self.worlds.read().get(key).cloned()
    }

    /// Unloads a world and drops any nether link it takes part in.
    pub fn remove_world(&self, key: &Identifier) -> Option<Arc<IslandWorld>> {
        let removed = self.worlds.write().remove(key)?;
        self.nether_links
            .write()
            .retain(|overworld, nether| overworld != key && nether != key);
        log::info!("Removed world {key}");
        Some(removed)
    }

    /// Sends portals in `overworld` to `nether` and back.
    pub fn link_nether(&self, overworld: Identifier, nether: Identifier) {
        self.nether_links.write().insert(overworld, nether);
    }

    /// The nether linked to an overworld.
    #[must_use]
    pub fn nether_of(&self, overworld: &Identifier) -> Option<Identifier> {
        self.nether_links.read().get(overworld).cloned()
    }

    /// The overworld a nether is linked to.
    #[must_use]
    pub fn overworld_of(&self, nether: &Identifier) -> Option<Identifier> {
        self.nether_links
            .read()
            .iter()
            .find(|(_, linked)| *linked == nether)
            .map(|(overworld, _)| overworld.clone())
    }

    /// Number of loaded worlds.
    #[must_use]
    pub fn world_count(&self) -> usize {
        self.worlds.read().len()
    }

    /// Keys of every loaded world.
    #[must_use]
    pub fn world_keys(&self) -> Vec<Identifier> {
        let mut keys: Vec<Identifier> = self.worlds.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for DimensionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{
        void_chunk_generator::VoidChunkGenerator,
        world_gen_context::{ChunkGeneratorType, WorldGenContext},
    };
    use crate::islands::{ISLAND_NAMESPACE, nether_key, new_island_key};

    fn world(key: Identifier, dimension_type: DimensionType) -> IslandWorld {
        IslandWorld::new(
            WorldGenContext::new(
                key,
                dimension_type,
                Arc::new(ChunkGeneratorType::Void(VoidChunkGenerator::new())),
            ),
            0,
            512,
        )
    }

    #[test]
    fn test_island_types_registered() {
        let manager = DimensionManager::new();
        let nether = manager
            .dimension_type(&Identifier::new_static(ISLAND_NAMESPACE, "nether"))
            .unwrap();
        assert_eq!(nether.logical_height, 128);
        assert_eq!(nether.fixed_time, Some(18000));
    }

    #[test]
    fn test_link_and_remove() {
        let manager = DimensionManager::new();
        let overworld = new_island_key();
        let nether = nether_key(&overworld);
        manager.add_world(world(overworld.clone(), DimensionType::island_overworld()));
        manager.add_world(world(nether.clone(), DimensionType::island_nether()));
        manager.link_nether(overworld.clone(), nether.clone());

        assert_eq!(manager.nether_of(&overworld), Some(nether.clone()));
        assert_eq!(manager.overworld_of(&nether), Some(overworld.clone()));
        assert_eq!(manager.world_count(), 2);

        assert!(manager.remove_world(&overworld).is_some());
        assert!(manager.nether_of(&overworld).is_none());
        assert!(manager.remove_world(&overworld).is_none());
        assert_eq!(manager.world_keys(), vec![nether]);
    }
}
