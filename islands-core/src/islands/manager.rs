//! Island lifecycle and team rules.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use islands_utils::{BlockPos, Identifier};
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::chunk::{
    flat_chunk_generator::FlatChunkGenerator,
    generation_hooks::ChunkStageHook,
    void_chunk_generator::VoidChunkGenerator,
    world_gen_context::{ChunkGeneratorType, WorldGenContext},
};
use crate::config::IslandsSettings;
use crate::dimension::DimensionType;
use crate::islands::{
    Island, IslandError, ISLAND_NAMESPACE,
    dimension_manager::DimensionManager,
    island_world::IslandWorld,
    nether_key, new_island_key,
    protosky::ProtoskySanitizer,
    registry::{IslandRecord, IslandRegistry},
    spawn_platform::{PLATFORM_ORIGIN, Structure},
};

/// Creates, loads and deletes islands and enforces team rules.
///
/// Ownership and membership live in an [`IslandRegistry`] that is written
/// back to disk after every change. Pending invites are kept in memory only.
pub struct IslandManager {
    settings: Arc<IslandsSettings>,
    sanitizer: Arc<dyn ChunkStageHook>,
    dimensions: DimensionManager,
    registry: RwLock<IslandRegistry>,
    invites: Mutex<FxHashMap<Uuid, Vec<Uuid>>>,
    db_path: Option<PathBuf>,
    platform: Structure,
}

impl IslandManager {
    /// A manager over an existing registry. With no `db_path` nothing is
    /// written to disk.
    #[must_use]
    pub fn new(
        settings: Arc<IslandsSettings>,
        registry: IslandRegistry,
        db_path: Option<PathBuf>,
    ) -> Self {
        Self {
            sanitizer: Arc::new(ProtoskySanitizer::new(Arc::clone(&settings))),
            settings,
            dimensions: DimensionManager::new(),
            registry: RwLock::new(registry),
            invites: Mutex::new(FxHashMap::default()),
            db_path,
            platform: Structure::spawn_platform(),
        }
    }

    /// Opens the island database at `db_path`.
    ///
    /// # Errors
    /// Returns an error if the database exists but cannot be read.
    pub fn open(
        settings: Arc<IslandsSettings>,
        db_path: impl Into<PathBuf>,
    ) -> anyhow::Result<Self> {
        let db_path = db_path.into();
        let registry = IslandRegistry::load(&db_path)?;
        log::info!("Loaded {} islands from {}", registry.len(), db_path.display());
        Ok(Self::new(settings, registry, Some(db_path)))
    }

    /// The live configuration.
    #[must_use]
    pub const fn settings(&self) -> &Arc<IslandsSettings> {
        &self.settings
    }

    /// The loaded worlds.
    #[must_use]
    pub const fn dimensions(&self) -> &DimensionManager {
        &self.dimensions
    }

    /// Number of islands in the registry.
    #[must_use]
    pub fn island_count(&self) -> usize {
        self.registry.read().len()
    }

    fn save(&self) {
        let Some(path) = &self.db_path else {
            return;
        };
        if let Err(err) = self.registry.read().save(path) {
            log::error!("Failed to save island database: {err:#}");
        }
    }

    fn generator(&self) -> ChunkGeneratorType {
        if self.settings.snapshot().protosky_mode {
            ChunkGeneratorType::Flat(FlatChunkGenerator::default())
        } else {
            ChunkGeneratorType::Void(VoidChunkGenerator::new())
        }
    }

    fn open_world(
        &self,
        key: Identifier,
        type_path: &'static str,
        seed: i64,
    ) -> anyhow::Result<Arc<IslandWorld>> {
        let type_id = Identifier::new_static(ISLAND_NAMESPACE, type_path);
        let dimension_type: DimensionType = self
            .dimensions
            .dimension_type(&type_id)
            .cloned()
            .with_context(|| format!("unknown dimension type {type_id}"))?;
        let context = WorldGenContext::new(key, dimension_type, Arc::new(self.generator()))
            .with_hook(Arc::clone(&self.sanitizer));
        let border = self.settings.snapshot().max_island_size;
        Ok(self
            .dimensions
            .add_world(IslandWorld::new(context, seed, border)))
    }

    /// Adds the overworld and nether of an island and links them.
    fn open_worlds(&self, overworld: &Identifier, seed: i64) -> anyhow::Result<Arc<IslandWorld>> {
        let world = self.open_world(overworld.clone(), "overworld", seed)?;
        let nether = nether_key(overworld);
        self.open_world(nether.clone(), "nether", seed)?;
        self.dimensions.link_nether(overworld.clone(), nether);
        Ok(world)
    }

    fn close_worlds(&self, overworld: &Identifier) {
        self.dimensions.remove_world(&nether_key(overworld));
        self.dimensions.remove_world(overworld);
    }

    /// Loads the worlds of every island in the registry.
    ///
    /// Chunks are not saved, so each island gets its spawn platform placed
    /// again.
    ///
    /// # Errors
    /// Returns an error if a world cannot be opened or its platform cannot
    /// be placed.
    pub fn load_all(&self) -> anyhow::Result<usize> {
        let records: Vec<IslandRecord> = self.registry.read().islands().cloned().collect();
        for record in &records {
            let world = self.open_worlds(&record.dimension, record.seed)?;
            self.platform
                .place(&world, PLATFORM_ORIGIN)
                .with_context(|| format!("cannot restore the platform of {}", record.dimension))?;
            world.set_spawn_pos(
                record
                    .home
                    .unwrap_or_else(|| self.platform.home_pos(PLATFORM_ORIGIN)),
            );
        }
        Ok(records.len())
    }

    /// Returns true if `player` owns or belongs to an island.
    #[must_use]
    pub fn has_island(&self, player: Uuid) -> bool {
        self.registry.read().island_of(player).is_some()
    }

    /// Returns true if `player` owns an island.
    #[must_use]
    pub fn has_own_island(&self, player: Uuid) -> bool {
        self.registry.read().owned_by(player).is_some()
    }

    /// The island `player` owns or belongs to.
    #[must_use]
    pub fn island_of(&self, player: Uuid) -> Option<Island> {
        self.registry.read().island_of(player).map(|record| Island {
            owner: record.owner,
            dimension: record.dimension.clone(),
        })
    }

    /// The overworld of the island `player` owns or belongs to.
    #[must_use]
    pub fn world_of(&self, player: Uuid) -> Option<Arc<IslandWorld>> {
        let island = self.island_of(player)?;
        self.dimensions.get_world(&island.dimension)
    }

    /// Members of the team of `owner`.
    #[must_use]
    pub fn members_of(&self, owner: Uuid) -> Vec<Uuid> {
        self.registry.read().members_of(owner)
    }

    /// Creates an island for `player`: a new overworld and nether with a
    /// random seed and the spawn platform at the world origin.
    ///
    /// # Errors
    /// [`IslandError::AlreadyOnIsland`] if the player owns or belongs to an
    /// island, [`IslandError::Internal`] if the worlds cannot be built.
    pub fn create_island(&self, player: Uuid) -> Result<Island, IslandError> {
        if self.has_island(player) {
            return Err(IslandError::AlreadyOnIsland);
        }

        let seed = rand::random::<i64>();
        let dimension = new_island_key();
        let world = self.open_worlds(&dimension, seed)?;
        if let Err(err) = self.platform.place(&world, PLATFORM_ORIGIN) {
            self.close_worlds(&dimension);
            return Err(err.into());
        }
        world.set_spawn_pos(self.platform.home_pos(PLATFORM_ORIGIN));

        {
            let mut registry = self.registry.write();
            if registry.island_of(player).is_some() {
                drop(registry);
                self.close_worlds(&dimension);
                return Err(IslandError::AlreadyOnIsland);
            }
            registry.insert(IslandRecord {
                owner: player,
                dimension: dimension.clone(),
                seed,
                home: None,
            });
        }
        self.save();

        log::info!("Created island {dimension} for {player}");
        Ok(Island {
            owner: player,
            dimension,
        })
    }

    /// Deletes the island `player` owns and disbands its team.
    ///
    /// # Errors
    /// [`IslandError::NoIslandOwned`] if the player owns no island.
    pub fn delete_island(&self, player: Uuid) -> Result<(), IslandError> {
        let record = self
            .registry
            .write()
            .remove(player)
            .ok_or(IslandError::NoIslandOwned)?;
        self.close_worlds(&record.dimension);
        for inviters in self.invites.lock().values_mut() {
            inviters.retain(|inviter| *inviter != player);
        }
        self.save();
        log::info!("Deleted island {} of {player}", record.dimension);
        Ok(())
    }

    /// Removes `player` from the team they are on.
    ///
    /// # Errors
    /// [`IslandError::NoIsland`] if the player has no island,
    /// [`IslandError::IslandOwned`] if they own it.
    pub fn leave_island(&self, player: Uuid) -> Result<(), IslandError> {
        {
            let mut registry = self.registry.write();
            if registry.island_of(player).is_none() {
                return Err(IslandError::NoIsland);
            }
            if registry.owned_by(player).is_some() {
                return Err(IslandError::IslandOwned);
            }
            registry.leave(player);
        }
        self.save();
        Ok(())
    }

    /// Hands the island of `player` to `new_owner`. The old owner stays on
    /// the team.
    ///
    /// # Errors
    /// [`IslandError::NoIslandOwned`] if `player` owns no island,
    /// [`IslandError::AlreadyOnOtherIsland`] if `new_owner` owns one.
    pub fn transfer_island(&self, player: Uuid, new_owner: Uuid) -> Result<(), IslandError> {
        {
            let mut registry = self.registry.write();
            if registry.owned_by(player).is_none() {
                return Err(IslandError::NoIslandOwned);
            }
            if player == new_owner || registry.owned_by(new_owner).is_some() {
                return Err(IslandError::AlreadyOnOtherIsland);
            }
            registry.transfer(player, new_owner);
        }
        self.save();
        log::info!("Island of {player} transferred to {new_owner}");
        Ok(())
    }

    /// Records an invite from the island of `owner` to `target`.
    ///
    /// # Errors
    /// [`IslandError::NoIslandOwned`] if `owner` owns no island,
    /// [`IslandError::AlreadyOnOtherIsland`] if `target` has one.
    pub fn invite(&self, owner: Uuid, target: Uuid) -> Result<(), IslandError> {
        if !self.has_own_island(owner) {
            return Err(IslandError::NoIslandOwned);
        }
        if self.has_island(target) {
            return Err(IslandError::AlreadyOnOtherIsland);
        }
        let mut invites = self.invites.lock();
        let inviters = invites.entry(target).or_default();
        if !inviters.contains(&owner) {
            inviters.push(owner);
        }
        Ok(())
    }

    /// Returns true if `player` has a pending invite from `from`.
    #[must_use]
    pub fn has_invite(&self, player: Uuid, from: Uuid) -> bool {
        self.invites
            .lock()
            .get(&player)
            .is_some_and(|inviters| inviters.contains(&from))
    }

    /// Joins the team of `from`, consuming every pending invite of `player`.
    ///
    /// # Errors
    /// [`IslandError::NoInvite`] without a pending invite from an existing
    /// island, [`IslandError::AlreadyOnIsland`] if the player joined another
    /// island since, [`IslandError::IslandFull`] if the team is full.
    pub fn accept_invite(&self, player: Uuid, from: Uuid) -> Result<(), IslandError> {
        if !self.has_invite(player, from) || !self.has_own_island(from) {
            return Err(IslandError::NoInvite);
        }
        {
            let mut registry = self.registry.write();
            if registry.island_of(player).is_some() {
                return Err(IslandError::AlreadyOnIsland);
            }
            if Self::is_full(self.settings.snapshot().max_team_size, &registry, from) {
                return Err(IslandError::IslandFull);
            }
            registry.add_member(from, player);
        }
        self.invites.lock().remove(&player);
        self.save();
        Ok(())
    }

    /// Removes `target` from the team of `owner`.
    ///
    /// # Errors
    /// [`IslandError::NoIslandOwned`] if `owner` owns no island.
    pub fn remove_member(&self, owner: Uuid, target: Uuid) -> Result<bool, IslandError> {
        let removed = {
            let mut registry = self.registry.write();
            if registry.owned_by(owner).is_none() {
                return Err(IslandError::NoIslandOwned);
            }
            registry.remove_member(owner, target)
        };
        if removed {
            self.save();
        }
        Ok(removed)
    }

    fn is_full(max_team_size: u32, registry: &IslandRegistry, owner: Uuid) -> bool {
        max_team_size != 0 && registry.team_size(owner) >= max_team_size as usize
    }

    /// Returns true if the team of `owner` cannot take another member.
    #[must_use]
    pub fn team_full(&self, owner: Uuid) -> bool {
        Self::is_full(
            self.settings.snapshot().max_team_size,
            &self.registry.read(),
            owner,
        )
    }

    /// Moves the spawn point of the island `player` owns.
    ///
    /// # Errors
    /// [`IslandError::NoIslandOwned`] if the player owns no island,
    /// [`IslandError::OutsideBorder`] if `pos` is outside its world border.
    pub fn set_home(&self, player: Uuid, pos: BlockPos) -> Result<(), IslandError> {
        let dimension = self
            .registry
            .read()
            .owned_by(player)
            .map(|record| record.dimension.clone())
            .ok_or(IslandError::NoIslandOwned)?;
        let world = self.dimensions.get_world(&dimension);
        if world.as_ref().is_some_and(|world| !world.is_within_border(pos)) {
            return Err(IslandError::OutsideBorder);
        }

        self.registry
            .write()
            .owned_by_mut(player)
            .ok_or(IslandError::NoIslandOwned)?
            .home = Some(pos);
        if let Some(world) = world {
            world.set_spawn_pos(pos);
        }
        self.save();
        Ok(())
    }

    /// Where `player` is sent by `/island home`.
    ///
    /// # Errors
    /// [`IslandError::NoIsland`] if the player has no island.
    pub fn home(&self, player: Uuid) -> Result<(Identifier, BlockPos), IslandError> {
        let world = self.world_of(player).ok_or(IslandError::NoIsland)?;
        Ok((world.key().clone(), world.spawn_pos()))
    }

    /// The seed of the island `player` owns or belongs to.
    ///
    /// # Errors
    /// [`IslandError::NoIsland`] if the player has no island.
    pub fn seed(&self, player: Uuid) -> Result<i64, IslandError> {
        self.registry
            .read()
            .island_of(player)
            .map(|record| record.seed)
            .ok_or(IslandError::NoIsland)
    }
}
