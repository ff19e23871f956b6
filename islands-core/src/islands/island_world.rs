//! A loaded island world.

use anyhow::Context;
use islands_utils::{BlockPos, BlockStateId, Identifier};
use parking_lot::RwLock;

use crate::chunk::{
    block_entity::BlockEntity, chunk_access::ChunkStatus, chunk_map::ChunkMap,
    world_gen_context::WorldGenContext,
};
use crate::dimension::DimensionType;

/// One island dimension: its chunks, border and spawn point.
pub struct IslandWorld {
    seed: i64,
    border_size: u32,
    chunk_map: ChunkMap,
    spawn: RwLock<BlockPos>,
}

impl IslandWorld {
    /// Creates a world with no chunks and spawn at the origin.
    #[must_use]
    pub fn new(context: WorldGenContext, seed: i64, border_size: u32) -> Self {
        Self {
            seed,
            border_size,
            chunk_map: ChunkMap::new(context.into()),
            spawn: RwLock::new(BlockPos::ORIGIN),
        }
    }

    /// The dimension key.
    #[must_use]
    pub fn key(&self) -> &Identifier {
        &self.chunk_map.context().dimension
    }

    /// The dimension type.
    #[must_use]
    pub fn dimension_type(&self) -> &DimensionType {
        &self.chunk_map.context().dimension_type
    }

    /// The world seed.
    #[must_use]
    pub const fn seed(&self) -> i64 {
        self.seed
    }

    /// Diameter of the world border, centred on the origin.
    #[must_use]
    pub const fn border_size(&self) -> u32 {
        self.border_size
    }

    /// The chunks of this world.
    #[must_use]
    pub const fn chunk_map(&self) -> &ChunkMap {
        &self.chunk_map
    }

    /// Where players arrive.
    #[must_use]
    pub fn spawn_pos(&self) -> BlockPos {
        *self.spawn.read()
    }

    /// Moves the spawn point.
    pub fn set_spawn_pos(&self, pos: BlockPos) {
        *self.spawn.write() = pos;
    }

    /// Returns true if `pos` is inside the world border.
    #[must_use]
    pub fn is_within_border(&self, pos: BlockPos) -> bool {
        let half = f64::from(self.border_size) / 2.0;
        f64::from(pos.0.x).abs() <= half && f64::from(pos.0.z).abs() <= half
    }

    fn ensure_full(&self, pos: BlockPos) -> anyhow::Result<()> {
        let chunk_pos = pos.chunk_pos();
        if self.chunk_map.status_of(chunk_pos) != Some(ChunkStatus::Full) {
            self.chunk_map.generate_chunk(chunk_pos, ChunkStatus::Full)?;
        }
        Ok(())
    }

    /// Reads a block from a loaded full chunk.
    #[must_use]
    pub fn get_block(&self, pos: BlockPos) -> Option<BlockStateId> {
        self.chunk_map
            .with_chunk(pos.chunk_pos(), |chunk| {
                chunk.as_full().map(|full| full.get_block_state(pos))
            })
            .flatten()
    }

    /// Writes a block, generating its chunk first if needed. Returns the
    /// previous state.
    ///
    /// # Errors
    /// Returns an error if the chunk cannot be generated or `pos` is outside
    /// the world's height.
    pub fn set_block(&self, pos: BlockPos, state: BlockStateId) -> anyhow::Result<BlockStateId> {
        self.ensure_full(pos)?;
        self.chunk_map
            .with_chunk_mut(pos.chunk_pos(), |chunk| {
                chunk
                    .as_full_mut()
                    .and_then(|full| full.set_block_state(pos, state))
            })
            .flatten()
            .with_context(|| format!("cannot place block at {pos} in {}", self.key()))
    }

    /// Attaches a block entity, generating its chunk first if needed.
    ///
    /// # Errors
    /// Returns an error if the chunk cannot be generated.
    pub fn set_block_entity(&self, block_entity: BlockEntity) -> anyhow::Result<()> {
        self.ensure_full(block_entity.pos)?;
        let chunk_pos = block_entity.pos.chunk_pos();
        self.chunk_map
            .with_chunk_mut(chunk_pos, |chunk| {
                chunk
                    .as_full_mut()
                    .map(|full| full.set_block_entity(block_entity))
            })
            .flatten()
            .with_context(|| format!("chunk {chunk_pos} in {} is not loaded", self.key()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::blocks;
    use crate::chunk::{
        void_chunk_generator::VoidChunkGenerator, world_gen_context::ChunkGeneratorType,
    };
    use crate::islands::new_island_key;

    fn world() -> IslandWorld {
        IslandWorld::new(
            WorldGenContext::new(
                new_island_key(),
                DimensionType::island_overworld(),
                Arc::new(ChunkGeneratorType::Void(VoidChunkGenerator::new())),
            ),
            7,
            512,
        )
    }

    #[test]
    fn test_set_block_generates_chunk() {
        let world = world();
        let pos = BlockPos::new(-3, 64, 40);
        assert_eq!(world.get_block(pos), None);
        assert_eq!(world.set_block(pos, blocks::DIRT).unwrap(), blocks::AIR);
        assert_eq!(world.get_block(pos), Some(blocks::DIRT));
        assert_eq!(world.chunk_map().loaded_count(), 1);
    }

    #[test]
    fn test_set_block_out_of_height() {
        let world = world();
        assert!(world.set_block(BlockPos::new(0, 256, 0), blocks::DIRT).is_err());
    }

    #[test]
    fn test_border() {
        let world = world();
        assert!(world.is_within_border(BlockPos::new(256, 0, -256)));
        assert!(!world.is_within_border(BlockPos::new(257, 0, 0)));
    }
}
