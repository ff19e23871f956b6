//! Layered terrain with a few decorations per chunk.

use islands_utils::math::Vector3;
use islands_utils::{BlockPos, BlockStateId, Identifier};

use crate::blocks;
use crate::chunk::{
    block_entity::BlockEntity, chunk_generator::ChunkGenerator, entity::ProtoEntity,
    proto_chunk::ProtoChunk,
};

/// Column where the lamp is placed.
const LAMP_COLUMN: (usize, usize) = (8, 8);
/// Column where the chest is placed.
const CHEST_COLUMN: (usize, usize) = (3, 12);

/// Fills each chunk with horizontal layers starting at the bottom of the world.
///
/// Decoration adds a glowstone lamp and a loot chest on top of the terrain,
/// and mob spawning adds a sheep, so every chunk ends up with some block
/// data, light sources, block entities and entities.
#[derive(Debug, Clone)]
pub struct FlatChunkGenerator {
    layers: Vec<BlockStateId>,
}

impl FlatChunkGenerator {
    /// One bedrock layer, three dirt layers and a grass top.
    #[must_use]
    pub fn new(bedrock: BlockStateId, dirt: BlockStateId, grass: BlockStateId) -> Self {
        Self {
            layers: vec![bedrock, dirt, dirt, dirt, grass],
        }
    }

    fn surface_pos(&self, chunk: &ProtoChunk, (x, z): (usize, usize)) -> BlockPos {
        let pos = chunk.pos();
        BlockPos::new(
            pos.min_block_x() + x as i32,
            chunk.min_y() + self.layers.len() as i32,
            pos.min_block_z() + z as i32,
        )
    }
}

impl Default for FlatChunkGenerator {
    fn default() -> Self {
        Self::new(blocks::BEDROCK, blocks::DIRT, blocks::GRASS_BLOCK)
    }
}

impl ChunkGenerator for FlatChunkGenerator {
    fn create_structures(&self, _chunk: &mut ProtoChunk) {}

    fn create_biomes(&self, _chunk: &mut ProtoChunk) {}

    fn fill_from_noise(&self, chunk: &mut ProtoChunk) {
        let max = chunk.height() as usize;
        for (y, &state) in self.layers.iter().enumerate().take(max) {
            if state.is_air() {
                continue;
            }
            for z in 0..16 {
                for x in 0..16 {
                    chunk.set_relative_block(x, y, z, state);
                }
            }
        }
    }

    fn build_surface(&self, _chunk: &mut ProtoChunk) {}

    fn apply_carvers(&self, _chunk: &mut ProtoChunk) {}

    fn apply_biome_decorations(&self, chunk: &mut ProtoChunk) {
        let lamp = self.surface_pos(chunk, LAMP_COLUMN);
        chunk.set_block_state(lamp, blocks::GLOWSTONE);

        let chest = self.surface_pos(chunk, CHEST_COLUMN);
        if chunk.set_block_state(chest, blocks::CHEST).is_some() {
            chunk.set_block_entity(
                BlockEntity::new(Identifier::vanilla_static("chest"), chest)
                    .with_loot_table(Identifier::vanilla_static("chests/village/village_plains_house")),
            );
        }
    }

    fn spawn_original_mobs(&self, chunk: &mut ProtoChunk) {
        let pos = self.surface_pos(chunk, (12, 4));
        chunk.add_entity(ProtoEntity::new(
            Identifier::vanilla_static("sheep"),
            Vector3::new(
                f64::from(pos.0.x) + 0.5,
                f64::from(pos.0.y),
                f64::from(pos.0.z) + 0.5,
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use islands_utils::ChunkPos;

    use super::*;
    use crate::chunk::section::Sections;

    fn chunk() -> ProtoChunk {
        ProtoChunk::new(Sections::empty(16), ChunkPos::new(-2, 5), 0, 256)
    }

    #[test]
    fn test_fill_layers() {
        let generator = FlatChunkGenerator::default();
        let mut chunk = chunk();
        generator.fill_from_noise(&mut chunk);
        let base = BlockPos::new(-32, 0, 80);
        assert_eq!(chunk.get_block_state(base), blocks::BEDROCK);
        assert_eq!(chunk.get_block_state(base.offset(5, 2, 5)), blocks::DIRT);
        assert_eq!(chunk.get_block_state(base.offset(15, 4, 15)), blocks::GRASS_BLOCK);
        assert_eq!(chunk.get_block_state(base.offset(0, 5, 0)), blocks::AIR);
        assert_eq!(chunk.sections().sections[0].non_air_count(), 5 * 256);
    }

    #[test]
    fn test_decorations() {
        let generator = FlatChunkGenerator::default();
        let mut chunk = chunk();
        generator.fill_from_noise(&mut chunk);
        generator.apply_biome_decorations(&mut chunk);
        generator.spawn_original_mobs(&mut chunk);

        assert_eq!(chunk.light_sources().len(), 1);
        assert_eq!(chunk.block_entity_count(), 1);
        assert_eq!(chunk.entities().len(), 1);
        assert_eq!(chunk.entities()[0].kind, Identifier::vanilla_static("sheep"));
    }
}
