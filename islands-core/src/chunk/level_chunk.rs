//! Fully generated chunks.

use islands_utils::{BlockPos, BlockStateId, ChunkPos, SectionPos};
use rustc_hash::FxHashMap;

use crate::chunk::{
    block_entity::BlockEntity,
    heightmap::{Heightmap, HeightmapType},
    proto_chunk::ProtoChunk,
    section::Sections,
};

/// A chunk that has finished generation.
///
/// Light sources and proto entities do not survive the upgrade; they only
/// matter while the chunk is generating.
#[derive(Debug, Clone)]
pub struct LevelChunk {
    pos: ChunkPos,
    min_y: i32,
    height: i32,
    sections: Sections,
    block_entities: FxHashMap<BlockPos, BlockEntity>,
    heightmaps: FxHashMap<HeightmapType, Heightmap>,
}

impl LevelChunk {
    /// Upgrades a proto chunk.
    #[must_use]
    pub fn from_proto(proto: ProtoChunk) -> Self {
        let (pos, min_y, height, sections, block_entities, heightmaps) = proto.into_parts();
        Self {
            pos,
            min_y,
            height,
            sections,
            block_entities,
            heightmaps,
        }
    }

    /// The chunk position.
    #[must_use]
    pub const fn pos(&self) -> ChunkPos {
        self.pos
    }

    /// The block sections.
    #[must_use]
    pub const fn sections(&self) -> &Sections {
        &self.sections
    }

    fn local(&self, pos: BlockPos) -> Option<(usize, usize, usize)> {
        (pos.chunk_pos() == self.pos && pos.0.y >= self.min_y && pos.0.y < self.min_y + self.height)
            .then(|| {
                (
                    SectionPos::section_relative(pos.0.x),
                    (pos.0.y - self.min_y) as usize,
                    SectionPos::section_relative(pos.0.z),
                )
            })
    }

    /// Reads a block state. Positions outside the chunk read as air.
    #[must_use]
    pub fn get_block_state(&self, pos: BlockPos) -> BlockStateId {
        self.local(pos).map_or(BlockStateId::AIR, |(x, y, z)| {
            self.sections.get_relative_block(x, y, z)
        })
    }

    /// Writes a block state, keeping heightmaps current. Returns the old state,
    /// or `None` if the position is outside the chunk.
    pub fn set_block_state(&mut self, pos: BlockPos, state: BlockStateId) -> Option<BlockStateId> {
        let (x, y, z) = self.local(pos)?;
        let old = self.sections.sections[y >> 4].set_block_state(x, y & 15, z, state);
        if old != state {
            for heightmap in self.heightmaps.values_mut() {
                heightmap.update(x, pos.0.y, z, state, &self.sections);
            }
        }
        Some(old)
    }

    /// The block entity at a position.
    #[must_use]
    pub fn get_block_entity(&self, pos: BlockPos) -> Option<&BlockEntity> {
        self.block_entities.get(&pos)
    }

    /// Adds or replaces a block entity inside this chunk.
    pub fn set_block_entity(&mut self, block_entity: BlockEntity) {
        if self.local(block_entity.pos).is_some() {
            self.block_entities.insert(block_entity.pos, block_entity);
        }
    }

    /// Number of block entities.
    #[must_use]
    pub fn block_entity_count(&self) -> usize {
        self.block_entities.len()
    }

    /// The heightmap of a given type, if present.
    #[must_use]
    pub fn heightmap(&self, kind: HeightmapType) -> Option<&Heightmap> {
        self.heightmaps.get(&kind)
    }
}
