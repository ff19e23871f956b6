//! Chunks that are still being generated.

use islands_utils::{BlockPos, BlockStateId, ChunkPos, SectionPos};
use rustc_hash::FxHashMap;

use crate::blocks;
use crate::chunk::{
    block_entity::BlockEntity,
    chunk_access::ChunkStatus,
    entity::ProtoEntity,
    heightmap::{Heightmap, HeightmapType},
    section::Sections,
};

/// A chunk moving through the generation pipeline.
///
/// Besides block data it keeps everything generation accumulates before the
/// chunk goes live: block entities, the emissive blocks the light engine
/// should seed from, heightmaps and entities placed by population.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoChunk {
    pos: ChunkPos,
    min_y: i32,
    height: i32,
    status: ChunkStatus,
    sections: Sections,
    block_entities: FxHashMap<BlockPos, BlockEntity>,
    light_sources: Vec<BlockPos>,
    heightmaps: FxHashMap<HeightmapType, Heightmap>,
    entities: Vec<ProtoEntity>,
    light_correct: bool,
}

impl ProtoChunk {
    /// Creates an empty proto chunk at `ChunkStatus::Empty`.
    #[must_use]
    pub fn new(sections: Sections, pos: ChunkPos, min_y: i32, height: i32) -> Self {
        debug_assert_eq!(sections.len() as i32 * 16, height);
        Self {
            pos,
            min_y,
            height,
            status: ChunkStatus::Empty,
            sections,
            block_entities: FxHashMap::default(),
            light_sources: Vec::new(),
            heightmaps: FxHashMap::default(),
            entities: Vec::new(),
            light_correct: false,
        }
    }

    /// The chunk position.
    #[must_use]
    pub const fn pos(&self) -> ChunkPos {
        self.pos
    }

    /// Lowest block y of the chunk.
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Height of the chunk in blocks.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// The last completed status.
    #[must_use]
    pub const fn status(&self) -> ChunkStatus {
        self.status
    }

    /// Records a completed status.
    ///
    /// # Panics
    /// Panics if `status` would move the chunk backwards.
    pub fn set_status(&mut self, status: ChunkStatus) {
        assert!(
            status.is_at_least(self.status),
            "chunk {} cannot go back from {} to {}",
            self.pos,
            self.status,
            status
        );
        self.status = status;
    }

    /// The block sections.
    #[must_use]
    pub const fn sections(&self) -> &Sections {
        &self.sections
    }

    /// Mutable access to the block sections.
    pub const fn sections_mut(&mut self) -> &mut Sections {
        &mut self.sections
    }

    fn local(&self, pos: BlockPos) -> Option<(usize, usize, usize)> {
        if pos.chunk_pos() != self.pos || pos.0.y < self.min_y || pos.0.y >= self.min_y + self.height
        {
            return None;
        }
        Some((
            SectionPos::section_relative(pos.0.x),
            (pos.0.y - self.min_y) as usize,
            SectionPos::section_relative(pos.0.z),
        ))
    }

    /// Reads a block state. Positions outside the chunk read as air.
    #[must_use]
    pub fn get_block_state(&self, pos: BlockPos) -> BlockStateId {
        self.local(pos).map_or(blocks::AIR, |(x, y, z)| {
            self.sections.get_relative_block(x, y, z)
        })
    }

    /// Writes a block state and returns the previous one.
    ///
    /// Emissive states are registered as light sources and every heightmap
    /// the chunk already has is kept up to date. Returns `None` if the
    /// position is outside the chunk.
    pub fn set_block_state(&mut self, pos: BlockPos, state: BlockStateId) -> Option<BlockStateId> {
        let (x, y, z) = self.local(pos)?;
        let old = self.sections.sections[y >> 4].set_block_state(x, y & 15, z, state);
        if old == state {
            return Some(old);
        }

        if blocks::light_emission(state) > 0 {
            self.light_sources.push(pos);
        }

        for heightmap in self.heightmaps.values_mut() {
            heightmap.update(x, pos.0.y, z, state, &self.sections);
        }

        Some(old)
    }

    /// Writes a block using chunk relative coordinates (`y` from the chunk bottom).
    pub fn set_relative_block(&mut self, x: usize, y: usize, z: usize, state: BlockStateId) {
        let pos = BlockPos::new(
            self.pos.min_block_x() + x as i32,
            self.min_y + y as i32,
            self.pos.min_block_z() + z as i32,
        );
        self.set_block_state(pos, state);
    }

    /// Positions that currently hold a block entity.
    #[must_use]
    pub fn block_entity_positions(&self) -> Vec<BlockPos> {
        self.block_entities.keys().copied().collect()
    }

    /// The block entity at a position.
    #[must_use]
    pub fn get_block_entity(&self, pos: BlockPos) -> Option<&BlockEntity> {
        self.block_entities.get(&pos)
    }

    /// Adds or replaces a block entity. Entities outside the chunk are ignored.
    pub fn set_block_entity(&mut self, block_entity: BlockEntity) {
        if self.local(block_entity.pos).is_some() {
            self.block_entities.insert(block_entity.pos, block_entity);
        }
    }

    /// Removes the block entity at a position.
    pub fn remove_block_entity(&mut self, pos: BlockPos) -> Option<BlockEntity> {
        self.block_entities.remove(&pos)
    }

    /// Number of block entities.
    #[must_use]
    pub fn block_entity_count(&self) -> usize {
        self.block_entities.len()
    }

    /// Emissive positions the light engine seeds from.
    #[must_use]
    pub fn light_sources(&self) -> &[BlockPos] {
        &self.light_sources
    }

    /// Mutable access to the light source list.
    pub const fn light_sources_mut(&mut self) -> &mut Vec<BlockPos> {
        &mut self.light_sources
    }

    /// The heightmap of a given type, if the chunk has one.
    #[must_use]
    pub fn heightmap(&self, kind: HeightmapType) -> Option<&Heightmap> {
        self.heightmaps.get(&kind)
    }

    /// Every heightmap present on the chunk.
    pub fn heightmaps(&self) -> impl Iterator<Item = (&HeightmapType, &Heightmap)> {
        self.heightmaps.iter()
    }

    /// Mutable access to every heightmap present on the chunk.
    pub fn heightmaps_mut(&mut self) -> impl Iterator<Item = (&HeightmapType, &mut Heightmap)> {
        self.heightmaps.iter_mut()
    }

    /// Creates and recomputes the given heightmaps from the block data.
    pub fn prime_heightmaps(&mut self, types: &[HeightmapType]) {
        Heightmap::prime_heightmaps(
            &mut self.heightmaps,
            types,
            &self.sections,
            self.min_y,
            self.height,
        );
    }

    /// Entities placed during generation.
    #[must_use]
    pub fn entities(&self) -> &[ProtoEntity] {
        &self.entities
    }

    /// Mutable access to the entities placed during generation.
    pub const fn entities_mut(&mut self) -> &mut Vec<ProtoEntity> {
        &mut self.entities
    }

    /// Adds an entity.
    pub fn add_entity(&mut self, entity: ProtoEntity) {
        self.entities.push(entity);
    }

    /// Whether lighting has been computed for this chunk.
    #[must_use]
    pub const fn is_light_correct(&self) -> bool {
        self.light_correct
    }

    /// Marks lighting as computed.
    pub const fn set_light_correct(&mut self, light_correct: bool) {
        self.light_correct = light_correct;
    }

    /// Splits the chunk into the parts a level chunk keeps.
    #[allow(clippy::type_complexity)]
    pub(crate) fn into_parts(
        self,
    ) -> (
        ChunkPos,
        i32,
        i32,
        Sections,
        FxHashMap<BlockPos, BlockEntity>,
        FxHashMap<HeightmapType, Heightmap>,
    ) {
        (
            self.pos,
            self.min_y,
            self.height,
            self.sections,
            self.block_entities,
            self.heightmaps,
        )
    }
}

#[cfg(test)]
mod tests {
    use islands_utils::Identifier;

    use super::*;

    fn chunk() -> ProtoChunk {
        ProtoChunk::new(Sections::empty(16), ChunkPos::new(1, -1), 0, 256)
    }

    #[test]
    fn test_set_block_outside_chunk() {
        let mut chunk = chunk();
        assert_eq!(chunk.set_block_state(BlockPos::new(0, 10, 0), blocks::STONE), None);
        assert_eq!(chunk.set_block_state(BlockPos::new(16, 300, -16), blocks::STONE), None);
        assert_eq!(
            chunk.set_block_state(BlockPos::new(16, 10, -16), blocks::STONE),
            Some(blocks::AIR)
        );
        assert_eq!(chunk.get_block_state(BlockPos::new(16, 10, -16)), blocks::STONE);
    }

    #[test]
    fn test_emissive_blocks_become_light_sources() {
        let mut chunk = chunk();
        chunk.set_block_state(BlockPos::new(17, 70, -10), blocks::GLOWSTONE);
        chunk.set_block_state(BlockPos::new(18, 70, -10), blocks::STONE);
        assert_eq!(chunk.light_sources(), &[BlockPos::new(17, 70, -10)]);
    }

    #[test]
    fn test_heightmaps_follow_writes() {
        let mut chunk = chunk();
        chunk.prime_heightmaps(&[HeightmapType::WorldSurfaceWg]);
        chunk.set_relative_block(3, 40, 4, blocks::DIRT);
        let map = chunk.heightmap(HeightmapType::WorldSurfaceWg).unwrap();
        assert_eq!(map.get_first_available(3, 4), 41);
    }

    #[test]
    fn test_block_entities() {
        let mut chunk = chunk();
        let pos = BlockPos::new(20, 64, -8);
        chunk.set_block_entity(BlockEntity::new(Identifier::vanilla_static("chest"), pos));
        chunk.set_block_entity(BlockEntity::new(
            Identifier::vanilla_static("chest"),
            BlockPos::new(0, 64, 0),
        ));
        assert_eq!(chunk.block_entity_positions(), vec![pos]);
        assert!(chunk.remove_block_entity(pos).is_some());
        assert_eq!(chunk.block_entity_count(), 0);
    }

    #[test]
    #[should_panic(expected = "cannot go back")]
    fn test_status_is_monotonic() {
        let mut chunk = chunk();
        chunk.set_status(ChunkStatus::Noise);
        chunk.set_status(ChunkStatus::Biomes);
    }
}
