//! A generator that leaves every chunk empty.

use crate::chunk::{chunk_generator::ChunkGenerator, proto_chunk::ProtoChunk};

/// Generates nothing at all. Island worlds use it when protosky mode is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidChunkGenerator;

impl VoidChunkGenerator {
    /// Creates the generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ChunkGenerator for VoidChunkGenerator {
    fn create_structures(&self, _chunk: &mut ProtoChunk) {}

    fn create_biomes(&self, _chunk: &mut ProtoChunk) {}

    fn fill_from_noise(&self, _chunk: &mut ProtoChunk) {}

    fn build_surface(&self, _chunk: &mut ProtoChunk) {}

    fn apply_carvers(&self, _chunk: &mut ProtoChunk) {}

    fn apply_biome_decorations(&self, _chunk: &mut ProtoChunk) {}

    fn spawn_original_mobs(&self, _chunk: &mut ProtoChunk) {}
}
