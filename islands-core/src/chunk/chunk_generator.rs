//! The generator interface the status tasks drive.

use enum_dispatch::enum_dispatch;

use crate::chunk::proto_chunk::ProtoChunk;

/// Produces the contents of a chunk, one generation step at a time.
///
/// Every method is called exactly once per chunk, from the status task of
/// the same name, while the caller holds exclusive access to the chunk.
#[enum_dispatch]
pub trait ChunkGenerator: Send + Sync {
    /// Places structure starts.
    fn create_structures(&self, chunk: &mut ProtoChunk);

    /// Fills in biomes.
    fn create_biomes(&self, chunk: &mut ProtoChunk);

    /// Fills the base terrain.
    fn fill_from_noise(&self, chunk: &mut ProtoChunk);

    /// Replaces the top layers with biome surface blocks.
    fn build_surface(&self, chunk: &mut ProtoChunk);

    /// Carves caves and ravines.
    fn apply_carvers(&self, chunk: &mut ProtoChunk);

    /// Places features: ores, plants, containers, light fixtures.
    fn apply_biome_decorations(&self, chunk: &mut ProtoChunk);

    /// Spawns the initial mobs of the chunk.
    fn spawn_original_mobs(&self, chunk: &mut ProtoChunk);
}
