//! Protosky mode: island chunks are generated like normal terrain and then
//! emptied, so the worlds keep their biomes and structure layout while the
//! player starts on a single platform in the void.
//!
//! The pass has two halves. Right before the light stage the chunk loses its
//! blocks, block entities, light sources and heightmap contents. After mob
//! spawning its entities are dropped. Only the chunk being generated is
//! touched; neighbouring chunks are never read or written.

use std::sync::Arc;

use islands_utils::{BitStorage, Identifier};

use crate::chunk::{
    chunk_access::ChunkStatus,
    generation_hooks::{ChunkStageHook, StageContext},
    heightmap::COLUMN_COUNT,
    proto_chunk::ProtoChunk,
};
use crate::config::IslandsSettings;
use crate::islands::ISLAND_NAMESPACE;

/// Empties island chunks during generation when protosky mode is on.
#[derive(Debug)]
pub struct ProtoskySanitizer {
    namespace: &'static str,
    settings: Arc<IslandsSettings>,
}

impl ProtoskySanitizer {
    /// A sanitizer for the island namespace reading `settings` on every chunk.
    #[must_use]
    pub fn new(settings: Arc<IslandsSettings>) -> Self {
        Self::for_namespace(ISLAND_NAMESPACE, settings)
    }

    /// A sanitizer acting on another namespace.
    #[must_use]
    pub fn for_namespace(namespace: &'static str, settings: Arc<IslandsSettings>) -> Self {
        Self {
            namespace,
            settings,
        }
    }

    fn applies_to(&self, dimension: &Identifier) -> bool {
        dimension.is_in_namespace(self.namespace)
    }

    /// Empties the chunk before it is lit.
    ///
    /// Runs only if protosky mode is on, the chunk belongs to an island
    /// dimension and it has not already reached `target`. Every section is
    /// replaced by an empty one, every block entity and light source is
    /// dropped and every heightmap is zeroed at its own bit width. Returns
    /// whether the chunk was stripped.
    pub fn strip_before_light(
        &self,
        dimension: &Identifier,
        target: ChunkStatus,
        chunk: &mut ProtoChunk,
    ) -> bool {
        if !self.settings.snapshot().protosky_mode
            || !self.applies_to(dimension)
            || chunk.status().is_at_least(target)
        {
            return false;
        }

        chunk.sections_mut().clear();

        for pos in chunk.block_entity_positions() {
            chunk.remove_block_entity(pos);
        }

        chunk.light_sources_mut().clear();

        for (_, heightmap) in chunk.heightmaps_mut() {
            heightmap.set_storage(BitStorage::new(heightmap.bits(), COLUMN_COUNT));
        }

        log::debug!("Stripped chunk {} in {dimension}", chunk.pos());
        true
    }

    /// Drops every entity spawned into the chunk. Only the dimension is
    /// checked; protosky mode does not matter here.
    pub fn clear_after_population(&self, dimension: &Identifier, chunk: &mut ProtoChunk) -> bool {
        if !self.applies_to(dimension) {
            return false;
        }

        let removed = chunk.entities().len();
        chunk.entities_mut().clear();
        if removed > 0 {
            log::debug!(
                "Cleared {removed} entities from chunk {} in {dimension}",
                chunk.pos()
            );
        }
        true
    }
}

impl ChunkStageHook for ProtoskySanitizer {
    fn before_stage(&self, context: &StageContext<'_>, chunk: &mut ProtoChunk) {
        if context.target == ChunkStatus::Light {
            self.strip_before_light(context.dimension, context.target, chunk);
        }
    }

    fn after_stage(&self, context: &StageContext<'_>, chunk: &mut ProtoChunk) {
        if context.target == ChunkStatus::Spawn {
            self.clear_after_population(context.dimension, chunk);
        }
    }
}

#[cfg(test)]
mod tests {
    use islands_utils::{BlockPos, ChunkPos};

    use super::*;
    use crate::blocks;
    use crate::chunk::{
        block_entity::BlockEntity, entity::ProtoEntity, heightmap::HeightmapType,
        section::Sections,
    };
    use crate::config::IslandsConfig;

    fn settings(protosky_mode: bool) -> Arc<IslandsSettings> {
        Arc::new(IslandsSettings::in_memory(IslandsConfig {
            protosky_mode,
            ..IslandsConfig::default()
        }))
    }

    fn island() -> Identifier {
        Identifier::new_static(ISLAND_NAMESPACE, "0f8e2a8c-6d1e-4f43-9a8f-2d7b9c1e5a10")
    }

    /// A chunk at `Features` with blocks, a lamp, a chest, heightmaps and a mob.
    fn populated_chunk() -> ProtoChunk {
        let mut chunk = ProtoChunk::new(Sections::empty(16), ChunkPos::new(1, -1), 0, 256);
        for x in 0..16 {
            for z in 0..16 {
                chunk.set_relative_block(x, 0, z, blocks::STONE);
            }
        }
        let lamp = BlockPos::new(20, 1, -10);
        chunk.set_block_state(lamp, blocks::GLOWSTONE);
        let chest = BlockPos::new(18, 1, -12);
        chunk.set_block_state(chest, blocks::CHEST);
        chunk.set_block_entity(BlockEntity::new(Identifier::vanilla_static("chest"), chest));
        chunk.prime_heightmaps(&HeightmapType::FINAL);
        chunk.add_entity(ProtoEntity::new(
            Identifier::vanilla_static("cow"),
            islands_utils::math::Vector3::new(20.5, 1.0, -9.5),
        ));
        chunk.set_status(ChunkStatus::Features);
        chunk
    }

    fn assert_stripped(chunk: &ProtoChunk) {
        assert_eq!(chunk.sections().non_empty_count(), 0);
        assert_eq!(chunk.block_entity_count(), 0);
        assert!(chunk.light_sources().is_empty());
        let zero = BitStorage::new(9, COLUMN_COUNT);
        for (_, heightmap) in chunk.heightmaps() {
            assert_eq!(heightmap.storage(), &zero);
        }
    }

    #[test]
    fn test_strip_in_island_dimension() {
        let sanitizer = ProtoskySanitizer::new(settings(true));
        let mut chunk = populated_chunk();
        assert!(sanitizer.strip_before_light(&island(), ChunkStatus::Light, &mut chunk));
        assert_stripped(&chunk);
        assert_eq!(chunk.heightmaps().count(), HeightmapType::FINAL.len());
        assert_eq!(chunk.entities().len(), 1);
    }

    #[test]
    fn test_other_dimension_is_untouched() {
        for protosky_mode in [true, false] {
            let sanitizer = ProtoskySanitizer::new(settings(protosky_mode));
            let mut chunk = populated_chunk();
            let before = chunk.clone();
            let overworld = Identifier::vanilla_static("overworld");
            assert!(!sanitizer.strip_before_light(&overworld, ChunkStatus::Light, &mut chunk));
            assert!(!sanitizer.clear_after_population(&overworld, &mut chunk));
            assert_eq!(chunk, before);
        }
    }

    #[test]
    fn test_chunk_past_target_is_untouched() {
        let sanitizer = ProtoskySanitizer::new(settings(true));
        let mut chunk = populated_chunk();
        chunk.set_status(ChunkStatus::InitializeLight);
        chunk.set_status(ChunkStatus::Light);
        chunk.set_light_correct(true);
        let before = chunk.clone();
        assert!(!sanitizer.strip_before_light(&island(), ChunkStatus::Light, &mut chunk));
        assert_eq!(chunk, before);

        chunk.set_status(ChunkStatus::Spawn);
        let before = chunk.clone();
        assert!(!sanitizer.strip_before_light(&island(), ChunkStatus::Light, &mut chunk));
        assert_eq!(chunk, before);
    }

    #[test]
    fn test_entities_cleared_regardless_of_mode() {
        for protosky_mode in [true, false] {
            let sanitizer = ProtoskySanitizer::new(settings(protosky_mode));
            let mut chunk = populated_chunk();
            assert!(sanitizer.clear_after_population(&island(), &mut chunk));
            assert!(chunk.entities().is_empty());
        }
    }

    #[test]
    fn test_mode_off_only_clears_entities() {
        let sanitizer = ProtoskySanitizer::new(settings(false));
        let mut chunk = populated_chunk();
        let before = chunk.clone();
        assert!(!sanitizer.strip_before_light(&island(), ChunkStatus::Light, &mut chunk));
        assert_eq!(chunk, before);

        assert!(sanitizer.clear_after_population(&island(), &mut chunk));
        assert!(chunk.entities().is_empty());
        chunk.entities_mut().extend(before.entities().iter().cloned());
        assert_eq!(chunk, before);
    }

    #[test]
    fn test_reload_is_seen_by_next_chunk() {
        let settings = settings(false);
        let sanitizer = ProtoskySanitizer::new(Arc::clone(&settings));
        let mut first = populated_chunk();
        assert!(!sanitizer.strip_before_light(&island(), ChunkStatus::Light, &mut first));

        settings.replace(IslandsConfig {
            protosky_mode: true,
            ..IslandsConfig::default()
        });
        let mut second = populated_chunk();
        assert!(sanitizer.strip_before_light(&island(), ChunkStatus::Light, &mut second));
        assert_stripped(&second);
    }

    #[test]
    fn test_hook_only_acts_on_its_stages() {
        use crate::chunk::{
            void_chunk_generator::VoidChunkGenerator, world_gen_context::ChunkGeneratorType,
        };
        use crate::dimension::DimensionType;

        let sanitizer = ProtoskySanitizer::new(settings(true));
        let (dimension, dimension_type, generator) = (
            &island(),
            &DimensionType::island_overworld(),
            &ChunkGeneratorType::Void(VoidChunkGenerator::new()),
        );
        let stage = move |target| StageContext {
            target,
            dimension,
            dimension_type,
            generator,
            neighbors: &[],
        };

        let mut chunk = populated_chunk();
        sanitizer.before_stage(&stage(ChunkStatus::InitializeLight), &mut chunk);
        sanitizer.after_stage(&stage(ChunkStatus::Light), &mut chunk);
        assert_eq!(chunk.sections().non_empty_count(), 1);
        assert_eq!(chunk.entities().len(), 1);

        sanitizer.before_stage(&stage(ChunkStatus::Light), &mut chunk);
        assert_stripped(&chunk);
        sanitizer.after_stage(&stage(ChunkStatus::Spawn), &mut chunk);
        assert!(chunk.entities().is_empty());
    }
}
