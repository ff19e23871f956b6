#![allow(missing_docs)]

use anyhow::Context;
use islands_utils::ChunkPos;

use crate::chunk::{
    chunk_access::{ChunkAccess, ChunkStatus},
    chunk_generator::ChunkGenerator,
    chunk_holder::ChunkHolder,
    generation_hooks::StageContext,
    heightmap::HeightmapType,
    proto_chunk::ProtoChunk,
    section::Sections,
    world_gen_context::WorldGenContext,
};

type StatusTask = fn(&WorldGenContext, &mut ProtoChunk) -> Result<(), anyhow::Error>;

pub struct ChunkStatusTasks;

/// All these functions are blocking.
impl ChunkStatusTasks {
    /// Advances the chunk in `holder` to `status`.
    ///
    /// `Empty` creates the proto chunk and `Full` upgrades it. Every status in
    /// between runs under the holder's write lock: registered hooks see the
    /// chunk before the task, then the task runs, then hooks see it again and
    /// the status is recorded.
    ///
    /// # Errors
    /// Returns an error if the chunk is missing, already full where a proto
    /// chunk is required, or a task fails.
    pub fn run(
        context: &WorldGenContext,
        status: ChunkStatus,
        neighbors: &[ChunkPos],
        holder: &ChunkHolder,
    ) -> Result<(), anyhow::Error> {
        if holder
            .persisted_status()
            .is_some_and(|current| current.is_at_least(status))
        {
            log::debug!("Chunk {} already at {}", holder.get_pos(), status);
            return Ok(());
        }

        match status {
            ChunkStatus::Empty => Self::empty(context, holder),
            ChunkStatus::Full => Self::full(holder),
            _ => {
                let task = Self::task_for(status)
                    .with_context(|| format!("{status} is not a proto chunk task"))?;
                holder.with_proto_mut(|chunk| {
                    let stage = StageContext {
                        target: status,
                        dimension: &context.dimension,
                        dimension_type: &context.dimension_type,
                        generator: &context.generator,
                        neighbors,
                    };
                    context.hooks.run_before(&stage, chunk);
                    task(context, chunk)?;
                    context.hooks.run_after(&stage, chunk);
                    chunk.set_status(status);
                    Ok::<(), anyhow::Error>(())
                })?
            }
        }
    }

    /// The proto chunk task of `status`. `Empty` and `Full` act on the
    /// holder instead and have none.
    fn task_for(status: ChunkStatus) -> Option<StatusTask> {
        let task: StatusTask = match status {
            ChunkStatus::StructureStarts => Self::generate_structure_starts,
            ChunkStatus::StructureReferences => Self::generate_structure_references,
            ChunkStatus::Biomes => Self::generate_biomes,
            ChunkStatus::Noise => Self::generate_noise,
            ChunkStatus::Surface => Self::generate_surface,
            ChunkStatus::Carvers => Self::generate_carvers,
            ChunkStatus::Features => Self::generate_features,
            ChunkStatus::InitializeLight => Self::initialize_light,
            ChunkStatus::Light => Self::light,
            ChunkStatus::Spawn => Self::generate_spawn,
            ChunkStatus::Empty | ChunkStatus::Full => return None,
        };
        Some(task)
    }

    pub fn empty(context: &WorldGenContext, holder: &ChunkHolder) -> Result<(), anyhow::Error> {
        let proto_chunk = ProtoChunk::new(
            Sections::empty(context.section_count()),
            holder.get_pos(),
            context.min_y(),
            context.height(),
        );

        holder.insert_chunk(ChunkAccess::Proto(proto_chunk));
        Ok(())
    }

    pub fn generate_structure_starts(
        context: &WorldGenContext,
        chunk: &mut ProtoChunk,
    ) -> Result<(), anyhow::Error> {
        context.generator.create_structures(chunk);
        Ok(())
    }

    pub fn generate_structure_references(
        _context: &WorldGenContext,
        _chunk: &mut ProtoChunk,
    ) -> Result<(), anyhow::Error> {
        Ok(())
    }

    pub fn generate_biomes(
        context: &WorldGenContext,
        chunk: &mut ProtoChunk,
    ) -> Result<(), anyhow::Error> {
        context.generator.create_biomes(chunk);
        Ok(())
    }

    pub fn generate_noise(
        context: &WorldGenContext,
        chunk: &mut ProtoChunk,
    ) -> Result<(), anyhow::Error> {
        context.generator.fill_from_noise(chunk);
        chunk.prime_heightmaps(&HeightmapType::WORLDGEN);
        Ok(())
    }

    pub fn generate_surface(
        context: &WorldGenContext,
        chunk: &mut ProtoChunk,
    ) -> Result<(), anyhow::Error> {
        context.generator.build_surface(chunk);
        Ok(())
    }

    pub fn generate_carvers(
        context: &WorldGenContext,
        chunk: &mut ProtoChunk,
    ) -> Result<(), anyhow::Error> {
        context.generator.apply_carvers(chunk);
        Ok(())
    }

    /// Decorates the chunk and computes the heightmaps kept after generation.
    pub fn generate_features(
        context: &WorldGenContext,
        chunk: &mut ProtoChunk,
    ) -> Result<(), anyhow::Error> {
        context.generator.apply_biome_decorations(chunk);
        chunk.prime_heightmaps(&HeightmapType::FINAL);
        Ok(())
    }

    pub fn initialize_light(
        _context: &WorldGenContext,
        chunk: &mut ProtoChunk,
    ) -> Result<(), anyhow::Error> {
        chunk.set_light_correct(false);
        Ok(())
    }

    /// Light propagation itself is out of scope; the stage only records that
    /// the chunk's light is settled from its current light sources.
    pub fn light(_context: &WorldGenContext, chunk: &mut ProtoChunk) -> Result<(), anyhow::Error> {
        log::trace!(
            "Lighting chunk {} from {} sources",
            chunk.pos(),
            chunk.light_sources().len()
        );
        chunk.set_light_correct(true);
        Ok(())
    }

    pub fn generate_spawn(
        context: &WorldGenContext,
        chunk: &mut ProtoChunk,
    ) -> Result<(), anyhow::Error> {
        context.generator.spawn_original_mobs(chunk);
        Ok(())
    }

    pub fn full(holder: &ChunkHolder) -> Result<(), anyhow::Error> {
        holder.upgrade_to_full()
    }
}
