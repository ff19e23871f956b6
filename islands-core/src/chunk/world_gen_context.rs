//! This module contains the `WorldGenContext` struct, which is used to provide context for chunk generation.

use std::sync::Arc;

use enum_dispatch::enum_dispatch;
use islands_utils::Identifier;

use crate::chunk::{
    chunk_generator::ChunkGenerator,
    flat_chunk_generator::FlatChunkGenerator,
    generation_hooks::{ChunkStageHook, GenerationHooks},
    proto_chunk::ProtoChunk,
    void_chunk_generator::VoidChunkGenerator,
};
use crate::dimension::DimensionType;

#[allow(missing_docs)]
#[enum_dispatch(ChunkGenerator)]
#[derive(Debug, Clone)]
pub enum ChunkGeneratorType {
    Flat(FlatChunkGenerator),
    Void(VoidChunkGenerator),
}

/// Context for world generation.
#[derive(Debug)]
pub struct WorldGenContext {
    /// The world being generated.
    pub dimension: Identifier,
    /// Vertical layout of the world.
    pub dimension_type: DimensionType,
    /// The chunk generator to use.
    pub generator: Arc<ChunkGeneratorType>,
    /// Callbacks run around every status task.
    pub hooks: GenerationHooks,
}

impl WorldGenContext {
    /// Creates a context with no hooks.
    #[must_use]
    pub fn new(
        dimension: Identifier,
        dimension_type: DimensionType,
        generator: Arc<ChunkGeneratorType>,
    ) -> Self {
        Self {
            dimension,
            dimension_type,
            generator,
            hooks: GenerationHooks::new(),
        }
    }

    /// Registers a stage hook.
    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn ChunkStageHook>) -> Self {
        self.hooks.register(hook);
        self
    }

    /// Lowest block y.
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.dimension_type.min_y
    }

    /// World height in blocks.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.dimension_type.height
    }

    /// Sections per chunk.
    #[must_use]
    pub const fn section_count(&self) -> usize {
        self.dimension_type.section_count()
    }
}
