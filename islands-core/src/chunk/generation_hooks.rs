//! Extension points around generation stages.
//!
//! The pipeline calls every registered hook right before a status task runs
//! and again right after it finishes. Hooks get the chunk mutably and the
//! rest of the stage as read-only context.

use std::fmt;
use std::sync::Arc;

use islands_utils::{ChunkPos, Identifier};

use crate::chunk::{
    chunk_access::ChunkStatus, proto_chunk::ProtoChunk, world_gen_context::ChunkGeneratorType,
};
use crate::dimension::DimensionType;

/// What a hook can see about the stage it runs in.
pub struct StageContext<'a> {
    /// The status the stage produces.
    pub target: ChunkStatus,
    /// The world the chunk belongs to.
    pub dimension: &'a Identifier,
    /// Vertical layout of that world.
    pub dimension_type: &'a DimensionType,
    /// The world's generator.
    pub generator: &'a ChunkGeneratorType,
    /// Positions of the neighbouring chunks the stage may read.
    pub neighbors: &'a [ChunkPos],
}

/// A callback run around status tasks.
///
/// Both methods default to doing nothing, so a hook only implements the side
/// it cares about. Hooks must not block: they run on generation workers.
pub trait ChunkStageHook: Send + Sync {
    /// Called before the task producing `context.target` runs.
    fn before_stage(&self, _context: &StageContext<'_>, _chunk: &mut ProtoChunk) {}

    /// Called after the task producing `context.target` has run.
    fn after_stage(&self, _context: &StageContext<'_>, _chunk: &mut ProtoChunk) {}
}

/// The ordered list of hooks a world runs.
#[derive(Clone, Default)]
pub struct GenerationHooks {
    hooks: Vec<Arc<dyn ChunkStageHook>>,
}

impl GenerationHooks {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a hook. Hooks run in registration order.
    pub fn register(&mut self, hook: Arc<dyn ChunkStageHook>) {
        self.hooks.push(hook);
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if no hook is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Runs every `before_stage` callback.
    pub fn run_before(&self, context: &StageContext<'_>, chunk: &mut ProtoChunk) {
        for hook in &self.hooks {
            hook.before_stage(context, chunk);
        }
    }

    /// Runs every `after_stage` callback.
    pub fn run_after(&self, context: &StageContext<'_>, chunk: &mut ProtoChunk) {
        for hook in &self.hooks {
            hook.after_stage(context, chunk);
        }
    }
}

impl fmt::Debug for GenerationHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationHooks")
            .field("len", &self.hooks.len())
            .finish()
    }
}
