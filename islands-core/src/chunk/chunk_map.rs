use std::sync::Arc;
use std::time::Instant;

use islands_utils::ChunkPos;
use parking_lot::RwLock;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::chunk::{
    chunk_access::{ChunkAccess, ChunkStatus},
    chunk_holder::ChunkHolder,
    chunk_status_tasks::ChunkStatusTasks,
    world_gen_context::WorldGenContext,
};

/// Radius of the neighbourhood handed to stage hooks.
const NEIGHBOR_RADIUS: i32 = 1;

/// All chunk holders of one world.
pub struct ChunkMap {
    context: Arc<WorldGenContext>,
    chunks: RwLock<FxHashMap<ChunkPos, Arc<ChunkHolder>>>,
}

impl ChunkMap {
    /// Creates an empty map generating with `context`.
    #[must_use]
    pub fn new(context: Arc<WorldGenContext>) -> Self {
        Self {
            context,
            chunks: RwLock::new(FxHashMap::default()),
        }
    }

    /// The generation context of the world.
    #[must_use]
    pub const fn context(&self) -> &Arc<WorldGenContext> {
        &self.context
    }

    /// The holder at a position, if one exists.
    #[must_use]
    pub fn get_holder(&self, pos: ChunkPos) -> Option<Arc<ChunkHolder>> {
        self.chunks.read().get(&pos).cloned()
    }

    /// The status of the chunk at a position.
    #[must_use]
    pub fn status_of(&self, pos: ChunkPos) -> Option<ChunkStatus> {
        self.get_holder(pos)?.persisted_status()
    }

    /// Number of holders in the map.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.chunks.read().len()
    }

    /// Runs `f` with shared access to the chunk at `pos`.
    pub fn with_chunk<R>(&self, pos: ChunkPos, f: impl FnOnce(&ChunkAccess) -> R) -> Option<R> {
        self.get_holder(pos)?.with_chunk(f)
    }

    /// Runs `f` with exclusive access to the chunk at `pos`.
    pub fn with_chunk_mut<R>(
        &self,
        pos: ChunkPos,
        f: impl FnOnce(&mut ChunkAccess) -> R,
    ) -> Option<R> {
        self.get_holder(pos)?.with_chunk_mut(f)
    }

    fn square(center: ChunkPos, radius: i32) -> impl Iterator<Item = ChunkPos> {
        (-radius..=radius).flat_map(move |dz| {
            (-radius..=radius).map(move |dx| ChunkPos::new(center.x() + dx, center.z() + dz))
        })
    }

    /// Counts chunks of the square around `center` that reached `status`.
    #[must_use]
    pub fn count_at_least(&self, center: ChunkPos, radius: i32, status: ChunkStatus) -> usize {
        let chunks = self.chunks.read();
        Self::square(center, radius)
            .filter(|pos| {
                chunks
                    .get(pos)
                    .and_then(|holder| holder.persisted_status())
                    .is_some_and(|current| current.is_at_least(status))
            })
            .count()
    }

    /// Brings one chunk to `target`.
    ///
    /// # Errors
    /// See [`ChunkMap::generate_area`].
    pub fn generate_chunk(&self, pos: ChunkPos, target: ChunkStatus) -> anyhow::Result<()> {
        self.generate_area(pos, 0, target)
    }

    /// Brings every chunk of the square around `center` to `target`.
    ///
    /// The whole square advances one status at a time, so when a chunk runs
    /// a stage every neighbour inside the square has finished the previous
    /// one. Chunks of the same status are processed in parallel, each under
    /// its own holder lock.
    ///
    /// # Errors
    /// Returns the first error raised by a status task.
    pub fn generate_area(
        &self,
        center: ChunkPos,
        radius: i32,
        target: ChunkStatus,
    ) -> anyhow::Result<()> {
        let start = Instant::now();
        let holders: Vec<(Arc<ChunkHolder>, Vec<ChunkPos>)> = {
            let mut chunks = self.chunks.write();
            let positions: Vec<ChunkPos> = Self::square(center, radius).collect();
            for pos in &positions {
                chunks
                    .entry(*pos)
                    .or_insert_with(|| Arc::new(ChunkHolder::new(*pos)));
            }
            positions
                .iter()
                .map(|pos| {
                    let neighbors = Self::square(*pos, NEIGHBOR_RADIUS)
                        .filter(|n| n != pos && chunks.contains_key(n))
                        .collect();
                    (Arc::clone(&chunks[pos]), neighbors)
                })
                .collect()
        };

        for status in ChunkStatus::ALL
            .into_iter()
            .take_while(|status| target.is_at_least(*status))
        {
            holders
                .par_iter()
                .filter(|(holder, _)| {
                    holder
                        .persisted_status()
                        .is_none_or(|current| !current.is_at_least(status))
                })
                .try_for_each(|(holder, neighbors)| {
                    ChunkStatusTasks::run(&self.context, status, neighbors, holder)
                })?;
        }

        log::debug!(
            "Generated {} chunks around {} in {} to {} in {:.2}ms",
            holders.len(),
            center,
            self.context.dimension,
            target,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(())
    }
}
