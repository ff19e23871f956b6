//! Owner of one chunk slot in the chunk map.

use anyhow::{Context, anyhow};
use islands_utils::ChunkPos;
use parking_lot::RwLock;

use crate::chunk::{
    chunk_access::{ChunkAccess, ChunkStatus},
    level_chunk::LevelChunk,
    proto_chunk::ProtoChunk,
};

/// Holds the chunk at one position while it generates and after.
///
/// Stage code never gets a bare `&mut` to the chunk: mutable access is only
/// handed out for the duration of a closure while the write lock is held,
/// so two workers can never mutate the same chunk at once.
#[derive(Debug)]
pub struct ChunkHolder {
    pos: ChunkPos,
    chunk: RwLock<Option<ChunkAccess>>,
}

impl ChunkHolder {
    /// Creates an empty holder.
    #[must_use]
    pub const fn new(pos: ChunkPos) -> Self {
        Self {
            pos,
            chunk: RwLock::new(None),
        }
    }

    /// The position this holder is responsible for.
    #[must_use]
    pub const fn get_pos(&self) -> ChunkPos {
        self.pos
    }

    /// Stores a chunk, replacing whatever was there.
    pub fn insert_chunk(&self, chunk: ChunkAccess) {
        debug_assert_eq!(chunk.pos(), self.pos);
        *self.chunk.write() = Some(chunk);
    }

    /// The status of the stored chunk, or `None` if nothing is stored yet.
    #[must_use]
    pub fn persisted_status(&self) -> Option<ChunkStatus> {
        self.chunk.read().as_ref().map(ChunkAccess::status)
    }

    /// Runs `f` with shared access to the chunk.
    pub fn with_chunk<R>(&self, f: impl FnOnce(&ChunkAccess) -> R) -> Option<R> {
        self.chunk.read().as_ref().map(f)
    }

    /// Runs `f` with exclusive access to the chunk.
    pub fn with_chunk_mut<R>(&self, f: impl FnOnce(&mut ChunkAccess) -> R) -> Option<R> {
        self.chunk.write().as_mut().map(f)
    }

    /// Runs `f` with exclusive access to the proto chunk.
    ///
    /// # Errors
    /// Returns an error if no chunk is stored or it has already been upgraded.
    pub fn with_proto_mut<R>(&self, f: impl FnOnce(&mut ProtoChunk) -> R) -> anyhow::Result<R> {
        let mut guard = self.chunk.write();
        let chunk = guard
            .as_mut()
            .with_context(|| format!("no chunk stored at {}", self.pos))?;
        let proto = chunk
            .as_proto_mut()
            .ok_or_else(|| anyhow!("chunk at {} is already full", self.pos))?;
        Ok(f(proto))
    }

    /// Turns the stored proto chunk into a level chunk.
    ///
    /// # Errors
    /// Returns an error if no chunk is stored or it is already full.
    pub fn upgrade_to_full(&self) -> anyhow::Result<()> {
        let mut guard = self.chunk.write();
        match guard.take() {
            Some(ChunkAccess::Proto(proto)) => {
                *guard = Some(ChunkAccess::Full(LevelChunk::from_proto(proto)));
                Ok(())
            }
            Some(full @ ChunkAccess::Full(_)) => {
                *guard = Some(full);
                Err(anyhow!("chunk at {} is already full", self.pos))
            }
            None => Err(anyhow!("no chunk stored at {}", self.pos)),
        }
    }
}
