//! Value types shared by the island crates.
//!
//! Everything here is plain data: identifiers, positions, block state ids and
//! the packed integer storage used by heightmaps and paletted containers.

mod bit_storage;
mod identifier;
pub mod math;
mod pos;

pub use bit_storage::{BitStorage, ceil_log2};
pub use identifier::{Identifier, IdentifierParseError};
pub use pos::{BlockPos, ChunkPos, SectionPos};

/// A block state id in the global palette. Id `0` is always air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BlockStateId(pub u16);

impl BlockStateId {
    /// The air block state.
    pub const AIR: Self = Self(0);

    /// Returns true if this is the air block state.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

impl From<BlockStateId> for u32 {
    fn from(value: BlockStateId) -> Self {
        Self::from(value.0)
    }
}
