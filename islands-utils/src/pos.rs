//! World, section and chunk positions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::{Vector2, Vector3};

/// The position of a chunk column. `0.y` holds the chunk z coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChunkPos(pub Vector2<i32>);

impl ChunkPos {
    /// Creates a chunk position from chunk coordinates.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self(Vector2::new(x, z))
    }

    /// The chunk x coordinate.
    #[inline]
    #[must_use]
    pub const fn x(self) -> i32 {
        self.0.x
    }

    /// The chunk z coordinate.
    #[inline]
    #[must_use]
    pub const fn z(self) -> i32 {
        self.0.y
    }

    /// The x coordinate of the first block in this chunk.
    #[must_use]
    pub const fn min_block_x(self) -> i32 {
        self.0.x << 4
    }

    /// The z coordinate of the first block in this chunk.
    #[must_use]
    pub const fn min_block_z(self) -> i32 {
        self.0.y << 4
    }

    /// Chebyshev distance between two chunk positions.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> i32 {
        (self.0.x - other.0.x).abs().max((self.0.y - other.0.y).abs())
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0.x, self.0.y)
    }
}

/// An absolute block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos(pub Vector3<i32>);

impl BlockPos {
    /// The world origin.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Creates a block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// Returns the position offset by the given amounts.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.0.x + dx, self.0.y + dy, self.0.z + dz)
    }

    /// The chunk containing this block.
    #[must_use]
    pub const fn chunk_pos(self) -> ChunkPos {
        ChunkPos::new(
            SectionPos::block_to_section_coord(self.0.x),
            SectionPos::block_to_section_coord(self.0.z),
        )
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

/// Section coordinate helpers.
pub struct SectionPos;

impl SectionPos {
    /// Converts a block coordinate to a section coordinate.
    #[inline]
    #[must_use]
    pub const fn block_to_section_coord(block: i32) -> i32 {
        block >> 4
    }

    /// Converts a block coordinate to its offset inside a section.
    #[inline]
    #[must_use]
    pub const fn section_relative(block: i32) -> usize {
        (block & 15) as usize
    }
}
