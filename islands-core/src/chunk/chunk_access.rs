//! Generation statuses and the proto/full chunk union.

use std::fmt;

use islands_utils::ChunkPos;

use crate::chunk::{level_chunk::LevelChunk, proto_chunk::ProtoChunk, section::Sections};

/// How far a chunk has progressed through generation.
///
/// Statuses are totally ordered and a chunk only ever moves forward.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChunkStatus {
    Empty,
    StructureStarts,
    StructureReferences,
    Biomes,
    Noise,
    Surface,
    Carvers,
    Features,
    InitializeLight,
    Light,
    Spawn,
    Full,
}

impl ChunkStatus {
    /// Every status, in generation order.
    pub const ALL: [Self; 12] = [
        Self::Empty,
        Self::StructureStarts,
        Self::StructureReferences,
        Self::Biomes,
        Self::Noise,
        Self::Surface,
        Self::Carvers,
        Self::Features,
        Self::InitializeLight,
        Self::Light,
        Self::Spawn,
        Self::Full,
    ];

    /// Returns true if `self` is `other` or comes after it.
    #[inline]
    #[must_use]
    pub fn is_at_least(self, other: Self) -> bool {
        self >= other
    }

    /// The registry name of the status.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "minecraft:empty",
            Self::StructureStarts => "minecraft:structure_starts",
            Self::StructureReferences => "minecraft:structure_references",
            Self::Biomes => "minecraft:biomes",
            Self::Noise => "minecraft:noise",
            Self::Surface => "minecraft:surface",
            Self::Carvers => "minecraft:carvers",
            Self::Features => "minecraft:features",
            Self::InitializeLight => "minecraft:initialize_light",
            Self::Light => "minecraft:light",
            Self::Spawn => "minecraft:spawn",
            Self::Full => "minecraft:full",
        }
    }
}

impl fmt::Display for ChunkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A chunk in either of its two forms.
#[derive(Debug)]
pub enum ChunkAccess {
    /// Still generating.
    Proto(ProtoChunk),
    /// Done generating and live in the world.
    Full(LevelChunk),
}

impl ChunkAccess {
    /// The chunk position.
    #[must_use]
    pub const fn pos(&self) -> ChunkPos {
        match self {
            Self::Proto(chunk) => chunk.pos(),
            Self::Full(chunk) => chunk.pos(),
        }
    }

    /// The last completed status.
    #[must_use]
    pub const fn status(&self) -> ChunkStatus {
        match self {
            Self::Proto(chunk) => chunk.status(),
            Self::Full(_) => ChunkStatus::Full,
        }
    }

    /// The block sections.
    #[must_use]
    pub const fn sections(&self) -> &Sections {
        match self {
            Self::Proto(chunk) => chunk.sections(),
            Self::Full(chunk) => chunk.sections(),
        }
    }

    /// The proto chunk, if the chunk is still generating.
    #[must_use]
    pub const fn as_proto(&self) -> Option<&ProtoChunk> {
        match self {
            Self::Proto(chunk) => Some(chunk),
            Self::Full(_) => None,
        }
    }

    /// Mutable access to the proto chunk, if the chunk is still generating.
    pub const fn as_proto_mut(&mut self) -> Option<&mut ProtoChunk> {
        match self {
            Self::Proto(chunk) => Some(chunk),
            Self::Full(_) => None,
        }
    }

    /// The level chunk, if generation has finished.
    #[must_use]
    pub const fn as_full(&self) -> Option<&LevelChunk> {
        match self {
            Self::Proto(_) => None,
            Self::Full(chunk) => Some(chunk),
        }
    }

    /// Mutable access to the level chunk, if generation has finished.
    pub const fn as_full_mut(&mut self) -> Option<&mut LevelChunk> {
        match self {
            Self::Proto(_) => None,
            Self::Full(chunk) => Some(chunk),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_order() {
        assert!(ChunkStatus::Spawn.is_at_least(ChunkStatus::Light));
        assert!(ChunkStatus::Light.is_at_least(ChunkStatus::Light));
        assert!(!ChunkStatus::InitializeLight.is_at_least(ChunkStatus::Light));
    }

    #[test]
    fn test_all_is_in_generation_order() {
        for (i, status) in ChunkStatus::ALL.iter().enumerate() {
            assert_eq!(*status as usize, i);
        }
        assert!(ChunkStatus::ALL.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(ChunkStatus::Light.to_string(), "minecraft:light");
    }
}
