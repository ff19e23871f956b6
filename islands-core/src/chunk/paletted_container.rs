//! Paletted block storage for a single chunk section.

use islands_utils::{BitStorage, BlockStateId, ceil_log2};

/// Number of blocks along one edge of a section.
pub const SECTION_WIDTH: usize = 16;
/// Number of blocks in a section.
pub const SECTION_VOLUME: usize = SECTION_WIDTH * SECTION_WIDTH * SECTION_WIDTH;

/// Smallest bit width used once a section holds more than one state.
const MIN_INDIRECT_BITS: u32 = 4;

/// Block states of one 16×16×16 section.
///
/// A section that holds a single state stores no array at all. Writing a
/// second state switches to an indirect palette over a [`BitStorage`],
/// growing the bit width whenever the palette outgrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PalettedContainer {
    /// Every block has the same state.
    Single(BlockStateId),
    /// Local palette plus packed palette indices.
    Indirect {
        /// Palette entries, indexed by the values in `storage`.
        palette: Vec<BlockStateId>,
        /// One palette index per block.
        storage: BitStorage,
    },
}

impl PalettedContainer {
    #[inline]
    fn index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < SECTION_WIDTH && y < SECTION_WIDTH && z < SECTION_WIDTH);
        (y << 8) | (z << 4) | x
    }

    /// Reads the state at section relative coordinates.
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockStateId {
        match self {
            Self::Single(state) => *state,
            Self::Indirect { palette, storage } => {
                palette[storage.get(Self::index(x, y, z)) as usize]
            }
        }
    }

    /// Writes the state at section relative coordinates and returns the old one.
    pub fn set(&mut self, x: usize, y: usize, z: usize, state: BlockStateId) -> BlockStateId {
        let index = Self::index(x, y, z);
        match self {
            Self::Single(current) if *current == state => state,
            Self::Single(current) => {
                let old = *current;
                let mut storage = BitStorage::new(MIN_INDIRECT_BITS, SECTION_VOLUME);
                storage.set(index, 1);
                *self = Self::Indirect {
                    palette: vec![old, state],
                    storage,
                };
                old
            }
            Self::Indirect { palette, storage } => {
                let id = if let Some(id) = palette.iter().position(|s| *s == state) {
                    id
                } else {
                    palette.push(state);
                    let needed = ceil_log2(palette.len() as u32).max(MIN_INDIRECT_BITS);
                    if needed > storage.bits() {
                        let mut grown = BitStorage::new(needed, SECTION_VOLUME);
                        for (i, value) in storage.iter().enumerate() {
                            grown.set(i, value);
                        }
                        *storage = grown;
                    }
                    palette.len() - 1
                };
                palette[storage.get_and_set(index, id as u32) as usize]
            }
        }
    }

    /// Counts blocks matching the predicate.
    pub fn count(&self, mut predicate: impl FnMut(BlockStateId) -> bool) -> usize {
        match self {
            Self::Single(state) => {
                if predicate(*state) {
                    SECTION_VOLUME
                } else {
                    0
                }
            }
            Self::Indirect { palette, storage } => storage
                .iter()
                .filter(|&id| predicate(palette[id as usize]))
                .count(),
        }
    }
}

impl Default for PalettedContainer {
    fn default() -> Self {
        Self::Single(BlockStateId::AIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value_stays_single() {
        let mut container = PalettedContainer::default();
        assert_eq!(container.set(1, 2, 3, BlockStateId::AIR), BlockStateId::AIR);
        assert_eq!(container, PalettedContainer::Single(BlockStateId::AIR));
    }

    #[test]
    fn test_switches_to_indirect() {
        let mut container = PalettedContainer::default();
        let old = container.set(1, 2, 3, BlockStateId(5));
        assert_eq!(old, BlockStateId::AIR);
        assert_eq!(container.get(1, 2, 3), BlockStateId(5));
        assert_eq!(container.get(0, 0, 0), BlockStateId::AIR);
        assert!(matches!(container, PalettedContainer::Indirect { .. }));
    }

    #[test]
    fn test_palette_growth_keeps_values() {
        let mut container = PalettedContainer::default();
        for i in 0..40u16 {
            container.set(i as usize % 16, i as usize / 16, 0, BlockStateId(i + 1));
        }
        for i in 0..40u16 {
            assert_eq!(
                container.get(i as usize % 16, i as usize / 16, 0),
                BlockStateId(i + 1)
            );
        }
        if let PalettedContainer::Indirect { storage, .. } = &container {
            assert_eq!(storage.bits(), 6);
        } else {
            panic!("expected an indirect container");
        }
        assert_eq!(container.count(|s| !s.is_air()), 40);
    }
}
