//! Chunk sections and the per-chunk section list.

use islands_utils::BlockStateId;

use crate::chunk::paletted_container::PalettedContainer;

/// A 16×16×16 slab of block states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkSection {
    /// The block states of the section.
    pub states: PalettedContainer,
    non_air_count: u16,
}

impl ChunkSection {
    /// The canonical empty section: all air, no palette array.
    #[must_use]
    pub const fn new_empty() -> Self {
        Self {
            states: PalettedContainer::Single(BlockStateId::AIR),
            non_air_count: 0,
        }
    }

    /// Creates a section from an existing container.
    #[must_use]
    pub fn from_states(states: PalettedContainer) -> Self {
        let non_air_count = states.count(|state| !state.is_air()) as u16;
        Self {
            states,
            non_air_count,
        }
    }

    /// Returns true if the section contains only air.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.non_air_count == 0
    }

    /// Number of non-air blocks.
    #[must_use]
    pub const fn non_air_count(&self) -> u16 {
        self.non_air_count
    }

    /// Reads a block state.
    #[must_use]
    pub fn get_block_state(&self, x: usize, y: usize, z: usize) -> BlockStateId {
        self.states.get(x, y, z)
    }

    /// Writes a block state and returns the previous one.
    pub fn set_block_state(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        state: BlockStateId,
    ) -> BlockStateId {
        let old = self.states.set(x, y, z, state);
        if old.is_air() && !state.is_air() {
            self.non_air_count += 1;
        } else if !old.is_air() && state.is_air() {
            self.non_air_count -= 1;
        }
        old
    }
}

/// The vertical stack of sections of one chunk, bottom first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections {
    /// The sections, indexed by vertical layer.
    pub sections: Box<[ChunkSection]>,
}

impl Sections {
    /// Wraps already built sections.
    #[must_use]
    pub const fn from_owned(sections: Box<[ChunkSection]>) -> Self {
        Self { sections }
    }

    /// Creates `count` empty sections.
    #[must_use]
    pub fn empty(count: usize) -> Self {
        Self {
            sections: (0..count).map(|_| ChunkSection::new_empty()).collect(),
        }
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if there are no sections at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of sections holding at least one non-air block.
    #[must_use]
    pub fn non_empty_count(&self) -> usize {
        self.sections.iter().filter(|s| !s.is_empty()).count()
    }

    /// Replaces every section with the canonical empty section.
    pub fn clear(&mut self) {
        self.sections.fill(ChunkSection::new_empty());
    }

    /// Reads a block by chunk relative coordinates, `y` counted from the bottom section.
    #[must_use]
    pub fn get_relative_block(&self, x: usize, y: usize, z: usize) -> BlockStateId {
        self.sections
            .get(y >> 4)
            .map_or(BlockStateId::AIR, |section| {
                section.get_block_state(x, y & 15, z)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_air_count_tracking() {
        let mut section = ChunkSection::new_empty();
        assert!(section.is_empty());
        section.set_block_state(0, 0, 0, BlockStateId(1));
        section.set_block_state(0, 0, 0, BlockStateId(2));
        section.set_block_state(1, 0, 0, BlockStateId(2));
        assert_eq!(section.non_air_count(), 2);
        section.set_block_state(0, 0, 0, BlockStateId::AIR);
        assert_eq!(section.non_air_count(), 1);
    }

    #[test]
    fn test_clear_restores_canonical_sections() {
        let mut sections = Sections::empty(4);
        sections.sections[2].set_block_state(3, 3, 3, BlockStateId(7));
        assert_eq!(sections.non_empty_count(), 1);
        sections.clear();
        assert!(sections.sections.iter().all(|s| *s == ChunkSection::new_empty()));
    }

    #[test]
    fn test_relative_block_out_of_range_is_air() {
        let sections = Sections::empty(1);
        assert_eq!(sections.get_relative_block(0, 100, 0), BlockStateId::AIR);
    }
}
