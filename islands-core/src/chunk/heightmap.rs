//! Per-column surface tracking.
//!
//! A heightmap stores, for each of the 256 columns of a chunk, the first free
//! y above the highest block matching the heightmap's predicate, relative to
//! the chunk's minimum y. Zero therefore means "nothing in this column".

use islands_utils::{BitStorage, BlockStateId, ceil_log2};
use rustc_hash::FxHashMap;

use crate::blocks;
use crate::chunk::section::Sections;

/// Number of columns in a chunk (16×16).
pub const COLUMN_COUNT: usize = 256;

/// Heightmap purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeightmapType {
    /// Highest non-air block, maintained during world generation.
    WorldSurfaceWg,
    /// Highest non-air block.
    WorldSurface,
    /// Highest motion blocking block, maintained during world generation.
    OceanFloorWg,
    /// Highest motion blocking block.
    OceanFloor,
    /// Highest motion blocking or fluid block.
    MotionBlocking,
    /// Like [`HeightmapType::MotionBlocking`] but ignoring leaves.
    MotionBlockingNoLeaves,
}

impl HeightmapType {
    /// Heightmaps used while the chunk is being generated.
    pub const WORLDGEN: [Self; 2] = [Self::OceanFloorWg, Self::WorldSurfaceWg];
    /// Heightmaps kept once decoration is done.
    pub const FINAL: [Self; 4] = [
        Self::WorldSurface,
        Self::OceanFloor,
        Self::MotionBlocking,
        Self::MotionBlockingNoLeaves,
    ];

    /// Whether a block counts towards this heightmap.
    #[must_use]
    pub const fn is_opaque(self, state: BlockStateId) -> bool {
        match self {
            Self::WorldSurfaceWg | Self::WorldSurface => !state.is_air(),
            Self::OceanFloorWg | Self::OceanFloor => blocks::blocks_motion(state),
            Self::MotionBlocking => blocks::blocks_motion(state) || blocks::is_fluid(state),
            Self::MotionBlockingNoLeaves => {
                (blocks::blocks_motion(state) || blocks::is_fluid(state))
                    && !blocks::is_leaves(state)
            }
        }
    }
}

/// One heightmap of a chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heightmap {
    kind: HeightmapType,
    min_y: i32,
    data: BitStorage,
}

impl Heightmap {
    /// Creates an all-zero heightmap for a chunk `height` blocks tall.
    #[must_use]
    pub fn new(kind: HeightmapType, min_y: i32, height: i32) -> Self {
        Self {
            kind,
            min_y,
            data: BitStorage::new(Self::bits_for_height(height), COLUMN_COUNT),
        }
    }

    /// Bits needed to store every value in `0..=height`.
    #[must_use]
    pub const fn bits_for_height(height: i32) -> u32 {
        ceil_log2(height as u32 + 1)
    }

    #[inline]
    const fn index(x: usize, z: usize) -> usize {
        x + z * 16
    }

    /// Bits per column entry.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.data.bits()
    }

    /// The packed storage.
    #[must_use]
    pub const fn storage(&self) -> &BitStorage {
        &self.data
    }

    /// Replaces the packed storage wholesale.
    ///
    /// # Panics
    /// Panics if the storage does not have one entry per column at this
    /// heightmap's bit width.
    pub fn set_storage(&mut self, storage: BitStorage) {
        assert_eq!(storage.size(), COLUMN_COUNT, "heightmap storage must hold 256 columns");
        assert_eq!(storage.bits(), self.data.bits(), "heightmap bit width mismatch");
        self.data = storage;
    }

    /// First free y in the column (absolute).
    #[must_use]
    pub fn get_first_available(&self, x: usize, z: usize) -> i32 {
        self.data.get(Self::index(x, z)) as i32 + self.min_y
    }

    fn set_height(&mut self, x: usize, z: usize, first_available: i32) {
        self.data
            .set(Self::index(x, z), (first_available - self.min_y) as u32);
    }

    /// Updates the column after a block change at absolute `y`.
    ///
    /// `sections` must already contain the new state. Returns true if the
    /// stored height changed.
    pub fn update(
        &mut self,
        x: usize,
        y: i32,
        z: usize,
        state: BlockStateId,
        sections: &Sections,
    ) -> bool {
        let first_available = self.get_first_available(x, z);
        if y <= first_available - 2 {
            return false;
        }

        if self.kind.is_opaque(state) {
            if y >= first_available {
                self.set_height(x, z, y + 1);
                return true;
            }
        } else if first_available - 1 == y {
            for below in (self.min_y..y).rev() {
                let local_y = (below - self.min_y) as usize;
                if self.kind.is_opaque(sections.get_relative_block(x, local_y, z)) {
                    self.set_height(x, z, below + 1);
                    return true;
                }
            }
            self.set_height(x, z, self.min_y);
            return true;
        }

        false
    }

    /// Creates any missing heightmaps of `types` and recomputes them from `sections`.
    pub fn prime_heightmaps(
        heightmaps: &mut FxHashMap<HeightmapType, Heightmap>,
        types: &[HeightmapType],
        sections: &Sections,
        min_y: i32,
        height: i32,
    ) {
        for kind in types {
            heightmaps
                .entry(*kind)
                .or_insert_with(|| Self::new(*kind, min_y, height));
        }

        let top = (sections.len() * 16) as i32;
        for z in 0..16 {
            for x in 0..16 {
                let mut pending: Vec<HeightmapType> = types.to_vec();
                for local_y in (0..top).rev() {
                    if pending.is_empty() {
                        break;
                    }
                    let state = sections.get_relative_block(x, local_y as usize, z);
                    if state.is_air() {
                        continue;
                    }
                    pending.retain(|kind| {
                        if kind.is_opaque(state) {
                            if let Some(map) = heightmaps.get_mut(kind) {
                                map.set_height(x, z, local_y + min_y + 1);
                            }
                            false
                        } else {
                            true
                        }
                    });
                }
                for kind in pending {
                    if let Some(map) = heightmaps.get_mut(&kind) {
                        map.set_height(x, z, min_y);
                    }
                }
            }
        }
    }
}
