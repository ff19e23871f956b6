//! Block entities attached to positions inside a chunk.

use islands_utils::{BlockPos, Identifier};

/// Auxiliary state attached to a single block, such as a chest's inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEntity {
    /// The block entity type, e.g. `minecraft:chest`.
    pub kind: Identifier,
    /// Absolute position of the owning block.
    pub pos: BlockPos,
    /// Loot table to roll when the container is first opened.
    pub loot_table: Option<Identifier>,
}

impl BlockEntity {
    /// Creates a block entity without loot.
    #[must_use]
    pub const fn new(kind: Identifier, pos: BlockPos) -> Self {
        Self {
            kind,
            pos,
            loot_table: None,
        }
    }

    /// Sets the loot table rolled on first open.
    #[must_use]
    pub fn with_loot_table(mut self, loot_table: Identifier) -> Self {
        self.loot_table = Some(loot_table);
        self
    }
}
