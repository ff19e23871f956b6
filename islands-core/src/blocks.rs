//! The handful of block states the island generators place.
//!
//! Ids follow the global palette used by the flat generator tests.
//! Anything not listed here behaves like a full, non-emissive solid block.

use islands_utils::BlockStateId;

/// Air.
pub const AIR: BlockStateId = BlockStateId(0);
/// Stone.
pub const STONE: BlockStateId = BlockStateId(1);
/// Grass block.
pub const GRASS_BLOCK: BlockStateId = BlockStateId(9);
/// Dirt.
pub const DIRT: BlockStateId = BlockStateId(10);
/// Bedrock.
pub const BEDROCK: BlockStateId = BlockStateId(33);
/// Still water.
pub const WATER: BlockStateId = BlockStateId(34);
/// Oak leaves.
pub const OAK_LEAVES: BlockStateId = BlockStateId(158);
/// Glowstone.
pub const GLOWSTONE: BlockStateId = BlockStateId(4013);
/// A north facing chest.
pub const CHEST: BlockStateId = BlockStateId(2954);
/// A standing torch.
pub const TORCH: BlockStateId = BlockStateId(1434);

/// Light level emitted by a block state.
#[must_use]
pub const fn light_emission(state: BlockStateId) -> u8 {
    match state {
        GLOWSTONE => 15,
        TORCH => 14,
        _ => 0,
    }
}

/// Whether the block stops entity movement.
#[must_use]
pub const fn blocks_motion(state: BlockStateId) -> bool {
    !matches!(state, AIR | WATER | TORCH)
}

/// Whether the block holds a fluid.
#[must_use]
pub const fn is_fluid(state: BlockStateId) -> bool {
    matches!(state, WATER)
}

/// Whether the block is leaves.
#[must_use]
pub const fn is_leaves(state: BlockStateId) -> bool {
    matches!(state, OAK_LEAVES)
}
