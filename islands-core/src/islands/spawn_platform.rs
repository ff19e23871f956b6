//! The starting platform placed in every new island.

use islands_utils::math::Vector3;
use islands_utils::{BlockPos, BlockStateId, Identifier};

use crate::blocks;
use crate::chunk::block_entity::BlockEntity;
use crate::islands::island_world::IslandWorld;

/// Where the platform's lowest corner goes.
pub const PLATFORM_ORIGIN: BlockPos = BlockPos::new(0, 64, 0);

/// Loot rolled in the starter chest.
const STARTER_LOOT: Identifier = Identifier::new_static("gunpowder-islands", "chests/starter");

/// A small block template, positions relative to its lowest corner.
#[derive(Debug, Clone)]
pub struct Structure {
    size: Vector3<i32>,
    blocks: Vec<(BlockPos, BlockStateId)>,
}

impl Structure {
    /// The 5×5 grass platform with a chest on one corner.
    #[must_use]
    pub fn spawn_platform() -> Self {
        let mut layout = Vec::with_capacity(26);
        for z in 0..5 {
            for x in 0..5 {
                layout.push((BlockPos::new(x, 0, z), blocks::GRASS_BLOCK));
            }
        }
        layout.push((BlockPos::new(0, 1, 0), blocks::CHEST));
        Self {
            size: Vector3::new(5, 2, 5),
            blocks: layout,
        }
    }

    /// The bounding box size.
    #[must_use]
    pub const fn size(&self) -> Vector3<i32> {
        self.size
    }

    /// Where players stand once the structure is placed at `origin`: on top,
    /// in the middle.
    #[must_use]
    pub const fn home_pos(&self, origin: BlockPos) -> BlockPos {
        origin.offset(self.size.x / 2, self.size.y + 1, self.size.z / 2)
    }

    /// Places every block at `origin`. Chests get their block entity.
    ///
    /// # Errors
    /// Returns an error if a block cannot be written.
    pub fn place(&self, world: &IslandWorld, origin: BlockPos) -> anyhow::Result<()> {
        for &(offset, state) in &self.blocks {
            let pos = origin.offset(offset.0.x, offset.0.y, offset.0.z);
            world.set_block(pos, state)?;
            if state == blocks::CHEST {
                world.set_block_entity(
                    BlockEntity::new(Identifier::vanilla_static("chest"), pos)
                        .with_loot_table(STARTER_LOOT),
                )?;
            }
        }
        log::debug!("Placed {} blocks at {origin} in {}", self.blocks.len(), world.key());
        Ok(())
    }
}
