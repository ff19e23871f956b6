//! Dimension types: the vertical layout and environment of a world.

use islands_utils::Identifier;

/// Properties shared by every world of the same dimension type.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionType {
    /// The registry key of the type.
    pub id: Identifier,
    /// Lowest buildable y.
    pub min_y: i32,
    /// Total buildable height. Always a multiple of 16.
    pub height: i32,
    /// Height portals and chorus fruit may reach.
    pub logical_height: i32,
    /// Whether the sky emits light.
    pub has_skylight: bool,
    /// Whether the world has a bedrock ceiling.
    pub has_ceiling: bool,
    /// Whether water evaporates.
    pub ultrawarm: bool,
    /// Horizontal scale relative to the overworld.
    pub coordinate_scale: f64,
    /// Fixed time of day, if any.
    pub fixed_time: Option<i64>,
    /// Minimum ambient light.
    pub ambient_light: f32,
}

impl DimensionType {
    /// The vanilla overworld.
    #[must_use]
    pub const fn overworld() -> Self {
        Self {
            id: Identifier::vanilla_static("overworld"),
            min_y: -64,
            height: 384,
            logical_height: 384,
            has_skylight: true,
            has_ceiling: false,
            ultrawarm: false,
            coordinate_scale: 1.0,
            fixed_time: None,
            ambient_light: 0.0,
        }
    }

    /// Overworld-like type used by island worlds.
    #[must_use]
    pub const fn island_overworld() -> Self {
        Self {
            id: Identifier::new_static(crate::islands::ISLAND_NAMESPACE, "overworld"),
            min_y: 0,
            height: 256,
            logical_height: 256,
            has_skylight: true,
            has_ceiling: false,
            ultrawarm: false,
            coordinate_scale: 1.0,
            fixed_time: None,
            ambient_light: 0.0,
        }
    }

    /// Nether-like type used by island nethers.
    #[must_use]
    pub const fn island_nether() -> Self {
        Self {
            id: Identifier::new_static(crate::islands::ISLAND_NAMESPACE, "nether"),
            min_y: 0,
            height: 256,
            logical_height: 128,
            has_skylight: false,
            has_ceiling: true,
            ultrawarm: true,
            coordinate_scale: 8.0,
            fixed_time: Some(18000),
            ambient_light: 0.1,
        }
    }

    /// Number of 16 block sections per chunk.
    #[must_use]
    pub const fn section_count(&self) -> usize {
        (self.height / 16) as usize
    }

    /// One past the highest buildable y.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.min_y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_counts() {
        assert_eq!(DimensionType::overworld().section_count(), 24);
        assert_eq!(DimensionType::island_overworld().section_count(), 16);
        assert_eq!(DimensionType::island_nether().max_y(), 256);
    }
}
