//! Entities placed into a chunk while it is still being generated.

use islands_utils::Identifier;
use islands_utils::math::Vector3;
use uuid::Uuid;

/// An entity waiting in a proto chunk until the chunk reaches `Full`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoEntity {
    /// Unique id of the entity.
    pub uuid: Uuid,
    /// Entity type, e.g. `minecraft:sheep`.
    pub kind: Identifier,
    /// Absolute position.
    pub pos: Vector3<f64>,
}

impl ProtoEntity {
    /// Creates an entity with a fresh random uuid.
    #[must_use]
    pub fn new(kind: Identifier, pos: Vector3<f64>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            kind,
            pos,
        }
    }
}
