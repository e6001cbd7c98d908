use std::fmt;

use bevy::math::IVec3;

pub mod entity;
pub use entity::{BlockCell, BlockEntity, BlockVisuals, EntityBlockFactory};

/// A placed block as seen by the chunk layer.
///
/// The handle is opaque: chunks only ever flip its activity and ask where it
/// sits. Rendering and collision live behind whatever implements this.
pub trait BlockHandle {
    fn set_active(&mut self, active: bool);
    fn is_active(&self) -> bool;
    fn position(&self) -> IVec3;
}

/// Instantiates blocks for the chunk layer.
pub trait BlockFactory {
    type Block: BlockHandle;

    fn spawn_block(&mut self, position: IVec3) -> Result<Self::Block, SpawnError>;

    /// Releases a block that was spawned but never ended up owned by a chunk.
    fn discard_block(&mut self, _block: Self::Block) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnError {
    pub position: IVec3,
    pub reason: String,
}

impl SpawnError {
    pub fn new(position: IVec3, reason: impl Into<String>) -> Self {
        Self {
            position,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to spawn block at ({}, {}, {}): {}",
            self.position.x, self.position.y, self.position.z, self.reason
        )
    }
}

impl std::error::Error for SpawnError {}
