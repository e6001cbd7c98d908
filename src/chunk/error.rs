use std::fmt;

use bevy::math::{IVec3, Vec3};

use super::ChunkIndex;
use crate::block::SpawnError;

#[derive(Debug, Clone, PartialEq)]
pub enum ChunkError {
    /// A chunk was looked up directly and is not registered.
    Lookup(ChunkIndex),
    /// The block factory failed while a chunk was being built. Nothing was
    /// registered for `index`.
    Generation { index: ChunkIndex, source: SpawnError },
    /// The block factory failed while placing a single block.
    Placement { cell: IVec3, source: SpawnError },
    /// The position is not finite, or the chunks around it would have
    /// block cells beyond the `i32` range.
    OutOfRange { position: Vec3 },
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::Lookup(index) => write!(f, "chunk {} is not loaded", index),
            ChunkError::Generation { index, source } => {
                write!(f, "failed to generate chunk {}: {}", index, source)
            }
            ChunkError::Placement { cell, source } => write!(
                f,
                "failed to place block at ({}, {}, {}): {}",
                cell.x, cell.y, cell.z, source
            ),
            ChunkError::OutOfRange { position } => {
                write!(f, "position {} is outside the addressable world", position)
            }
        }
    }
}

impl std::error::Error for ChunkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChunkError::Lookup(_) | ChunkError::OutOfRange { .. } => None,
            ChunkError::Generation { source, .. } | ChunkError::Placement { source, .. } => {
                Some(source)
            }
        }
    }
}
