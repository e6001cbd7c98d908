use bevy::log::debug;
use bevy::math::{IVec3, Vec3};

use super::{ChunkError, ChunkIndex, ChunkPool, StreamingController};
use crate::block::{BlockFactory, BlockHandle};

/// Where a placed block ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub index: ChunkIndex,
    /// The owning chunk did not exist before this placement.
    pub created_chunk: bool,
}

/// The cell next to a hit block, on the side the surface normal points to.
pub fn placement_target(hit: IVec3, normal: Vec3) -> IVec3 {
    hit + normal.round().as_ivec3()
}

impl<B: BlockHandle> ChunkPool<B> {
    /// Adds one block at `cell` to the chunk that contains it, creating that
    /// chunk if needed. The streaming radius plays no part here.
    ///
    /// Placements are not deduplicated: placing twice at the same cell yields
    /// two coincident blocks.
    pub fn place_block<F>(&mut self, cell: IVec3, factory: &mut F) -> Result<ChunkIndex, ChunkError>
    where
        F: BlockFactory<Block = B>,
    {
        let index = ChunkIndex::containing_block(cell, self.layout().edge_length);
        if !index.window_in_range(0, self.layout().edge_length) {
            return Err(ChunkError::OutOfRange {
                position: cell.as_vec3(),
            });
        }
        let chunk = self.get_or_create(index, factory)?;

        if chunk.blocks_at(cell) > 0 {
            debug!(
                "Placing a coincident block at ({}, {}, {}) in chunk {}",
                cell.x, cell.y, cell.z, index
            );
        }

        let block = factory
            .spawn_block(cell)
            .map_err(|source| ChunkError::Placement { cell, source })?;
        chunk.adopt_block(block);
        Ok(index)
    }
}

impl<B: BlockHandle> StreamingController<B> {
    /// See [`ChunkPool::place_block`]. A chunk built by the placement outside
    /// the current loading window is switched off straight away.
    pub fn place_block<F>(&mut self, cell: IVec3, factory: &mut F) -> Result<Placement, ChunkError>
    where
        F: BlockFactory<Block = B>,
    {
        let index = self.chunk_of_cell(cell);
        let created_chunk = !self.pool().contains(index);
        let result = self.pool_mut().place_block(cell, factory);

        if created_chunk && !self.in_loading_window(index) {
            if let Ok(chunk) = self.pool_mut().get_mut(index) {
                chunk.set_active(false);
            }
        }

        result.map(|index| Placement {
            index,
            created_chunk,
        })
    }

    pub fn chunk_of_cell(&self, cell: IVec3) -> ChunkIndex {
        ChunkIndex::containing_block(cell, self.config().chunk_edge_length)
    }

    /// Before the first initialize or crossing every chunk counts as inside.
    fn in_loading_window(&self, index: ChunkIndex) -> bool {
        self.previous_index().map_or(true, |center| {
            index.chebyshev_distance(center) <= self.config().loading_radius
        })
    }
}
