use bevy::math::IVec3;

use super::{ChunkError, ChunkIndex, CHUNK_SIZE};
use crate::block::{BlockFactory, BlockHandle};
use crate::world::TerrainGenerator;

/// Dimensions shared by every chunk in a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkLayout {
    pub edge_length: i32,
    pub height: i32,
}

impl ChunkLayout {
    pub fn new(edge_length: i32, height: i32) -> Self {
        Self {
            edge_length,
            height,
        }
    }

    pub fn cells_per_chunk(&self) -> usize {
        (self.edge_length.max(0) as usize).pow(2) * self.height.max(0) as usize
    }
}

impl Default for ChunkLayout {
    fn default() -> Self {
        Self::new(CHUNK_SIZE, 1)
    }
}

/// One chunk column and every block it owns.
///
/// Content is produced once by [`Chunk::generate`]. Afterwards the only
/// changes are activity toggles and blocks adopted from placements.
#[derive(Debug)]
pub struct Chunk<B> {
    index: ChunkIndex,
    height: i32,
    blocks: Vec<B>,
    active: bool,
}

impl<B: BlockHandle> Chunk<B> {
    /// Builds the chunk at `index`, layer by layer downwards from `y = 0`.
    ///
    /// If the factory fails part way, the blocks spawned so far are handed
    /// back through [`BlockFactory::discard_block`] and no chunk is returned.
    pub fn generate<F>(
        index: ChunkIndex,
        layout: ChunkLayout,
        generator: &dyn TerrainGenerator,
        factory: &mut F,
    ) -> Result<Self, ChunkError>
    where
        F: BlockFactory<Block = B>,
    {
        let origin = index.origin_cell(layout.edge_length);
        let mut blocks = Vec::with_capacity(layout.cells_per_chunk());

        for i in 0..layout.edge_length {
            for j in 0..layout.edge_length {
                for k in 0..layout.height {
                    let cell = origin + IVec3::new(i, -k, j);
                    if !generator.is_solid(cell) {
                        continue;
                    }

                    match factory.spawn_block(cell) {
                        Ok(mut block) => {
                            block.set_active(true);
                            blocks.push(block);
                        }
                        Err(source) => {
                            for block in blocks {
                                factory.discard_block(block);
                            }
                            return Err(ChunkError::Generation { index, source });
                        }
                    }
                }
            }
        }

        Ok(Self {
            index,
            height: layout.height,
            blocks,
            active: true,
        })
    }

    pub fn index(&self) -> ChunkIndex {
        self.index
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn blocks(&self) -> &[B] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Applies `active` to every owned block. Takes `&mut self`, so no
    /// reader can see the chunk half way through.
    pub fn set_active(&mut self, active: bool) {
        for block in &mut self.blocks {
            block.set_active(active);
        }
        self.active = active;
    }

    /// Takes ownership of a placed block and aligns it with the chunk's
    /// current activity. Returns the adopted block.
    pub fn adopt_block(&mut self, mut block: B) -> &B {
        block.set_active(self.active);
        self.blocks.push(block);
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn blocks_at(&self, cell: IVec3) -> usize {
        self.blocks
            .iter()
            .filter(|block| block.position() == cell)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::testing::{RecordingFactory, TestBlock};
    use crate::world::FlatGenerator;

    fn build(index: ChunkIndex, layout: ChunkLayout) -> (Chunk<TestBlock>, RecordingFactory) {
        let mut factory = RecordingFactory::default();
        let chunk = Chunk::generate(index, layout, &FlatGenerator::default(), &mut factory)
            .expect("generate chunk");
        (chunk, factory)
    }

    #[test]
    fn single_layer_fills_the_column_footprint() {
        let index = ChunkIndex::new(-1, 2);
        let (chunk, factory) = build(index, ChunkLayout::default());

        assert_eq!(chunk.block_count(), 256);
        assert_eq!(factory.spawned, 256);
        assert!(chunk.is_active());
        for block in chunk.blocks() {
            assert_eq!(block.position.y, 0);
            assert_eq!(ChunkIndex::containing_block(block.position, CHUNK_SIZE), index);
        }
        assert_eq!(chunk.blocks()[0].position, IVec3::new(-16, 0, 32));
    }

    #[test]
    fn taller_chunks_stack_downwards() {
        let (chunk, _) = build(ChunkIndex::new(0, 0), ChunkLayout::new(CHUNK_SIZE, 3));

        assert_eq!(chunk.height(), 3);
        assert_eq!(chunk.block_count(), 16 * 16 * 3);
        assert_eq!(chunk.blocks_at(IVec3::new(4, -2, 9)), 1);
        assert!(chunk.blocks().iter().all(|block| (-2..=0).contains(&block.position.y)));
    }

    #[test]
    fn generation_order_is_stable() {
        let layout = ChunkLayout::new(4, 2);
        let (first, _) = build(ChunkIndex::new(3, -5), layout);
        let (second, _) = build(ChunkIndex::new(3, -5), layout);

        let first: Vec<_> = first.blocks().iter().map(|block| block.position).collect();
        let second: Vec<_> = second.blocks().iter().map(|block| block.position).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn generator_decides_which_cells_are_filled() {
        let mut factory = RecordingFactory::default();
        let generator = |cell: IVec3| cell.x % 2 == 0;
        let chunk = Chunk::generate(ChunkIndex::new(0, 0), ChunkLayout::default(), &generator, &mut factory)
            .expect("generate chunk");
        assert_eq!(chunk.block_count(), 128);
    }

    #[test]
    fn set_active_reaches_every_block() {
        let (mut chunk, _) = build(ChunkIndex::new(0, 0), ChunkLayout::new(CHUNK_SIZE, 2));

        chunk.set_active(false);
        assert!(!chunk.is_active());
        assert!(chunk.blocks().iter().all(|block| !block.active));

        chunk.set_active(true);
        assert!(chunk.blocks().iter().all(|block| block.active));
    }

    #[test]
    fn failed_generation_discards_spawned_blocks() {
        let mut factory = RecordingFactory::failing_after(10);
        let result = Chunk::generate(
            ChunkIndex::new(1, 1),
            ChunkLayout::default(),
            &FlatGenerator::default(),
            &mut factory,
        );

        match result {
            Err(ChunkError::Generation { index, .. }) => assert_eq!(index, ChunkIndex::new(1, 1)),
            other => panic!("expected generation failure, got {other:?}"),
        }
        assert_eq!(factory.discarded, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn adopted_blocks_follow_chunk_activity() {
        let (mut chunk, mut factory) = build(ChunkIndex::new(0, 0), ChunkLayout::default());
        chunk.set_active(false);

        let placed = factory.spawn_block(IVec3::new(5, 1, 5)).expect("spawn");
        assert!(placed.active);
        assert!(!chunk.adopt_block(placed).active);
        assert_eq!(chunk.block_count(), 257);

        chunk.set_active(true);
        assert!(chunk.blocks().iter().all(|block| block.active));
    }
}
