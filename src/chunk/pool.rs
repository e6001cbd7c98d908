use std::collections::{HashMap, HashSet};

use bevy::log::debug;

use super::{Chunk, ChunkError, ChunkIndex, ChunkLayout};
use crate::block::{BlockFactory, BlockHandle};
use crate::world::TerrainGenerator;

/// Registry of every chunk created so far.
///
/// The pool is the only owner of chunks. Entries are never removed, so memory
/// grows with the number of distinct chunks visited; chunks that fall out of
/// range are deactivated, not freed.
pub struct ChunkPool<B> {
    chunks: HashMap<ChunkIndex, Chunk<B>>,
    layout: ChunkLayout,
    generator: Box<dyn TerrainGenerator>,
}

impl<B: BlockHandle> ChunkPool<B> {
    pub fn new(layout: ChunkLayout, generator: impl TerrainGenerator) -> Self {
        Self {
            chunks: HashMap::new(),
            layout,
            generator: Box::new(generator),
        }
    }

    pub fn layout(&self) -> ChunkLayout {
        self.layout
    }

    /// Returns the chunk at `index`, building and registering it first if it
    /// does not exist yet. A chunk is only registered once its generation has
    /// fully succeeded.
    pub fn get_or_create<F>(
        &mut self,
        index: ChunkIndex,
        factory: &mut F,
    ) -> Result<&mut Chunk<B>, ChunkError>
    where
        F: BlockFactory<Block = B>,
    {
        if !self.chunks.contains_key(&index) {
            let chunk = self.build_chunk(index, factory)?;
            debug!(
                "Generated chunk {} with {} blocks",
                index,
                chunk.block_count()
            );
            self.chunks.insert(index, chunk);
        }
        self.get_mut(index)
    }

    fn build_chunk<F>(&self, index: ChunkIndex, factory: &mut F) -> Result<Chunk<B>, ChunkError>
    where
        F: BlockFactory<Block = B>,
    {
        Chunk::generate(index, self.layout, self.generator.as_ref(), factory)
    }

    /// Direct lookup that fails on absence. Outside callers go through
    /// [`ChunkPool::find`] or [`ChunkPool::get_or_create`].
    pub(crate) fn get(&self, index: ChunkIndex) -> Result<&Chunk<B>, ChunkError> {
        self.chunks.get(&index).ok_or(ChunkError::Lookup(index))
    }

    pub(crate) fn get_mut(&mut self, index: ChunkIndex) -> Result<&mut Chunk<B>, ChunkError> {
        self.chunks.get_mut(&index).ok_or(ChunkError::Lookup(index))
    }

    pub fn find(&self, index: ChunkIndex) -> Option<&Chunk<B>> {
        self.get(index).ok()
    }

    pub fn contains(&self, index: ChunkIndex) -> bool {
        self.chunks.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// All known chunks, in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk<B>> {
        self.chunks.values()
    }

    pub fn chunks_mut(&mut self) -> impl Iterator<Item = &mut Chunk<B>> {
        self.chunks.values_mut()
    }

    pub fn indices(&self) -> HashSet<ChunkIndex> {
        self.chunks.keys().copied().collect()
    }

    pub fn active_indices(&self) -> HashSet<ChunkIndex> {
        self.chunks
            .values()
            .filter(|chunk| chunk.is_active())
            .map(Chunk::index)
            .collect()
    }

    pub fn block_count(&self) -> usize {
        self.chunks.values().map(Chunk::block_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::testing::{RecordingFactory, TestBlock};
    use crate::world::FlatGenerator;

    fn pool() -> ChunkPool<TestBlock> {
        ChunkPool::new(ChunkLayout::default(), FlatGenerator::default())
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut pool = pool();
        let mut factory = RecordingFactory::default();
        let index = ChunkIndex::new(2, -1);

        let first_ids: Vec<_> = pool
            .get_or_create(index, &mut factory)
            .expect("create")
            .blocks()
            .iter()
            .map(|block| block.id)
            .collect();
        let second_ids: Vec<_> = pool
            .get_or_create(index, &mut factory)
            .expect("lookup")
            .blocks()
            .iter()
            .map(|block| block.id)
            .collect();

        assert_eq!(first_ids, second_ids);
        assert_eq!(factory.spawned, 256);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn failed_generation_registers_nothing() {
        let mut pool = pool();
        let mut factory = RecordingFactory::failing_after(300);
        let first = ChunkIndex::new(0, 0);
        let second = ChunkIndex::new(0, 1);

        pool.get_or_create(first, &mut factory).expect("first chunk fits");
        let err = pool
            .get_or_create(second, &mut factory)
            .expect_err("second chunk runs out of blocks");

        assert!(matches!(err, ChunkError::Generation { index, .. } if index == second));
        assert!(pool.contains(first));
        assert!(!pool.contains(second));
        assert_eq!(pool.len(), 1);
        assert_eq!(factory.discarded.len(), 300 - 256);
    }

    #[test]
    fn direct_lookup_reports_missing_chunks() {
        let mut pool = pool();
        let mut factory = RecordingFactory::default();
        let missing = ChunkIndex::new(9, 9);

        assert_eq!(pool.get(missing).err(), Some(ChunkError::Lookup(missing)));
        assert!(pool.find(missing).is_none());

        pool.get_or_create(missing, &mut factory).expect("create");
        assert!(pool.get(missing).is_ok());
    }

    #[test]
    fn snapshots_cover_every_chunk() {
        let mut pool = pool();
        let mut factory = RecordingFactory::default();
        for index in ChunkIndex::new(0, 0).square(1) {
            pool.get_or_create(index, &mut factory).expect("create");
        }
        pool.get_mut(ChunkIndex::new(1, 1))
            .expect("registered")
            .set_active(false);

        assert_eq!(pool.chunks().count(), 9);
        assert_eq!(pool.indices().len(), 9);
        assert_eq!(pool.active_indices().len(), 8);
        assert!(!pool.active_indices().contains(&ChunkIndex::new(1, 1)));
        assert_eq!(pool.block_count(), 9 * 256);
    }
}
