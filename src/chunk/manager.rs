use bevy::log::{debug, info};
use bevy::math::Vec3;

use super::{ChunkError, ChunkIndex, ChunkPool};
use crate::block::{BlockFactory, BlockHandle};
use crate::config::{ConfigError, StreamingConfig};
use crate::world::TerrainGenerator;

/// What a chunk crossing changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamingReport {
    pub previous: Option<ChunkIndex>,
    pub current: ChunkIndex,
    /// Chunks that did not exist before this tick. They start active.
    pub created: Vec<ChunkIndex>,
    /// Existing chunks switched from inactive to active.
    pub activated: Vec<ChunkIndex>,
    /// Chunks switched off because they left the loading window.
    pub deactivated: Vec<ChunkIndex>,
}

impl StreamingReport {
    /// Existing chunks whose activity changed.
    pub fn toggled(&self) -> impl Iterator<Item = ChunkIndex> + '_ {
        self.activated.iter().chain(&self.deactivated).copied()
    }
}

/// Keeps the chunks around an observer active.
///
/// The controller owns the [`ChunkPool`] and remembers which chunk the
/// observer was in last time. Nothing happens until the observer crosses into
/// another chunk; then every chunk outside `loading_radius` is switched off
/// and every chunk inside it is created if needed and switched on.
pub struct StreamingController<B> {
    pool: ChunkPool<B>,
    config: StreamingConfig,
    previous: Option<ChunkIndex>,
}

impl<B: BlockHandle> StreamingController<B> {
    pub fn new(
        config: StreamingConfig,
        generator: impl TerrainGenerator,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            pool: ChunkPool::new(config.layout(), generator),
            config,
            previous: None,
        })
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    pub fn pool(&self) -> &ChunkPool<B> {
        &self.pool
    }

    pub(crate) fn pool_mut(&mut self) -> &mut ChunkPool<B> {
        &mut self.pool
    }

    /// Observer chunk as of the last successful initialize or crossing.
    pub fn previous_index(&self) -> Option<ChunkIndex> {
        self.previous
    }

    pub fn is_initialized(&self) -> bool {
        self.previous.is_some()
    }

    pub fn index_of(&self, position: Vec3) -> ChunkIndex {
        ChunkIndex::from_world_pos(position, self.config.chunk_edge_length)
    }

    /// Chunk of `observer`, provided the window of `radius` around it can be
    /// generated without leaving the `i32` cell range.
    fn window_center(&self, observer: Vec3, radius: i32) -> Result<ChunkIndex, ChunkError> {
        let center = self.index_of(observer);
        if observer.is_finite() && center.window_in_range(radius, self.config.chunk_edge_length) {
            Ok(center)
        } else {
            Err(ChunkError::OutOfRange { position: observer })
        }
    }

    /// Materializes every chunk within `initial_radius` of the observer and
    /// records its chunk. Activity is left as construction set it.
    ///
    /// Returns the chunks that were newly created.
    pub fn initialize<F>(
        &mut self,
        observer: Vec3,
        factory: &mut F,
    ) -> Result<Vec<ChunkIndex>, ChunkError>
    where
        F: BlockFactory<Block = B>,
    {
        let center = self.window_center(observer, self.config.initial_radius)?;
        let mut created = Vec::new();

        for index in center.square(self.config.initial_radius) {
            if self.pool.contains(index) {
                continue;
            }
            self.pool.get_or_create(index, factory)?;
            created.push(index);
        }

        self.previous = Some(center);
        info!(
            "Streaming initialized at chunk {} with {} chunks ({} new)",
            center,
            self.pool.len(),
            created.len()
        );
        Ok(created)
    }

    /// Re-evaluates the active window if the observer changed chunk.
    ///
    /// Returns `Ok(None)` while the observer stays in the same chunk. On
    /// error the previous chunk is kept, so the next tick retries the whole
    /// crossing.
    pub fn tick<F>(
        &mut self,
        observer: Vec3,
        factory: &mut F,
    ) -> Result<Option<StreamingReport>, ChunkError>
    where
        F: BlockFactory<Block = B>,
    {
        let radius = self.config.loading_radius;
        let current = self.window_center(observer, radius)?;
        if self.previous == Some(current) {
            return Ok(None);
        }

        let mut report = StreamingReport {
            previous: self.previous,
            current,
            ..Default::default()
        };

        // Every known chunk is checked, but only those whose state changes
        // have their blocks touched.
        for chunk in self.pool.chunks_mut() {
            if chunk.is_active() && chunk.index().chebyshev_distance(current) > radius {
                chunk.set_active(false);
                report.deactivated.push(chunk.index());
            }
        }

        for index in current.square(radius) {
            let existed = self.pool.contains(index);
            let chunk = self.pool.get_or_create(index, factory)?;
            if !existed {
                report.created.push(index);
            }
            if !chunk.is_active() {
                chunk.set_active(true);
                report.activated.push(index);
            }
        }

        debug!(
            "Observer crossed into chunk {}: {} created, {} activated, {} deactivated",
            current,
            report.created.len(),
            report.activated.len(),
            report.deactivated.len()
        );
        self.previous = Some(current);
        Ok(Some(report))
    }
}
