use bevy::prelude::*;

use super::{ChunkError, ChunkPool, StreamingController};
use crate::block::{BlockEntity, BlockVisuals, EntityBlockFactory};
use crate::config::{ConfigError, StreamingConfig};
use crate::observer::{ObserverSource, StreamingObserver};
use crate::world::TerrainGenerator;

const STATS_LOG_INTERVAL_SECONDS: f64 = 5.0;

/// The streaming controller as a Bevy resource. Blocks are entities.
#[derive(Resource)]
pub struct ChunkStreaming {
    controller: StreamingController<BlockEntity>,
}

impl ChunkStreaming {
    pub fn new(
        config: StreamingConfig,
        generator: impl TerrainGenerator,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            controller: StreamingController::new(config, generator)?,
        })
    }

    pub fn controller(&self) -> &StreamingController<BlockEntity> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut StreamingController<BlockEntity> {
        &mut self.controller
    }
}

#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct StreamingStats {
    pub known_chunks: usize,
    pub active_chunks: usize,
    pub blocks: usize,
    pub crossings: u64,
    pub placements: u64,
    pub failed_ticks: u64,
    pub failed_placements: u64,
}

impl StreamingStats {
    pub(crate) fn refresh(&mut self, pool: &ChunkPool<BlockEntity>) {
        self.known_chunks = pool.len();
        self.active_chunks = pool.chunks().filter(|chunk| chunk.is_active()).count();
        self.blocks = pool.block_count();
    }
}

pub fn stream_chunks_around_observer(
    mut commands: Commands,
    mut streaming: ResMut<ChunkStreaming>,
    mut stats: ResMut<StreamingStats>,
    visuals: Option<Res<BlockVisuals>>,
    observer_query: Query<&GlobalTransform, With<StreamingObserver>>,
) {
    let Ok(observer) = observer_query.get_single() else {
        return;
    };

    let controller = streaming.controller_mut();
    let mut factory = EntityBlockFactory::new(&mut commands, visuals.as_deref());

    if !controller.is_initialized() {
        let Some(position) = observer.observer_position() else {
            return;
        };
        if let Err(err) = controller.initialize(position, &mut factory) {
            warn!("Initial chunk generation failed, retrying next frame: {}", err);
            stats.failed_ticks += 1;
        }
        stats.refresh(controller.pool());
        return;
    }

    match controller.tick_from(observer, &mut factory) {
        Ok(Some(report)) => {
            for index in report.toggled() {
                if let Some(chunk) = controller.pool().find(index) {
                    factory.sync_visibility(chunk.blocks());
                }
            }
            stats.crossings += 1;
            stats.refresh(controller.pool());
        }
        Ok(None) => {}
        Err(err @ ChunkError::OutOfRange { .. }) => {
            warn!("Chunk streaming paused: {}", err);
            stats.failed_ticks += 1;
        }
        Err(err) => {
            warn!("Chunk streaming tick failed, retrying next frame: {}", err);
            // Part of the window may already have been toggled.
            for chunk in controller.pool().chunks() {
                factory.sync_visibility(chunk.blocks());
            }
            stats.failed_ticks += 1;
            stats.refresh(controller.pool());
        }
    }
}

pub fn log_streaming_stats(
    time: Res<Time>,
    stats: Res<StreamingStats>,
    mut last_log_seconds: Local<f64>,
) {
    let now = time.elapsed_seconds_f64();
    if now - *last_log_seconds < STATS_LOG_INTERVAL_SECONDS {
        return;
    }
    *last_log_seconds = now;

    info!(
        "Chunks: {} known, {} active, {} blocks | crossings {} | placements {} ({} failed) | failed ticks {}",
        stats.known_chunks,
        stats.active_chunks,
        stats.blocks,
        stats.crossings,
        stats.placements,
        stats.failed_placements,
        stats.failed_ticks
    );
}
