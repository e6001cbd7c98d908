use bevy::prelude::*;

pub mod coords;
pub mod data;
pub mod error;
pub mod gateway;
pub mod manager;
pub mod pool;
pub mod systems;

pub use coords::{chunk_index_of, ChunkIndex, CHUNK_SIZE};
pub use data::{Chunk, ChunkLayout};
pub use error::ChunkError;
pub use gateway::{placement_target, Placement};
pub use manager::{StreamingController, StreamingReport};
pub use pool::ChunkPool;
pub use systems::{ChunkStreaming, StreamingStats};

use crate::config::StreamingConfig;
use crate::interaction::{self, PlaceBlockRequest};
use crate::world::FlatGenerator;

/// Streams chunks around the [`StreamingObserver`](crate::observer::StreamingObserver).
///
/// Uses flat terrain unless a [`ChunkStreaming`] resource was inserted before
/// the plugin, which is how a different generator is plugged in.
#[derive(Default)]
pub struct ChunkStreamingPlugin {
    pub config: StreamingConfig,
}

impl ChunkStreamingPlugin {
    pub fn new(config: StreamingConfig) -> Self {
        Self { config }
    }
}

impl Plugin for ChunkStreamingPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<ChunkStreaming>() {
            match ChunkStreaming::new(self.config.clone(), FlatGenerator::default()) {
                Ok(streaming) => {
                    app.insert_resource(streaming);
                }
                Err(err) => {
                    error!("Chunk streaming disabled, invalid config: {}", err);
                    return;
                }
            }
        }

        let config = app
            .world()
            .resource::<ChunkStreaming>()
            .controller()
            .config()
            .clone();

        app.insert_resource(config)
            .init_resource::<StreamingStats>()
            .add_event::<PlaceBlockRequest>()
            .add_systems(
                Update,
                (
                    systems::stream_chunks_around_observer,
                    interaction::apply_place_block_requests,
                    systems::log_streaming_stats,
                )
                    .chain(),
            );
    }
}
