use bevy::prelude::*;

use crate::block::{BlockVisuals, EntityBlockFactory};
use crate::chunk::{placement_target, ChunkStreaming, StreamingStats};

/// Request to put a block against the face of an existing one.
///
/// Sent by whatever does the picking (a raycast, a console command); `hit` is
/// the block that was hit and `normal` the face it was hit on.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct PlaceBlockRequest {
    pub hit: IVec3,
    pub normal: Vec3,
}

impl PlaceBlockRequest {
    pub fn target(&self) -> IVec3 {
        placement_target(self.hit, self.normal)
    }
}

pub fn apply_place_block_requests(
    mut commands: Commands,
    mut requests: EventReader<PlaceBlockRequest>,
    mut streaming: ResMut<ChunkStreaming>,
    mut stats: ResMut<StreamingStats>,
    visuals: Option<Res<BlockVisuals>>,
) {
    for request in requests.read() {
        let cell = request.target();
        let controller = streaming.controller_mut();
        let mut factory = EntityBlockFactory::new(&mut commands, visuals.as_deref());

        match controller.place_block(cell, &mut factory) {
            Ok(placement) => {
                if let Some(chunk) = controller.pool().find(placement.index) {
                    if placement.created_chunk {
                        factory.sync_visibility(chunk.blocks());
                    } else {
                        factory.sync_visibility(chunk.blocks().last());
                    }
                }
                debug!("Placed block at {:?} in chunk {}", cell, placement.index);
                stats.placements += 1;
            }
            Err(err) => {
                warn!("Block placement at {:?} failed: {}", cell, err);
                // The owning chunk may have been built before the block failed.
                if let Some(chunk) = controller.pool().find(controller.chunk_of_cell(cell)) {
                    factory.sync_visibility(chunk.blocks());
                }
                stats.failed_placements += 1;
            }
        }
        stats.refresh(controller.pool());
    }
}
