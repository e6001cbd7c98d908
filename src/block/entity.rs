use bevy::prelude::*;

use super::{BlockFactory, BlockHandle, SpawnError};

/// Marks an entity spawned for a chunk block.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockCell {
    pub position: IVec3,
}

/// Mesh and material shared by every block entity. Without it blocks are
/// spawned as bare spatial entities, which is what headless runs use.
#[derive(Resource, Clone)]
pub struct BlockVisuals {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Chunk-side handle to a block entity.
///
/// Activity is tracked here and pushed to the entity's `Visibility` with
/// [`sync_visibility`] once a chunk has finished toggling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockEntity {
    pub entity: Entity,
    position: IVec3,
    active: bool,
}

impl BlockHandle for BlockEntity {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn position(&self) -> IVec3 {
        self.position
    }
}

pub struct EntityBlockFactory<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    visuals: Option<&'a BlockVisuals>,
}

impl<'a, 'w, 's> EntityBlockFactory<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>, visuals: Option<&'a BlockVisuals>) -> Self {
        Self { commands, visuals }
    }

    /// Queues `Visibility` updates so each entity matches its handle.
    /// Everything queued here lands in the same command flush.
    pub fn sync_visibility<'b>(&mut self, blocks: impl IntoIterator<Item = &'b BlockEntity>) {
        for block in blocks {
            self.commands
                .entity(block.entity)
                .insert(visibility_for(block.active));
        }
    }
}

impl BlockFactory for EntityBlockFactory<'_, '_, '_> {
    type Block = BlockEntity;

    fn spawn_block(&mut self, position: IVec3) -> Result<BlockEntity, SpawnError> {
        let transform = Transform::from_translation(position.as_vec3());
        let cell = BlockCell { position };

        let entity = match self.visuals {
            Some(visuals) => self
                .commands
                .spawn((
                    PbrBundle {
                        mesh: visuals.mesh.clone(),
                        material: visuals.material.clone(),
                        transform,
                        ..default()
                    },
                    cell,
                ))
                .id(),
            None => self
                .commands
                .spawn((SpatialBundle::from_transform(transform), cell))
                .id(),
        };

        Ok(BlockEntity {
            entity,
            position,
            active: true,
        })
    }

    fn discard_block(&mut self, block: BlockEntity) {
        self.commands.entity(block.entity).despawn();
    }
}

pub fn visibility_for(active: bool) -> Visibility {
    if active {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}
