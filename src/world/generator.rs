use bevy::math::IVec3;

/// Decides which cells of a chunk column hold a block.
///
/// Chunks ask once per cell while they are being built, so implementations
/// must be deterministic for a given cell.
pub trait TerrainGenerator: Send + Sync + 'static {
    fn is_solid(&self, cell: IVec3) -> bool;
}

/// Placeholder terrain: everything at or below `surface_y` is solid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlatGenerator {
    pub surface_y: i32,
}

impl Default for FlatGenerator {
    fn default() -> Self {
        Self { surface_y: 0 }
    }
}

impl TerrainGenerator for FlatGenerator {
    fn is_solid(&self, cell: IVec3) -> bool {
        cell.y <= self.surface_y
    }
}

impl<F> TerrainGenerator for F
where
    F: Fn(IVec3) -> bool + Send + Sync + 'static,
{
    fn is_solid(&self, cell: IVec3) -> bool {
        self(cell)
    }
}
