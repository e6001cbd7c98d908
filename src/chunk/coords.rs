use std::fmt;

use bevy::math::{IVec3, Vec3};

/// Default edge length of a chunk column, in blocks.
pub const CHUNK_SIZE: i32 = 16;

/// Grid coordinate of a chunk column on the x-z plane.
///
/// Chunk `(n, m)` covers blocks `16n ..= 16n + 15` on x and `16m ..= 16m + 15`
/// on z (for the default edge length). Negative indices follow floor division,
/// so `-1` lives in chunk `-1`, not `0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkIndex {
    pub x: i32,
    pub z: i32,
}

impl ChunkIndex {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The chunk column containing a world position. `y` is ignored.
    pub fn from_world_pos(pos: Vec3, edge_length: i32) -> Self {
        let edge = edge_length as f32;
        Self {
            x: (pos.x / edge).floor() as i32,
            z: (pos.z / edge).floor() as i32,
        }
    }

    /// The chunk column containing an integer block cell.
    pub fn containing_block(cell: IVec3, edge_length: i32) -> Self {
        Self {
            x: cell.x.div_euclid(edge_length),
            z: cell.z.div_euclid(edge_length),
        }
    }

    /// World cell of the chunk's `(0, 0, 0)` corner.
    pub fn origin_cell(&self, edge_length: i32) -> IVec3 {
        IVec3::new(self.x * edge_length, 0, self.z * edge_length)
    }

    pub fn chebyshev_distance(&self, other: ChunkIndex) -> i32 {
        let dx = self.x.saturating_sub(other.x).saturating_abs();
        let dz = self.z.saturating_sub(other.z).saturating_abs();
        dx.max(dz)
    }

    /// Whether every block cell of every chunk within `radius` of this one
    /// is representable as an `i32`.
    pub fn window_in_range(&self, radius: i32, edge_length: i32) -> bool {
        let radius = i64::from(radius.max(0));
        let edge = i64::from(edge_length);
        let fits = |c: i32| {
            let c = i64::from(c);
            (c + radius + 1).saturating_mul(edge) - 1 <= i64::from(i32::MAX)
                && (c - radius).saturating_mul(edge) >= i64::from(i32::MIN)
        };
        fits(self.x) && fits(self.z)
    }
}

impl fmt::Display for ChunkIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Chunk index of a world position using the default edge length.
pub fn chunk_index_of(position: Vec3) -> ChunkIndex {
    ChunkIndex::from_world_pos(position, CHUNK_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_in_same_column_share_an_index() {
        assert_eq!(chunk_index_of(Vec3::new(0.0, 5.0, 0.0)), ChunkIndex::new(0, 0));
        assert_eq!(chunk_index_of(Vec3::new(15.0, -3.0, 15.0)), ChunkIndex::new(0, 0));
        assert_eq!(chunk_index_of(Vec3::new(15.99, 0.0, 0.5)), ChunkIndex::new(0, 0));
        assert_eq!(chunk_index_of(Vec3::new(16.0, 0.0, 0.0)), ChunkIndex::new(1, 0));
        assert_eq!(chunk_index_of(Vec3::new(5.0, 0.0, 20.0)), ChunkIndex::new(0, 1));
    }

    #[test]
    fn negative_positions_floor_instead_of_truncating() {
        assert_eq!(chunk_index_of(Vec3::new(-1.0, 0.0, -1.0)), ChunkIndex::new(-1, -1));
        assert_eq!(chunk_index_of(Vec3::new(-0.5, 0.0, 3.0)), ChunkIndex::new(-1, 0));
        assert_eq!(chunk_index_of(Vec3::new(-15.0, 0.0, 0.0)), ChunkIndex::new(-1, 0));
        assert_eq!(chunk_index_of(Vec3::new(-16.0, 0.0, 0.0)), ChunkIndex::new(-1, 0));
        assert_eq!(chunk_index_of(Vec3::new(-17.0, 0.0, 0.0)), ChunkIndex::new(-2, 0));
    }

    #[test]
    fn block_cells_use_the_same_boundaries() {
        for x in -40..40 {
            let cell = IVec3::new(x, 0, -x);
            let from_cell = ChunkIndex::containing_block(cell, CHUNK_SIZE);
            let from_pos = ChunkIndex::from_world_pos(cell.as_vec3(), CHUNK_SIZE);
            assert_eq!(from_cell, from_pos, "cell {cell:?}");
        }
    }

    #[test]
    fn custom_edge_length() {
        assert_eq!(
            ChunkIndex::from_world_pos(Vec3::new(8.0, 0.0, -1.0), 8),
            ChunkIndex::new(1, -1)
        );
        assert_eq!(ChunkIndex::new(2, -3).origin_cell(8), IVec3::new(16, 0, -24));
    }

    #[test]
    fn square_covers_chebyshev_neighbourhood() {
        let center = ChunkIndex::new(1, 0);
        let square: Vec<_> = center.square(1).collect();
        assert_eq!(square.len(), 9);
        assert!(square.iter().all(|index| index.chebyshev_distance(center) <= 1));
        assert!(square.contains(&ChunkIndex::new(0, -1)));
        assert!(square.contains(&ChunkIndex::new(2, 1)));

        assert_eq!(center.square(0).collect::<Vec<_>>(), vec![center]);
        assert_eq!(center.square(3).count(), 49);
        assert_eq!(center.square(-1).count(), 0);
    }

    #[test]
    fn windows_near_the_i32_limit_are_out_of_range() {
        assert!(ChunkIndex::new(0, 0).window_in_range(4, CHUNK_SIZE));
        assert!(ChunkIndex::new(-1_000_000, 1_000_000).window_in_range(8, CHUNK_SIZE));

        let far = ChunkIndex::from_world_pos(Vec3::new(1.0e10, 0.0, 0.0), CHUNK_SIZE);
        assert!(!far.window_in_range(0, CHUNK_SIZE));

        let last = ChunkIndex::new(i32::MAX / CHUNK_SIZE, 0);
        assert!(last.window_in_range(0, CHUNK_SIZE));
        assert!(!last.window_in_range(1, CHUNK_SIZE));
        let first = ChunkIndex::new(0, i32::MIN / CHUNK_SIZE);
        assert!(first.window_in_range(0, CHUNK_SIZE));
        assert!(!first.window_in_range(1, CHUNK_SIZE));
        assert!(!ChunkIndex::new(i32::MAX / 10, 0).window_in_range(0, 10));
    }

    #[test]
    fn distance_saturates_instead_of_overflowing() {
        let low = ChunkIndex::new(i32::MIN, 0);
        let high = ChunkIndex::new(i32::MAX, 0);
        assert_eq!(low.chebyshev_distance(high), i32::MAX);
    }
}
