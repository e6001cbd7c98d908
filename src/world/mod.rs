pub mod generator;

pub use generator::{FlatGenerator, TerrainGenerator};
