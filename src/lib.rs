pub mod block;
pub mod chunk;
pub mod config;
pub mod interaction;
pub mod observer;
pub mod world;

pub use chunk::{ChunkStreaming, ChunkStreamingPlugin, StreamingStats};
pub use config::StreamingConfig;
pub use interaction::PlaceBlockRequest;
pub use observer::StreamingObserver;
