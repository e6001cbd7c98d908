use bevy::prelude::*;

use crate::block::{BlockFactory, BlockHandle};
use crate::chunk::{ChunkError, StreamingController, StreamingReport};

/// Tags the entity whose position drives chunk streaming.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct StreamingObserver;

/// Anything that can say where the observer currently is.
///
/// `None` means there is no usable position this tick, for example a
/// non-finite transform, and streaming should sit the tick out.
pub trait ObserverSource {
    fn observer_position(&self) -> Option<Vec3>;
}

impl ObserverSource for Vec3 {
    fn observer_position(&self) -> Option<Vec3> {
        self.is_finite().then_some(*self)
    }
}

impl ObserverSource for Transform {
    fn observer_position(&self) -> Option<Vec3> {
        self.translation.observer_position()
    }
}

impl ObserverSource for GlobalTransform {
    fn observer_position(&self) -> Option<Vec3> {
        self.translation().observer_position()
    }
}

impl<T: ObserverSource> ObserverSource for Option<T> {
    fn observer_position(&self) -> Option<Vec3> {
        self.as_ref().and_then(ObserverSource::observer_position)
    }
}

impl<B: BlockHandle> StreamingController<B> {
    /// [`StreamingController::tick`] driven by an [`ObserverSource`].
    pub fn tick_from<S, F>(
        &mut self,
        source: &S,
        factory: &mut F,
    ) -> Result<Option<StreamingReport>, ChunkError>
    where
        S: ObserverSource + ?Sized,
        F: BlockFactory<Block = B>,
    {
        match source.observer_position() {
            Some(position) => self.tick(position, factory),
            None => Ok(None),
        }
    }
}
