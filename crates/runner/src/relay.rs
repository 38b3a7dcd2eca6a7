use crate::clock::Clock;
use crate::runner::SceneRunner;
use cubestage_common::SurfaceSize;
use cubestage_render::RenderSurface;
use cubestage_viewport::{SizeTracker, Subscription};
use std::cell::Cell;
use std::rc::Rc;

/// Carries size changes from a [`SizeTracker`] to [`SceneRunner::resize`].
///
/// Tracker callbacks cannot borrow the runner, so the latest size is parked
/// here and the host applies it once the tracker has been fed.
pub struct ResizeRelay {
    pending: Rc<Cell<Option<SurfaceSize>>>,
    subscription: Subscription,
}

impl ResizeRelay {
    pub fn subscribe(tracker: &mut dyn SizeTracker) -> Self {
        let pending = Rc::new(Cell::new(None));
        let slot = Rc::clone(&pending);
        let subscription = tracker.subscribe(Box::new(move |size| slot.set(Some(size))));
        Self {
            pending,
            subscription,
        }
    }

    /// Resize `runner` to the last size the tracker reported, if any.
    /// Intermediate sizes reported since the previous call are dropped.
    pub fn apply<S: RenderSurface, C: Clock>(
        &self,
        runner: &mut SceneRunner<S, C>,
    ) -> Option<SurfaceSize> {
        let size = self.pending.take()?;
        runner.resize(size.width, size.height);
        Some(size)
    }

    /// Stop listening. Returns `false` if the tracker had already dropped us.
    pub fn unsubscribe(self, tracker: &mut dyn SizeTracker) -> bool {
        tracker.unsubscribe(self.subscription)
    }
}
