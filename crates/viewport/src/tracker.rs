use cubestage_common::SurfaceSize;

/// Handle returned by [`SizeTracker::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Reports the current viewport size and notifies subscribers on change.
pub trait SizeTracker {
    fn current_size(&self) -> SurfaceSize;

    fn subscribe(&mut self, callback: Box<dyn FnMut(SurfaceSize)>) -> Subscription;

    /// Returns `false` if the subscription was already gone.
    fn unsubscribe(&mut self, subscription: Subscription) -> bool;
}

/// Size tracker fed by the host's window events.
pub struct ViewportTracker {
    size: SurfaceSize,
    next_id: u64,
    subscribers: Vec<(Subscription, Box<dyn FnMut(SurfaceSize)>)>,
}

impl ViewportTracker {
    pub fn new(initial: SurfaceSize) -> Self {
        Self {
            size: initial,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Record a size reported by the host. Returns whether it changed.
    pub fn observe(&mut self, size: SurfaceSize) -> bool {
        if size == self.size {
            return false;
        }
        tracing::debug!(from = %self.size, to = %size, "viewport resized");
        self.size = size;
        for (_, callback) in &mut self.subscribers {
            callback(size);
        }
        true
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl SizeTracker for ViewportTracker {
    fn current_size(&self) -> SurfaceSize {
        self.size
    }

    fn subscribe(&mut self, callback: Box<dyn FnMut(SurfaceSize)>) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, callback));
        id
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(id, _)| *id != subscription);
        self.subscribers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<SurfaceSize>>>, Box<dyn FnMut(SurfaceSize)>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, Box::new(move |size| sink.borrow_mut().push(size)))
    }

    #[test]
    fn reports_initial_size() {
        let tracker = ViewportTracker::new(SurfaceSize::new(1280, 720));
        assert_eq!(tracker.current_size(), SurfaceSize::new(1280, 720));
    }

    #[test]
    fn notifies_only_on_change() {
        let mut tracker = ViewportTracker::new(SurfaceSize::new(100, 100));
        let (seen, callback) = recorder();
        tracker.subscribe(callback);

        assert!(!tracker.observe(SurfaceSize::new(100, 100)));
        assert!(tracker.observe(SurfaceSize::new(800, 600)));
        assert!(!tracker.observe(SurfaceSize::new(800, 600)));
        assert!(tracker.observe(SurfaceSize::new(1024, 768)));

        assert_eq!(
            *seen.borrow(),
            [SurfaceSize::new(800, 600), SurfaceSize::new(1024, 768)]
        );
        assert_eq!(tracker.current_size(), SurfaceSize::new(1024, 768));
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut tracker = ViewportTracker::new(SurfaceSize::default());
        let (first, cb1) = recorder();
        let (second, cb2) = recorder();
        let s1 = tracker.subscribe(cb1);
        tracker.subscribe(cb2);

        assert!(tracker.unsubscribe(s1));
        assert!(!tracker.unsubscribe(s1));
        tracker.observe(SurfaceSize::new(10, 20));

        assert!(first.borrow().is_empty());
        assert_eq!(second.borrow().len(), 1);
        assert_eq!(tracker.subscriber_count(), 1);
    }
}
