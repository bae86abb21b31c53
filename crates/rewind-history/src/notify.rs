/// Synchronous change notification for history observers.
use crate::snapshot::HistorySnapshot;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&HistorySnapshot)>;

/// Ordered registry of observers.
///
/// Observers run in registration order, on the caller's thread, before the
/// triggering operation returns. Each dispatch hands every observer the same
/// detached snapshot, so nothing an observer holds can change afterwards.
#[derive(Default)]
pub struct NotificationBus {
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("observers", &self.observers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` after all existing ones.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&HistorySnapshot) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Invokes every observer with `snapshot`.
    pub fn dispatch(&mut self, snapshot: &HistorySnapshot) {
        for (_, observer) in &mut self.observers {
            observer(snapshot);
        }
    }
}
