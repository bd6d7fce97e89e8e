//! Synchronous change listeners.

use crate::repo::state_repo::PersistedState;

/// Handle returned by `Store::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked with the committed state after every effective mutation.
pub type Listener = Box<dyn FnMut(&PersistedState)>;

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(current, _)| *current != id);
        self.entries.len() != before
    }

    /// Calls every listener in subscription order.
    pub(crate) fn notify(&mut self, state: &PersistedState) {
        for (_, listener) in &mut self.entries {
            listener(state);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
