//! State container: owns the composite snapshot and applies events in dispatch order.

use tokio::sync::{broadcast, watch};
use tracing::trace;

use crate::{events::AssetEvent, reducer, state::AssetsState};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

pub struct AssetStore {
    state: watch::Sender<AssetsState>,
    events: broadcast::Sender<AssetEvent>,
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetStore {
    pub fn new() -> Self {
        Self::with_state(AssetsState::default())
    }

    pub fn with_state(initial: AssetsState) -> Self {
        let (state, _) = watch::channel(initial);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { state, events }
    }

    /// Applies every slice transition for `event` in one step, then notifies
    /// snapshot and event subscribers.
    pub fn dispatch(&self, event: impl Into<AssetEvent>) {
        let event = event.into();
        trace!(event = event.name(), "dispatching asset event");
        self.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = reducer::reduce(current, &event);
        });
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    pub fn snapshot(&self) -> AssetsState {
        self.state.borrow().clone()
    }

    /// Reads a part of the current snapshot without cloning all of it.
    pub fn read<R>(&self, f: impl FnOnce(&AssetsState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<AssetsState> {
        self.state.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<AssetEvent> {
        self.events.subscribe()
    }
}
