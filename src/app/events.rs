//! Observable catalog events and the broadcast bus that carries them.
//!
//! Observers subscribe to the [`EventBus`] and receive a [`CatalogEvent`] after
//! every observable state change. Each event carries a full snapshot of the
//! collection it describes, and state is always mutated before the event is sent,
//! so an observer never sees an intermediate state.

use crate::domain::{CityRecord, SearchError};
use crate::worker::SearchSeq;
use tokio::sync::broadcast;

/// Default buffer size of the event bus.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Observable change in catalog state.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    /// The search result set was replaced by a newer completion.
    ResultsReplaced {
        /// Request number of the search that produced the results.
        seq: SearchSeq,
        /// The new result set.
        cities: Vec<CityRecord>,
    },

    /// The latest search failed; results were left untouched.
    SearchFailed {
        seq: SearchSeq,
        query: String,
        error: SearchError,
    },

    /// The favorites set changed.
    FavoritesChanged {
        /// Favorites after the change, in insertion order.
        favorites: Vec<CityRecord>,
    },

    /// The selected city changed.
    SelectionChanged {
        /// Index into the result set, `None` when nothing is selected.
        index: Option<usize>,
        /// The selected city.
        city: Option<CityRecord>,
    },

    /// Writing favorites to storage failed; the in-memory set was kept.
    PersistFailed {
        /// Description of the storage failure.
        message: String,
    },
}

/// Broadcast-backed event bus.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    /// Creates a bus whose subscribers may lag by up to `buffer` events.
    #[must_use]
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer.max(1));
        tracing::debug!(buffer, "catalog event bus initialized");
        Self { sender }
    }

    /// Subscribes to events emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }

    /// Emits an event to every current subscriber.
    ///
    /// Emitting with no subscribers is not an error.
    pub fn emit(&self, event: CatalogEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_events_in_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.emit(CatalogEvent::PersistFailed { message: "disk full".to_string() });
        bus.emit(CatalogEvent::FavoritesChanged { favorites: vec![] });

        assert_eq!(
            rx.try_recv().unwrap(),
            CatalogEvent::PersistFailed { message: "disk full".to_string() }
        );
        assert_eq!(rx.try_recv().unwrap(), CatalogEvent::FavoritesChanged { favorites: vec![] });
    }

    #[test]
    fn emitting_without_subscribers_is_fine() {
        EventBus::new(0).emit(CatalogEvent::FavoritesChanged { favorites: vec![] });
    }
}
