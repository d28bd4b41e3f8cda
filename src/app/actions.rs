//! Actions representing side effects to be executed by the catalog runtime.
//!
//! The event handler mutates [`CatalogState`](crate::app::CatalogState) and returns
//! a `Vec<Action>`; the runtime in [`catalog`](crate::catalog) executes them in
//! order. Keeping the handler free of I/O makes every state transition testable
//! without a worker or an event bus.

use crate::app::events::CatalogEvent;
use crate::domain::{CityRecord, SearchError};
use crate::worker::{SearchSeq, WorkerMessage};

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Posts a message to the search worker.
    PostToWorker(WorkerMessage),

    /// Emits an event to subscribed observers.
    Publish(CatalogEvent),

    /// Delivers a search outcome to the callback registered for `seq`.
    ///
    /// Always emitted after the state changes and events for the same completion.
    Complete {
        seq: SearchSeq,
        result: Result<Vec<CityRecord>, SearchError>,
    },
}
