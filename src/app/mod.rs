//! Application layer coordinating catalog state, events, and actions.
//!
//! This module sits between the catalog runtime ([`crate::catalog`]) and the
//! domain, storage and worker layers.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Catalog API → Events → Event Handler → State Mutations → Actions → Side Effects
//!                            ↑                                  ↓
//!                            └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`events`]: Observable catalog events and the broadcast bus
//! - [`handler`]: Event processing logic and state transitions
//! - [`state`]: Central catalog state container

pub mod actions;
pub mod events;
pub mod handler;
pub mod state;

pub use actions::Action;
pub use events::{CatalogEvent, EventBus};
pub use handler::{handle_event, Event};
pub use state::CatalogState;
