//! Background worker for remote searches.
//!
//! This module runs network requests away from the task that owns catalog state and
//! marshals their results back over a channel.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol tagged with search sequence numbers
//! - `handler`: Worker implementation and dispatch loop

pub mod handler;
pub mod messages;

pub use handler::{SearchWorker, WorkerHandle};
pub use messages::{SearchSeq, WorkerMessage, WorkerResponse};
