//! Search worker running remote requests off the UI task.
//!
//! [`SearchWorker::spawn`] starts a dispatcher task that receives
//! [`WorkerMessage`]s and runs each search on its own tokio task, so a slow request
//! never delays a later one. Every completion is posted back on the response channel
//! exactly once; the catalog drains that channel on its own task.

use crate::domain::error::{CityfinderError, Result};
use crate::remote::SearchClient;
use crate::worker::{WorkerMessage, WorkerResponse};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Background search executor.
#[derive(Debug, Clone)]
pub struct SearchWorker {
    client: SearchClient,
}

impl SearchWorker {
    #[must_use]
    pub const fn new(client: SearchClient) -> Self {
        Self { client }
    }

    /// Starts the worker and returns the catalog's end of its channels.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(self) -> WorkerHandle {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(self.run(message_rx, response_tx));
        tracing::debug!("search worker started");

        WorkerHandle {
            messages: Some(message_tx),
            responses: response_rx,
            task,
        }
    }

    /// Processes one message to completion and returns its response.
    pub async fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        match message {
            WorkerMessage::Search { seq, query } => {
                let result = self.client.search(&query).await;
                match &result {
                    Ok(cities) => tracing::debug!(count = cities.len(), "search succeeded"),
                    Err(e) => tracing::debug!(error = %e, "search failed"),
                }
                WorkerResponse::SearchCompleted { seq, query, result }
            }
        }
    }

    /// Dispatch loop: one task per message until the catalog hangs up.
    async fn run(
        self,
        mut messages: mpsc::UnboundedReceiver<WorkerMessage>,
        responses: mpsc::UnboundedSender<WorkerResponse>,
    ) {
        while let Some(message) = messages.recv().await {
            let span = match &message {
                WorkerMessage::Search { seq, query } => {
                    tracing::debug_span!("worker_search", seq = *seq, query = %query)
                }
            };

            let worker = self.clone();
            let responses = responses.clone();
            tokio::spawn(
                async move {
                    let response = worker.handle_message(message).await;
                    if responses.send(response).is_err() {
                        tracing::debug!("catalog dropped before search completed");
                    }
                }
                .instrument(span),
            );
        }
        tracing::debug!("search worker stopped");
    }
}

/// The catalog's end of the worker channels.
#[derive(Debug)]
pub struct WorkerHandle {
    /// `None` once [`WorkerHandle::shutdown`] ran.
    messages: Option<mpsc::UnboundedSender<WorkerMessage>>,
    responses: mpsc::UnboundedReceiver<WorkerResponse>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Posts a message to the worker.
    ///
    /// # Errors
    ///
    /// Returns [`CityfinderError::Worker`] if the worker has stopped.
    pub fn post(&self, message: WorkerMessage) -> Result<()> {
        let Some(messages) = &self.messages else {
            return Err(CityfinderError::Worker(format!("worker shut down, dropped {message:?}")));
        };
        messages
            .send(message)
            .map_err(|e| CityfinderError::Worker(format!("worker stopped, dropped {:?}", e.0)))
    }

    /// Stops accepting messages and waits for the dispatcher to exit.
    ///
    /// Messages posted earlier are still dispatched, and searches already running
    /// deliver their completions as usual.
    pub async fn shutdown(&mut self) {
        if self.messages.take().is_some() {
            let _ = (&mut self.task).await;
            tracing::debug!("search worker shut down");
        }
    }

    /// Waits for the next completion.
    ///
    /// Returns `None` once the worker has stopped and every completion was received.
    pub async fn recv(&mut self) -> Option<WorkerResponse> {
        self.responses.recv().await
    }

    /// Returns a completion if one is already waiting.
    pub fn try_recv(&mut self) -> Option<WorkerResponse> {
        self.responses.try_recv().ok()
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
