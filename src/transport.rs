//! Fetch transport abstraction
//!
//! Providers never perform network I/O themselves; they hand a
//! [`FetchRequest`] to a transport and return immediately. The transport's
//! eventual [`FetchResponse`] re-enters the engine as an `ingest` call with
//! the same provider id, which is the only synchronization point.

use crate::{
    aggregator::AggregationCoordinator,
    constants::{REQUEST_TIMEOUT_SECS, USER_AGENT},
    types::{FetchRequest, FetchResponse},
};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Fire-and-forget dispatch of fetch requests
///
/// `dispatch` returns true iff the request was successfully handed off; it
/// never waits for the network response and carries no per-request timeout.
/// Retry, if any, happens on the host scheduler's next tick.
#[async_trait]
pub trait FetchTransport: Send + Sync {
    /// Hands a fetch request to the transport
    async fn dispatch(&self, request: FetchRequest) -> bool;
}

/// Transport that forwards requests onto an in-process channel
///
/// For hosts that route fetches through their own message bus, and for
/// tests. Dispatch succeeds while the receiving end is alive.
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<FetchRequest>,
}

impl ChannelTransport {
    /// Creates a channel transport and the receiver the host should drain
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FetchRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl FetchTransport for ChannelTransport {
    async fn dispatch(&self, request: FetchRequest) -> bool {
        match self.tx.send(request) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(url = %e.0.url, "Fetch request dropped: channel closed");
                false
            }
        }
    }
}

/// Transport that performs the HTTP GET in a background task
///
/// Successful response bodies are pushed as [`FetchResponse`]s onto the
/// channel returned by [`HttpTransport::new`]; the host drains it into
/// [`AggregationCoordinator::ingest`], typically via [`run_ingest_loop`].
pub struct HttpTransport {
    client: Client,
    responses: mpsc::UnboundedSender<FetchResponse>,
}

impl HttpTransport {
    /// Creates an HTTP transport and the response channel it feeds
    pub fn new() -> Result<(Self, mpsc::UnboundedReceiver<FetchResponse>), reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        let (responses, rx) = mpsc::unbounded_channel();
        Ok((Self { client, responses }, rx))
    }
}

#[async_trait]
impl FetchTransport for HttpTransport {
    async fn dispatch(&self, request: FetchRequest) -> bool {
        if self.responses.is_closed() {
            tracing::warn!(url = %request.url, "Fetch request dropped: response channel closed");
            return false;
        }

        let client = self.client.clone();
        let responses = self.responses.clone();
        tokio::spawn(async move {
            let result = client.get(&request.url).send().await;
            let response = match result {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(url = %request.url, error = %e, "Fetch failed");
                    return;
                }
            };

            if !response.status().is_success() {
                tracing::warn!(
                    url = %request.url,
                    status = response.status().as_u16(),
                    "Fetch returned non-success status"
                );
                return;
            }

            match response.bytes().await {
                Ok(body) => {
                    let _ = responses.send(FetchResponse {
                        provider_id: request.provider_id,
                        body: body.to_vec(),
                    });
                }
                Err(e) => {
                    tracing::warn!(url = %request.url, error = %e, "Failed to read fetch body");
                }
            }
        });

        true
    }
}

/// Drains fetch responses into the coordinator until the channel closes
pub async fn run_ingest_loop(
    coordinator: Arc<AggregationCoordinator>,
    mut responses: mpsc::UnboundedReceiver<FetchResponse>,
) {
    while let Some(response) = responses.recv().await {
        coordinator
            .ingest(&response.provider_id, &response.body)
            .await;
    }
    tracing::info!("Fetch response channel closed; ingest loop exiting");
}
