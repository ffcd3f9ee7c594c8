//! Destinations for drained traffic counters.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tally_core::{PanelEndpoint, TRAFFIC_PUSH_PATH};

use crate::collector::Snapshot;
use crate::error::AgentError;

/// Receiver of one drained batch per flush.
///
/// A returned error means the batch was not accepted; the caller merges it
/// back into the store.
#[async_trait]
pub trait TrafficSink: Send + Sync {
    async fn push(&self, batch: &Snapshot) -> Result<(), AgentError>;
}

#[async_trait]
impl<S: TrafficSink + ?Sized> TrafficSink for Arc<S> {
    #[inline]
    async fn push(&self, batch: &Snapshot) -> Result<(), AgentError> {
        (**self).push(batch).await
    }
}

/// Pushes batches to the panel's traffic endpoint.
///
/// Body shape is `{"<key>": [tx, rx], ...}`.
#[derive(Debug, Clone)]
pub struct HttpTrafficSink {
    client: Client,
    endpoint: PanelEndpoint,
    timeout: Duration,
}

impl HttpTrafficSink {
    pub fn new(endpoint: PanelEndpoint, timeout: Duration) -> Self {
        Self::with_client(Client::new(), endpoint, timeout)
    }

    pub fn with_client(client: Client, endpoint: PanelEndpoint, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    fn encode(batch: &Snapshot) -> Result<Vec<u8>, AgentError> {
        let body: BTreeMap<&str, [u64; 2]> = batch
            .iter()
            .map(|(key, entry)| (key.as_str(), [entry.tx, entry.rx]))
            .collect();
        Ok(serde_json::to_vec(&body)?)
    }
}

#[async_trait]
impl TrafficSink for HttpTrafficSink {
    async fn push(&self, batch: &Snapshot) -> Result<(), AgentError> {
        let body = Self::encode(batch)?;
        let resp = self
            .client
            .post(self.endpoint.url(TRAFFIC_PUSH_PATH))
            .query(&self.endpoint.query())
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Timeout(self.timeout)
                } else {
                    AgentError::transport(e)
                }
            })?;

        if !resp.status().is_success() {
            return Err(AgentError::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}
