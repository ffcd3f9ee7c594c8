//! HTTP identity source.
//!
//! Pulls the node's user list from the billing panel.
//!
//! # Example
//!
//! ```no_run
//! use tally_auth::HttpIdentitySource;
//! use tally_core::PanelEndpoint;
//!
//! let endpoint = PanelEndpoint::new("https://panel.example.com", "node-token", 1, "hysteria");
//! let source = HttpIdentitySource::new(endpoint);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use tally_core::{PanelEndpoint, USER_LIST_PATH};

use crate::{AuthError, IdentityRecord, IdentitySource};

/// Identity source backed by the panel's user list endpoint.
#[derive(Debug, Clone)]
pub struct HttpIdentitySource {
    client: Client,
    endpoint: PanelEndpoint,
}

impl HttpIdentitySource {
    pub fn new(endpoint: PanelEndpoint) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    /// Create with a custom reqwest [`Client`] (for proxies, TLS settings, etc.).
    pub fn with_client(client: Client, endpoint: PanelEndpoint) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl IdentitySource for HttpIdentitySource {
    async fn fetch(&self) -> Result<Vec<IdentityRecord>, AuthError> {
        let resp = self
            .client
            .get(self.endpoint.url(USER_LIST_PATH))
            .query(&self.endpoint.query())
            .send()
            .await
            .map_err(AuthError::transport)?;

        if !resp.status().is_success() {
            return Err(AuthError::Status(resp.status().as_u16()));
        }

        let body = resp.bytes().await.map_err(AuthError::transport)?;
        let list: wire::UserList = serde_json::from_slice(&body).map_err(AuthError::decode)?;
        Ok(list.users.into_iter().map(Into::into).collect())
    }
}

// ── Wire types ────────────────────────────────────────────────────

#[allow(missing_debug_implementations)]
mod wire {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct UserList {
        pub users: Vec<User>,
    }

    #[derive(Deserialize)]
    pub struct User {
        pub id: UserId,
        pub uuid: String,
        #[serde(default)]
        pub speed_limit: Option<u32>,
    }

    /// Panels disagree on whether ids are numbers or strings.
    #[derive(Deserialize)]
    #[serde(untagged)]
    pub enum UserId {
        Num(u64),
        Str(String),
    }
}

impl From<wire::User> for IdentityRecord {
    fn from(u: wire::User) -> Self {
        let key = match u.id {
            wire::UserId::Num(n) => n.to_string(),
            wire::UserId::Str(s) => s,
        };
        IdentityRecord::new(key, u.uuid, u.speed_limit)
    }
}
