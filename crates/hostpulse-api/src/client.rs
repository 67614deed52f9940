// Monitoring service HTTP client
//
// Wraps `reqwest::Client` with URL construction and body decoding. Endpoint
// methods stay thin; the get/post helpers keep transport mechanics in one
// place so error mapping is uniform.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{
    AddHostBody, DataSnapshot, GroupNameBody, GroupsResponse, RemoveHostBody, StatusAck,
};
use crate::transport::TransportConfig;

/// HTTP client for the hostpulse monitoring service.
///
/// All configuration mutations go through POST endpoints acknowledged by the
/// service; reads are plain GETs. The client holds no session state — the
/// service is unauthenticated within its deployment network.
pub struct MonitorClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MonitorClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client` (used by tests).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Configuration endpoints ───────────────────────────────────────

    /// Fetch the full group/host configuration.
    ///
    /// `GET /hosts/groups` — called once at startup to seed local state.
    pub async fn fetch_groups(&self) -> Result<GroupsResponse, Error> {
        let url = self.endpoint("hosts/groups")?;
        debug!("fetching group configuration");
        self.get(url).await
    }

    /// Create a group.
    ///
    /// `POST /groups/add` with `{"name": "..."}`. The service answers
    /// `{"status": "ok"}` on acceptance; anything else is a rejection.
    pub async fn add_group(&self, name: &str) -> Result<(), Error> {
        let url = self.endpoint("groups/add")?;
        debug!(name, "adding group");
        let ack: StatusAck = self.post(url, &GroupNameBody { name }).await?;
        if ack.status == "ok" {
            Ok(())
        } else {
            Err(Error::Rejected {
                message: ack
                    .msg
                    .unwrap_or_else(|| format!("group add refused (status {:?})", ack.status)),
            })
        }
    }

    /// Remove a group.
    ///
    /// `POST /groups/remove` with `{"name": "..."}`. The response body is
    /// not inspected — any 2xx counts as an acknowledgement.
    pub async fn remove_group(&self, name: &str) -> Result<(), Error> {
        let url = self.endpoint("groups/remove")?;
        debug!(name, "removing group");
        self.post_ack(url, &GroupNameBody { name }).await
    }

    /// Register a host for probing under a group.
    ///
    /// `POST /add_ip` with `{"ip": ..., "name": ..., "group": ...}`.
    pub async fn add_host(&self, address: &str, label: &str, group: &str) -> Result<(), Error> {
        let url = self.endpoint("add_ip")?;
        debug!(address, label, group, "adding host");
        self.post_ack(
            url,
            &AddHostBody {
                address,
                label,
                group,
            },
        )
        .await
    }

    /// Stop probing a host and drop its history.
    ///
    /// `POST /remove_ip` with `{"address": "..."}`.
    pub async fn remove_host(&self, address: &str) -> Result<(), Error> {
        let url = self.endpoint("remove_ip")?;
        debug!(address, "removing host");
        self.post_ack(url, &RemoveHostBody { address }).await
    }

    // ── Time-series endpoint ──────────────────────────────────────────

    /// Fetch the consolidated time-series snapshot for every probed host.
    ///
    /// `GET /data` — address → ordered sample history, bounded server-side.
    pub async fn fetch_data(&self) -> Result<DataSnapshot, Error> {
        let url = self.endpoint("data")?;
        self.get(url).await
    }

    // ── Transport helpers ─────────────────────────────────────────────

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Self::decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, url: Url, body: &B) -> Result<T, Error> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Self::decode(response).await
    }

    /// POST where only the HTTP status matters; the body is discarded.
    async fn post_ack<B: Serialize>(&self, url: Url, body: &B) -> Result<(), Error> {
        self.http
            .post(url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Decode a JSON body, preserving the raw text on failure.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
