// HexStrike API HTTP client
//
// Wraps `reqwest::Client` with base-URL path construction and status
// checking. Two layers: the fallible methods return `Result<_, Error>`,
// and the degrading methods the dashboard calls collapse every failure
// into `false` / `None` so nothing raw escapes the client boundary.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::models::DashboardSnapshot;
use crate::transport::TransportConfig;

const HEALTH_PATH: &str = "health";
const DASHBOARD_PATH: &str = "api/dashboard/live";
const PROCESS_STATUS_PATH: &str = "api/processes/status";
const PROCESS_CONTROL_PATH: &str = "api/processes";

/// Longest body excerpt carried into a deserialization error message.
const BODY_PREVIEW_CHARS: usize = 200;

// ── Control actions ──────────────────────────────────────────────────

/// Imperative operations the server exposes per process.
///
/// `Display` yields the path segment (`terminate`, `pause`, `resume`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ControlAction {
    Terminate,
    Pause,
    Resume,
}

impl ControlAction {
    /// Past-tense verb for user-facing confirmations.
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Terminate => "terminated",
            Self::Pause => "paused",
            Self::Resume => "resumed",
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Raw HTTP client for the HexStrike server.
///
/// Every call is a single attempt bounded by the transport timeout. There
/// is no retry, no backoff, and no state carried between calls beyond the
/// pooled connection inside `reqwest`.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the server root, e.g. `http://localhost:8888`. A path
    /// prefix (`http://host/hexstrike`) is preserved.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}/{path}`, keeping any prefix already on the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get(&self, path: &str) -> Result<reqwest::Response, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url.clone()).send().await?;
        ensure_success(resp, &url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let resp = self.get(path).await?;
        let body = resp.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn post(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);

        let resp = self.http.post(url.clone()).send().await?;
        ensure_success(resp, &url).map(|_| ())
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /health`. Succeeds iff the server answers with a 2xx status.
    pub async fn health(&self) -> Result<(), Error> {
        self.get(HEALTH_PATH).await.map(|_| ())
    }

    /// `GET /api/dashboard/live`.
    pub async fn dashboard(&self) -> Result<DashboardSnapshot, Error> {
        self.get_json(DASHBOARD_PATH).await
    }

    /// `GET /api/processes/status/{pid}`. The payload is opaque JSON.
    pub async fn process_status(&self, pid: u32) -> Result<serde_json::Value, Error> {
        self.get_json(&format!("{PROCESS_STATUS_PATH}/{pid}")).await
    }

    /// `POST /api/processes/{action}/{pid}`. The response body is ignored.
    pub async fn control(&self, action: ControlAction, pid: u32) -> Result<(), Error> {
        self.post(&format!("{PROCESS_CONTROL_PATH}/{action}/{pid}"))
            .await
    }

    // ── Degrading wrappers ───────────────────────────────────────────

    /// `true` iff `/health` answered with a success status.
    pub async fn check_health(&self) -> bool {
        match self.health().await {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "health check failed");
                false
            }
        }
    }

    /// Fetch one dashboard snapshot, or `None` on any failure.
    ///
    /// Transport and parse failures are reported on stderr through
    /// `tracing`; a plain non-success status is not.
    pub async fn fetch_snapshot(&self) -> Option<DashboardSnapshot> {
        match self.dashboard().await {
            Ok(snapshot) => Some(snapshot),
            Err(e @ Error::Status { .. }) => {
                debug!(error = %e, "dashboard endpoint returned non-success");
                None
            }
            Err(e) => {
                warn!(error = %e, "error fetching dashboard data");
                None
            }
        }
    }

    /// Fetch the raw status object for one process, or `None` on any failure.
    pub async fn fetch_process_status(&self, pid: u32) -> Option<serde_json::Value> {
        self.process_status(pid)
            .await
            .inspect_err(|e| debug!(pid, error = %e, "process status unavailable"))
            .ok()
    }

    pub async fn terminate_process(&self, pid: u32) -> bool {
        self.control_quietly(ControlAction::Terminate, pid).await
    }

    pub async fn pause_process(&self, pid: u32) -> bool {
        self.control_quietly(ControlAction::Pause, pid).await
    }

    pub async fn resume_process(&self, pid: u32) -> bool {
        self.control_quietly(ControlAction::Resume, pid).await
    }

    /// Run a control action, mapping every failure to `false`.
    pub async fn control_quietly(&self, action: ControlAction, pid: u32) -> bool {
        match self.control(action, pid).await {
            Ok(()) => true,
            Err(e) => {
                debug!(pid, %action, error = %e, "control request failed");
                false
            }
        }
    }
}

fn ensure_success(resp: reqwest::Response, url: &Url) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(Error::Status {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}
