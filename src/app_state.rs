//! Shared state for the Actix-web server.
//!
//! Wrapped in `web::Data` and shared across all HTTP handlers. Everything
//! here is read-only per request apart from the metrics tracker, which
//! synchronizes internally; no lock is ever held across a fetch.

use crate::config::Config;
use crate::http_client::FetchClient;
use crate::metrics::MetricsTracker;

pub struct AppState {
    /// Outbound fetch client with identity rotation.
    pub fetcher: FetchClient,
    /// Application configuration, read-only once loaded.
    pub config: Config,
    /// Per-operation fetch counters.
    pub metrics: MetricsTracker,
}
