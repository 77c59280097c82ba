use crate::error::ScrapeError;
use rand::Rng;
use reqwest::{header, Client, ClientBuilder, Url};
use std::time::Duration;

/// Built-in origin used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://mangapark.net/";

/// User agents rotated across outbound requests to avoid fetch blocking.
///
/// Each string represents a different browser and OS combination, so
/// consecutive requests do not present a single stable identity to the
/// target site.
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.2 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.159 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3",
];

/// A pool of outbound client identities, read-only after construction.
#[derive(Debug)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// The pool must contain at least one entry; an empty pool is a
    /// configuration error reported at startup, not at call time.
    pub fn new(agents: Vec<String>) -> Result<Self, ScrapeError> {
        if agents.is_empty() {
            return Err(ScrapeError::Config(
                "user agent pool must contain at least one entry".into(),
            ));
        }
        Ok(Self { agents })
    }

    /// One identity chosen uniformly at random from the pool.
    pub fn next(&self) -> &str {
        let mut rng = rand::thread_rng();
        let index = rng.gen_range(0..self.agents.len());
        &self.agents[index]
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect())
            .expect("built-in user agent pool is non-empty")
    }
}

/// Configuration for the outbound fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agents: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(10_000),
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// One outbound page fetch, immutable per call.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub timeout_ms: Option<u64>,
}

impl FetchRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            timeout_ms: None,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// A received HTTP response, whatever its status code.
///
/// The source site serves styled error pages with status 200 for missing
/// listings, so a non-2xx status is not a failure at this layer; the
/// caller interprets the body.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub raw_body: String,
    pub status_code: u16,
}

/// Outbound fetch client: one configured base origin, a bounded timeout
/// and a rotated identity per request. Holds no mutable state across
/// calls, so it is safe to share behind application data.
#[derive(Debug)]
pub struct FetchClient {
    client: Client,
    base: Url,
    pool: UserAgentPool,
    timeout_ms: u64,
}

impl FetchClient {
    pub fn new() -> Result<Self, ScrapeError> {
        Self::with_config(FetchConfig::default())
    }

    pub fn with_config(config: FetchConfig) -> Result<Self, ScrapeError> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            ScrapeError::Config(format!("invalid base origin {:?}: {}", config.base_url, e))
        })?;
        let pool = UserAgentPool::new(config.user_agents)?;
        let timeout_ms = config.timeout.as_millis() as u64;

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| ScrapeError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base,
            pool,
            timeout_ms,
        })
    }

    /// Performs a single GET against the configured origin.
    ///
    /// No retries happen here; a failed fetch yields a single failure and
    /// the caller owns retry policy. Timeouts map to
    /// [`ScrapeError::Timeout`], everything else that prevented a response
    /// to [`ScrapeError::Network`].
    pub async fn fetch(&self, req: &FetchRequest) -> Result<FetchOutcome, ScrapeError> {
        let url = self
            .base
            .join(&req.path)
            .map_err(|e| ScrapeError::Config(format!("invalid request path {:?}: {}", req.path, e)))?;
        let timeout_ms = req.timeout_ms.unwrap_or(self.timeout_ms);

        let mut request = self
            .client
            .get(url)
            .header(header::USER_AGENT, self.pool.next())
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(Duration::from_millis(timeout_ms));
        if !req.query.is_empty() {
            request = request.query(&req.query);
        }

        match request.send().await {
            Ok(response) => {
                let status_code = response.status().as_u16();
                let raw_body = response
                    .text()
                    .await
                    .map_err(|e| classify(e, timeout_ms))?;
                log::debug!(
                    "GET {} -> {} ({} bytes)",
                    req.path,
                    status_code,
                    raw_body.len()
                );
                Ok(FetchOutcome {
                    raw_body,
                    status_code,
                })
            }
            Err(e) => {
                log::warn!("GET {} failed: {}", req.path, e);
                Err(classify(e, timeout_ms))
            }
        }
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    pub fn user_agents(&self) -> &UserAgentPool {
        &self.pool
    }
}

fn classify(err: reqwest::Error, timeout_ms: u64) -> ScrapeError {
    if err.is_timeout() {
        ScrapeError::Timeout(timeout_ms)
    } else {
        ScrapeError::Network(err.to_string())
    }
}
