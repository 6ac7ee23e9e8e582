//! HTTP fetcher for the primary forecast site
//!
//! Headers and session cookies are explicit configuration inputs; the
//! client carries no module-level state. The three elevations of a resort
//! are fetched through a fixed 3-wide pool, and one unit's failure never
//! aborts its siblings.

use crate::config::ScrapeConfig;
use crate::error::ForecastError;
use crate::resorts::Elevation;
use futures::StreamExt;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Concurrent fetch width; one worker per elevation station
const FETCH_POOL_SIZE: usize = 3;

/// HTTP client for resort forecast pages
pub struct ScrapeClient {
    client: reqwest::Client,
    base_url: String,
    period: String,
}

impl ScrapeClient {
    /// Build a client from scrape configuration
    pub fn new(config: &ScrapeConfig) -> Result<Self, ForecastError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&config.user_agent, "user agent")?);
        headers.insert(ACCEPT, header_value(&config.accept, "accept header")?);
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value(&config.accept_language, "accept-language header")?,
        );
        if let Some(cookies) = &config.cookies {
            headers.insert(COOKIE, header_value(cookies, "cookie header")?);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            period: config.period.clone(),
        })
    }

    /// Templated page URL: `{base}/{resort}/{period}/{elevation}`
    #[must_use]
    pub fn page_url(&self, resort: &str, elevation: Elevation) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            urlencoding::encode(resort),
            self.period,
            elevation
        )
    }

    /// Fetch one resort/elevation page as raw markup
    pub async fn fetch_page(
        &self,
        resort: &str,
        elevation: Elevation,
    ) -> Result<String, ForecastError> {
        let url = self.page_url(resort, elevation);
        debug!("Fetching forecast page {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::transport(format!(
                "{url} returned HTTP {status}"
            )));
        }
        Ok(response.text().await?)
    }

    /// Fetch all elevations of a resort concurrently.
    ///
    /// Returns whatever succeeded; callers decide whether an empty map is
    /// fatal. Failures are logged and dropped here.
    pub async fn fetch_elevations(&self, resort: &str) -> BTreeMap<Elevation, String> {
        let fetches = Elevation::ALL.map(|elevation| async move {
            (elevation, self.fetch_page(resort, elevation).await)
        });

        let mut pages = BTreeMap::new();
        let mut stream = futures::stream::iter(fetches).buffer_unordered(FETCH_POOL_SIZE);
        while let Some((elevation, result)) = stream.next().await {
            match result {
                Ok(html) => {
                    info!("Fetched {resort}/{elevation} ({} bytes)", html.len());
                    pages.insert(elevation, html);
                }
                Err(e) => {
                    warn!("Fetch failed for {resort}/{elevation}: {e}");
                }
            }
        }
        pages
    }
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue, ForecastError> {
    HeaderValue::from_str(value)
        .map_err(|e| ForecastError::config(format!("invalid {what}: {e}")))
}
