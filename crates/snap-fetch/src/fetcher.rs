//! `reqwest`-backed [`DocumentSource`].

use async_trait::async_trait;
use snap_config::FetchConfig;
use snap_core::SnapshotTime;
use tracing::{debug, warn};
use url::Url;

use crate::error::FetchError;
use crate::http::check_response;
use crate::retry::RetryConfig;
use crate::source::{DocumentSource, FetchedDocument};

/// HTTP client that fetches snapshot documents.
pub struct HttpFetcher {
    http: reqwest::Client,
    retry: RetryConfig,
}

impl HttpFetcher {
    /// Build a fetcher from the `[fetch]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying client cannot be built.
    pub fn from_config(config: &FetchConfig) -> Result<Self, FetchError> {
        Self::with_retry(config, RetryConfig::from(config))
    }

    /// Like [`Self::from_config`] with an explicit retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying client cannot be built.
    pub fn with_retry(config: &FetchConfig, retry: RetryConfig) -> Result<Self, FetchError> {
        let max_redirects = config.max_redirects as usize;
        let redirects = reqwest::redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() > max_redirects {
                return attempt.error(format!("more than {max_redirects} redirects"));
            }
            debug!(
                status = attempt.status().as_u16(),
                to = %attempt.url(),
                "following redirect"
            );
            attempt.follow()
        });
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .redirect(redirects)
            .build()?;
        Ok(Self { http, retry })
    }

    async fn fetch_once(&self, url: &Url) -> Result<FetchedDocument, FetchError> {
        let resp = check_response(self.http.get(url.clone()).send().await?)?;
        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let body = resp.text().await?;
        Ok(FetchedDocument {
            url: url.to_string(),
            final_url,
            status,
            body,
            fetched_at: SnapshotTime::now(),
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

#[async_trait]
impl DocumentSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        let parsed = parse_url(url)?;
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let error = match self.fetch_once(&parsed).await {
                Ok(document) => {
                    debug!(url, attempt, status = document.status, "fetched document");
                    return Ok(document);
                }
                Err(error) => error,
            };
            if !error.is_transient() {
                return Err(error);
            }
            if attempt >= max_attempts {
                if max_attempts == 1 {
                    return Err(error);
                }
                return Err(FetchError::Exhausted {
                    attempts: attempt,
                    last: Box::new(error),
                });
            }
            let retry_after = match &error {
                FetchError::Status {
                    retry_after_secs: Some(secs),
                    ..
                } => Some(std::time::Duration::from_secs(*secs)),
                _ => None,
            };
            let delay = self.retry.delay(attempt, retry_after);
            warn!(
                url,
                attempt,
                status = error.status(),
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                %error,
                "transient fetch failure, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
