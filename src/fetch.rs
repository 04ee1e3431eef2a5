// src/fetch.rs
// =============================================================================
// This module fetches URLs over HTTP.
//
// Key functionality:
// - One shared reqwest client (connection pooling, timeout, user agent)
// - GET requests that hand back status + content type before the body is read
// - Transport errors categorised into FetchError variants, kept separate from
//   non-success status codes (those are a normal response, not an error here)
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - thiserror: Derive Display/Error for our error enum
// =============================================================================

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use thiserror::Error;
use url::Url;

use crate::config::{ConfigError, CrawlConfig};

// Why a request failed before we got a status code
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request timed out
    #[error("request to {url} timed out")]
    Timeout { url: String },
    /// Could not resolve hostname
    #[error("could not resolve host for {url}")]
    Dns { url: String },
    /// Host unreachable, connection refused, etc.
    #[error("connection to {url} failed: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// SSL/TLS certificate error
    #[error("TLS error for {url}")]
    Tls { url: String },
    /// Too many redirects (redirect loop)
    #[error("too many redirects for {url}")]
    TooManyRedirects { url: String },
    /// Headers arrived but the body could not be read
    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// Anything else reqwest reports
    #[error("request to {url} failed: {source}")]
    Other {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

// A response whose headers have arrived.
//
// The body stays on the wire until text() is called, so resources we only
// list in the sitemap (PDFs, images) are never buffered.
#[derive(Debug)]
pub struct FetchedPage {
    url: Url,
    // Where the response came from after redirects; base for relative links
    final_url: Url,
    status: StatusCode,
    content_type: Option<String>,
    response: Response,
}

impl FetchedPage {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn final_url(&self) -> &Url {
        &self.final_url
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    // True when the Content-Type header starts with text/html
    // (parameters such as "; charset=utf-8" are allowed after it)
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("text/html"))
            .unwrap_or(false)
    }

    pub async fn text(self) -> Result<String, FetchError> {
        let url = self.url;
        self.response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(ConfigError::Client)?;
        Ok(Self { client })
    }

    // Sends a GET and returns as soon as the headers are in.
    //
    // A 404 or 500 is still Ok here; callers look at status() themselves.
    pub async fn get(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(FetchedPage {
            url: url.clone(),
            final_url: response.url().clone(),
            status: response.status(),
            content_type,
            response,
        })
    }
}

// Categorizes different error types from reqwest
fn categorize_error(url: &Url, error: reqwest::Error) -> FetchError {
    let url = url.to_string();
    // Convert error to string once; reqwest hides DNS/TLS details in the chain
    let error_string = format!("{:?}", error).to_ascii_lowercase();

    if error.is_timeout() {
        FetchError::Timeout { url }
    } else if error.is_redirect() {
        FetchError::TooManyRedirects { url }
    } else if error.is_connect() {
        if error_string.contains("dns") || error_string.contains("resolve") {
            FetchError::Dns { url }
        } else {
            FetchError::Connect { url, source: error }
        }
    } else if error_string.contains("certificate") || error_string.contains("tls") {
        FetchError::Tls { url }
    } else {
        FetchError::Other { url, source: error }
    }
}
