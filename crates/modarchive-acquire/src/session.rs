use anyhow::{Context, Result};
use std::future::Future;

const USER_AGENT: &str = concat!("modarchive/", env!("CARGO_PKG_VERSION"), " (module player)");

/// The parts of an HTTP response the archive client looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Raw `Content-Type` header value, if the server sent one.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Something that can issue GET requests and keep state between them.
pub trait HttpSession {
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// HTTP session backed by a single `reqwest::Client` with a cookie store.
#[derive(Debug, Clone)]
pub struct ReqwestSession {
    client: reqwest::Client,
}

impl ReqwestSession {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpSession for ReqwestSession {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .context("Failed to read response body")?
            .to_vec();

        tracing::debug!(url = %url, status, content_type = ?content_type, bytes = body.len(), "GET");
        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}
