use async_trait::async_trait;
use http::{
    HeaderMap,
    StatusCode,
    header::{
        ACCEPT,
        AUTHORIZATION,
    },
};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("preceding-tag/", env!("CARGO_PKG_VERSION"));

/// A fully read response; the status is left for the caller to
/// interpret as the meaning differs between endpoints.
#[derive(Clone, Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("transport failure: {0}")]
    Message(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET for the path (with query string) relative to the API
    /// root.
    async fn get(&self, path: &str) -> Result<Response, TransportError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl ReqwestTransport {
    pub fn new(
        api_url: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        let api_url = api_url.into()
            .trim_end_matches('/')
            .to_string();
        Ok(Self { client, api_url, token })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, path: &str) -> Result<Response, TransportError> {
        let mut request = self.client
            .get(format!("{}{path}", self.api_url))
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = self.token.as_deref() {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }
        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        debug!("GET {path} -> {status}");
        Ok(Response { status, headers, body })
    }
}
