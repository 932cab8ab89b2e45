//! Probe client: one HTTP GET through one proxy

use crate::config::Config;
use crate::proxy::models::ProxyRecord;
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, HOST, PRAGMA,
    USER_AGENT,
};
use reqwest::{Client, Proxy as ReqwestProxy};
use std::fmt;
use std::time::Duration;

/// Browser user agent sent with every probe
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.0 Safari/605.1.15";

const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Shown when an error carries neither a status code nor a message
const UNKNOWN_ERROR: &str = "unknown error";

/// A probe that did not produce an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeError {
    pub status: Option<u16>,
    pub message: Option<String>,
}

impl ProbeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: Some(message.into()),
        }
    }

    pub fn timeout() -> Self {
        Self::new("timeout")
    }

    /// Status code if present, else the message, never empty
    pub fn display_message(&self) -> String {
        if let Some(status) = self.status {
            return status.to_string();
        }
        match self.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => UNKNOWN_ERROR.to_string(),
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_message())
    }
}

impl std::error::Error for ProbeError {}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::timeout();
        }
        Self {
            status: e.status().map(|s| s.as_u16()),
            message: Some(e.to_string()),
        }
    }
}

/// Status code of a response, or why there was none
pub type ProbeReply = std::result::Result<u16, ProbeError>;

/// Issues a reachability probe through a proxy.
///
/// Timeouts are the client's responsibility; callers never cancel or retry.
pub trait ProbeClient {
    fn probe<'a>(&'a self, proxy: &'a ProxyRecord) -> BoxFuture<'a, ProbeReply>;
}

/// Configuration for the HTTP probe client
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub target_url: String,
    pub domain: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ProbeConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            target_url: config.target_url(),
            domain: config.domain.clone(),
            timeout: config.timeout_duration(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// reqwest-backed probe client
#[derive(Debug, Clone)]
pub struct HttpProbe {
    config: ProbeConfig,
    headers: HeaderMap,
}

impl HttpProbe {
    pub fn new(config: ProbeConfig) -> crate::Result<Self> {
        let headers = Self::build_headers(&config)?;
        Ok(Self { config, headers })
    }

    fn build_headers(config: &ProbeConfig) -> crate::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_str(&config.domain)?);
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        Ok(headers)
    }

    /// A fresh client per probe, so nothing (cookies included) is shared
    /// between proxies
    fn create_client(&self, proxy: &ProxyRecord) -> std::result::Result<Client, ProbeError> {
        let mut reqwest_proxy = ReqwestProxy::all(proxy.url())?;
        if let Some(auth) = &proxy.auth {
            reqwest_proxy = reqwest_proxy.basic_auth(&auth.username, &auth.password);
        }

        let client = Client::builder()
            .proxy(reqwest_proxy)
            .default_headers(self.headers.clone())
            .gzip(true)
            .timeout(self.config.timeout)
            .build()?;

        Ok(client)
    }

    async fn run_probe(&self, proxy: &ProxyRecord) -> ProbeReply {
        let client = self.create_client(proxy)?;

        match tokio::time::timeout(
            self.config.timeout,
            client.get(&self.config.target_url).send(),
        )
        .await
        {
            Ok(Ok(response)) => Ok(response.status().as_u16()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(ProbeError::timeout()),
        }
    }
}

impl ProbeClient for HttpProbe {
    fn probe<'a>(&'a self, proxy: &'a ProxyRecord) -> BoxFuture<'a, ProbeReply> {
        self.run_probe(proxy).boxed()
    }
}
