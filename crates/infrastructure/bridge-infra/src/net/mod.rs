use bridge_config::{status_header_name, REQUESTED_WITH_HEADER, SERVER_ERROR_STATUS};
use bridge_core::{Method, ProtocolRequest, ProtocolResponse};
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::error::ProtocolError;

mod wire;

pub use wire::decode_payload;

/// Issues a single attempt per intent and classifies the outcome.
#[async_trait::async_trait]
pub trait ProtocolClient: Send + Sync + 'static {
    async fn send(&self, request: ProtocolRequest) -> Result<ProtocolResponse, ProtocolError>;
}

#[derive(Debug, Clone)]
pub struct ProtocolConfig {
    /// Origin (and optional prefix) that request paths are resolved against.
    pub base_url: Url,
    pub app_marker: String,
}

impl ProtocolConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            app_marker: bridge_config::DEFAULT_APP_MARKER.to_string(),
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.app_marker = marker.into();
        self
    }
}

/// reqwest-backed protocol client.
#[derive(Clone)]
pub struct HttpProtocolClient {
    client: Client,
    base_url: Url,
    app_marker: String,
    status_header: String,
}

impl HttpProtocolClient {
    pub fn new(client: Client, config: ProtocolConfig) -> Self {
        let status_header = status_header_name(&config.app_marker);
        Self {
            client,
            base_url: config.base_url,
            app_marker: config.app_marker,
            status_header,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> Result<Url, ProtocolError> {
        self.base_url
            .join(path)
            .map_err(|e| ProtocolError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl ProtocolClient for HttpProtocolClient {
    async fn send(&self, request: ProtocolRequest) -> Result<ProtocolResponse, ProtocolError> {
        let url = self.resolve(&request.path)?;
        debug!("{} {}", request.method.name(), url);

        let builder = match &request.method {
            Method::Get => self.client.get(url),
            Method::Post(data) => self.client.post(url).form(data.fields()),
        };

        let response = match builder
            .header(REQUESTED_WITH_HEADER, self.app_marker.as_str())
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("request to {} failed: {}", request.path, e);
                return Ok(ProtocolResponse::NetworkError);
            }
        };

        if response.status().as_u16() == SERVER_ERROR_STATUS {
            return Ok(ProtocolResponse::ServerError);
        }

        // Not an in-app response (third-party page, plain HTML error page).
        if response.headers().get(self.status_header.as_str()).is_none() {
            return Ok(ProtocolResponse::Reload);
        }

        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                warn!("reading body of {} failed: {}", request.path, e);
                return Ok(ProtocolResponse::NetworkError);
            }
        };

        decode_payload(&body)
    }
}
