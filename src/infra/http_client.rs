use crate::app::ports::{HttpClientPort, HttpResponse, RegistryRequest};
use crate::config::HttpConfig;
use crate::error::{AwardError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    /// Builds a client with a bounded request timeout; expiry surfaces as a transport error
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AwardError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn send(&self, request: &RegistryRequest) -> std::result::Result<HttpResponse, String> {
        tracing::info!("HTTP {} request to: {}", request.method(), request.url());
        let builder = match request {
            RegistryRequest::PostJson { url, body } => self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .json(body),
            RegistryRequest::Get { url, query } => self.client.get(url).query(query),
        };

        let resp = builder.send().await.map_err(describe)?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.map_err(describe)?.to_vec();
        tracing::info!("HTTP response: status={}, size={} bytes", status, bytes.len());
        Ok(HttpResponse { status, bytes })
    }
}

fn describe(err: reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}
