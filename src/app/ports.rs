use async_trait::async_trait;

/// A fully built outbound request for one registry
#[derive(Clone, Debug, PartialEq)]
pub enum RegistryRequest {
    /// JSON body POSTed with `Content-Type: application/json`
    PostJson { url: String, body: serde_json::Value },
    /// GET with query parameters; a key may repeat
    Get { url: String, query: Vec<(String, String)> },
}

impl RegistryRequest {
    pub fn url(&self) -> &str {
        match self {
            RegistryRequest::PostJson { url, .. } | RegistryRequest::Get { url, .. } => url.as_str(),
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            RegistryRequest::PostJson { .. } => "POST",
            RegistryRequest::Get { .. } => "GET",
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP seam. `Err` carries a transport-level failure
/// (DNS, connect, reset, timeout); any HTTP status is an `Ok` response.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn send(&self, request: &RegistryRequest) -> Result<HttpResponse, String>;
}
