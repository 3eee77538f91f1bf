use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::error::CacheError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Cache key: method plus URL.
    pub fn identity(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Only plain 200 responses are worth caching.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

pub trait Transport: Send + Sync {
    fn send(&self, request: &Request) -> Result<Response, CacheError>;
}

/// Live transport: `http(s)://` through reqwest, everything else from disk.
pub struct NetTransport {
    client: reqwest::blocking::Client,
}

impl NetTransport {
    pub fn new() -> Result<Self, CacheError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("applaunch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CacheError::Transport {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    fn send_http(&self, request: &Request) -> Result<Response, CacheError> {
        let transport_err = |e: &dyn std::fmt::Display| CacheError::Transport {
            url: request.url.clone(),
            message: e.to_string(),
        };

        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| transport_err(&e))?;
        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let res = builder.send().map_err(|e| transport_err(&e))?;
        let status = res.status().as_u16();
        let headers = res
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = res.bytes().map_err(|e| transport_err(&e))?.to_vec();

        debug!(url = %request.url, status, bytes = body.len(), "http response");
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

impl Transport for NetTransport {
    fn send(&self, request: &Request) -> Result<Response, CacheError> {
        if is_http(&request.url) {
            return self.send_http(request);
        }
        read_local(&request.url)
    }
}

fn is_http(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn read_local(url: &str) -> Result<Response, CacheError> {
    let path = url.strip_prefix("file://").unwrap_or(url);
    let body = std::fs::read(Path::new(path)).map_err(|e| CacheError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    debug!(path, bytes = body.len(), "read local resource");
    Ok(Response::ok(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_uppercases_method() {
        let req = Request::new("get", "https://x/apps.json");
        assert!(req.is_get());
        assert_eq!(req.identity(), "GET https://x/apps.json");
        assert_ne!(req.identity(), Request::new("POST", "https://x/apps.json").identity());
    }

    #[test]
    fn test_only_200_is_success() {
        assert!(Response::ok("x").is_success());
        assert!(!Response::with_status(204, "").is_success());
        assert!(!Response::with_status(404, "").is_success());
    }

    #[test]
    fn test_local_file_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.json");
        std::fs::write(&path, b"[]").unwrap();

        let transport = NetTransport::new().unwrap();
        let res = transport
            .send(&Request::get(path.to_string_lossy().to_string()))
            .unwrap();
        assert_eq!(res.body, b"[]");

        let file_url = format!("file://{}", path.display());
        assert!(transport.send(&Request::get(file_url)).is_ok());
    }

    #[test]
    fn test_missing_local_file_is_transport_error() {
        let transport = NetTransport::new().unwrap();
        let err = transport
            .send(&Request::get("/definitely/not/here/apps.json"))
            .unwrap_err();
        assert!(matches!(err, CacheError::Transport { .. }));
    }
}
