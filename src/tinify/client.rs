//! HTTP client for the Tinify compression API.

use crate::constants::{
    TINIFY_API_ENDPOINT, TINIFY_AUTH_USER, TINIFY_COUNT_HEADER, TINIFY_SHRINK_PATH, USER_AGENT,
    WEBP_MIME_TYPE,
};
use crate::error::TinifyClientError;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

/// Format the service should convert the compressed image to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertTarget {
    WebP,
}

impl ConvertTarget {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ConvertTarget::WebP => WEBP_MIME_TYPE,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ConvertTarget::WebP => "webp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub data: Vec<u8>,
    /// Extension derived from the response content type, e.g. `png`.
    pub extension: Option<String>,
    /// Compressions used this month, as reported by the service.
    pub compression_count: Option<u32>,
}

/// A remote image compressor gated by an API key.
#[async_trait]
pub trait CompressionService: Send + Sync {
    /// Succeeds when the service accepts `api_key`.
    async fn validate(&self, api_key: &str) -> Result<(), TinifyClientError>;

    async fn compress(
        &self,
        api_key: &str,
        source: Vec<u8>,
        convert: Option<ConvertTarget>,
    ) -> Result<CompressedImage, TinifyClientError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone)]
pub struct TinifyClient {
    http: Client,
    endpoint: String,
}

impl TinifyClient {
    pub fn new() -> Result<Self, TinifyClientError> {
        Self::with_endpoint(TINIFY_API_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, TinifyClientError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TinifyClientError::Connection(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    fn shrink_url(&self) -> String {
        format!("{}{}", self.endpoint, TINIFY_SHRINK_PATH)
    }

    async fn check(response: Response) -> Result<Response, TinifyClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_body(status.as_u16(), &body))
    }
}

#[async_trait]
impl CompressionService for TinifyClient {
    async fn validate(&self, api_key: &str) -> Result<(), TinifyClientError> {
        let response = self
            .http
            .post(self.shrink_url())
            .basic_auth(TINIFY_AUTH_USER, Some(api_key))
            .send()
            .await
            .map_err(connection_error)?;

        // An empty upload is a client error, which still proves the key works.
        match Self::check(response).await {
            Ok(_) => Ok(()),
            Err(TinifyClientError::Account { status: 429, .. }) => Ok(()),
            Err(TinifyClientError::Client { .. }) => Ok(()),
            Err(err) => Err(err),
        }
    }

    async fn compress(
        &self,
        api_key: &str,
        source: Vec<u8>,
        convert: Option<ConvertTarget>,
    ) -> Result<CompressedImage, TinifyClientError> {
        let response = self
            .http
            .post(self.shrink_url())
            .basic_auth(TINIFY_AUTH_USER, Some(api_key))
            .body(source)
            .send()
            .await
            .map_err(connection_error)?;
        let response = Self::check(response).await?;

        let compression_count = response
            .headers()
            .get(TINIFY_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok());
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| TinifyClientError::InvalidResponse("missing Location header".to_string()))?;

        let request = match convert {
            Some(target) => self
                .http
                .post(&location)
                .json(&json!({ "convert": { "type": target.mime_type() } })),
            None => self.http.get(&location),
        };
        let output = request
            .basic_auth(TINIFY_AUTH_USER, Some(api_key))
            .send()
            .await
            .map_err(connection_error)?;
        let output = Self::check(output).await?;

        let extension = output
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(extension_from_content_type);
        let data = output.bytes().await.map_err(connection_error)?.to_vec();

        Ok(CompressedImage {
            data,
            extension,
            compression_count,
        })
    }
}

fn connection_error(err: reqwest::Error) -> TinifyClientError {
    TinifyClientError::Connection(err.to_string())
}

/// Builds a typed error from a non-success response body.
pub fn error_from_body(status: u16, body: &str) -> TinifyClientError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => TinifyClientError::from_status(status, parsed.error, parsed.message),
        Err(_) => TinifyClientError::from_status(
            status,
            "ParseError".to_string(),
            format!("Error while parsing response: {}", body.trim()),
        ),
    }
}

/// `image/png; charset=binary` -> `png`.
pub fn extension_from_content_type(content_type: &str) -> Option<String> {
    let mime = content_type.split(';').next()?.trim();
    let subtype = mime.strip_prefix("image/")?;
    (!subtype.is_empty()).then(|| subtype.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    struct Canned {
        status: &'static str,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    }

    /// Serves one canned response per connection, picked by request line.
    async fn spawn_server(route: fn(&str, &str, u16) -> Canned) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                tokio::spawn(handle(stream, route, port));
            }
        });
        port
    }

    async fn handle(mut stream: TcpStream, route: fn(&str, &str, u16) -> Canned, port: u16) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
        let method = request_line.next().unwrap_or_default().to_string();
        let path = request_line.next().unwrap_or_default().to_string();
        let canned = route(&method, &path, port);

        let mut response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            canned.status,
            canned.body.len()
        );
        for (name, value) in &canned.headers {
            response.push_str(&format!("{name}: {value}\r\n"));
        }
        response.push_str("\r\n");
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.write_all(&canned.body).await.unwrap();
        stream.shutdown().await.ok();
    }

    fn json_error(status: &'static str, error: &str, message: &str) -> Canned {
        Canned {
            status,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: format!(r#"{{"error":"{error}","message":"{message}"}}"#).into_bytes(),
        }
    }

    fn client(port: u16) -> TinifyClient {
        let mut client = TinifyClient::with_endpoint(format!("http://127.0.0.1:{port}/")).unwrap();
        client.http = Client::builder().no_proxy().build().unwrap();
        client
    }

    #[test]
    fn test_extension_from_content_type() {
        assert_eq!(extension_from_content_type("image/png"), Some("png".to_string()));
        assert_eq!(extension_from_content_type("image/webp; charset=binary"), Some("webp".to_string()));
        assert_eq!(extension_from_content_type("image/jpeg"), Some("jpeg".to_string()));
        assert_eq!(extension_from_content_type("application/json"), None);
        assert_eq!(extension_from_content_type("image/"), None);
    }

    #[test]
    fn test_error_from_body() {
        let err = error_from_body(401, r#"{"error":"Unauthorized","message":"Credentials are invalid."}"#);
        assert!(matches!(err, TinifyClientError::Account { status: 401, .. }));
        assert_eq!(err.to_string(), "Credentials are invalid. (HTTP 401/Unauthorized)");

        let err = error_from_body(502, "<html>bad gateway</html>");
        assert!(matches!(err, TinifyClientError::Server { status: 502, .. }));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn test_convert_target() {
        assert_eq!(ConvertTarget::WebP.mime_type(), "image/webp");
        assert_eq!(ConvertTarget::WebP.extension(), "webp");
    }

    #[tokio::test]
    async fn test_validate_rejects_unauthorized_key() {
        let port = spawn_server(|_, _, _| json_error("401 Unauthorized", "Unauthorized", "Credentials are invalid.")).await;
        let err = client(port).validate("bad").await.unwrap_err();
        assert!(matches!(err, TinifyClientError::Account { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_validate_accepts_missing_input_error() {
        let port = spawn_server(|_, _, _| json_error("400 Bad Request", "InputMissing", "Input is missing")).await;
        assert!(client(port).validate("good").await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_accepts_exhausted_key() {
        let port = spawn_server(|_, _, _| json_error("429 Too Many Requests", "TooManyRequests", "Limit reached")).await;
        assert!(client(port).validate("good").await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_server_error_fails() {
        let port = spawn_server(|_, _, _| json_error("503 Service Unavailable", "Unavailable", "Try later")).await;
        let err = client(port).validate("good").await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_validate_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = client(port).validate("key").await.unwrap_err();
        assert!(matches!(err, TinifyClientError::Connection(_)));
    }

    fn shrink_then_download(method: &str, path: &str, port: u16) -> Canned {
        match (method, path) {
            ("POST", "/shrink") => Canned {
                status: "201 Created",
                headers: vec![
                    ("Location".into(), format!("http://127.0.0.1:{port}/output/abc")),
                    ("Compression-Count".into(), "12".into()),
                    ("Content-Type".into(), "application/json".into()),
                ],
                body: br#"{"output":{"size":3}}"#.to_vec(),
            },
            ("GET", "/output/abc") => Canned {
                status: "200 OK",
                headers: vec![("Content-Type".into(), "image/png".into())],
                body: b"png".to_vec(),
            },
            ("POST", "/output/abc") => Canned {
                status: "200 OK",
                headers: vec![("Content-Type".into(), "image/webp".into())],
                body: b"webp".to_vec(),
            },
            _ => json_error("404 Not Found", "NotFound", "Unknown route"),
        }
    }

    #[tokio::test]
    async fn test_compress_downloads_output() {
        let port = spawn_server(shrink_then_download).await;
        let image = client(port).compress("key", b"source".to_vec(), None).await.unwrap();

        assert_eq!(image.data, b"png");
        assert_eq!(image.extension.as_deref(), Some("png"));
        assert_eq!(image.compression_count, Some(12));
    }

    #[tokio::test]
    async fn test_compress_with_conversion() {
        let port = spawn_server(shrink_then_download).await;
        let image = client(port)
            .compress("key", b"source".to_vec(), Some(ConvertTarget::WebP))
            .await
            .unwrap();

        assert_eq!(image.data, b"webp");
        assert_eq!(image.extension.as_deref(), Some("webp"));
    }

    #[tokio::test]
    async fn test_compress_missing_location() {
        let port = spawn_server(|_, _, _| Canned {
            status: "201 Created",
            headers: vec![],
            body: Vec::new(),
        })
        .await;
        let err = client(port).compress("key", b"x".to_vec(), None).await.unwrap_err();
        assert!(matches!(err, TinifyClientError::InvalidResponse(_)));
    }
}
