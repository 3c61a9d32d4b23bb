// Roster source: fetches the raw roster CSV from the password-gated gateway.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::Config;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("password rejected by {url}")]
    Unauthorized { url: String },

    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Anything that can hand back the roster sheet as CSV text for a password.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch_csv(&self, password: &str) -> Result<String, SourceError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct LoginBody<'a> {
    password: &'a str,
}

/// Posts the password to the gateway's `/get-data` endpoint.
#[derive(Debug, Clone)]
pub struct HttpRosterSource {
    http: reqwest::Client,
    url: String,
}

impl HttpRosterSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Share an existing client (and its connection pool).
    pub fn with_client(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.source.gateway_url.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RosterSource for HttpRosterSource {
    #[instrument(skip(self, password), fields(url = %self.url))]
    async fn fetch_csv(&self, password: &str) -> Result<String, SourceError> {
        let response = self
            .http
            .post(&self.url)
            .json(&LoginBody { password })
            .send()
            .await
            .map_err(|source| SourceError::Http {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("roster request rejected");
            return Err(SourceError::Unauthorized {
                url: self.url.clone(),
            });
        }
        if !status.is_success() {
            warn!("roster request failed with {status}");
            return Err(SourceError::Status {
                url: self.url.clone(),
                status,
            });
        }

        let text = response.text().await.map_err(|source| SourceError::Body {
            url: self.url.clone(),
            source,
        })?;
        debug!("fetched {} bytes of roster CSV", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer exactly one request with `response`; the task yields the raw
    /// request text.
    async fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let task = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
            request
        });

        (format!("http://{addr}/get-data"), task)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn http_response(status: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[tokio::test]
    async fn success_returns_csv_body() {
        let csv = "ID,Name\np1,Ada\n";
        let (url, server) = serve_once(http_response("200 OK", "text/csv", csv)).await;

        let source = HttpRosterSource::new(url);
        let body = source.fetch_csv("hunter2").await.unwrap();
        assert_eq!(body, csv);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /get-data HTTP/1.1"));
        assert!(request.to_lowercase().contains("content-type: application/json"));
        assert!(request.ends_with(r#"{"password":"hunter2"}"#));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_unauthorized() {
        let (url, server) = serve_once(http_response(
            "401 Unauthorized",
            "application/json",
            r#"{"error":"Unauthorized"}"#,
        ))
        .await;

        let err = HttpRosterSource::new(url).fetch_csv("wrong").await.unwrap_err();
        assert!(matches!(err, SourceError::Unauthorized { .. }), "got {err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn server_error_maps_to_status() {
        let (url, server) = serve_once(http_response(
            "500 Internal Server Error",
            "application/json",
            r#"{"error":"Internal Server Error"}"#,
        ))
        .await;

        let err = HttpRosterSource::new(url).fetch_csv("pw").await.unwrap_err();
        match err {
            SourceError::Status { status, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR)
            }
            other => panic!("expected Status, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn connection_refused_maps_to_http() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpRosterSource::new(format!("http://{addr}/get-data"));
        let err = source.fetch_csv("pw").await.unwrap_err();
        assert!(matches!(err, SourceError::Http { .. }), "got {err:?}");
        assert!(err.to_string().contains(&addr.to_string()));
    }

    #[test]
    fn from_config_uses_gateway_url() {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let text = std::fs::read_to_string(root.join("defaults/showcase.toml")).unwrap();
        let config = crate::config::parse_showcase(
            &text,
            std::path::Path::new("showcase.toml"),
            Default::default(),
        )
        .unwrap();
        let source = HttpRosterSource::from_config(&config);
        assert_eq!(source.url(), "http://127.0.0.1:8787/get-data");
    }
}
