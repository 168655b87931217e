//! Outbound manifest fetching.
//!
//! Redirect handling is manual: automatic following is disabled on the
//! client, one redirect is honored, and a second one is a hard failure.

use std::time::Duration;

use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

/// Identifying user-agent sent with every manifest fetch.
pub const USER_AGENT: &str = concat!("netherlink/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Manifest fetch {url} returned status {status}")]
    Status { url: String, status: StatusCode },
    #[error("Redirect from {url} carries no usable Location header")]
    MissingLocation { url: String },
    #[error("Redirect from {url} to unparsable target {location}")]
    InvalidRedirect { url: String, location: String },
    #[error("Manifest at {url} redirected more than once")]
    TooManyRedirects { url: String },
    #[error("Manifest at {url} is not valid JSON: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// HTTP client wrapper for manifest downloads.
#[derive(Debug, Clone)]
pub struct ManifestFetcher {
    client: Client,
}

impl ManifestFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(Policy::none())
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch `url` and parse the body as JSON, following at most one
    /// redirect.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let first = self.get(url).await?;
        let response = if first.status().is_redirection() {
            let target = redirect_target(&first)?;
            let second = self.get(target.as_str()).await?;
            if second.status().is_redirection() {
                return Err(FetchError::TooManyRedirects {
                    url: url.to_string(),
                });
            }
            second
        } else {
            first
        };

        let final_url = response.url().to_string();
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: final_url,
                status,
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Request {
                url: final_url.clone(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Json {
            url: final_url,
            source,
        })
    }

    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })
    }
}

fn redirect_target(response: &Response) -> Result<Url, FetchError> {
    let url = response.url();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| FetchError::MissingLocation {
            url: url.to_string(),
        })?;
    url.join(location).map_err(|_| FetchError::InvalidRedirect {
        url: url.to_string(),
        location: location.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use std::net::SocketAddr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn fetcher() -> ManifestFetcher {
        ManifestFetcher::new(Duration::from_secs(5)).unwrap()
    }

    fn response(status_line: &str, extra_headers: &[(&str, &str)], body: &str) -> String {
        let mut text = format!("HTTP/1.1 {status_line}\r\n");
        for (name, value) in extra_headers {
            text.push_str(&format!("{name}: {value}\r\n"));
        }
        text.push_str(&format!(
            "content-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        ));
        text
    }

    /// Serves the canned responses on sequential connections, then stops
    /// accepting.
    async fn spawn_host(responses: Vec<String>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for canned in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut head = [0u8; 2048];
                let _ = socket.read(&mut head).await;
                let _ = socket.write_all(canned.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        addr
    }

    #[tokio::test]
    async fn fetches_json_and_preserves_key_order() {
        let body = r#"{"z":1,"a":{"nested":true},"files":{"m.jar":"abc"}}"#;
        let addr = spawn_host(vec![response("200 OK", &[], body)]).await;
        let manifest = fetcher()
            .fetch_json(&format!("http://{addr}/mods.json"))
            .await
            .unwrap();
        assert_eq!(manifest.to_string(), body);
    }

    #[tokio::test]
    async fn follows_exactly_one_redirect() {
        let body = r#"{"files":{}}"#;
        let addr = spawn_host(vec![
            response("302 Found", &[("location", "/moved.json")], ""),
            response("200 OK", &[], body),
        ])
        .await;
        let manifest = fetcher()
            .fetch_json(&format!("http://{addr}/mods.json"))
            .await
            .unwrap();
        assert_eq!(manifest.to_string(), body);
    }

    #[tokio::test]
    async fn second_redirect_is_an_error() {
        let addr = spawn_host(vec![
            response("302 Found", &[("location", "/a.json")], ""),
            response("302 Found", &[("location", "/b.json")], ""),
        ])
        .await;
        let err = fetcher()
            .fetch_json(&format!("http://{addr}/mods.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::TooManyRedirects { .. }));
    }

    #[tokio::test]
    async fn terminal_non_success_is_an_error() {
        let addr = spawn_host(vec![response("404 Not Found", &[], "{}")]).await;
        let err = fetcher()
            .fetch_json(&format!("http://{addr}/mods.json"))
            .await
            .unwrap_err();
        match err {
            FetchError::Status { status, .. } => assert_eq!(status, StatusCode::NOT_FOUND),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn redirect_without_location_is_an_error() {
        let addr = spawn_host(vec![response("302 Found", &[], "")]).await;
        let err = fetcher()
            .fetch_json(&format!("http://{addr}/mods.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::MissingLocation { .. }));
    }

    #[tokio::test]
    async fn non_json_body_is_an_error() {
        let addr = spawn_host(vec![response("200 OK", &[], "<html></html>")]).await;
        let err = fetcher()
            .fetch_json(&format!("http://{addr}/mods.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Json { .. }));
    }
}
