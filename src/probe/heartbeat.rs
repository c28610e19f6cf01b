//! Heartbeat polling.
//!
//! ChromaDB exposes `/api/v2/heartbeat` on newer servers and
//! `/api/v1/heartbeat` on older ones. Both are equally valid proof of life,
//! so the client tries v2 and falls back to v1 if v2 does not answer 200.

use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;

use crate::error::{CheckError, Result};

/// Heartbeat paths in the order they are tried.
pub const HEARTBEAT_PATHS: [&str; 2] = ["/api/v2/heartbeat", "/api/v1/heartbeat"];

/// Result of polling the heartbeat endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HeartbeatOutcome {
    /// A path answered 200.
    Healthy { path: String },
    /// The server answered, but never with 200. `code` is from the last path tried.
    UnexpectedStatus { path: String, code: u16 },
    /// The last path tried could not be reached.
    Unreachable { path: String, error: String },
}

impl HeartbeatOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HeartbeatOutcome::Healthy { .. })
    }
}

/// Polls a server's heartbeat endpoints.
pub struct HeartbeatClient {
    client: Client,
    base_url: String,
}

impl HeartbeatClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:8000`).
    ///
    /// `timeout` bounds each request, connection included.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("chroma-check/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(timeout)
            // A local server must never be reached through a proxy.
            .no_proxy()
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path`, returning the status code.
    pub fn get_status(&self, path: &str) -> Result<u16> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().map_err(|e| CheckError::Http {
            url: url.clone(),
            message: error_chain(&e),
        })?;

        let code = response.status().as_u16();
        tracing::debug!("GET {} -> {}", url, code);
        Ok(code)
    }

    /// Poll the heartbeat paths in order until one answers 200.
    ///
    /// v1 is tried after any v2 failure, a non-200 status as well as a
    /// transport error, since older servers answer 404 on the v2 path.
    pub fn check(&self) -> HeartbeatOutcome {
        let mut outcome = None;

        for path in HEARTBEAT_PATHS {
            let attempt = match self.get_status(path) {
                Ok(200) => {
                    return HeartbeatOutcome::Healthy {
                        path: path.to_string(),
                    }
                }
                Ok(code) => HeartbeatOutcome::UnexpectedStatus {
                    path: path.to_string(),
                    code,
                },
                Err(e) => HeartbeatOutcome::Unreachable {
                    path: path.to_string(),
                    error: e.to_string(),
                },
            };
            outcome = Some(attempt);
        }

        outcome.unwrap_or_else(|| HeartbeatOutcome::Unreachable {
            path: String::new(),
            error: "no heartbeat paths configured".to_string(),
        })
    }
}

/// Render an error with its source chain, `outer: inner: root`.
///
/// reqwest's top-level message ("error sending request") hides the useful
/// part, such as "Connection refused".
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> HeartbeatClient {
        HeartbeatClient::new(server.base_url(), Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn v2_healthy_skips_v1() {
        let server = MockServer::start();
        let v2 = server.mock(|when, then| {
            when.method(GET).path("/api/v2/heartbeat");
            then.status(200).body("{\"nanosecond heartbeat\": 1}");
        });

        let outcome = client_for(&server).check();

        assert_eq!(
            outcome,
            HeartbeatOutcome::Healthy {
                path: "/api/v2/heartbeat".to_string()
            }
        );
        v2.assert();
    }

    #[test]
    fn falls_back_to_v1_when_v2_missing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v2/heartbeat");
            then.status(404);
        });
        let v1 = server.mock(|when, then| {
            when.method(GET).path("/api/v1/heartbeat");
            then.status(200);
        });

        let outcome = client_for(&server).check();

        assert_eq!(
            outcome,
            HeartbeatOutcome::Healthy {
                path: "/api/v1/heartbeat".to_string()
            }
        );
        v1.assert();
    }

    #[test]
    fn falls_back_to_v1_when_v2_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v2/heartbeat");
            then.status(200).delay(Duration::from_secs(2));
        });
        let v1 = server.mock(|when, then| {
            when.method(GET).path("/api/v1/heartbeat");
            then.status(200);
        });
        let client =
            HeartbeatClient::new(server.base_url(), Duration::from_millis(200)).unwrap();

        let outcome = client.check();

        assert_eq!(
            outcome,
            HeartbeatOutcome::Healthy {
                path: "/api/v1/heartbeat".to_string()
            }
        );
        v1.assert();
    }

    #[test]
    fn v2_timeout_error_names_the_timeout() {
        let server = MockServer::start();
        for path in HEARTBEAT_PATHS {
            server.mock(|when, then| {
                when.method(GET).path(path);
                then.status(200).delay(Duration::from_secs(2));
            });
        }
        let client =
            HeartbeatClient::new(server.base_url(), Duration::from_millis(200)).unwrap();

        match client.check() {
            HeartbeatOutcome::Unreachable { path, error } => {
                assert_eq!(path, "/api/v1/heartbeat");
                assert!(error.contains("/api/v1/heartbeat"), "{error}");
            }
            other => panic!("expected Unreachable, got {other:?}"),
        }
    }

    #[test]
    fn server_errors_on_both_paths_are_unhealthy() {
        let server = MockServer::start();
        for path in HEARTBEAT_PATHS {
            server.mock(|when, then| {
                when.method(GET).path(path);
                then.status(500);
            });
        }

        let outcome = client_for(&server).check();

        assert_eq!(
            outcome,
            HeartbeatOutcome::UnexpectedStatus {
                path: "/api/v1/heartbeat".to_string(),
                code: 500
            }
        );
    }

    #[test]
    fn closed_port_is_unreachable() {
        // Bind then drop a listener to get a port nothing is serving.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = HeartbeatClient::new(
            format!("http://127.0.0.1:{}", port),
            Duration::from_millis(500),
        )
        .unwrap();

        match client.check() {
            HeartbeatOutcome::Unreachable { path, .. } => {
                assert_eq!(path, "/api/v1/heartbeat");
            }
            other => panic!("expected Unreachable, got {other:?}"),
        }
    }

    #[test]
    fn url_strips_trailing_slash() {
        let client = HeartbeatClient::new("http://127.0.0.1:8000/", Duration::from_secs(2)).unwrap();
        assert_eq!(
            client.url("/api/v2/heartbeat"),
            "http://127.0.0.1:8000/api/v2/heartbeat"
        );
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(HeartbeatOutcome::UnexpectedStatus {
            path: "/api/v1/heartbeat".to_string(),
            code: 503,
        })
        .unwrap();
        assert_eq!(json["status"], "unexpected_status");
        assert_eq!(json["code"], 503);
    }
}
