//! HTTP health probe for the launched server.

use std::time::Duration;

/// Why a health probe did not pass
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HealthError {
    #[error("Connection refused")]
    ConnectionRefused,

    #[error("Health check timed out")]
    Timeout,

    #[error("Unhealthy (HTTP {0})")]
    Unhealthy(u16),

    #[error("Health check failed: {0}")]
    Failed(String),
}

/// Single GET against `url`; only HTTP 200 counts as healthy
pub async fn check_health(url: &str, timeout: Duration) -> Result<(), HealthError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| HealthError::Failed(e.to_string()))?;

    let response = client.get(url).send().await.map_err(map_request_error)?;
    let status = response.status();
    if status == reqwest::StatusCode::OK {
        Ok(())
    } else {
        Err(HealthError::Unhealthy(status.as_u16()))
    }
}

fn map_request_error(e: reqwest::Error) -> HealthError {
    if e.is_timeout() {
        HealthError::Timeout
    } else if e.is_connect() {
        HealthError::ConnectionRefused
    } else {
        HealthError::Failed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned response on a random local port.
    fn one_shot_server(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response =
                    format!("{status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/healthz")
    }

    #[tokio::test]
    async fn health_ok_on_200() {
        let url = one_shot_server("HTTP/1.1 200 OK");
        assert_eq!(check_health(&url, Duration::from_secs(5)).await, Ok(()));
    }

    #[tokio::test]
    async fn health_unhealthy_preserves_code() {
        let url = one_shot_server("HTTP/1.1 503 Service Unavailable");
        assert_eq!(
            check_health(&url, Duration::from_secs(5)).await,
            Err(HealthError::Unhealthy(503))
        );
    }

    #[tokio::test]
    async fn health_connection_refused_when_nothing_listens() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{port}/healthz");
        assert_eq!(
            check_health(&url, Duration::from_secs(5)).await,
            Err(HealthError::ConnectionRefused)
        );
    }

    #[tokio::test]
    async fn health_invalid_url_fails() {
        let result = check_health("not a url", Duration::from_secs(1)).await;
        assert!(matches!(result, Err(HealthError::Failed(_))));
    }
}
