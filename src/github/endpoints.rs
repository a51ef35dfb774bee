// GitHub API endpoint functions.
// Exposes the public user events feed as an `EventSource`.

use async_trait::async_trait;

use crate::error::{OctofeedError, Result};
use crate::feed::EventSource;

use super::client::{GitHubClient, RemoteResponse};

/// Longest login GitHub allows.
const MAX_LOGIN_LEN: usize = 39;

/// Trim `identity` and check it is a plausible GitHub login.
///
/// Logins are ASCII letters, digits and hyphens, never starting with a
/// hyphen. Anything else cannot exist upstream and reads as not found.
pub fn validate_login(identity: &str) -> Result<&str> {
    let login = identity.trim();
    let valid = !login.is_empty()
        && login.len() <= MAX_LOGIN_LEN
        && !login.starts_with('-')
        && login.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

    if valid {
        Ok(login)
    } else {
        Err(OctofeedError::NotFound(login.to_string()))
    }
}

impl GitHubClient {
    /// Get the first page of a user's public events.
    pub async fn get_user_events(
        &mut self,
        username: &str,
        etag: Option<&str>,
    ) -> Result<RemoteResponse> {
        let username = validate_login(username)?;
        let params = [("per_page", self.per_page().to_string())];
        self.get_conditional(&format!("/users/{}/events", username), &params, etag)
            .await
            .map_err(|e| match e {
                OctofeedError::NotFound(_) => OctofeedError::NotFound(username.to_string()),
                other => other,
            })
    }
}

#[async_trait]
impl EventSource for GitHubClient {
    async fn fetch_events(&mut self, identity: &str, etag: Option<&str>) -> Result<RemoteResponse> {
        self.get_user_events(identity, etag).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response and hand back the raw request text.
    async fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_lowercase()
        });

        (base, handle)
    }

    fn client_for(base: String) -> GitHubClient {
        let config = Config {
            api_base: base,
            per_page: 5,
            ..Config::default()
        };
        GitHubClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fresh_response_carries_etag_and_rate_limit() {
        let body = r#"[{"type":"PushEvent","repo":{"name":"octocat/hello"}}]"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nETag: \"abc\"\r\n\
             x-ratelimit-limit: 60\r\nx-ratelimit-remaining: 59\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let (base, server) = serve_once(response).await;
        let mut client = client_for(base);

        let result = client.get_user_events("octocat", None).await.unwrap();
        assert_eq!(
            result,
            RemoteResponse::Fresh {
                etag: Some("\"abc\"".to_string()),
                body: body.to_string(),
            }
        );
        assert_eq!(client.rate_limit().remaining, Some(59));

        let request = server.await.unwrap();
        assert!(request.starts_with("get /users/octocat/events?per_page=5 "));
        assert!(request.contains("accept: application/vnd.github+json"));
        assert!(!request.contains("if-none-match"));
    }

    #[tokio::test]
    async fn test_not_modified_sends_validator() {
        let (base, server) = serve_once(
            "HTTP/1.1 304 Not Modified\r\nETag: \"abc\"\r\nConnection: close\r\n\r\n"
                .to_string(),
        )
        .await;
        let mut client = client_for(base);

        let result = client
            .get_user_events("octocat", Some("\"abc\""))
            .await
            .unwrap();
        assert_eq!(result, RemoteResponse::NotModified);

        let request = server.await.unwrap();
        assert!(request.contains("if-none-match: \"abc\""));
    }

    #[tokio::test]
    async fn test_not_found_names_the_user() {
        let (base, _server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_string(),
        )
        .await;
        let mut client = client_for(base);

        match client.get_user_events("ghost-user", None).await {
            Err(OctofeedError::NotFound(name)) => assert_eq!(name, "ghost-user"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_login() {
        assert_eq!(validate_login("octocat").unwrap(), "octocat");
        assert_eq!(validate_login("  Octo-Cat42 ").unwrap(), "Octo-Cat42");
        assert!(validate_login(&"a".repeat(MAX_LOGIN_LEN)).is_ok());

        for bad in ["", "   ", "-octo", "octo/cat", "../repos/rust-lang/rust/x", "octo cat", "oct%2Fo", "é"] {
            assert!(
                matches!(validate_login(bad), Err(OctofeedError::NotFound(_))),
                "{:?} should be rejected",
                bad
            );
        }
        assert!(validate_login(&"a".repeat(MAX_LOGIN_LEN + 1)).is_err());
    }

    #[tokio::test]
    async fn test_path_traversal_identity_never_sent() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n[]".to_string(),
        )
        .await;
        let mut client = client_for(base);

        let result = client
            .get_user_events("../repos/rust-lang/rust/x", None)
            .await;
        assert!(matches!(result, Err(OctofeedError::NotFound(_))));
        server.abort();
    }

    #[tokio::test]
    async fn test_identity_trimmed_in_request() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n[]".to_string(),
        )
        .await;
        let mut client = client_for(base);

        client.get_user_events("  octocat\n", None).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("get /users/octocat/events?per_page=5 "));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let mut client = client_for(base);
        match client.get_user_events("octocat", None).await {
            Err(OctofeedError::Transport(_)) => {}
            other => panic!("expected Transport error, got {:?}", other),
        }
        assert!(!client.rate_limit().is_present());
    }

    #[tokio::test]
    async fn test_server_error_is_status_error() {
        let (base, _server) = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 4\r\nConnection: close\r\n\r\ndown"
                .to_string(),
        )
        .await;
        let mut client = client_for(base);

        match client.get_user_events("octocat", None).await {
            Err(OctofeedError::Status { status, body }) => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(body, "down");
            }
            other => panic!("expected Status error, got {:?}", other),
        }
    }
}
