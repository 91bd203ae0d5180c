//! Scrapbox REST client implementation

use crate::config::ProjectConfig;
use crate::error::{ConfigError, RemoteError, Result};
use crate::navigation::encode_uri;
use crate::page::{parse_search_payload, SearchPayload};
use crate::remote::RemoteSearchClient;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Number of pages requested by the recently-accessed listing
pub const RECENT_PAGE_LIMIT: usize = 1000;

/// Client for one Scrapbox project, authenticated with a session cookie
pub struct ScrapboxClient {
    client: Client,
    base_url: String,
    project: String,
    token: String,
}

impl ScrapboxClient {
    /// Create a new client from resolved configuration
    pub fn new(config: &ProjectConfig) -> Result<Self> {
        config.validate().map_err(|message| ConfigError::InvalidValue {
            field: "config".to_string(),
            value: message,
        })?;

        let client = Client::builder()
            .user_agent(concat!("scrap/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            project: config.project.clone(),
            token: config.token.clone(),
        })
    }

    /// Target of a query search; the query goes in exactly as typed
    pub fn search_url(&self, query: &str) -> String {
        encode_uri(&format!(
            "{}/api/pages/{}/search/query?q={}",
            self.base_url, self.project, query
        ))
    }

    /// Target of the recently-accessed listing
    pub fn recent_url(&self) -> String {
        encode_uri(&format!(
            "{}/api/pages/{}?sort=accessed&limit={}",
            self.base_url, self.project, RECENT_PAGE_LIMIT
        ))
    }

    async fn get_pages(&self, target: String) -> Result<SearchPayload> {
        let url = Url::parse(&target).map_err(|_| RemoteError::InvalidUrl {
            url: target.clone(),
        })?;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(COOKIE, format!("connect.sid={}", self.token))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| RemoteError::Network {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RemoteError::Status {
                status: response.status().as_u16(),
                url: target,
            }
            .into());
        }

        let body = response.bytes().await.map_err(|e| RemoteError::Network {
            message: format!("Failed to read response: {}", e),
        })?;

        Ok(parse_search_payload(&body))
    }
}

#[async_trait]
impl RemoteSearchClient for ScrapboxClient {
    async fn search(&self, query: &str) -> Result<SearchPayload> {
        self.get_pages(self.search_url(query)).await
    }

    async fn fetch_recently_accessed_pages(&self) -> Result<SearchPayload> {
        self.get_pages(self.recent_url()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn client() -> ScrapboxClient {
        let config = ProjectConfig::new("demo".to_string(), "s%3Atoken".to_string());
        ScrapboxClient::new(&config).unwrap()
    }

    /// Serve one canned HTTP reply on a local port. The task yields the raw
    /// request head it received.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let reply = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
             Connection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(reply.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, server)
    }

    fn local_client(base_url: String) -> ScrapboxClient {
        let config =
            ProjectConfig::new("demo".to_string(), "tok".to_string()).with_base_url(base_url);
        ScrapboxClient::new(&config).unwrap()
    }

    #[test]
    fn test_search_url_encodes_query_as_typed() {
        let client = client();
        assert_eq!(
            client.search_url("hello world"),
            "https://scrapbox.io/api/pages/demo/search/query?q=hello%20world"
        );
        assert_eq!(
            client.search_url("  日本 "),
            "https://scrapbox.io/api/pages/demo/search/query?q=%20%20%E6%97%A5%E6%9C%AC%20"
        );
    }

    #[test]
    fn test_recent_url() {
        assert_eq!(
            client().recent_url(),
            "https://scrapbox.io/api/pages/demo?sort=accessed&limit=1000"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let config = ProjectConfig::new("demo".to_string(), "tok".to_string())
            .with_base_url("http://localhost:3000/".to_string());
        let client = ScrapboxClient::new(&config).unwrap();
        assert_eq!(
            client.recent_url(),
            "http://localhost:3000/api/pages/demo?sort=accessed&limit=1000"
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ProjectConfig::new(String::new(), "tok".to_string());
        assert!(ScrapboxClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let config = ProjectConfig::new("demo".to_string(), "tok".to_string())
            .with_base_url("http://127.0.0.1:9".to_string());
        let client = ScrapboxClient::new(&config).unwrap();

        let result = client.fetch_recently_accessed_pages().await;
        assert!(matches!(result, Err(crate::error::Error::Remote(_))));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let (base_url, server) = serve_once("500 Internal Server Error", "").await;
        let client = local_client(base_url);

        let result = client.search("hello").await;
        assert!(matches!(
            result,
            Err(Error::Remote(RemoteError::Status { status: 500, .. }))
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_search_parses_pages_and_sends_session_headers() {
        let body = r#"{"pages": [{"id": "p1", "title": "Hello World", "lines": ["Hello World"]}]}"#;
        let (base_url, server) = serve_once("200 OK", body).await;
        let client = local_client(base_url);

        let pages = client
            .search("hello world")
            .await
            .unwrap()
            .into_pages()
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].id, "p1");
        assert_eq!(pages[0].title, "Hello World");

        let request = server.await.unwrap().to_lowercase();
        let request_line = request.lines().next().unwrap();
        assert_eq!(
            request_line,
            "get /api/pages/demo/search/query?q=hello%20world http/1.1"
        );
        assert!(request.contains("\r\ncookie: connect.sid=tok\r\n"));
        assert!(request.contains("\r\ncontent-type: application/json\r\n"));
    }

    #[tokio::test]
    async fn test_recent_listing_requests_accessed_order() {
        let (base_url, server) = serve_once("200 OK", r#"{"pages": []}"#).await;
        let client = local_client(base_url);

        let payload = client.fetch_recently_accessed_pages().await.unwrap();
        assert_eq!(payload.into_pages(), Some(Vec::new()));

        let request = server.await.unwrap().to_lowercase();
        let request_line = request.lines().next().unwrap();
        assert_eq!(request_line, "get /api/pages/demo?sort=accessed&limit=1000 http/1.1");
    }

    #[tokio::test]
    async fn test_unexpected_body_is_malformed() {
        let (base_url, server) = serve_once("200 OK", "<html>maintenance</html>").await;
        let client = local_client(base_url);

        let payload = client.search("hello").await.unwrap();
        assert!(matches!(payload, SearchPayload::Malformed));
        server.await.unwrap();
    }
}
