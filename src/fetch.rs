use async_trait::async_trait;
use log::debug;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use scraper::Html;
use url::Url;

use crate::error::{Error, FetchError};

const DEFAULT_USER_AGENT: &str = concat!("mangadl/", env!("CARGO_PKG_VERSION"));

/// Source of raw bytes for index pages, chapter documents and images.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError>;

    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        let bytes = self.fetch_bytes(url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// HTTP fetcher. Compressed bodies are decoded by reqwest, transient failures
/// are retried by the middleware with exponential backoff.
pub struct HttpFetcher {
    client: ClientWithMiddleware,
}

impl HttpFetcher {
    pub fn new(retries: u32, user_agent: Option<&str>) -> anyhow::Result<Self> {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(retries);
        let inner = reqwest::Client::builder()
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .gzip(true)
            .build()?;
        let client = ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        debug!("Reading url: {}", url);
        let res = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status,
            });
        }

        let bytes = res.bytes().await.map_err(|source| FetchError::Body {
            url: url.clone(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

pub fn parse_document(text: &str) -> Html {
    Html::parse_document(text)
}

/// Parses user input as a URL, assuming `http://` when no scheme is given.
pub fn parse_url(input: &str) -> Result<Url, Error> {
    let input = input.trim();
    let with_scheme = if input.contains("://") {
        input.to_string()
    } else {
        format!("http://{}", input)
    };
    Url::parse(&with_scheme).map_err(|source| Error::InvalidUrl {
        url: input.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `head` and `body` to every connection on a local port and
    /// counts the requests.
    async fn serve(head: &'static str, body: Vec<u8>) -> (Url, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let mut response = format!(
                    "{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    head,
                    body.len()
                )
                .into_bytes();
                response.extend_from_slice(&body);
                let _ = socket.write_all(&response).await;
                let _ = socket.shutdown().await;
            }
        });

        let url = Url::parse(&format!("http://{}/comic/page", addr)).unwrap();
        (url, hits)
    }

    #[tokio::test]
    async fn success_body_is_returned() {
        let (url, hits) = serve("HTTP/1.1 200 OK", b"<html>index</html>".to_vec()).await;
        let fetcher = HttpFetcher::new(2, None).unwrap();
        assert_eq!("<html>index</html>", fetcher.fetch_text(&url).await.unwrap());
        assert_eq!(1, hits.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn not_found_is_a_status_error() {
        let (url, hits) = serve("HTTP/1.1 404 Not Found", b"gone".to_vec()).await;
        let fetcher = HttpFetcher::new(2, None).unwrap();

        let err = fetcher.fetch_bytes(&url).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND
        ));
        // Not transient, so never retried
        assert_eq!(1, hits.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn gzip_body_is_decoded() {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"<html>compressed</html>").unwrap();
        let body = encoder.finish().unwrap();

        let (url, _) = serve("HTTP/1.1 200 OK\r\nContent-Encoding: gzip", body).await;
        let fetcher = HttpFetcher::new(0, None).unwrap();
        assert_eq!(
            "<html>compressed</html>",
            fetcher.fetch_text(&url).await.unwrap()
        );
    }

    #[tokio::test]
    async fn transient_failures_retry_within_bound() {
        let (url, hits) = serve("HTTP/1.1 503 Service Unavailable", Vec::new()).await;
        let fetcher = HttpFetcher::new(1, None).unwrap();

        let err = fetcher.fetch_bytes(&url).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Status { status, .. } if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        ));
        assert_eq!(2, hits.load(Ordering::SeqCst));
    }

    #[test]
    fn parse_url_adds_missing_scheme() {
        let url = parse_url("www.bato.to/comic/_/comics/nonscale-r12295").unwrap();
        assert_eq!("http", url.scheme());
        assert_eq!(Some("www.bato.to"), url.host_str());
    }

    #[test]
    fn parse_url_keeps_existing_scheme() {
        let url = parse_url("  https://starkana.com/manga/T/Toriko ").unwrap();
        assert_eq!("https://starkana.com/manga/T/Toriko", url.as_str());
    }

    #[test]
    fn parse_url_rejects_garbage() {
        assert!(matches!(
            parse_url("http://"),
            Err(Error::InvalidUrl { .. })
        ));
    }
}
