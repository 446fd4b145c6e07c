use crate::feed::query::parse_absolute_url;
use crate::prelude::{FeedSource, QuakeError, QuakeResult};
use crate::telemetry::log::LogManager;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tokio::runtime::Builder;

pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(15_000);
pub const READ_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Network bounds applied to every request.
///
/// `connect` bounds establishing the connection; `read` bounds each wait for
/// more response data and restarts after every successful read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTimeouts {
    pub connect: Duration,
    pub read: Duration,
}

impl Default for FetchTimeouts {
    fn default() -> Self {
        Self {
            connect: CONNECT_TIMEOUT,
            read: READ_TIMEOUT,
        }
    }
}

/// Blocking HTTP GET fetcher for feed documents.
///
/// A fresh client and a private current-thread runtime are built per call and
/// dropped before returning; the connection and response stream never
/// outlive `fetch`. Must be called from a blocking context.
pub struct HttpFetcher {
    timeouts: FetchTimeouts,
    logger: LogManager,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_timeouts(FetchTimeouts::default())
    }

    pub fn with_timeouts(timeouts: FetchTimeouts) -> Self {
        Self {
            timeouts,
            logger: LogManager::new("fetcher"),
        }
    }

    pub fn timeouts(&self) -> FetchTimeouts {
        self.timeouts
    }

    /// Performs the GET and returns the body of a 200 response as text.
    pub fn fetch(&self, url: &str) -> QuakeResult<String> {
        let url = parse_absolute_url(url)?;

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| {
                QuakeError::NetworkFailure(format!("creating fetch runtime: {err}"))
            })?;
        let body = runtime.block_on(self.request(url.clone()))?;

        self.logger
            .record(&format!("fetched {} bytes from {}", body.len(), url));
        Ok(body)
    }

    async fn request(&self, url: Url) -> QuakeResult<String> {
        let client = Client::builder()
            .connect_timeout(self.timeouts.connect)
            .read_timeout(self.timeouts.read)
            .build()
            .map_err(network_failure)?;

        let response = client.get(url).send().await.map_err(network_failure)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(QuakeError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(network_failure)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Like [`HttpFetcher::fetch`], but logs any failure and yields empty text.
    pub fn fetch_or_empty(&self, url: &str) -> String {
        match self.fetch(url) {
            Ok(body) => body,
            Err(err) => {
                self.logger
                    .failure(&format!("problem retrieving {url}"), &err);
                String::new()
            }
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSource for HttpFetcher {
    fn fetch(&self, url: &str) -> QuakeResult<String> {
        HttpFetcher::fetch(self, url)
    }
}

fn network_failure(err: reqwest::Error) -> QuakeError {
    QuakeError::NetworkFailure(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener};
    use std::thread;

    const SLOW_BODY: &str = r#"{"features":[]}"#;

    /// Serves one response whose body arrives in 4-byte chunks `gap` apart.
    fn serve_trickled_body(gap: Duration) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 512];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                SLOW_BODY.len()
            );
            if stream.write_all(head.as_bytes()).is_err() {
                return;
            }
            for chunk in SLOW_BODY.as_bytes().chunks(4) {
                thread::sleep(gap);
                if stream.write_all(chunk).and_then(|_| stream.flush()).is_err() {
                    return;
                }
            }
        });
        addr
    }

    #[test]
    fn default_timeouts_are_fixed() {
        let fetcher = HttpFetcher::new();
        assert_eq!(fetcher.timeouts().connect, Duration::from_millis(15_000));
        assert_eq!(fetcher.timeouts().read, Duration::from_millis(10_000));
    }

    #[test]
    fn ok_response_body_is_returned() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/query")
            .with_status(200)
            .with_body(r#"{"features":[]}"#)
            .create();

        let body = HttpFetcher::new()
            .fetch(&format!("{}/query", server.url()))
            .unwrap();

        mock.assert();
        assert_eq!(body, r#"{"features":[]}"#);
    }

    #[test]
    fn not_found_is_unexpected_status() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .expect(2)
            .create();
        let url = format!("{}/missing", server.url());

        let fetcher = HttpFetcher::new();
        assert_eq!(fetcher.fetch(&url), Err(QuakeError::UnexpectedStatus(404)));
        assert_eq!(fetcher.fetch_or_empty(&url), "");
        mock.assert();
    }

    #[test]
    fn url_without_scheme_never_reaches_the_network() {
        let mut server = mockito::Server::new();
        let mock = server.mock("GET", mockito::Matcher::Any).expect(0).create();
        let host = server.host_with_port();

        let result = HttpFetcher::new().fetch(&format!("{host}/query"));

        assert!(matches!(result, Err(QuakeError::MalformedInput(_))));
        mock.assert();
    }

    #[test]
    fn refused_connection_is_network_failure() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let fetcher = HttpFetcher::with_timeouts(FetchTimeouts {
            connect: Duration::from_millis(500),
            read: Duration::from_millis(500),
        });

        let result = fetcher.fetch(&format!("http://{addr}/query"));
        assert!(matches!(result, Err(QuakeError::NetworkFailure(_))));
        assert_eq!(fetcher.fetch_or_empty(&format!("http://{addr}/query")), "");
    }

    #[test]
    fn slow_body_within_read_timeout_succeeds() {
        // four gaps of 300 ms: longer in total than the read timeout, no single gap is
        let addr = serve_trickled_body(Duration::from_millis(300));
        let fetcher = HttpFetcher::with_timeouts(FetchTimeouts {
            connect: Duration::from_millis(2_000),
            read: Duration::from_millis(800),
        });

        let body = fetcher.fetch(&format!("http://{addr}/query")).unwrap();
        assert_eq!(body, SLOW_BODY);
    }

    #[test]
    fn stalled_body_is_network_failure() {
        let addr = serve_trickled_body(Duration::from_millis(1_500));
        let fetcher = HttpFetcher::with_timeouts(FetchTimeouts {
            connect: Duration::from_millis(2_000),
            read: Duration::from_millis(400),
        });

        let result = fetcher.fetch(&format!("http://{addr}/query"));
        assert!(matches!(result, Err(QuakeError::NetworkFailure(_))));
    }
}
