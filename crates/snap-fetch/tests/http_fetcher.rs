//! `HttpFetcher` against a local `tiny_http` server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use snap_config::FetchConfig;
use snap_fetch::{DocumentSource, FetchError, HttpFetcher, RetryConfig};
use tiny_http::{Header, Response, Server};

/// What the mock server answers: status, body, and an optional `Location`.
type Reply = (u16, &'static str, Option<&'static str>);

struct MockServer {
    base: String,
    hits: Arc<AtomicUsize>,
}

impl MockServer {
    /// Serve requests on a random port. `route` receives the request path
    /// and the zero-based number of the request.
    fn start<F>(route: F) -> Self
    where
        F: Fn(&str, usize) -> Reply + Send + 'static,
    {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        thread::spawn(move || {
            for request in server.incoming_requests() {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let (status, body, location) = route(request.url(), n);
                let mut response = Response::from_string(body).with_status_code(status);
                if let Some(location) = location {
                    response = response.with_header(
                        Header::from_bytes(&b"Location"[..], location.as_bytes()).unwrap(),
                    );
                }
                let _ = request.respond(response);
            }
        });
        Self {
            base: format!("http://127.0.0.1:{port}"),
            hits,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        base_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
    }
}

fn fetcher(max_attempts: u32) -> HttpFetcher {
    HttpFetcher::with_retry(&FetchConfig::default(), fast_retry(max_attempts)).unwrap()
}

#[tokio::test]
async fn fetches_body_and_status() {
    let server = MockServer::start(|_, _| (200, "<p>Terms</p>", None));
    let doc = fetcher(3).fetch(&server.url("/terms")).await.unwrap();

    assert_eq!(doc.status, 200);
    assert_eq!(doc.body, "<p>Terms</p>");
    assert_eq!(doc.final_url, server.url("/terms"));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn follows_redirects() {
    let server = MockServer::start(|path, _| match path {
        "/old" => (301, "", Some("/interim")),
        "/interim" => (302, "", Some("/new")),
        _ => (200, "moved content", None),
    });
    let doc = fetcher(1).fetch(&server.url("/old")).await.unwrap();

    assert_eq!(doc.body, "moved content");
    assert_eq!(doc.url, server.url("/old"));
    assert_eq!(doc.final_url, server.url("/new"));
}

#[tokio::test]
async fn stops_after_max_redirects() {
    let server = MockServer::start(|_, _| (302, "", Some("/loop")));
    let config = FetchConfig {
        max_redirects: 2,
        ..FetchConfig::default()
    };
    let fetcher = HttpFetcher::with_retry(&config, RetryConfig::none()).unwrap();

    let err = fetcher.fetch(&server.url("/loop")).await.unwrap_err();
    assert!(matches!(err, FetchError::Http(_)), "{err:?}");
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn retries_server_errors_until_success() {
    let server = MockServer::start(|_, n| {
        if n < 2 {
            (503, "busy", None)
        } else {
            (200, "finally", None)
        }
    });
    let doc = fetcher(3).fetch(&server.url("/terms")).await.unwrap();

    assert_eq!(doc.body, "finally");
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let server = MockServer::start(|_, _| (500, "broken", None));
    let err = fetcher(3).fetch(&server.url("/terms")).await.unwrap_err();

    assert!(
        matches!(err, FetchError::Exhausted { attempts: 3, .. }),
        "{err:?}"
    );
    assert_eq!(err.status(), Some(500));
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn not_found_fails_fast() {
    let server = MockServer::start(|_, _| (404, "missing", None));
    let err = fetcher(3).fetch(&server.url("/gone")).await.unwrap_err();

    assert!(
        matches!(err, FetchError::Status { status: 404, .. }),
        "{err:?}"
    );
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn rate_limit_is_retried() {
    let server = MockServer::start(|_, n| {
        if n == 0 {
            (429, "slow down", None)
        } else {
            (200, "ok", None)
        }
    });
    let doc = fetcher(2).fetch(&server.url("/terms")).await.unwrap();
    assert_eq!(doc.body, "ok");
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn connection_refused_is_exhausted() {
    // Bind and drop a listener so the port is very likely closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let err = fetcher(2)
        .fetch(&format!("http://127.0.0.1:{port}/"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, FetchError::Exhausted { attempts: 2, .. }),
        "{err:?}"
    );
}
