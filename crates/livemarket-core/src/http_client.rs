use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::{watch, Semaphore};

/// GET request envelope used by resource transport calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// HTTP response envelope returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            status_text: String::from("OK"),
            body: body.into(),
        }
    }

    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: String::new(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Transport contract shared by every remote resource.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// Production HTTP client backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::with_client(
            reqwest::Client::builder()
                .user_agent(concat!("livemarket/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        )
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .get(&request.url)
                .timeout(std::time::Duration::from_millis(request.timeout_ms));

            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::new(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    HttpError::new(format!("connection failed: {e}"))
                } else {
                    HttpError::new(format!("request failed: {e}"))
                }
            })?;

            let status = response.status();
            let status_text = status.canonical_reason().unwrap_or_default().to_owned();
            let body = response
                .text()
                .await
                .map_err(|e| HttpError::new(format!("failed to read response body: {e}")))?;

            Ok(HttpResponse {
                status: status.as_u16(),
                status_text,
                body,
            })
        })
    }
}

#[derive(Debug, Default)]
struct StaticRoutes {
    responses: HashMap<String, Result<HttpResponse, HttpError>>,
    held: HashSet<String>,
    pending: Vec<(String, Arc<Semaphore>)>,
    requests: Vec<HttpRequest>,
}

/// In-memory transport serving canned responses, for offline runs and tests.
///
/// Unknown URLs answer `404 Not Found`. A held URL parks every request until
/// [`release`](Self::release) is called for it; the response is read when the
/// request is released, so it can be swapped between calls.
#[derive(Debug)]
pub struct StaticHttpClient {
    routes: Mutex<StaticRoutes>,
    seen: watch::Sender<usize>,
}

impl Default for StaticHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticHttpClient {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(StaticRoutes::default()),
            seen: watch::channel(0).0,
        }
    }

    pub fn with_json(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.respond(url, Ok(HttpResponse::ok_json(body)));
        self
    }

    pub fn with_status(
        self,
        url: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
    ) -> Self {
        self.respond(url, Ok(HttpResponse::status(status, status_text)));
        self
    }

    pub fn with_failure(self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.respond(url, Err(HttpError::new(message)));
        self
    }

    /// Replace the canned outcome for `url`.
    pub fn respond(&self, url: impl Into<String>, outcome: Result<HttpResponse, HttpError>) {
        self.lock().responses.insert(url.into(), outcome);
    }

    /// Park every subsequent request for `url` until released.
    pub fn hold(&self, url: impl Into<String>) {
        self.lock().held.insert(url.into());
    }

    /// Let the `index`-th parked request for `url` (arrival order) proceed.
    pub fn release(&self, url: &str, index: usize) -> bool {
        let routes = self.lock();
        match routes
            .pending
            .iter()
            .filter(|(pending_url, _)| pending_url == url)
            .nth(index)
        {
            Some((_, gate)) => {
                gate.add_permits(1);
                true
            }
            None => false,
        }
    }

    /// Every request executed so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|request| request.url == url)
            .count()
    }

    /// Wait until at least `count` requests have been executed.
    pub async fn wait_for_requests(&self, count: usize) {
        let mut seen = self.seen.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = seen.wait_for(|total| *total >= count).await;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StaticRoutes> {
        self.routes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl HttpClient for StaticHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let url = request.url.clone();
        let gate = {
            let mut routes = self.lock();
            routes.requests.push(request);
            let total = routes.requests.len();
            let gate = routes.held.contains(&url).then(|| {
                let gate = Arc::new(Semaphore::new(0));
                routes.pending.push((url.clone(), Arc::clone(&gate)));
                gate
            });
            self.seen.send_replace(total);
            gate
        };

        Box::pin(async move {
            if let Some(gate) = gate {
                gate.acquire()
                    .await
                    .map_err(|_| HttpError::new("request gate closed"))?
                    .forget();
            }

            self.lock()
                .responses
                .get(&url)
                .cloned()
                .unwrap_or_else(|| Ok(HttpResponse::status(404, "Not Found")))
        })
    }
}
