//! Generic remote fetch primitive.
//!
//! A [`RemoteResource`] wraps one URL into a tri-state [`RemoteResult`]
//! (`data` / `error` / `loading`) that can be re-triggered with
//! [`RemoteResource::refetch`].
//!
//! # Lifecycle of a request
//!
//! | Step | Effect on the result cell |
//! |------|---------------------------|
//! | `refetch()` called | `loading = true`, `error = None` (before any await) |
//! | transport fails | `error = Network`, `data` kept |
//! | non-2xx status | `error = HttpStatus { status, status_text }`, `data` kept |
//! | body fails to parse or validate | `error = Parse`, `data` kept |
//! | success | `data = Some(parsed)` |
//! | any exit, including drop | `loading = false` |
//!
//! Every request takes a generation number. A response that settles after a
//! newer request has been issued is discarded, so the cell always reflects the
//! most recently issued request.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::{ConstituentsResponse, HistoryResponse, SummaryResponse};
use crate::http_client::{HttpClient, HttpRequest};
use crate::{CoreError, FetchError, ValidationError};

/// Body type a resource can be parsed into.
pub trait Payload: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Structural checks applied after deserialization.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl Payload for serde_json::Value {}

impl Payload for ConstituentsResponse {}

impl Payload for SummaryResponse {}

impl Payload for HistoryResponse {
    fn validate(&self) -> Result<(), ValidationError> {
        self.data.validate_order()
    }
}

/// Tri-state outcome of an asynchronous fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResult<T> {
    pub data: Option<T>,
    pub error: Option<FetchError>,
    pub loading: bool,
}

impl<T> Default for RemoteResult<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
        }
    }
}

impl<T> RemoteResult<T> {
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Neither loading nor holding anything yet.
    pub const fn is_idle(&self) -> bool {
        !self.loading && self.data.is_none() && self.error.is_none()
    }
}

/// Knobs for a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Issue the first request as soon as the resource is created.
    pub immediate: bool,
    /// Simulated latency awaited after a successful status, before parsing.
    pub delay: Duration,
    pub timeout_ms: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            immediate: true,
            delay: Duration::ZERO,
            timeout_ms: 10_000,
        }
    }
}

impl FetchOptions {
    pub fn deferred() -> Self {
        Self {
            immediate: false,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Observable result cell guarded by a request generation counter.
#[derive(Debug)]
pub(crate) struct ResultCell<T> {
    state: watch::Sender<RemoteResult<T>>,
    generation: AtomicU64,
}

impl<T: Clone> ResultCell<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: watch::channel(RemoteResult::default()).0,
            generation: AtomicU64::new(0),
        }
    }

    /// Start a request: bump the generation, raise `loading`, clear `error`.
    pub(crate) fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        generation
    }

    pub(crate) fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Apply `update` and drop `loading`, unless a newer request exists.
    pub(crate) fn settle(
        &self,
        generation: u64,
        update: impl FnOnce(&mut RemoteResult<T>),
    ) -> bool {
        if !self.is_latest(generation) {
            return false;
        }
        self.state.send_modify(|state| {
            update(state);
            state.loading = false;
        });
        true
    }

    pub(crate) fn snapshot(&self) -> RemoteResult<T> {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<RemoteResult<T>> {
        self.state.subscribe()
    }
}

/// Releases `loading` when an in-flight request goes away without settling.
pub(crate) struct InFlight<T> {
    cell: Arc<ResultCell<T>>,
    generation: u64,
}

impl<T> InFlight<T> {
    pub(crate) fn new(cell: Arc<ResultCell<T>>, generation: u64) -> Self {
        Self { cell, generation }
    }
}

impl<T> Drop for InFlight<T> {
    fn drop(&mut self) {
        if self.cell.generation.load(Ordering::SeqCst) != self.generation {
            return;
        }
        self.cell.state.send_if_modified(|state| {
            let was_loading = state.loading;
            state.loading = false;
            was_loading
        });
    }
}

/// Asynchronous fetch of one URL into an observable [`RemoteResult`].
pub struct RemoteResource<T> {
    url: Arc<str>,
    client: Arc<dyn HttpClient>,
    options: FetchOptions,
    cell: Arc<ResultCell<T>>,
}

impl<T> Clone for RemoteResource<T> {
    fn clone(&self) -> Self {
        Self {
            url: Arc::clone(&self.url),
            client: Arc::clone(&self.client),
            options: self.options,
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> std::fmt::Debug for RemoteResource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteResource")
            .field("url", &self.url)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T: Payload> RemoteResource<T> {
    /// Resource that waits for an explicit [`refetch`](Self::refetch).
    pub fn new(client: Arc<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self::with_options(client, url, FetchOptions::deferred())
    }

    /// Build without issuing anything, whatever `options.immediate` says.
    pub fn with_options(
        client: Arc<dyn HttpClient>,
        url: impl Into<String>,
        options: FetchOptions,
    ) -> Self {
        Self {
            url: Arc::from(url.into()),
            client,
            options,
            cell: Arc::new(ResultCell::new()),
        }
    }

    /// Build and, when `options.immediate` is set, spawn the first request on
    /// the current Tokio runtime.
    pub fn create(
        client: Arc<dyn HttpClient>,
        url: impl Into<String>,
        options: FetchOptions,
    ) -> Result<Self, CoreError> {
        let resource = Self::with_options(client, url, options);
        if options.immediate {
            let runtime = tokio::runtime::Handle::try_current()
                .map_err(|_| CoreError::RuntimeUnavailable)?;
            runtime.spawn(resource.refetch());
        }
        Ok(resource)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn snapshot(&self) -> RemoteResult<T> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<RemoteResult<T>> {
        self.cell.subscribe()
    }

    /// Issue a new request.
    ///
    /// `loading` is raised and `error` cleared before this returns; the
    /// returned future performs the request and resolves to the cell contents
    /// once it has settled. Dropping the future releases `loading` if it was
    /// the latest request.
    pub fn refetch(&self) -> impl Future<Output = RemoteResult<T>> + Send + 'static {
        let resource = self.clone();
        let generation = resource.cell.begin();
        let in_flight = InFlight::new(Arc::clone(&resource.cell), generation);
        debug!(url = %resource.url, generation, "fetch issued");

        async move {
            let outcome = resource.fetch().await;
            let applied = resource.cell.settle(generation, |state| match outcome {
                Ok(data) => state.data = Some(data),
                Err(error) => {
                    warn!(url = %resource.url, code = error.code(), %error, "fetch failed");
                    state.error = Some(error);
                }
            });
            if !applied {
                debug!(url = %resource.url, generation, "discarding stale response");
            }
            drop(in_flight);
            resource.cell.snapshot()
        }
    }

    async fn fetch(&self) -> Result<T, FetchError> {
        let request = HttpRequest::get(self.url.as_ref())
            .with_header("accept", "application/json")
            .with_timeout_ms(self.options.timeout_ms);

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|error| FetchError::network(error.message()))?;

        if !response.is_success() {
            return Err(FetchError::http_status(
                response.status,
                response.status_text,
            ));
        }

        if !self.options.delay.is_zero() {
            tokio::time::sleep(self.options.delay).await;
        }

        let data: T = serde_json::from_str(&response.body)
            .map_err(|error| FetchError::parse(error.to_string()))?;
        data.validate()?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::http_client::{HttpError, HttpResponse, StaticHttpClient};

    const URL: &str = "https://example.test/data.json";

    fn resource(client: &Arc<StaticHttpClient>) -> RemoteResource<Value> {
        RemoteResource::new(Arc::clone(client) as Arc<dyn HttpClient>, URL)
    }

    #[tokio::test]
    async fn starts_idle() {
        let client = Arc::new(StaticHttpClient::new());
        let resource = resource(&client);

        assert!(resource.snapshot().is_idle());
        assert_eq!(client.requests().len(), 0);
    }

    #[tokio::test]
    async fn loading_is_raised_before_the_request_settles() {
        let client = Arc::new(StaticHttpClient::new().with_json(URL, r#"{"a":1}"#));
        let resource = resource(&client);

        let pending = resource.refetch();
        assert!(resource.snapshot().loading);

        let settled = pending.await;
        assert!(!settled.loading);
        assert_eq!(settled.data, Some(json!({"a": 1})));
        assert!(settled.error.is_none());
    }

    #[tokio::test]
    async fn http_error_keeps_previous_data() {
        let client = Arc::new(StaticHttpClient::new().with_json(URL, "[1,2]"));
        let resource = resource(&client);
        resource.refetch().await;

        client.respond(URL, Ok(HttpResponse::status(503, "Service Unavailable")));
        let settled = resource.refetch().await;

        assert_eq!(settled.data, Some(json!([1, 2])));
        assert_eq!(
            settled.error,
            Some(FetchError::http_status(503, "Service Unavailable"))
        );
        assert!(!settled.loading);
    }

    #[tokio::test]
    async fn refetch_clears_previous_error_while_loading() {
        let client = Arc::new(StaticHttpClient::new().with_failure(URL, "connection refused"));
        let resource = resource(&client);
        let failed = resource.refetch().await;
        assert!(matches!(failed.error, Some(FetchError::Network { .. })));

        client.respond(URL, Ok(HttpResponse::ok_json("true")));
        let pending = resource.refetch();
        assert!(resource.snapshot().error.is_none());

        let settled = pending.await;
        assert_eq!(settled.data, Some(Value::Bool(true)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_failure() {
        let client = Arc::new(StaticHttpClient::new().with_json(URL, "{not json"));
        let resource = resource(&client);

        let settled = resource.refetch().await;

        assert!(matches!(settled.error, Some(FetchError::Parse { .. })));
        assert!(settled.data.is_none());
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let client = Arc::new(StaticHttpClient::new().with_json(URL, r#""first""#));
        client.hold(URL);
        let resource = resource(&client);

        let first = tokio::spawn(resource.refetch());
        let second = tokio::spawn(resource.refetch());
        client.wait_for_requests(2).await;

        client.respond(URL, Ok(HttpResponse::ok_json(r#""second""#)));
        client.release(URL, 1);
        second.await.expect("second request should join");
        assert_eq!(resource.snapshot().data, Some(json!("second")));

        client.respond(URL, Ok(HttpResponse::ok_json(r#""first""#)));
        client.release(URL, 0);
        let stale = first.await.expect("first request should join");

        assert_eq!(stale.data, Some(json!("second")));
        assert!(!stale.loading);
    }

    #[tokio::test]
    async fn newer_request_keeps_loading_raised_when_older_settles() {
        let client = Arc::new(StaticHttpClient::new().with_json(URL, "1"));
        client.hold(URL);
        let resource = resource(&client);

        let first = tokio::spawn(resource.refetch());
        let second = tokio::spawn(resource.refetch());
        client.wait_for_requests(2).await;

        client.release(URL, 0);
        first.await.expect("first request should join");
        assert!(resource.snapshot().loading);
        assert!(resource.snapshot().data.is_none());

        client.release(URL, 1);
        let settled = second.await.expect("second request should join");
        assert!(!settled.loading);
        assert_eq!(settled.data, Some(json!(1)));
    }

    #[tokio::test]
    async fn dropping_an_unfinished_request_releases_loading() {
        let client = Arc::new(StaticHttpClient::new().with_json(URL, "1"));
        client.hold(URL);
        let resource = resource(&client);

        let pending = resource.refetch();
        assert!(resource.snapshot().loading);
        drop(pending);

        assert!(!resource.snapshot().loading);
    }

    #[tokio::test]
    async fn immediate_resource_issues_its_first_request() {
        let client = Arc::new(StaticHttpClient::new().with_json(URL, "42"));
        let resource: RemoteResource<Value> = RemoteResource::create(
            Arc::clone(&client) as Arc<dyn HttpClient>,
            URL,
            FetchOptions::default(),
        )
        .expect("runtime is available");

        let mut updates = resource.subscribe();
        let settled = updates
            .wait_for(|state| state.data.is_some())
            .await
            .expect("resource is alive")
            .clone();

        assert_eq!(settled.data, Some(json!(42)));
        assert_eq!(client.request_count(URL), 1);
    }

    #[test]
    fn immediate_resource_needs_a_runtime() {
        let client: Arc<dyn HttpClient> = Arc::new(StaticHttpClient::new());
        let result = RemoteResource::<Value>::create(client, URL, FetchOptions::default());
        assert!(matches!(result, Err(CoreError::RuntimeUnavailable)));
    }

    #[tokio::test(start_paused = true)]
    async fn artificial_delay_runs_before_parsing() {
        let client: Arc<dyn HttpClient> = Arc::new(StaticHttpClient::new().with_json(URL, "7"));
        let resource: RemoteResource<Value> = RemoteResource::with_options(
            client,
            URL,
            FetchOptions::deferred().with_delay(Duration::from_millis(300)),
        );

        let started = tokio::time::Instant::now();
        let settled = resource.refetch().await;

        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(settled.data, Some(json!(7)));
    }

    #[tokio::test]
    async fn transport_error_message_is_preserved() {
        let client = Arc::new(StaticHttpClient::new());
        client.respond(URL, Err(HttpError::new("dns lookup failed")));
        let resource = resource(&client);

        let settled = resource.refetch().await;
        assert_eq!(settled.error, Some(FetchError::network("dns lookup failed")));
    }
}
