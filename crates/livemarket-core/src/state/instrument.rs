use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::http_client::HttpClient;
use crate::resource::{FetchOptions, InFlight, Payload, RemoteResource, RemoteResult, ResultCell};

/// Instrument-keyed data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentEndpoint {
    Summary,
    History,
}

impl InstrumentEndpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::History => "history",
        }
    }

    pub fn url(self, config: &DashboardConfig, instrument: &str) -> String {
        match self {
            Self::Summary => config.summary_url(instrument),
            Self::History => config.history_url(instrument),
        }
    }
}

/// Container loading one instrument's file at a time.
///
/// Every [`load`](Self::load) creates a fresh [`RemoteResource`] for the
/// requested instrument and copies its outcome into this container's own cell.
/// On error the container drops its data, so a previous instrument is never
/// shown next to an error. Loads that settle after a newer load was issued
/// are discarded.
pub struct InstrumentState<T> {
    endpoint: InstrumentEndpoint,
    client: Arc<dyn HttpClient>,
    config: Arc<DashboardConfig>,
    cell: Arc<ResultCell<T>>,
    requested: Arc<watch::Sender<Option<String>>>,
}

impl<T> Clone for InstrumentState<T> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint,
            client: Arc::clone(&self.client),
            config: Arc::clone(&self.config),
            cell: Arc::clone(&self.cell),
            requested: Arc::clone(&self.requested),
        }
    }
}

impl<T> std::fmt::Debug for InstrumentState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstrumentState")
            .field("endpoint", &self.endpoint)
            .field("requested", &*self.requested.borrow())
            .finish_non_exhaustive()
    }
}

impl<T: Payload> InstrumentState<T> {
    pub fn new(
        endpoint: InstrumentEndpoint,
        client: Arc<dyn HttpClient>,
        config: Arc<DashboardConfig>,
    ) -> Self {
        Self {
            endpoint,
            client,
            config,
            cell: Arc::new(ResultCell::new()),
            requested: Arc::new(watch::channel(None).0),
        }
    }

    pub const fn endpoint(&self) -> InstrumentEndpoint {
        self.endpoint
    }

    /// Load `instrument`. `loading` is raised before this returns.
    pub fn load(
        &self,
        instrument: &str,
    ) -> impl Future<Output = RemoteResult<T>> + Send + 'static {
        let url = self.endpoint.url(&self.config, instrument);
        let options = FetchOptions::deferred()
            .with_timeout_ms(self.config.request_timeout_ms)
            .with_delay(std::time::Duration::from_millis(
                self.config.artificial_delay_ms,
            ));
        let resource = RemoteResource::<T>::with_options(Arc::clone(&self.client), url, options);

        // `loading` must be up before observers can see the new instrument.
        let generation = self.cell.begin();
        self.requested.send_replace(Some(instrument.to_owned()));
        let in_flight = InFlight::new(Arc::clone(&self.cell), generation);
        let cell = Arc::clone(&self.cell);
        let endpoint = self.endpoint;
        let instrument = instrument.to_owned();
        debug!(endpoint = endpoint.as_str(), %instrument, generation, "load issued");

        async move {
            let fetched = resource.refetch().await;
            let applied = cell.settle(generation, |state| {
                state.data = match fetched.error {
                    Some(_) => None,
                    None => fetched.data,
                };
                state.error = fetched.error;
            });
            if !applied {
                debug!(
                    endpoint = endpoint.as_str(),
                    %instrument,
                    generation,
                    "discarding stale load"
                );
            }
            drop(in_flight);
            cell.snapshot()
        }
    }

    /// Load the configured default instrument.
    pub fn load_default(&self) -> impl Future<Output = RemoteResult<T>> + Send + 'static {
        let instrument = self.config.default_instrument.clone();
        self.load(&instrument)
    }

    /// Instrument of the most recently issued load.
    pub fn instrument(&self) -> Option<String> {
        self.requested.borrow().clone()
    }

    pub fn result(&self) -> RemoteResult<T> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<RemoteResult<T>> {
        self.cell.subscribe()
    }

    /// Wait until a load for `instrument` has been issued and the container
    /// is no longer loading.
    pub async fn settled_for(&self, instrument: &str) -> RemoteResult<T> {
        let mut requested = self.requested.subscribe();
        let mut results = self.cell.subscribe();
        // Both senders live in `self`, so neither channel can close here.
        let _ = requested
            .wait_for(|current| current.as_deref() == Some(instrument))
            .await;
        let _ = results.wait_for(|state| !state.is_loading()).await;
        self.cell.snapshot()
    }
}
