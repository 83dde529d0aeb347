use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::domain::{Constituent, ConstituentsResponse};
use crate::http_client::HttpClient;
use crate::resource::{FetchOptions, RemoteResource, RemoteResult};

/// Order-preserving subsequence of `list` whose short name contains `term`,
/// ignoring case. A blank term selects everything; otherwise surrounding
/// whitespace is part of the match.
pub fn filter_constituents<'a>(list: &'a [Constituent], term: &str) -> Vec<&'a Constituent> {
    if term.trim().is_empty() {
        return list.iter().collect();
    }
    let needle = term.to_lowercase();
    list.iter()
        .filter(|constituent| constituent.short_name_contains(&needle))
        .collect()
}

/// Index member list plus a free-text search over it.
#[derive(Debug, Clone)]
pub struct ConstituentsState {
    resource: RemoteResource<ConstituentsResponse>,
    search_term: Arc<watch::Sender<String>>,
}

impl ConstituentsState {
    pub fn new(client: Arc<dyn HttpClient>, config: &DashboardConfig) -> Self {
        let options = FetchOptions::deferred()
            .with_timeout_ms(config.request_timeout_ms)
            .with_delay(std::time::Duration::from_millis(config.artificial_delay_ms));
        Self {
            resource: RemoteResource::with_options(client, config.constituents_url(), options),
            search_term: Arc::new(watch::channel(String::new()).0),
        }
    }

    /// Fetch the member list. `loading` is raised before this returns.
    pub fn load(
        &self,
    ) -> impl Future<Output = RemoteResult<ConstituentsResponse>> + Send + 'static {
        self.resource.refetch()
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        debug!(%term, "constituents search updated");
        self.search_term.send_if_modified(|current| {
            if *current == term {
                return false;
            }
            *current = term;
            true
        });
    }

    pub fn search_term(&self) -> String {
        self.search_term.borrow().clone()
    }

    pub fn result(&self) -> RemoteResult<ConstituentsResponse> {
        self.resource.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<RemoteResult<ConstituentsResponse>> {
        self.resource.subscribe()
    }

    /// Members matching the current search term; empty until loaded.
    pub fn filtered(&self) -> Vec<Constituent> {
        let term = self.search_term();
        let state = self.resource.snapshot();
        state
            .data
            .map(|response| {
                filter_constituents(&response.data.constituents, &term)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Observer recomputing the filtered list whenever the data or the term changes.
    pub fn watch(&self) -> FilteredConstituents {
        FilteredConstituents {
            result: self.resource.subscribe(),
            term: self.search_term.subscribe(),
        }
    }
}

/// Live view over [`ConstituentsState::filtered`].
#[derive(Debug)]
pub struct FilteredConstituents {
    result: watch::Receiver<RemoteResult<ConstituentsResponse>>,
    term: watch::Receiver<String>,
}

impl FilteredConstituents {
    pub fn current(&mut self) -> Vec<Constituent> {
        let term = self.term.borrow_and_update().clone();
        let result = self.result.borrow_and_update();
        result
            .data
            .as_ref()
            .map(|response| {
                filter_constituents(&response.data.constituents, &term)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Wait for the next change and return the recomputed list.
    ///
    /// Returns `None` once the owning state has been dropped.
    pub async fn changed(&mut self) -> Option<Vec<Constituent>> {
        let alive = tokio::select! {
            changed = self.result.changed() => changed.is_ok(),
            changed = self.term.changed() => changed.is_ok(),
        };
        alive.then(|| self.current())
    }
}
