//! Composition root wiring every state container together.
//!
//! The dashboard owns one instance of each container and reacts to selection
//! changes by re-invoking the summary and history loads. Containers never
//! write into each other.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::domain::{
    Constituent, ConstituentsResponse, HistoryPoint, HistoryResponse, SummaryResponse,
};
use crate::http_client::HttpClient;
use crate::period::{Period, PeriodFilter, PeriodSelection, YearRange};
use crate::resource::RemoteResult;
use crate::state::{ConstituentsState, HistoryState, SelectionState, SummaryState};
use crate::CoreError;

/// Point-in-time copy of every container.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub instrument: String,
    pub search_term: String,
    pub constituents: RemoteResult<ConstituentsResponse>,
    pub filtered_constituents: Vec<Constituent>,
    pub summary: RemoteResult<SummaryResponse>,
    pub history: RemoteResult<HistoryResponse>,
    pub period: PeriodSelection,
    pub history_view: Vec<HistoryPoint>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    config: Arc<DashboardConfig>,
    selection: SelectionState,
    constituents: ConstituentsState,
    summary: SummaryState,
    history: HistoryState,
    period: Arc<watch::Sender<PeriodFilter>>,
}

impl Dashboard {
    pub fn new(client: Arc<dyn HttpClient>, config: DashboardConfig) -> Self {
        let config = Arc::new(config);
        Self {
            selection: SelectionState::new(config.default_instrument.clone()),
            constituents: ConstituentsState::new(Arc::clone(&client), &config),
            summary: SummaryState::new(Arc::clone(&client), Arc::clone(&config)),
            history: HistoryState::new(client, Arc::clone(&config)),
            period: Arc::new(watch::channel(PeriodFilter::default()).0),
            config,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn constituents(&self) -> &ConstituentsState {
        &self.constituents
    }

    pub fn summary(&self) -> &SummaryState {
        &self.summary
    }

    pub fn history(&self) -> &HistoryState {
        &self.history
    }

    pub fn select(&self, instrument: impl Into<String>) {
        self.selection.select(instrument);
    }

    pub fn reset_selection(&self) {
        self.selection.reset();
    }

    pub fn select_period(&self, period: Period) {
        self.period.send_modify(|filter| filter.select(period));
    }

    pub fn select_year_range(&self, range: YearRange) {
        self.period.send_modify(|filter| filter.select_range(range));
    }

    pub fn period(&self) -> PeriodSelection {
        self.period.borrow().active()
    }

    pub fn subscribe_period(&self) -> watch::Receiver<PeriodFilter> {
        self.period.subscribe()
    }

    /// Current history chart through the active period.
    pub fn history_view(&self) -> Vec<HistoryPoint> {
        self.history.view(self.period())
    }

    /// Load summary and history for the current selection.
    pub fn load_selected(
        &self,
    ) -> impl Future<Output = (RemoteResult<SummaryResponse>, RemoteResult<HistoryResponse>)>
           + Send
           + 'static {
        let instrument = self.selection.current();
        let summary = self.summary.load(&instrument);
        let history = self.history.load(&instrument);
        async move { tokio::join!(summary, history) }
    }

    /// Watch the selection and reload the dependent containers on every change.
    ///
    /// The current selection is not loaded; call [`load_selected`](Self::load_selected)
    /// for that. The task ends when every selection handle has been dropped.
    pub fn start(&self) -> Result<JoinHandle<()>, CoreError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| CoreError::RuntimeUnavailable)?;
        let mut changes = self.selection.subscribe();
        let summary = self.summary.clone();
        let history = self.history.clone();
        let spawner = runtime.clone();

        info!(instrument = %self.selection.current(), "dashboard wiring started");
        Ok(runtime.spawn(async move {
            while changes.changed().await.is_ok() {
                let instrument = changes.borrow_and_update().clone();
                debug!(%instrument, "selection changed, reloading dependents");
                spawner.spawn(summary.load(&instrument));
                spawner.spawn(history.load(&instrument));
            }
        }))
    }

    /// Wait until summary and history have settled for the current selection.
    pub async fn wait_settled(&self) -> DashboardSnapshot {
        let instrument = self.selection.current();
        tokio::join!(
            self.summary.settled_for(&instrument),
            self.history.settled_for(&instrument)
        );
        self.snapshot()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let period = self.period();
        DashboardSnapshot {
            instrument: self.selection.current(),
            search_term: self.constituents.search_term(),
            constituents: self.constituents.result(),
            filtered_constituents: self.constituents.filtered(),
            summary: self.summary.result(),
            history: self.history.result(),
            period,
            history_view: self.history.view(period),
        }
    }
}
