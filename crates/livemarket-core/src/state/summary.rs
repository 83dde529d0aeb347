use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::config::DashboardConfig;
use crate::domain::SummaryResponse;
use crate::http_client::HttpClient;
use crate::resource::RemoteResult;

use super::instrument::{InstrumentEndpoint, InstrumentState};

/// Price summary of the selected instrument.
#[derive(Debug, Clone)]
pub struct SummaryState {
    inner: InstrumentState<SummaryResponse>,
}

impl SummaryState {
    pub fn new(client: Arc<dyn HttpClient>, config: Arc<DashboardConfig>) -> Self {
        Self {
            inner: InstrumentState::new(InstrumentEndpoint::Summary, client, config),
        }
    }

    pub fn load(
        &self,
        instrument: &str,
    ) -> impl Future<Output = RemoteResult<SummaryResponse>> + Send + 'static {
        self.inner.load(instrument)
    }

    pub fn load_default(
        &self,
    ) -> impl Future<Output = RemoteResult<SummaryResponse>> + Send + 'static {
        self.inner.load_default()
    }

    pub fn instrument(&self) -> Option<String> {
        self.inner.instrument()
    }

    pub fn result(&self) -> RemoteResult<SummaryResponse> {
        self.inner.result()
    }

    pub fn subscribe(&self) -> watch::Receiver<RemoteResult<SummaryResponse>> {
        self.inner.subscribe()
    }

    pub async fn settled_for(&self, instrument: &str) -> RemoteResult<SummaryResponse> {
        self.inner.settled_for(instrument).await
    }
}
