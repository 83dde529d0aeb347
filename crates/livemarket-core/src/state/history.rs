use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::config::DashboardConfig;
use crate::domain::{HistoryPoint, HistoryResponse};
use crate::http_client::HttpClient;
use crate::period::PeriodSelection;
use crate::resource::RemoteResult;

use super::instrument::{InstrumentEndpoint, InstrumentState};

/// Price series of the selected instrument.
#[derive(Debug, Clone)]
pub struct HistoryState {
    inner: InstrumentState<HistoryResponse>,
}

impl HistoryState {
    pub fn new(client: Arc<dyn HttpClient>, config: Arc<DashboardConfig>) -> Self {
        Self {
            inner: InstrumentState::new(InstrumentEndpoint::History, client, config),
        }
    }

    pub fn load(
        &self,
        instrument: &str,
    ) -> impl Future<Output = RemoteResult<HistoryResponse>> + Send + 'static {
        self.inner.load(instrument)
    }

    pub fn load_default(
        &self,
    ) -> impl Future<Output = RemoteResult<HistoryResponse>> + Send + 'static {
        self.inner.load_default()
    }

    pub fn instrument(&self) -> Option<String> {
        self.inner.instrument()
    }

    pub fn result(&self) -> RemoteResult<HistoryResponse> {
        self.inner.result()
    }

    pub fn subscribe(&self) -> watch::Receiver<RemoteResult<HistoryResponse>> {
        self.inner.subscribe()
    }

    pub async fn settled_for(&self, instrument: &str) -> RemoteResult<HistoryResponse> {
        self.inner.settled_for(instrument).await
    }

    /// Points of the current chart inside `selection`; empty when nothing is loaded.
    pub fn view(&self, selection: PeriodSelection) -> Vec<HistoryPoint> {
        self.inner
            .result()
            .data
            .map(|response| selection.apply(&response.data.chart).to_vec())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::StaticHttpClient;
    use crate::period::{Period, YearRange};
    use crate::FetchError;

    const URL: &str = "/data/history/history-IPSA.json";

    fn body(timestamps: &[i64]) -> String {
        let points: Vec<String> = timestamps
            .iter()
            .map(|ts| {
                format!(
                    r#"{{"datetimeLastPrice":"","datetimeLastPriceTs":{ts},"lastPrice":1,"highPrice":1,"lowPrice":1,"openPrice":1,"closePrice":1,"volume":0,"volumeMoney":0,"performanceRelative":0,"performanceAbsolute":0,"tend":"same"}}"#
                )
            })
            .collect();
        format!(
            r#"{{"success":true,"code":200,"data":{{"info":{{"name":"IPSA","shortName":"IPSA","codeInstrument":"IPSA"}},"chart":[{}]}}}}"#,
            points.join(",")
        )
    }

    #[tokio::test]
    async fn view_applies_the_selected_window() {
        let client = Arc::new(
            StaticHttpClient::new().with_json(URL, body(&[1699272000, 1699358400, 1699444800])),
        );
        let state = HistoryState::new(client, Arc::new(DashboardConfig::default()));
        assert!(state.view(PeriodSelection::default()).is_empty());

        state.load_default().await;

        assert_eq!(state.view(Period::All.into()).len(), 3);
        assert_eq!(state.view(Period::OneDay.into()).len(), 2);
        let next_year = YearRange::new(2024, 2024).expect("valid range");
        assert!(state.view(next_year.into()).is_empty());
    }

    #[tokio::test]
    async fn unordered_chart_is_rejected_at_the_boundary() {
        let client = Arc::new(StaticHttpClient::new().with_json(URL, body(&[30, 10])));
        let state = HistoryState::new(client, Arc::new(DashboardConfig::default()));

        let settled = state.load("IPSA").await;

        assert!(settled.data.is_none());
        assert!(matches!(settled.error, Some(FetchError::Parse { .. })));
    }
}
