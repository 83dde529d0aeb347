use std::sync::Arc;

use livemarket_core::{DashboardConfig, HistoryState, HttpClient, WindowStats};

use crate::cli::HistoryArgs;
use crate::error::CliError;
use crate::output::Report;

use super::{data_root, history_lines, period_selection, HistoryWindow};

pub async fn run(
    args: &HistoryArgs,
    client: Arc<dyn HttpClient>,
    config: DashboardConfig,
) -> Result<Report, CliError> {
    let period = period_selection(&args.window)?;
    let root = data_root(&config);
    let instrument = args
        .instrument
        .clone()
        .unwrap_or_else(|| config.default_instrument.clone());
    let state = HistoryState::new(client, Arc::new(config));
    let settled = state.load(&instrument).await;
    let view = state.view(period);

    let data = serde_json::to_value(HistoryWindow {
        period,
        stats: WindowStats::from_points(&view),
        points: &view,
    })?;

    let mut report = Report::new("history", root)
        .with_data(data)
        .with_lines(history_lines(&instrument, period, &view));
    report.push_error("history", settled.error.as_ref());
    Ok(report)
}
