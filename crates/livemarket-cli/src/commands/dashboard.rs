use std::sync::Arc;

use serde::Serialize;

use livemarket_core::{
    Dashboard, DashboardConfig, HttpClient, PeriodSelection, SummaryData, WindowStats,
};

use crate::cli::DashboardArgs;
use crate::error::CliError;
use crate::output::Report;

use super::constituents::{self, ConstituentRow};
use super::{data_root, history_lines, period_selection, summary, HistoryWindow};

#[derive(Debug, Serialize)]
struct DashboardResponseData<'a> {
    instrument: &'a str,
    search: &'a str,
    constituents: Vec<ConstituentRow<'a>>,
    summary: Option<&'a SummaryData>,
    history: HistoryWindow<'a>,
}

pub async fn run(
    args: &DashboardArgs,
    client: Arc<dyn HttpClient>,
    config: DashboardConfig,
) -> Result<Report, CliError> {
    let period = period_selection(&args.window)?;
    let root = data_root(&config);
    let dashboard = Dashboard::new(client, config);
    let wiring = dashboard.start()?;

    let _ = tokio::join!(dashboard.constituents().load(), dashboard.load_selected());
    if let Some(instrument) = &args.instrument {
        dashboard.select(instrument.as_str());
    }
    dashboard.constituents().set_search_term(args.search.as_str());
    match period {
        PeriodSelection::Preset(preset) => dashboard.select_period(preset),
        PeriodSelection::Custom(range) => dashboard.select_year_range(range),
    }

    let snapshot = dashboard.wait_settled().await;
    wiring.abort();

    let summary_data = snapshot.summary.data.as_ref().map(|response| &response.data);
    let data = serde_json::to_value(DashboardResponseData {
        instrument: &snapshot.instrument,
        search: &snapshot.search_term,
        constituents: constituents::rows(&snapshot.filtered_constituents),
        summary: summary_data,
        history: HistoryWindow {
            period: snapshot.period,
            stats: WindowStats::from_points(&snapshot.history_view),
            points: &snapshot.history_view,
        },
    })?;

    let mut lines = summary_data.map(summary::lines).unwrap_or_default();
    lines.push(String::new());
    lines.extend(history_lines(
        &snapshot.instrument,
        snapshot.period,
        &snapshot.history_view,
    ));
    lines.push(String::new());
    lines.push(format!(
        "constituents matching '{}': {}",
        snapshot.search_term,
        snapshot.filtered_constituents.len()
    ));
    lines.extend(constituents::lines(&snapshot.filtered_constituents));

    let mut report = Report::new("dashboard", root).with_data(data).with_lines(lines);
    report.push_error("constituents", snapshot.constituents.error.as_ref());
    report.push_error("summary", snapshot.summary.error.as_ref());
    report.push_error("history", snapshot.history.error.as_ref());
    Ok(report)
}
