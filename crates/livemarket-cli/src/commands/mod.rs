mod constituents;
mod dashboard;
mod history;
mod summary;

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use livemarket_core::{
    percent_format, price_format, DashboardConfig, HistoryPoint, HttpClient, PeriodSelection,
    ReqwestHttpClient, ValidationError, WindowStats, YearRange,
};

use crate::cli::{Cli, Command, WindowArgs};
use crate::error::CliError;
use crate::output::Report;

pub async fn run(cli: &Cli) -> Result<Report, CliError> {
    let config = cli.dashboard_config()?;
    debug!(
        deployment = %config.deployment,
        base_path = %config.base_path,
        "configuration resolved"
    );
    let client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

    let started = Instant::now();
    let mut report = match &cli.command {
        Command::Constituents(args) => constituents::run(args, client, &config).await?,
        Command::Summary(args) => summary::run(args, client, config).await?,
        Command::History(args) => history::run(args, client, config).await?,
        Command::Dashboard(args) => dashboard::run(args, client, config).await?,
    };
    report.latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    Ok(report)
}

fn data_root(config: &DashboardConfig) -> String {
    format!("{}{}", config.origin, config.base_path)
}

/// Period requested on the command line; `ALL` when nothing was given.
fn period_selection(window: &WindowArgs) -> Result<PeriodSelection, ValidationError> {
    match (window.period, window.from_year, window.to_year) {
        (Some(period), _, _) => Ok(period.into()),
        (None, Some(start_year), Some(end_year)) => {
            Ok(YearRange::new(start_year, end_year)?.into())
        }
        _ => Ok(PeriodSelection::default()),
    }
}

#[derive(Debug, Serialize)]
struct HistoryWindow<'a> {
    period: PeriodSelection,
    stats: Option<WindowStats>,
    points: &'a [HistoryPoint],
}

fn rfc3339(point: &HistoryPoint) -> String {
    point
        .datetime()
        .and_then(|datetime| datetime.format(&Rfc3339).ok())
        .unwrap_or_else(|| point.timestamp_epoch.to_string())
}

fn history_lines(instrument: &str, period: PeriodSelection, view: &[HistoryPoint]) -> Vec<String> {
    let mut lines = vec![format!("{instrument} [{period}]: {} points", view.len())];
    let (Some(first), Some(last), Some(stats)) =
        (view.first(), view.last(), WindowStats::from_points(view))
    else {
        return lines;
    };

    lines.push(format!("from      : {}", rfc3339(first)));
    lines.push(format!("to        : {}", rfc3339(last)));
    lines.push(format!(
        "close     : {} -> {} ({})",
        price_format(stats.first_close),
        price_format(stats.last_close),
        percent_format(stats.change_relative, true)
    ));
    lines.push(format!(
        "range     : {} - {}",
        price_format(stats.min_low),
        price_format(stats.max_high)
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use livemarket_core::{Period, Trend};

    fn point(ts: i64, close: f64) -> HistoryPoint {
        HistoryPoint {
            timestamp: String::new(),
            timestamp_epoch: ts,
            last_price: close,
            high_price: close + 1.0,
            low_price: close - 1.0,
            open_price: close,
            close_price: close,
            volume: 0.0,
            volume_money: 0.0,
            performance_relative: 0.0,
            performance_absolute: 0.0,
            trend: Trend::Same,
        }
    }

    fn window(period: Option<Period>, from_year: Option<i32>, to_year: Option<i32>) -> WindowArgs {
        WindowArgs {
            period,
            from_year,
            to_year,
        }
    }

    #[test]
    fn period_selection_prefers_token_then_range() {
        assert_eq!(
            period_selection(&window(Some(Period::OneYear), None, None)),
            Ok(PeriodSelection::Preset(Period::OneYear))
        );
        assert_eq!(
            period_selection(&window(None, None, None)),
            Ok(PeriodSelection::default())
        );
        let range = period_selection(&window(None, Some(2020), Some(2022))).expect("valid range");
        assert_eq!(range.to_string(), "2020-2022");
        assert!(period_selection(&window(None, Some(2022), Some(2020))).is_err());
    }

    #[test]
    fn history_lines_summarise_the_window() {
        let view = [point(1_699_358_400, 100.0), point(1_699_444_800, 110.0)];

        let lines = history_lines("IPSA", Period::OneDay.into(), &view);

        assert_eq!(lines[0], "IPSA [1D]: 2 points");
        assert_eq!(lines[1], "from      : 2023-11-07T12:00:00Z");
        assert_eq!(lines[3], "close     : $100.00 -> $110.00 (+10.00%)");
        assert_eq!(lines[4], "range     : $99.00 - $111.00");
    }

    #[test]
    fn empty_window_only_reports_the_count() {
        let lines = history_lines("IPSA", PeriodSelection::default(), &[]);
        assert_eq!(lines, ["IPSA [ALL]: 0 points"]);
    }
}
