use std::sync::Arc;

use serde::Serialize;

use livemarket_core::{
    percent_format, price_format, ColorPalette, DashboardConfig, HttpClient, SummaryData,
    SummaryState,
};

use crate::cli::SummaryArgs;
use crate::error::CliError;
use crate::output::Report;

use super::data_root;

#[derive(Debug, Serialize)]
struct SummaryResponseData<'a> {
    instrument: &'a str,
    summary: Option<&'a SummaryData>,
    display_price: Option<String>,
    display_change: Option<String>,
    change_class: Option<String>,
}

pub(super) fn lines(summary: &SummaryData) -> Vec<String> {
    let price = &summary.price;
    let info = &summary.info.instrument;
    let mut lines = vec![
        format!("{} ({})", info.name, info.short_name),
        format!("last      : {}", price_format(price.last_price)),
    ];
    if let Some(change) = price.performance_relative {
        lines.push(format!("change    : {}", percent_format(change, true)));
    }
    if let (Some(bid), Some(ask)) = (price.bid, price.ask) {
        lines.push(format!(
            "bid / ask : {} / {}",
            price_format(bid),
            price_format(ask)
        ));
    }
    if let (Some(min), Some(max)) = (price.min_day, price.max_day) {
        lines.push(format!("day       : {} - {}", price_format(min), price_format(max)));
    }
    if let (Some(min), Some(max)) = (price.min_52w, price.max_52w) {
        lines.push(format!("52 weeks  : {} - {}", price_format(min), price_format(max)));
    }
    lines
}

pub async fn run(
    args: &SummaryArgs,
    client: Arc<dyn HttpClient>,
    config: DashboardConfig,
) -> Result<Report, CliError> {
    let root = data_root(&config);
    let instrument = args
        .instrument
        .clone()
        .unwrap_or_else(|| config.default_instrument.clone());
    let state = SummaryState::new(client, Arc::new(config));
    let settled = state.load(&instrument).await;

    let summary = settled.data.as_ref().map(|response| &response.data);
    let change = summary.and_then(|s| s.price.performance_relative);
    let data = serde_json::to_value(SummaryResponseData {
        instrument: &instrument,
        summary,
        display_price: summary.map(|s| price_format(s.price.last_price)),
        display_change: change.map(|value| percent_format(value, true)),
        change_class: change.map(|value| ColorPalette::percentage().class_for(value)),
    })?;

    let mut report = Report::new("summary", root)
        .with_data(data)
        .with_lines(summary.map(lines).unwrap_or_default());
    report.push_error("summary", settled.error.as_ref());
    Ok(report)
}
