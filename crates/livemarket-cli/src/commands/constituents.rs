use std::sync::Arc;

use serde::Serialize;

use livemarket_core::{
    percent_format, price_format, ColorPalette, Constituent, ConstituentsState, DashboardConfig,
    HttpClient, InstrumentInfo,
};

use crate::cli::ConstituentsArgs;
use crate::error::CliError;
use crate::output::Report;

use super::data_root;

#[derive(Debug, Serialize)]
struct ConstituentsResponseData<'a> {
    info: Option<&'a InstrumentInfo>,
    search: &'a str,
    total: usize,
    constituents: Vec<ConstituentRow<'a>>,
}

/// A member with its display strings.
#[derive(Debug, Serialize)]
pub(super) struct ConstituentRow<'a> {
    #[serde(flatten)]
    constituent: &'a Constituent,
    display_price: String,
    display_day: String,
    day_class: String,
}

pub(super) fn rows(list: &[Constituent]) -> Vec<ConstituentRow<'_>> {
    let palette = ColorPalette::variation();
    list.iter()
        .map(|constituent| ConstituentRow {
            constituent,
            display_price: price_format(constituent.last_price),
            display_day: percent_format(constituent.pct_day, true),
            day_class: palette.class_for(constituent.pct_day),
        })
        .collect()
}

pub(super) fn lines(list: &[Constituent]) -> Vec<String> {
    list.iter()
        .map(|c| {
            format!(
                "{:<14} {:>14} {:>9}  {}",
                c.short_name,
                price_format(c.last_price),
                percent_format(c.pct_day, true),
                c.trend.as_str()
            )
        })
        .collect()
}

pub async fn run(
    args: &ConstituentsArgs,
    client: Arc<dyn HttpClient>,
    config: &DashboardConfig,
) -> Result<Report, CliError> {
    let state = ConstituentsState::new(client, config);
    state.set_search_term(args.search.as_str());
    let settled = state.load().await;
    let filtered = state.filtered();

    let data = serde_json::to_value(ConstituentsResponseData {
        info: settled.data.as_ref().map(|response| &response.data.info),
        search: &args.search,
        total: settled
            .data
            .as_ref()
            .map_or(0, |response| response.data.constituents.len()),
        constituents: rows(&filtered),
    })?;

    let mut report = Report::new("constituents", data_root(config))
        .with_data(data)
        .with_lines(lines(&filtered));
    report.push_error("constituents", settled.error.as_ref());
    Ok(report)
}
