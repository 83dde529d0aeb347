//! Behavior-driven tests for the dashboard wiring
//!
//! These tests verify what a dashboard user observes when selecting
//! instruments, searching constituents and hitting backend failures.

use std::sync::Arc;

use livemarket_core::{
    Dashboard, DashboardConfig, FetchError, HttpClient, HttpResponse, Period, PeriodSelection,
    StaticHttpClient,
};

const CONSTITUENTS_URL: &str = "/data/constituyentes/constituensList.json";

fn summary_url(id: &str) -> String {
    format!("/data/resumen/{id}.json")
}

fn history_url(id: &str) -> String {
    format!("/data/history/history-{id}.json")
}

fn summary_body(id: &str, last_price: f64) -> String {
    format!(
        r#"{{"success":true,"code":200,"data":{{
            "info":{{"name":"{id}","shortName":"{id}","codeInstrument":"{id}","countryName":"Chile"}},
            "price":{{"lastPrice":{last_price},"bid":5575,"ask":5576,"tend":"down"}}}}}}"#
    )
}

fn history_body(id: &str, timestamps: &[i64]) -> String {
    let chart: Vec<String> = timestamps
        .iter()
        .map(|ts| {
            format!(
                r#"{{"datetimeLastPrice":"","datetimeLastPriceTs":{ts},"lastPrice":10,"highPrice":11,"lowPrice":9,"openPrice":10,"closePrice":10,"volume":0,"volumeMoney":0,"performanceRelative":0,"performanceAbsolute":0,"tend":"same"}}"#
            )
        })
        .collect();
    format!(
        r#"{{"success":true,"code":200,"data":{{"info":{{"name":"{id}","shortName":"{id}","codeInstrument":"{id}"}},"chart":[{}]}}}}"#,
        chart.join(",")
    )
}

fn constituents_body(short_names: &[&str]) -> String {
    let items: Vec<String> = short_names
        .iter()
        .map(|name| {
            format!(
                r#"{{"codeInstrument":"{name}","name":"{name}","shortName":"{name}","pctDay":0,"pct30D":0,"pctCY":0,"pct1Y":0,"lastPrice":1,"datetimeLastPrice":"06-11-2024 12:20:25","volumeMoney":0,"accumulatedVolumeMoney":0,"tend":"same","performanceAbsolute":0,"performanceRelative":0}}"#
            )
        })
        .collect();
    format!(
        r#"{{"success":true,"code":200,"data":{{"info":{{"name":"IPSA","shortName":"IPSA","codeInstrument":"IPSA"}},"constituents":[{}]}}}}"#,
        items.join(",")
    )
}

const CHART: [i64; 3] = [1_699_272_000, 1_699_358_400, 1_699_444_800];

fn backend() -> Arc<StaticHttpClient> {
    Arc::new(
        StaticHttpClient::new()
            .with_json(CONSTITUENTS_URL, constituents_body(&["AGUAS-A", "BCI", "BSANTANDER"]))
            .with_json(summary_url("IPSA"), summary_body("IPSA", 5575.48))
            .with_json(history_url("IPSA"), history_body("IPSA", &CHART))
            .with_json(summary_url("AGUAS-A"), summary_body("AGUAS-A", 272.0))
            .with_json(history_url("AGUAS-A"), history_body("AGUAS-A", &CHART)),
    )
}

fn dashboard(client: &Arc<StaticHttpClient>) -> Dashboard {
    Dashboard::new(
        Arc::clone(client) as Arc<dyn HttpClient>,
        DashboardConfig::default(),
    )
}

// =============================================================================
// Instrument selection
// =============================================================================

#[tokio::test]
async fn selecting_an_instrument_reloads_only_its_summary_and_history() {
    // Given: A running dashboard showing the default instrument
    let client = backend();
    let dashboard = dashboard(&client);
    let _wiring = dashboard.start().expect("runtime is available");

    // When: The user selects AGUAS-A
    dashboard.select("AGUAS-A");
    let snapshot = dashboard.wait_settled().await;

    // Then: Exactly one summary and one history request went out for it
    assert_eq!(client.request_count(&summary_url("AGUAS-A")), 1);
    assert_eq!(client.request_count(&history_url("AGUAS-A")), 1);
    assert_eq!(
        client.request_count(CONSTITUENTS_URL),
        0,
        "constituents do not depend on the selection"
    );

    // And: Both containers now hold AGUAS-A data
    assert_eq!(snapshot.instrument, "AGUAS-A");
    let summary = snapshot.summary.data.expect("summary loaded");
    assert_eq!(summary.data.info.instrument.short_name, "AGUAS-A");
    assert_eq!(snapshot.history_view.len(), 3);
    assert!(!snapshot.summary.loading && !snapshot.history.loading);
}

#[tokio::test]
async fn reselecting_the_same_instrument_does_not_refetch() {
    // Given: A dashboard that already switched to AGUAS-A
    let client = backend();
    let dashboard = dashboard(&client);
    let _wiring = dashboard.start().expect("runtime is available");
    dashboard.select("AGUAS-A");
    dashboard.wait_settled().await;

    // When: The user clicks AGUAS-A again
    dashboard.select("AGUAS-A");
    dashboard.wait_settled().await;
    tokio::task::yield_now().await;

    // Then: No extra requests were issued
    assert_eq!(client.request_count(&summary_url("AGUAS-A")), 1);
    assert_eq!(client.request_count(&history_url("AGUAS-A")), 1);
}

#[tokio::test]
async fn resetting_the_selection_returns_to_the_default_instrument() {
    // Given: A dashboard switched away from the default
    let client = backend();
    let dashboard = dashboard(&client);
    let _wiring = dashboard.start().expect("runtime is available");
    dashboard.select("AGUAS-A");
    dashboard.wait_settled().await;

    // When: The selection is reset
    dashboard.reset_selection();
    let snapshot = dashboard.wait_settled().await;

    // Then: IPSA is selected and reloaded
    assert_eq!(snapshot.instrument, "IPSA");
    assert_eq!(client.request_count(&summary_url("IPSA")), 1);
    let summary = snapshot.summary.data.expect("summary loaded");
    assert!((summary.data.price.last_price - 5575.48).abs() < f64::EPSILON);
}

#[tokio::test]
async fn slow_response_for_a_previous_selection_never_overwrites_the_current_one() {
    // Given: The backend is slow to answer for AGUAS-A
    let client = backend();
    client.hold(summary_url("AGUAS-A"));
    let dashboard = dashboard(&client);
    let _wiring = dashboard.start().expect("runtime is available");

    // When: The user picks AGUAS-A and then goes back to IPSA before it answers
    dashboard.select("AGUAS-A");
    client.wait_for_requests(2).await;
    dashboard.select("IPSA");
    let snapshot = dashboard.wait_settled().await;
    assert_eq!(snapshot.instrument, "IPSA");

    client.release(&summary_url("AGUAS-A"), 0);
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }

    // Then: The summary still shows IPSA and is not loading
    let summary = dashboard.summary().result();
    assert!(!summary.loading);
    let data = summary.data.expect("summary loaded");
    assert_eq!(data.data.info.instrument.code_instrument, "IPSA");
    assert_eq!(dashboard.summary().instrument().as_deref(), Some("IPSA"));
}

// =============================================================================
// Failure isolation
// =============================================================================

#[tokio::test]
async fn history_failure_does_not_affect_summary() {
    // Given: The history file for BCI is missing but its summary exists
    let client = backend();
    client.respond(summary_url("BCI"), Ok(HttpResponse::ok_json(summary_body("BCI", 3.5))));
    let dashboard = dashboard(&client);
    let _wiring = dashboard.start().expect("runtime is available");

    // When: The user selects BCI
    dashboard.select("BCI");
    let snapshot = dashboard.wait_settled().await;

    // Then: The summary is shown and history reports the 404 with no data
    assert!(snapshot.summary.error.is_none());
    assert!(snapshot.summary.data.is_some());
    assert_eq!(
        snapshot.history.error,
        Some(FetchError::http_status(404, "Not Found"))
    );
    assert!(snapshot.history.data.is_none());
    assert!(snapshot.history_view.is_empty());
}

#[tokio::test]
async fn failed_instrument_load_clears_previous_data() {
    // Given: A dashboard showing IPSA
    let client = backend();
    let dashboard = dashboard(&client);
    let _wiring = dashboard.start().expect("runtime is available");
    dashboard.load_selected().await;
    assert!(dashboard.summary().result().data.is_some());

    // When: The user selects an instrument whose files fail to load
    client.respond(summary_url("ENEL"), Err(livemarket_core::HttpError::new("connection reset")));
    dashboard.select("ENEL");
    let snapshot = dashboard.wait_settled().await;

    // Then: No stale IPSA data is shown next to the error
    assert!(snapshot.summary.data.is_none());
    assert_eq!(
        snapshot.summary.error,
        Some(FetchError::network("connection reset"))
    );
}

// =============================================================================
// Constituents and period
// =============================================================================

#[tokio::test]
async fn searching_constituents_filters_without_refetching() {
    // Given: A loaded constituents list
    let client = backend();
    let dashboard = dashboard(&client);
    dashboard.constituents().load().await;

    // When: The user types a search term
    dashboard.constituents().set_search_term("b");
    let snapshot = dashboard.snapshot();

    // Then: Only matching members are listed, in source order
    let names: Vec<&str> = snapshot
        .filtered_constituents
        .iter()
        .map(|c| c.short_name.as_str())
        .collect();
    assert_eq!(names, ["BCI", "BSANTANDER"]);
    assert_eq!(client.request_count(CONSTITUENTS_URL), 1);

    // And: Clearing the term restores the full list
    dashboard.constituents().set_search_term("");
    assert_eq!(dashboard.constituents().filtered().len(), 3);
}

#[tokio::test]
async fn switching_period_changes_the_view_without_refetching() {
    // Given: A dashboard with IPSA history loaded
    let client = backend();
    let dashboard = dashboard(&client);
    dashboard.load_selected().await;
    let requests_before = client.requests().len();
    let mut period_updates = dashboard.subscribe_period();

    // When: The user picks the one-day window
    dashboard.select_period(Period::OneDay);

    // Then: Period observers are notified with the new selection
    assert!(period_updates.has_changed().expect("dashboard alive"));
    assert_eq!(
        period_updates.borrow_and_update().active(),
        PeriodSelection::from(Period::OneDay)
    );

    // And: Only the last two points remain and nothing is fetched
    assert_eq!(dashboard.history_view().len(), 2);
    assert_eq!(client.requests().len(), requests_before);

    // And: Going back to ALL shows every point again
    dashboard.select_period(Period::All);
    assert_eq!(dashboard.history_view().len(), 3);
}
