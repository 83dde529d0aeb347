use serde::{Deserialize, Serialize};

use super::{ApiResponse, InstrumentInfo, Trend};

pub type SummaryResponse = ApiResponse<SummaryData>;

/// Point-in-time quote snapshot for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryData {
    pub info: SummaryInfo,
    pub price: SummaryPrice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryInfo {
    #[serde(flatten)]
    pub instrument: InstrumentInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
}

/// Snapshot price block. Only the last price is guaranteed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPrice {
    pub last_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime_last_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime_close_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_absolute: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_relative: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_money: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accumulated_volume_money: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_instrument: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accumulated_volume_instrument: Option<f64>,
    #[serde(rename = "tend", skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_day: Option<f64>,
    #[serde(rename = "min52W", skip_serializing_if = "Option::is_none")]
    pub min_52w: Option<f64>,
    #[serde(rename = "max52W", skip_serializing_if = "Option::is_none")]
    pub max_52w: Option<f64>,
    #[serde(rename = "pct30D", skip_serializing_if = "Option::is_none")]
    pub pct_30d: Option<f64>,
    #[serde(rename = "pctRelW52", skip_serializing_if = "Option::is_none")]
    pub pct_rel_w52: Option<f64>,
    #[serde(rename = "pctRelCY", skip_serializing_if = "Option::is_none")]
    pub pct_rel_cy: Option<f64>,
}
