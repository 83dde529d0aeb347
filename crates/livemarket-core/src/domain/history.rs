use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{ApiResponse, InstrumentInfo, Trend};
use crate::ValidationError;

pub type HistoryResponse = ApiResponse<HistoryData>;

/// Instrument metadata plus its price series, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryData {
    pub info: InstrumentInfo,
    pub chart: Vec<HistoryPoint>,
}

impl HistoryData {
    /// Check that the chart is non-decreasing by epoch timestamp.
    pub fn validate_order(&self) -> Result<(), ValidationError> {
        for (index, pair) in self.chart.windows(2).enumerate() {
            if pair[1].timestamp_epoch < pair[0].timestamp_epoch {
                return Err(ValidationError::UnorderedChart {
                    index: index + 1,
                    ts: pair[1].timestamp_epoch,
                    previous: pair[0].timestamp_epoch,
                });
            }
        }
        Ok(())
    }
}

/// One sample of the price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    /// Display timestamp as sent by the backend (`DD-MM-YYYY HH:MM:SS`).
    #[serde(rename = "datetimeLastPrice")]
    pub timestamp: String,
    /// Seconds since the Unix epoch.
    #[serde(rename = "datetimeLastPriceTs")]
    pub timestamp_epoch: i64,
    pub last_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub open_price: f64,
    pub close_price: f64,
    pub volume: f64,
    pub volume_money: f64,
    pub performance_relative: f64,
    pub performance_absolute: f64,
    #[serde(rename = "tend")]
    pub trend: Trend,
}

impl HistoryPoint {
    pub fn datetime(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.timestamp_epoch).ok()
    }

    /// UTC calendar year of the sample.
    pub fn year(&self) -> Option<i32> {
        self.datetime().map(OffsetDateTime::year)
    }
}
