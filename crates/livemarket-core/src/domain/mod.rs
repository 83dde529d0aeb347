//! # Domain Models
//!
//! Wire-level models for the three dashboard data files.
//!
//! Every file shares the same envelope, [`ApiResponse`], whose `data` member
//! differs per endpoint:
//!
//! | Alias | Payload | Source file |
//! |-------|---------|-------------|
//! | [`ConstituentsResponse`] | [`ConstituentsData`] | `constituyentes/constituensList.json` |
//! | [`SummaryResponse`] | [`SummaryData`] | `resumen/{id}.json` |
//! | [`HistoryResponse`] | [`HistoryData`] | `history/history-{id}.json` |
//!
//! Field names follow the backend's camelCase spelling on the wire and
//! snake_case in Rust. The backend spells the trend field `tend`.

mod constituents;
mod history;
mod summary;

use serde::{Deserialize, Serialize};

pub use constituents::{Constituent, ConstituentsData, ConstituentsResponse};
pub use history::{HistoryData, HistoryPoint, HistoryResponse};
pub use summary::{SummaryData, SummaryInfo, SummaryPrice, SummaryResponse};

/// Envelope wrapping every backend payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<D> {
    pub success: bool,
    pub code: u16,
    pub data: D,
}

/// Direction of the last price move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    #[default]
    Same,
    Down,
    Up,
}

impl Trend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Same => "same",
            Self::Down => "down",
            Self::Up => "up",
        }
    }
}

/// Descriptive instrument metadata shared by every payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentInfo {
    pub name: String,
    pub short_name: String,
    pub code_instrument: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour_open: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour_close: Option<String>,
}
