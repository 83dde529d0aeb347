use serde::{Deserialize, Serialize};

use super::{ApiResponse, InstrumentInfo, Trend};

pub type ConstituentsResponse = ApiResponse<ConstituentsData>;

/// Index metadata plus its member list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstituentsData {
    pub info: InstrumentInfo,
    pub constituents: Vec<Constituent>,
}

/// One member of an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constituent {
    pub code_instrument: String,
    pub name: String,
    pub short_name: String,
    pub pct_day: f64,
    #[serde(rename = "pct30D")]
    pub pct_30d: f64,
    #[serde(rename = "pctCY")]
    pub pct_cy: f64,
    #[serde(rename = "pct1Y")]
    pub pct_1y: f64,
    pub last_price: f64,
    pub datetime_last_price: String,
    pub volume_money: f64,
    pub accumulated_volume_money: f64,
    #[serde(rename = "tend")]
    pub trend: Trend,
    pub performance_absolute: f64,
    pub performance_relative: f64,
}

impl Constituent {
    /// Case-insensitive substring match against the short name.
    ///
    /// `needle` must already be lower-cased.
    pub fn short_name_contains(&self, needle: &str) -> bool {
        self.short_name.to_lowercase().contains(needle)
    }
}
