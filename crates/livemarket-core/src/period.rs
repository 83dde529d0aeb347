//! Period filtering of a historical price series.
//!
//! A chart is ordered oldest to newest, so every view produced here is a
//! contiguous suffix (windowed tokens) or run (year ranges) of it. Views are
//! returned as sub-slices; the underlying series is never copied or mutated.
//!
//! Windows are rolling and fixed-length, anchored at the newest point, and
//! include their lower bound:
//!
//! | Token | Window |
//! |-------|--------|
//! | `1D` | 1 day |
//! | `1S` | 7 days |
//! | `1M` | 30 days |
//! | `3M` | 90 days |
//! | `6M` | 180 days |
//! | `1Y` | 365 days |
//! | `5Y` | 1 825 days |
//! | `ALL` | whole series |

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::HistoryPoint;
use crate::ValidationError;

const DAY_SECS: i64 = 86_400;

/// Named lookback window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1S")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
    #[default]
    #[serde(rename = "ALL")]
    All,
}

impl Period {
    pub const ALL: [Self; 8] = [
        Self::OneDay,
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::FiveYears,
        Self::All,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1D",
            Self::OneWeek => "1S",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
            Self::FiveYears => "5Y",
            Self::All => "ALL",
        }
    }

    /// Window length in seconds, `None` for `ALL`.
    pub const fn window_secs(self) -> Option<i64> {
        let days = match self {
            Self::OneDay => 1,
            Self::OneWeek => 7,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
            Self::FiveYears => 5 * 365,
            Self::All => return None,
        };
        Some(days * DAY_SECS)
    }

    /// Points within the window ending at the newest point.
    pub fn apply(self, chart: &[HistoryPoint]) -> &[HistoryPoint] {
        let (Some(window), Some(latest)) = (self.window_secs(), chart.last()) else {
            return chart;
        };
        let threshold = latest.timestamp_epoch.saturating_sub(window);
        let start = chart.partition_point(|point| point.timestamp_epoch < threshold);
        &chart[start..]
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "1D" => Ok(Self::OneDay),
            "1S" => Ok(Self::OneWeek),
            "1M" => Ok(Self::OneMonth),
            "3M" => Ok(Self::ThreeMonths),
            "6M" => Ok(Self::SixMonths),
            "1Y" => Ok(Self::OneYear),
            "5Y" => Ok(Self::FiveYears),
            "ALL" => Ok(Self::All),
            _ => Err(ValidationError::InvalidPeriod {
                value: value.to_owned(),
            }),
        }
    }
}

/// Inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawYearRange")]
pub struct YearRange {
    start_year: i32,
    end_year: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawYearRange {
    start_year: i32,
    end_year: i32,
}

impl TryFrom<RawYearRange> for YearRange {
    type Error = ValidationError;

    fn try_from(raw: RawYearRange) -> Result<Self, Self::Error> {
        Self::new(raw.start_year, raw.end_year)
    }
}

impl YearRange {
    pub fn new(start_year: i32, end_year: i32) -> Result<Self, ValidationError> {
        if start_year > end_year {
            return Err(ValidationError::InvertedYearRange {
                start_year,
                end_year,
            });
        }
        Ok(Self {
            start_year,
            end_year,
        })
    }

    pub const fn start_year(self) -> i32 {
        self.start_year
    }

    pub const fn end_year(self) -> i32 {
        self.end_year
    }

    pub fn contains(self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }

    /// Points whose UTC year lies in the range.
    pub fn apply(self, chart: &[HistoryPoint]) -> &[HistoryPoint] {
        let year_of = |point: &HistoryPoint| point.year().unwrap_or(i32::MIN);
        let start = chart.partition_point(|point| year_of(point) < self.start_year);
        let end = start + chart[start..].partition_point(|point| self.contains(year_of(point)));
        &chart[start..end]
    }
}

impl Display for YearRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year)
    }
}

/// The single active view over a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum PeriodSelection {
    Preset(Period),
    Custom(YearRange),
}

impl Default for PeriodSelection {
    fn default() -> Self {
        Self::Preset(Period::All)
    }
}

impl PeriodSelection {
    pub fn apply(self, chart: &[HistoryPoint]) -> &[HistoryPoint] {
        match self {
            Self::Preset(period) => period.apply(chart),
            Self::Custom(range) => range.apply(chart),
        }
    }
}

impl Display for PeriodSelection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preset(period) => Display::fmt(period, f),
            Self::Custom(range) => Display::fmt(range, f),
        }
    }
}

impl From<Period> for PeriodSelection {
    fn from(value: Period) -> Self {
        Self::Preset(value)
    }
}

impl From<YearRange> for PeriodSelection {
    fn from(value: YearRange) -> Self {
        Self::Custom(value)
    }
}

/// Holds the active period and derives views from whatever chart it is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodFilter {
    active: PeriodSelection,
}

impl PeriodFilter {
    pub fn new(active: impl Into<PeriodSelection>) -> Self {
        Self {
            active: active.into(),
        }
    }

    pub const fn active(&self) -> PeriodSelection {
        self.active
    }

    pub fn select(&mut self, period: Period) {
        self.active = PeriodSelection::Preset(period);
    }

    pub fn select_range(&mut self, range: YearRange) {
        self.active = PeriodSelection::Custom(range);
    }

    pub fn apply<'a>(&self, chart: &'a [HistoryPoint]) -> &'a [HistoryPoint] {
        self.active.apply(chart)
    }
}

/// Summary figures for the points of one view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowStats {
    pub points: usize,
    pub first_close: f64,
    pub last_close: f64,
    pub change_absolute: f64,
    /// Percentage change from the first to the last close.
    pub change_relative: f64,
    pub min_low: f64,
    pub max_high: f64,
}

impl WindowStats {
    pub fn from_points(points: &[HistoryPoint]) -> Option<Self> {
        let first = points.first()?;
        let last = points.last()?;
        let change_absolute = last.close_price - first.close_price;
        let change_relative = if first.close_price == 0.0 {
            0.0
        } else {
            change_absolute / first.close_price * 100.0
        };

        Some(Self {
            points: points.len(),
            first_close: first.close_price,
            last_close: last.close_price,
            change_absolute,
            change_relative,
            min_low: points.iter().map(|p| p.low_price).fold(f64::INFINITY, f64::min),
            max_high: points
                .iter()
                .map(|p| p.high_price)
                .fold(f64::NEG_INFINITY, f64::max),
        })
    }
}
