//! Pure display helpers for prices, percentages and sign-based color classes.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Two decimals, `+` for positive values, `%` appended when `with_symbol`.
pub fn percent_format(value: f64, with_symbol: bool) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    let suffix = if with_symbol { "%" } else { "" };
    format!("{sign}{value:.2}{suffix}")
}

/// US dollar currency rendering, e.g. `$1,234.57` or `-$12.30`.
pub fn price_format(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let scaled = (value.abs() * 100.0).round();
    if scaled >= u64::MAX as f64 {
        return format!("{sign}${:.2}", value.abs());
    }

    let cents = scaled as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Sign bucket of a numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    Positive,
    Negative,
    Neutral,
}

impl ColorClass {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Self::Positive
        } else if value < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive-color",
            Self::Negative => "negative-color",
            Self::Neutral => "neutral-color",
        }
    }
}

impl Display for ColorClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn color_class(value: f64) -> ColorClass {
    ColorClass::of(value)
}

/// Per-sign CSS classes with an optional font weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub positive: String,
    pub negative: String,
    pub neutral: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::new("text-green-500", "text-red-500", "text-gray-500")
    }
}

impl ColorPalette {
    pub fn new(
        positive: impl Into<String>,
        negative: impl Into<String>,
        neutral: impl Into<String>,
    ) -> Self {
        Self {
            positive: positive.into(),
            negative: negative.into(),
            neutral: neutral.into(),
            font_weight: None,
        }
    }

    pub fn with_font_weight(mut self, font_weight: impl Into<String>) -> Self {
        self.font_weight = Some(font_weight.into());
        self
    }

    /// Same class whatever the sign.
    pub fn price() -> Self {
        Self::new("text-gray-900", "text-gray-900", "text-gray-900")
    }

    pub fn variation() -> Self {
        Self::default().with_font_weight("font-semibold")
    }

    pub fn percentage() -> Self {
        Self::new("text-green-600", "text-red-600", "text-gray-600").with_font_weight("font-bold")
    }

    pub fn trend() -> Self {
        Self::new("text-emerald-500", "text-rose-500", "text-slate-500")
    }

    pub fn currency() -> Self {
        Self::new("text-green-700", "text-red-700", "text-gray-700").with_font_weight("font-medium")
    }

    pub fn status() -> Self {
        Self::new("text-blue-500", "text-orange-500", "text-gray-400")
    }

    pub fn class_for(&self, value: f64) -> String {
        let base = match ColorClass::of(value) {
            ColorClass::Positive => &self.positive,
            ColorClass::Negative => &self.negative,
            ColorClass::Neutral => &self.neutral,
        };
        match &self.font_weight {
            Some(weight) => format!("{base} {weight}"),
            None => base.clone(),
        }
    }
}
