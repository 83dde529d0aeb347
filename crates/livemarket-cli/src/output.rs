use serde::Serialize;
use serde_json::Value;

use livemarket_core::FetchError;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Result of one command, rendered to stdout.
#[derive(Debug, Serialize)]
pub struct Report {
    pub command: &'static str,
    pub data_root: String,
    pub latency_ms: u64,
    pub data: Value,
    pub errors: Vec<ReportError>,
    /// Pre-formatted lines for table output.
    #[serde(skip)]
    pub lines: Vec<String>,
}

impl Report {
    pub fn new(command: &'static str, data_root: impl Into<String>) -> Self {
        Self {
            command,
            data_root: data_root.into(),
            latency_ms: 0,
            data: Value::Null,
            errors: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.lines = lines;
        self
    }

    /// Record `error` as coming from `source`, if there is one.
    pub fn push_error(&mut self, source: &'static str, error: Option<&FetchError>) {
        if let Some(error) = error {
            self.errors.push(ReportError {
                source,
                code: error.code(),
                message: error.to_string(),
                status: error.status(),
            });
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportError {
    pub source: &'static str,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

pub fn render(report: &Report, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(report),
    }

    Ok(())
}

fn render_table(report: &Report) {
    println!("command   : {}", report.command);
    println!("data_root : {}", report.data_root);
    println!("latency_ms: {}", report.latency_ms);

    if !report.lines.is_empty() {
        println!();
        for line in &report.lines {
            println!("{line}");
        }
    }

    if !report.errors.is_empty() {
        println!();
        println!("errors:");
        for error in &report.errors {
            println!("  - [{}] {}: {}", error.source, error.code, error.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_keep_code_and_status() {
        let mut report = Report::new("summary", "http://localhost:5173");
        report.push_error("summary", Some(&FetchError::http_status(404, "Not Found")));
        report.push_error("history", None);

        assert_eq!(report.errors.len(), 1);
        let json = serde_json::to_value(&report).expect("serializable");
        assert_eq!(json["errors"][0]["code"], "fetch.http_status");
        assert_eq!(json["errors"][0]["status"], 404);
        assert_eq!(json["errors"][0]["message"], "Error: 404 Not Found");
        assert!(json.get("lines").is_none());
    }
}
