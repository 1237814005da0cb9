//! Rendering of exported records

use mindvault_core::{Error, Result};
use serde_json::{Map, Value};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Txt,
    Markdown,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
            ExportFormat::Markdown => "md",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "txt" => Ok(ExportFormat::Txt),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Render records in the given format.
///
/// JSON accepts any value. The tabular formats take an array of objects (a
/// single object counts as one record); an empty array renders as an empty
/// string.
pub fn render(data: &Value, format: ExportFormat) -> Result<String> {
    let tabular: fn(&[&Map<String, Value>]) -> String = match format {
        ExportFormat::Json => return Ok(serde_json::to_string_pretty(data)?),
        ExportFormat::Csv => render_csv,
        ExportFormat::Txt => render_txt,
        ExportFormat::Markdown => render_markdown,
    };

    let records = records(data)?;
    if records.is_empty() {
        return Ok(String::new());
    }
    Ok(tabular(&records))
}

fn records(data: &Value) -> Result<Vec<&Map<String, Value>>> {
    match data {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_object().ok_or_else(|| {
                    Error::InvalidExportData(format!("expected an object, got {}", item))
                })
            })
            .collect(),
        Value::Object(map) => Ok(vec![map]),
        other => Err(Error::InvalidExportData(format!(
            "expected an array of objects, got {}",
            other
        ))),
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Header from the first record's keys, then one row per record
fn render_csv(records: &[&Map<String, Value>]) -> String {
    let headers: Vec<&String> = records[0].keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| csv_escape(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for record in records {
        lines.push(
            headers
                .iter()
                .map(|h| csv_escape(&cell(record.get(*h))))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

fn render_txt(records: &[&Map<String, Value>]) -> String {
    records
        .iter()
        .map(|record| {
            record
                .iter()
                .map(|(k, v)| format!("{}: {}", k, cell(Some(v))))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn md_escape(field: &str) -> String {
    field.replace('|', "\\|").replace('\n', "<br>")
}

fn render_markdown(records: &[&Map<String, Value>]) -> String {
    let headers: Vec<&String> = records[0].keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(format!(
        "| {} |",
        headers.iter().map(|h| md_escape(h)).collect::<Vec<_>>().join(" | ")
    ));
    lines.push(format!(
        "| {} |",
        headers.iter().map(|_| "---").collect::<Vec<_>>().join(" | ")
    ));
    for record in records {
        lines.push(format!(
            "| {} |",
            headers
                .iter()
                .map(|h| md_escape(&cell(record.get(*h))))
                .collect::<Vec<_>>()
                .join(" | ")
        ));
    }
    lines.join("\n")
}
