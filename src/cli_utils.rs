use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Form;

/// How records and query results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned columns, one row per record.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Unknown output format '{}'; use table, json or yaml",
                s
            )),
        }
    }
}

/// Renders records in the requested format.
pub fn format_records<R>(records: &[R], format: OutputFormat) -> Result<String, String>
where
    R: Form + Serialize,
{
    match format {
        OutputFormat::Table => Ok(format_table(records)),
        OutputFormat::Json => serde_json::to_string_pretty(records)
            .map_err(|e| format!("Failed to format JSON: {}", e)),
        OutputFormat::Yaml => {
            serde_yml::to_string(records).map_err(|e| format!("Failed to format YAML: {}", e))
        }
    }
}

/// Renders a single value (a draft, a count) in the requested format.
pub fn format_value<T>(value: &T, format: OutputFormat) -> Result<String, String>
where
    T: Serialize,
{
    match format {
        OutputFormat::Yaml => {
            serde_yml::to_string(value).map_err(|e| format!("Failed to format YAML: {}", e))
        }
        OutputFormat::Table | OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("Failed to format JSON: {}", e)),
    }
}

/// Renders records as aligned columns headed by their wire field names.
pub fn format_table<R: Form>(records: &[R]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            R::FIELDS
                .iter()
                .map(|f| r.field(f).unwrap_or_default())
                .collect()
        })
        .collect();
    let mut widths: Vec<usize> = R::FIELDS.iter().map(|f| f.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let mut out = pad_row(R::FIELDS.iter().copied(), &widths);
    for row in &rows {
        out.push('\n');
        out.push_str(&pad_row(row.iter().map(String::as_str), &widths));
    }
    out
}

fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Renders `(id, label)` choices, one per line.
pub fn format_options(options: &[(crate::RecordId, String)]) -> String {
    options
        .iter()
        .map(|(id, label)| format!("{:>6}  {}", id.to_string(), label))
        .collect::<Vec<_>>()
        .join("\n")
}
