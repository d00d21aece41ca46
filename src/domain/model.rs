use serde::{Deserialize, Serialize};
use std::fmt;

/// One fixed-length field of a record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub length: usize,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, length: usize) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

impl<S: Into<String>> From<(S, usize)> for FieldSpec {
    fn from((name, length): (S, usize)) -> Self {
        Self::new(name, length)
    }
}

/// A parsed record: field name to value, in layout order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub record_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line_number: Option<usize>,
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn new(record_type: Option<String>) -> Self {
        Self {
            record_type,
            line_number: None,
            data: serde_json::Map::new(),
        }
    }

    pub fn insert(&mut self, field: &str, value: String) {
        self.data.insert(field.to_string(), serde_json::Value::String(value));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    #[serde(rename = "csv")]
    Csv,
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "jsonl")]
    JsonLines,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::JsonLines => "jsonl",
        }
    }

    /// Drops repeated formats, keeping the first occurrence of each.
    pub fn dedup<I>(formats: I) -> Vec<OutputFormat>
    where
        I: IntoIterator<Item = OutputFormat>,
    {
        let mut unique = Vec::new();
        for format in formats {
            if !unique.contains(&format) {
                unique.push(format);
            }
        }
        unique
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::JsonLines),
            other => Err(format!(
                "Unsupported format '{}'. Valid formats: csv, json, jsonl",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputFile {
    pub name: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub records: Vec<Record>,
    pub outputs: Vec<OutputFile>,
}
