pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::OutputFormat;
use serde::{Deserialize, Serialize};
use toml_config::LayoutConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "fwffr")]
#[command(about = "Fixed-width field format reader: convert fixed-width files to CSV or JSON")]
pub struct CliConfig {
    /// Path to the TOML layout file
    #[arg(short, long, default_value = "layout.toml")]
    pub layout: String,

    /// Fixed-width input file
    #[arg(short, long)]
    pub input: String,

    /// Output directory (overrides [output].path)
    #[arg(short, long)]
    pub output_path: Option<String>,

    /// Output formats: csv, json, jsonl (overrides [output].formats)
    #[arg(long, value_delimiter = ',')]
    pub format: Vec<OutputFormat>,

    /// Output file name without extension (overrides [output].basename)
    #[arg(long)]
    pub basename: Option<String>,

    /// Bundle all outputs into a single zip archive
    #[arg(long)]
    pub compress: bool,

    /// Fail on records whose type is not in the layout
    #[arg(long)]
    pub strict_types: bool,

    /// Show the layout summary without converting
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Command-line values win over the layout file's [output] section.
    pub fn resolve(&self, layout: &LayoutConfig) -> ConversionSettings {
        ConversionSettings {
            input_path: self.input.clone(),
            output_path: self
                .output_path
                .clone()
                .unwrap_or_else(|| layout.output_path().to_string()),
            output_formats: if self.format.is_empty() {
                layout.output_formats()
            } else {
                OutputFormat::dedup(self.format.iter().copied())
            },
            basename: self
                .basename
                .clone()
                .unwrap_or_else(|| layout.basename().to_string()),
            compress: self.compress || layout.compress(),
        }
    }
}

/// Resolved settings for one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionSettings {
    pub input_path: String,
    pub output_path: String,
    pub output_formats: Vec<OutputFormat>,
    pub basename: String,
    pub compress: bool,
}

impl ConversionSettings {
    pub fn from_layout(input_path: impl Into<String>, layout: &LayoutConfig) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: layout.output_path().to_string(),
            output_formats: layout.output_formats(),
            basename: layout.basename().to_string(),
            compress: layout.compress(),
        }
    }
}

impl ConfigProvider for ConversionSettings {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.output_formats
    }

    fn basename(&self) -> &str {
        &self.basename
    }

    fn compress(&self) -> bool {
        self.compress
    }
}
