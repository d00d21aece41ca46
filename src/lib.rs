//! Fixed-width field format reader.
//!
//! Splits fixed-length records into named fields, validating field separators
//! and justification along the way, and converts whole files to CSV or JSON.

pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::LayoutConfig, ConversionSettings};

pub use crate::core::{
    encoding::Encoding,
    etl::{ConversionEngine, RunSummary},
    parser::{FixedLengthFieldParser, Layout, OffsetRecordType, ParserOptions},
    pipeline::FwfPipeline,
    reader::RecordReader,
};
pub use domain::model::{FieldSpec, OutputFormat, Record};
pub use domain::ports::{JustificationOverride, RecordTypeResolver};
pub use utils::error::{FwfError, ParseError, Result};
