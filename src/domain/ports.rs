use crate::domain::model::{ConversionResult, OutputFormat, Record};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[OutputFormat];
    fn basename(&self) -> &str;
    fn compress(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, records: Vec<Record>) -> Result<ConversionResult>;
    async fn load(&self, result: ConversionResult) -> Result<Vec<String>>;
}

/// Picks the record-type key for a line of a file that mixes record layouts.
pub trait RecordTypeResolver: Send + Sync {
    fn record_type(&self, line: &str) -> String;
}

impl<F> RecordTypeResolver for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn record_type(&self, line: &str) -> String {
        self(line)
    }
}

/// Hook consulted when a value fails the justification check.
///
/// Returning `Some` replaces the value; `None` lets the error stand.
pub trait JustificationOverride: Send + Sync {
    fn override_value(&self, field: &str, value: &str) -> Option<String>;
}

impl<F> JustificationOverride for F
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync,
{
    fn override_value(&self, field: &str, value: &str) -> Option<String> {
        self(field, value)
    }
}
