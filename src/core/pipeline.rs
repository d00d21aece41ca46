use crate::core::output;
use crate::core::parser::FixedLengthFieldParser;
use crate::core::{ConfigProvider, ConversionResult, Pipeline, Record, Storage};
use crate::domain::model::{OutputFile, OutputFormat};
use crate::utils::error::Result;
use std::path::Path;

/// Converts one fixed-width file into the configured output formats.
pub struct FwfPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    parser: FixedLengthFieldParser,
}

impl<S: Storage, C: ConfigProvider> FwfPipeline<S, C> {
    pub fn new(storage: S, config: C, parser: FixedLengthFieldParser) -> Self {
        Self {
            storage,
            config,
            parser,
        }
    }

    fn output_name(&self, suffix: Option<&str>, format: OutputFormat) -> String {
        match suffix {
            Some(suffix) => format!("{}_{}.{}", self.config.basename(), suffix, format.extension()),
            None => format!("{}.{}", self.config.basename(), format.extension()),
        }
    }

    fn render_csv_files(&self, records: &[Record]) -> Result<Vec<OutputFile>> {
        if !self.parser.is_typed() {
            let header = self.parser.header_for(None);
            return Ok(vec![OutputFile {
                name: self.output_name(None, OutputFormat::Csv),
                contents: output::render_csv(&header, records)?,
            }]);
        }

        // 每種記錄類型各輸出一個 CSV
        let mut files = Vec::new();
        for record_type in self.parser.record_types() {
            let matching: Vec<&Record> = records
                .iter()
                .filter(|r| r.record_type.as_deref() == Some(record_type))
                .collect();
            if matching.is_empty() {
                tracing::debug!("No records of type {:?}; CSV skipped", record_type);
                continue;
            }
            let header = self.parser.header_for(Some(record_type));
            let suffix = output::sanitize_type_key(record_type);
            files.push(OutputFile {
                name: self.output_name(Some(&suffix), OutputFormat::Csv),
                contents: output::render_csv(&header, matching)?,
            });
        }
        Ok(files)
    }

    fn output_location(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for FwfPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let input = self.config.input_path();
        tracing::debug!("Reading fixed-width input from: {}", input);
        let data = self.storage.read_file(input).await?;
        tracing::debug!("Read {} bytes", data.len());

        let records = self.parser.parse_bytes(&data)?;
        Ok(records)
    }

    async fn transform(&self, records: Vec<Record>) -> Result<ConversionResult> {
        let mut outputs = Vec::new();

        for format in OutputFormat::dedup(self.config.output_formats().iter().copied()) {
            match format {
                OutputFormat::Csv => outputs.extend(self.render_csv_files(&records)?),
                OutputFormat::Json => outputs.push(OutputFile {
                    name: self.output_name(None, OutputFormat::Json),
                    contents: output::render_json(&records)?,
                }),
                OutputFormat::JsonLines => outputs.push(OutputFile {
                    name: self.output_name(None, OutputFormat::JsonLines),
                    contents: output::render_json_lines(&records)?,
                }),
            }
        }

        Ok(ConversionResult { records, outputs })
    }

    async fn load(&self, result: ConversionResult) -> Result<Vec<String>> {
        if self.config.compress() {
            let archive_name = format!("{}.zip", self.config.basename());
            tracing::debug!(
                "Creating ZIP file with {} files",
                result.outputs.len()
            );
            let zip_data = output::zip_outputs(&result.outputs)?;

            let location = self.output_location(&archive_name);
            tracing::debug!("Writing ZIP file ({} bytes) to {}", zip_data.len(), location);
            self.storage.write_file(&location, &zip_data).await?;
            return Ok(vec![location]);
        }

        let mut written = Vec::with_capacity(result.outputs.len());
        for file in &result.outputs {
            let location = self.output_location(&file.name);
            tracing::debug!("Writing {} ({} bytes)", location, file.contents.len());
            self.storage.write_file(&location, &file.contents).await?;
            written.push(location);
        }
        Ok(written)
    }
}
