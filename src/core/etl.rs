use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub records: usize,
    pub outputs: Vec<String>,
    pub elapsed: Duration,
}

pub struct ConversionEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ConversionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let start = Instant::now();
        tracing::info!("Starting conversion...");

        // Extract
        tracing::info!("📥 Parsing fixed-width records...");
        let records = self.pipeline.extract().await?;
        let record_count = records.len();
        tracing::info!("Parsed {} records", record_count);

        // Transform
        tracing::info!("🔄 Rendering outputs...");
        let result = self.pipeline.transform(records).await?;
        tracing::info!("Rendered {} output files", result.outputs.len());

        // Load
        tracing::info!("💾 Writing outputs...");
        let outputs = self.pipeline.load(result).await?;
        for path in &outputs {
            tracing::info!("📁 Output saved to: {}", path);
        }

        Ok(RunSummary {
            records: record_count,
            outputs,
            elapsed: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConversionResult, Record};
    use crate::domain::model::OutputFile;
    use crate::utils::error::FwfError;

    struct StubPipeline {
        fail_on_load: bool,
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<Vec<Record>> {
            Ok(vec![Record::new(None), Record::new(None)])
        }

        async fn transform(&self, records: Vec<Record>) -> Result<ConversionResult> {
            Ok(ConversionResult {
                records,
                outputs: vec![OutputFile {
                    name: "stub.csv".to_string(),
                    contents: Vec::new(),
                }],
            })
        }

        async fn load(&self, result: ConversionResult) -> Result<Vec<String>> {
            if self.fail_on_load {
                return Err(FwfError::processing("disk full"));
            }
            Ok(result.outputs.into_iter().map(|o| o.name).collect())
        }
    }

    #[tokio::test]
    async fn test_run_reports_summary() {
        let engine = ConversionEngine::new(StubPipeline { fail_on_load: false });
        let summary = engine.run().await.unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.outputs, vec!["stub.csv".to_string()]);
    }

    #[tokio::test]
    async fn test_run_propagates_stage_errors() {
        let engine = ConversionEngine::new(StubPipeline { fail_on_load: true });
        let err = engine.run().await.unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }
}
