use crate::domain::ports::Pipeline;
use crate::utils::error::{EtlError, Result};

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load. Whatever was extracted is always
    /// loaded; failed streams are reported afterwards as `SyncError`.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting sync");

        // Extract
        let batches = self.pipeline.extract().await?;
        let total: usize = batches.iter().map(|batch| batch.records.len()).sum();
        tracing::info!("📥 Extracted {} records from {} streams", total, batches.len());

        // Transform
        let result = self.pipeline.transform(batches).await?;
        tracing::info!("🔧 Prepared {} output files", result.jsonl_outputs.len() + 1);
        let failed_streams = result.failed_streams();

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("📁 Output saved to: {}", output_path);

        if !failed_streams.is_empty() {
            tracing::warn!(
                "⚠️ {} streams failed; partial output kept at {}",
                failed_streams.len(),
                output_path
            );
            return Err(EtlError::SyncError {
                streams: failed_streams,
            });
        }

        Ok(output_path)
    }
}
