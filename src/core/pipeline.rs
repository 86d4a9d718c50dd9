use crate::config::toml_config::TomlConfig;
use crate::core::catalog::{StreamCatalog, StreamDefinition};
use crate::core::paginator::PaginationDriver;
use crate::domain::model::{Record, StreamBatch, TransformResult};
use crate::domain::ports::{GraphqlTransport, Pipeline, Storage};
use crate::utils::error::{EtlError, Result};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Syncs the selected catalog streams and writes them as JSON Lines.
pub struct PartnersPipeline<S: Storage, T: GraphqlTransport> {
    storage: S,
    transport: T,
    config: TomlConfig,
}

impl<S: Storage, T: GraphqlTransport> PartnersPipeline<S, T> {
    pub fn new(storage: S, transport: T, config: TomlConfig) -> Self {
        Self {
            storage,
            transport,
            config,
        }
    }

    pub fn streams(&self) -> Vec<StreamDefinition> {
        StreamCatalog::select(&self.config.connector, self.config.selected_streams())
    }

    /// 讀取單一 stream；失敗時保留已取得的記錄
    async fn extract_stream(&self, definition: &StreamDefinition) -> StreamBatch {
        tracing::info!("🔄 {}: starting ({})", definition.name, definition.target);

        let mut driver = PaginationDriver::new(definition, &self.config.connector, &self.transport);
        let mut records = Vec::new();
        let mut error = None;

        loop {
            match driver.next_record().await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => break,
                Err(e) => {
                    let e = EtlError::StreamError {
                        stream: definition.name.to_string(),
                        source: Box::new(e),
                    };
                    tracing::error!("❌ {} (after {} records)", e, records.len());
                    error = Some(e.to_string());
                    break;
                }
            }
        }

        if error.is_none() {
            tracing::info!(
                "✅ {}: {} records in {} pages",
                definition.name,
                records.len(),
                driver.pages_fetched()
            );
        }

        StreamBatch {
            stream: definition.name.to_string(),
            primary_key: definition.primary_key.map(str::to_string),
            records,
            error,
        }
    }

    fn output_location(&self, file: &str) -> String {
        format!("{}/{}", self.config.output_path().trim_end_matches('/'), file)
    }
}

fn to_json_lines(records: &[Record]) -> Result<String> {
    let mut output = String::new();
    for record in records {
        output.push_str(&serde_json::to_string(&record.data)?);
        output.push('\n');
    }
    Ok(output)
}

#[async_trait::async_trait]
impl<S: Storage, T: GraphqlTransport> Pipeline for PartnersPipeline<S, T> {
    async fn extract(&self) -> Result<Vec<StreamBatch>> {
        let streams = self.streams();
        tracing::debug!("Extracting {} streams", streams.len());

        let mut batches = Vec::with_capacity(streams.len());
        for definition in &streams {
            batches.push(self.extract_stream(definition).await);
        }
        Ok(batches)
    }

    async fn transform(&self, batches: Vec<StreamBatch>) -> Result<TransformResult> {
        let mut jsonl_outputs = Vec::with_capacity(batches.len());
        let mut stream_entries = Vec::with_capacity(batches.len());

        for batch in &batches {
            let file_name = format!("{}.jsonl", batch.stream);
            jsonl_outputs.push((file_name, to_json_lines(&batch.records)?));

            let status = if batch.is_failed() { "failed" } else { "succeeded" };
            stream_entries.push(json!({
                "name": batch.stream,
                "primary_key": batch.primary_key,
                "record_count": batch.records.len(),
                "status": status,
                "error": batch.error,
            }));
        }

        let manifest = json!({
            "synced_at": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            "endpoint": self.config.connector.endpoint(),
            "app_id": self.config.connector.app_gid(),
            "record_layout": self.config.connector.record_layout,
            "streams": stream_entries,
        });

        Ok(TransformResult {
            batches,
            jsonl_outputs,
            manifest,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let manifest = serde_json::to_string_pretty(&result.manifest)?;

        if let Some(archive_name) = self.config.archive_name() {
            tracing::debug!(
                "Creating ZIP file with {} files",
                result.jsonl_outputs.len() + 1
            );

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

                for (file_name, content) in &result.jsonl_outputs {
                    zip.start_file::<_, ()>(file_name.as_str(), FileOptions::default())?;
                    zip.write_all(content.as_bytes())?;
                }

                zip.start_file::<_, ()>(MANIFEST_FILE, FileOptions::default())?;
                zip.write_all(manifest.as_bytes())?;

                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(archive_name, &zip_data).await?;
            return Ok(self.output_location(archive_name));
        }

        for (file_name, content) in &result.jsonl_outputs {
            self.storage.write_file(file_name, content.as_bytes()).await?;
        }
        self.storage
            .write_file(MANIFEST_FILE, manifest.as_bytes())
            .await?;

        tracing::debug!("Wrote {} stream files and manifest", result.jsonl_outputs.len());
        Ok(self.config.output_path().to_string())
    }
}
