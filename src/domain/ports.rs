use crate::domain::model::{QueryRequest, StreamBatch, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Sends one GraphQL request and returns the decoded JSON body.
///
/// Implementations own retries, timeouts and connection reuse; callers only see
/// the final body or the error.
pub trait GraphqlTransport: Send + Sync {
    fn post(
        &self,
        request: &QueryRequest,
    ) -> impl std::future::Future<Output = Result<serde_json::Value>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<StreamBatch>>;
    async fn transform(&self, batches: Vec<StreamBatch>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
