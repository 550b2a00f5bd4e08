use crate::domain::model::{CsvTable, PageRequest, ResultSet};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Issues one HTTP request and returns the decoded JSON body.
///
/// Non-2xx responses must come back as `TransientFetch` / `FatalQuery`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, request: &PageRequest) -> Result<Value>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    fn name(&self) -> &str;
    async fn extract(&self) -> Result<ResultSet>;
    async fn transform(&self, data: ResultSet) -> Result<CsvTable>;
    async fn load(&self, table: CsvTable) -> Result<String>;
}
