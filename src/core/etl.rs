use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSummary {
    pub repository: String,
    pub output_path: String,
    pub rows: usize,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract, transform and write one repository. Nothing is written if
    /// extraction fails.
    pub async fn run(&self) -> Result<HarvestSummary> {
        let name = self.pipeline.name();

        let raw_data = self.pipeline.extract().await?;
        tracing::debug!("{}: extracted {} records", name, raw_data.len());

        let table = self.pipeline.transform(raw_data).await?;
        let rows = table.len();

        let output_path = self.pipeline.load(table).await?;
        tracing::info!("{}: wrote {} rows to {}", name, rows, output_path);

        Ok(HarvestSummary {
            repository: name.to_string(),
            output_path,
            rows,
        })
    }
}
