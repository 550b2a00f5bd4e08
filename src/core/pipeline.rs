use crate::core::enrich::{Enricher, Enrichment};
use crate::core::extract::Extractor;
use crate::core::paginator::{PageOutcome, Paginator, SearchPlan};
use crate::domain::model::{CsvTable, ResultSet};
use crate::domain::ports::{PageFetcher, Pipeline, Storage};
use crate::utils::error::{HarvestError, Result};
use crate::utils::progress::RecordCounter;
use std::sync::Arc;

pub const IDENTIFIER_HEADER: &str = "DOI";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// The repository's extraction fails; nothing is written.
    Abort,
    /// Log the failure and write whatever was collected.
    KeepPartial,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Columns {
    IdentifierOnly,
    SecondaryThenIdentifier { secondary_header: String },
}

/// Everything that distinguishes one repository from another.
#[derive(Debug, Clone)]
pub struct RepositorySpec {
    /// Display name, e.g. "DataCite".
    pub name: String,
    /// Name used in the output file, e.g. "Datacite".
    pub file_label: String,
    /// "Datasets", or "Datasets_Software" when sub-searches are merged.
    pub file_kind: String,
    /// Run in order; results are concatenated into one file.
    pub searches: Vec<SearchPlan>,
    pub extractor: Extractor,
    pub columns: Columns,
    pub on_fetch_error: ErrorPolicy,
    pub enrichment: Option<Enrichment>,
}

impl RepositorySpec {
    pub fn file_name(&self, file_identifier: &str) -> String {
        format!("{}_{}_{}.csv", file_identifier, self.file_label, self.file_kind)
    }
}

pub struct RepositoryPipeline<S: Storage> {
    spec: RepositorySpec,
    fetcher: Arc<dyn PageFetcher>,
    storage: S,
    file_identifier: String,
    quiet: bool,
}

impl<S: Storage> RepositoryPipeline<S> {
    pub fn new(
        spec: RepositorySpec,
        fetcher: Arc<dyn PageFetcher>,
        storage: S,
        file_identifier: String,
    ) -> Self {
        Self {
            spec,
            fetcher,
            storage,
            file_identifier,
            quiet: false,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    async fn collect(&self, plan: &SearchPlan, results: &mut ResultSet) -> Result<()> {
        let counter = RecordCounter::new(&plan.label, self.quiet);
        let carried = plan.carried_query();
        let mut paginator = Paginator::new(self.fetcher.as_ref(), plan);

        let failure = 'pages: loop {
            let page = match paginator.next_page().await {
                PageOutcome::Page(page) => page,
                PageOutcome::NoMorePages => break None,
                PageOutcome::FetchFailed(e) => break Some(e),
            };
            tracing::debug!(
                "{}: page {} returned {} records",
                plan.label,
                page.index + 1,
                page.records.len()
            );
            for record in &page.records {
                match self
                    .spec
                    .extractor
                    .extract(record, self.fetcher.as_ref(), &carried)
                    .await
                {
                    Ok(extracted) => results.push(extracted),
                    Err(e) => break 'pages Some(e),
                }
                counter.inc(1);
            }
        };

        match failure {
            None => {
                counter.finish();
                tracing::info!(
                    "{} extraction complete: {} records from {} pages",
                    plan.label,
                    counter.count(),
                    paginator.pages_fetched()
                );
                Ok(())
            }
            Some(e) => {
                counter.abandon("failed");
                self.handle_failure(plan, e, counter.count())
            }
        }
    }

    fn handle_failure(&self, plan: &SearchPlan, err: HarvestError, collected: u64) -> Result<()> {
        match self.spec.on_fetch_error {
            ErrorPolicy::Abort => Err(err),
            ErrorPolicy::KeepPartial => {
                tracing::warn!(
                    "{}: {} (keeping {} records collected so far)",
                    plan.label,
                    err,
                    collected
                );
                Ok(())
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for RepositoryPipeline<S> {
    fn name(&self) -> &str {
        &self.spec.name
    }

    async fn extract(&self) -> Result<ResultSet> {
        let mut results = ResultSet::new();
        for plan in &self.spec.searches {
            tracing::info!("Beginning {} extraction", plan.label);
            self.collect(plan, &mut results).await?;
        }
        Ok(results)
    }

    async fn transform(&self, data: ResultSet) -> Result<CsvTable> {
        if let Some(enrichment) = &self.spec.enrichment {
            tracing::info!(
                "Fetching {} detail records for {}",
                data.len(),
                self.spec.name
            );
            let carried = self
                .spec
                .searches
                .first()
                .map(SearchPlan::carried_query)
                .unwrap_or_default();
            let enricher = Enricher::new(enrichment, self.fetcher.as_ref());
            return enricher.table(&data, &carried).await;
        }

        let table = match &self.spec.columns {
            Columns::IdentifierOnly => {
                let mut table = CsvTable::new(&[IDENTIFIER_HEADER]);
                for record in data {
                    table.push(vec![record.identifier]);
                }
                table
            }
            Columns::SecondaryThenIdentifier { secondary_header } => {
                let mut table = CsvTable::new(&[secondary_header.as_str(), IDENTIFIER_HEADER]);
                for record in data {
                    table.push(vec![record.secondary_id.unwrap_or_default(), record.identifier]);
                }
                table
            }
        };
        Ok(table)
    }

    async fn load(&self, table: CsvTable) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&table.header)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        let data = writer
            .into_inner()
            .map_err(|e| HarvestError::IoError(e.into_error()))?;

        let file_name = self.spec.file_name(&self.file_identifier);
        tracing::debug!("Writing {} rows ({} bytes) to {}", table.len(), data.len(), file_name);
        self.storage.write_file(&file_name, &data).await
    }
}
