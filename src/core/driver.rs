use crate::core::etl::{EtlEngine, HarvestSummary};
use crate::core::pipeline::RepositoryPipeline;
use crate::domain::ports::{PageFetcher, Storage};
use crate::repositories::Plan;
use crate::utils::error::HarvestError;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug)]
pub enum RepositoryOutcome {
    Written(HarvestSummary),
    Skipped { reason: String },
    Failed(HarvestError),
}

#[derive(Debug)]
pub struct RepositoryReport {
    pub repository: String,
    pub outcome: RepositoryOutcome,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub entries: Vec<RepositoryReport>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.outcome, RepositoryOutcome::Failed(_)))
    }

    pub fn written(&self) -> impl Iterator<Item = &HarvestSummary> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            RepositoryOutcome::Written(summary) => Some(summary),
            _ => None,
        })
    }

    pub fn outcome(&self, repository: &str) -> Option<&RepositoryOutcome> {
        self.entries
            .iter()
            .find(|e| e.repository == repository)
            .map(|e| &e.outcome)
    }
}

/// Runs each planned repository in turn. A failing repository is recorded
/// and the run moves on; files already written are left alone.
pub struct Driver<S: Storage + Clone> {
    fetcher: Arc<dyn PageFetcher>,
    storage: S,
    file_identifier: String,
    quiet: bool,
}

impl<S: Storage + Clone> Driver<S> {
    pub fn new(fetcher: Arc<dyn PageFetcher>, storage: S, file_identifier: String) -> Self {
        Self {
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

    pub async fn run(&self, plans: Vec<Plan>) -> RunReport {
        let mut report = RunReport::default();

        for plan in plans {
            let spec = match plan {
                Plan::Run(spec) => *spec,
                Plan::Skip { repository, reason } => {
                    tracing::info!("Skipping {}: {}", repository, reason);
                    report.entries.push(RepositoryReport {
                        repository: repository.name().to_string(),
                        outcome: RepositoryOutcome::Skipped { reason },
                    });
                    continue;
                }
            };

            let repository = spec.name.clone();
            let start_time = Instant::now();
            let pipeline = RepositoryPipeline::new(
                spec,
                Arc::clone(&self.fetcher),
                self.storage.clone(),
                self.file_identifier.clone(),
            )
            .quiet(self.quiet);

            let outcome = match EtlEngine::new(pipeline).run().await {
                Ok(summary) => {
                    tracing::info!(
                        "{} finished in {:?} ({} rows)",
                        repository,
                        start_time.elapsed(),
                        summary.rows
                    );
                    RepositoryOutcome::Written(summary)
                }
                Err(e) => {
                    tracing::error!("{} extraction failed: {}", repository, e);
                    tracing::error!("Suggestion: {}", e.recovery_suggestion());
                    RepositoryOutcome::Failed(e)
                }
            };
            report.entries.push(RepositoryReport {
                repository,
                outcome,
            });
        }

        report
    }
}
