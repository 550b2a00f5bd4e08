use httpmock::prelude::*;
use repo_harvest::config::toml_config::EndpointsConfig;
use repo_harvest::{plan_all, Driver, HarvestConfig, HttpFetcher, LocalStorage, RepositoryOutcome};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_failed_repository_does_not_stop_later_ones() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/dois");
        then.status(500).body("upstream exploded");
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/search");
        then.status(200).json_body(json!({
            "_embedded": {"stash:datasets": [{"identifier": "doi:10.5061/dryad.x1"}]}
        }));
    });
    let gbif = server.mock(|when, then| {
        when.method(GET).path("/dataset/search");
        then.status(200).json_body(json!({
            "endOfRecords": true,
            "results": [{"doi": "10.15468/abc"}]
        }));
    });

    let mut config = HarvestConfig::default();
    config.output.file_identifier = "UNI".to_string();
    config.output.directory = Some(temp_dir.path().to_string_lossy().into_owned());
    config.institution.ror = "https://ror.org/03yrm5c26".to_string();
    config.gbif.search_terms = vec!["Example University".to_string()];
    config.endpoints = EndpointsConfig::all(&server.base_url());

    let fetcher = Arc::new(HttpFetcher::new(&config.http).unwrap());
    let storage = LocalStorage::new(config.output_directory().to_string());
    let report = Driver::new(fetcher, storage, "UNI".to_string())
        .quiet(true)
        .run(plan_all(&config, &[]).unwrap())
        .await;

    gbif.assert_hits(1);
    assert!(report.has_failures());
    assert_eq!(report.entries.len(), 7);

    match report.outcome("DataCite") {
        Some(RepositoryOutcome::Failed(e)) => assert!(e.is_retryable()),
        other => panic!("expected DataCite failure, got {:?}", other),
    }
    assert!(matches!(
        report.outcome("Zenodo"),
        Some(RepositoryOutcome::Skipped { .. })
    ));
    assert!(matches!(
        report.outcome("OSF"),
        Some(RepositoryOutcome::Skipped { .. })
    ));

    let written: Vec<_> = report.written().map(|s| s.repository.as_str()).collect();
    assert_eq!(written, vec!["Dryad", "GBIF"]);

    assert!(!temp_dir.path().join("UNI_Datacite_Datasets.csv").exists());
    let gbif_csv = std::fs::read_to_string(temp_dir.path().join("UNI_GBIF_Datasets.csv")).unwrap();
    assert_eq!(gbif_csv, "DOI\n10.15468/abc\n");
}
