use httpmock::prelude::*;
use repo_harvest::config::toml_config::EndpointsConfig;
use repo_harvest::{plan_all, Driver, HarvestConfig, HttpFetcher, LocalStorage, Repository, RepositoryOutcome};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

const ROR: &str = "https://ror.org/03yrm5c26";

fn page(start: usize, len: usize, next: Option<String>) -> Value {
    let data: Vec<Value> = (start..start + len)
        .map(|i| json!({"id": format!("10.1234/ds.{i}"), "type": "dois"}))
        .collect();
    match next {
        Some(next) => json!({"data": data, "links": {"self": "x", "next": next}}),
        None => json!({"data": data, "links": {"self": "x"}}),
    }
}

fn config(server: &MockServer, dir: &TempDir) -> HarvestConfig {
    let mut config = HarvestConfig::default();
    config.output.file_identifier = "UNI".to_string();
    config.output.directory = Some(dir.path().to_string_lossy().into_owned());
    config.institution.ror = ROR.to_string();
    config.endpoints = EndpointsConfig::all(&server.base_url());
    config
}

async fn run(config: &HarvestConfig) -> repo_harvest::RunReport {
    let fetcher = Arc::new(HttpFetcher::new(&config.http).unwrap());
    let storage = LocalStorage::new(config.output_directory().to_string());
    let plans = plan_all(config, &[Repository::DataCite]).unwrap();
    Driver::new(fetcher, storage, config.output.file_identifier.clone())
        .quiet(true)
        .run(plans)
        .await
}

#[tokio::test]
async fn test_three_pages_produce_54_rows_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let first = server.mock(|when, then| {
        when.method(GET).path("/dois").query_param(
            "query",
            "creators.affiliation.affiliationIdentifier:*03yrm5c26* AND types.resourceTypeGeneral:Dataset",
        );
        then.status(200)
            .header("Content-Type", "application/vnd.api+json")
            .json_body(page(0, 25, Some(server.url("/dois-page-2"))));
    });
    let second = server.mock(|when, then| {
        when.method(GET).path("/dois-page-2");
        then.status(200)
            .json_body(page(25, 25, Some(server.url("/dois-page-3"))));
    });
    let third = server.mock(|when, then| {
        when.method(GET).path("/dois-page-3");
        then.status(200).json_body(page(50, 4, None));
    });

    let report = run(&config(&server, &temp_dir)).await;

    first.assert();
    second.assert();
    third.assert();
    assert!(!report.has_failures());

    let path = temp_dir.path().join("UNI_Datacite_Datasets.csv");
    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "DOI");
    assert_eq!(lines.len(), 55);
    let expected: Vec<String> = (0..54).map(|i| format!("10.1234/ds.{i}")).collect();
    assert_eq!(lines[1..], expected[..]);

    let summary = report.written().next().unwrap();
    assert_eq!(summary.rows, 54);
}

#[tokio::test]
async fn test_empty_result_writes_header_only() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/dois");
        then.status(200).json_body(json!({"data": [], "links": {}}));
    });

    let report = run(&config(&server, &temp_dir)).await;

    assert!(!report.has_failures());
    let content =
        std::fs::read_to_string(temp_dir.path().join("UNI_Datacite_Datasets.csv")).unwrap();
    assert_eq!(content, "DOI\n");
}

#[tokio::test]
async fn test_rerun_overwrites_previous_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("UNI_Datacite_Datasets.csv");
    std::fs::write(&path, "DOI\nstale.1\nstale.2\nstale.3\n").unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/dois");
        then.status(200).json_body(page(0, 1, None));
    });

    run(&config(&server, &temp_dir)).await;

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "DOI\n10.1234/ds.0\n");
}

#[tokio::test]
async fn test_failure_mid_pagination_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/dois");
        then.status(200)
            .json_body(page(0, 25, Some(server.url("/dois-page-2"))));
    });
    server.mock(|when, then| {
        when.method(GET).path("/dois-page-2");
        then.status(502);
    });

    let report = run(&config(&server, &temp_dir)).await;

    assert!(report.has_failures());
    match report.outcome("DataCite") {
        Some(RepositoryOutcome::Failed(e)) => assert!(e.is_retryable()),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!temp_dir.path().join("UNI_Datacite_Datasets.csv").exists());
}
