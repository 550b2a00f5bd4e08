use super::{or_query, trimmed_base};
use crate::core::enrich::{DetailColumn, Enrichment};
use crate::core::extract::Extractor;
use crate::core::paginator::{Pagination, SearchPlan};
use crate::core::pipeline::{Columns, ErrorPolicy, RepositorySpec};
use crate::domain::model::PageRequest;
use crate::utils::error::Result;
use crate::utils::validation::invalid_value;
use std::num::NonZeroU32;

/// Record types searched, in order; results share one output file.
pub const RECORD_TYPES: [&str; 2] = ["dataset", "software"];

pub fn search_query(terms: &[String]) -> String {
    format!(
        "creators.affiliation:({})",
        or_query(terms, |t| format!("\"{}\"", t))
    )
}

pub fn spec(
    terms: &[String],
    access_token: &str,
    base: &str,
    enrichment: Option<Enrichment>,
) -> RepositorySpec {
    let query = search_query(terms);
    let searches = RECORD_TYPES
        .iter()
        .map(|record_type| SearchPlan {
            label: format!("Zenodo {}", record_type),
            request: PageRequest::get(format!("{}/records", trimmed_base(base)))
                .param("q", query.clone())
                .param("type", *record_type)
                .param("access_token", access_token),
            pagination: Pagination::CursorLink {
                next_pointer: "/links/next".to_string(),
            },
            records_pointer: "/hits/hits".to_string(),
            carry_params: vec!["access_token".to_string()],
        })
        .collect();

    RepositorySpec {
        name: "Zenodo".to_string(),
        file_label: "Zenodo".to_string(),
        file_kind: "Datasets_Software".to_string(),
        searches,
        extractor: Extractor::Field {
            pointer: "/doi".to_string(),
            secondary_pointer: Some("/id".to_string()),
            strip_chars: 0,
        },
        columns: Columns::IdentifierOnly,
        on_fetch_error: ErrorPolicy::Abort,
        enrichment,
    }
}

/// Per-record metadata from `/records/<id>`, throttled to Zenodo's limit.
pub fn enrichment(base: &str, calls_per_minute: u32) -> Result<Enrichment> {
    let calls_per_minute = NonZeroU32::new(calls_per_minute).ok_or_else(|| {
        invalid_value(
            "zenodo.rate_limit_per_minute",
            calls_per_minute,
            "Value must be at least 1",
        )
    })?;

    Ok(Enrichment {
        record_url_prefix: format!("{}/records", trimmed_base(base)),
        columns: vec![
            DetailColumn::text("DOI", "/doi"),
            DetailColumn::text("URL", "/links/html"),
            DetailColumn::text("Zenodo ID", "/id"),
            DetailColumn::text("Date", "/metadata/publication_date"),
            DetailColumn::list("Creators", "/metadata/creators", "/name"),
            DetailColumn::text("Title", "/metadata/title"),
            DetailColumn::text("Type", "/metadata/resource_type/type"),
            DetailColumn::list("Keywords", "/metadata/keywords", ""),
        ],
        calls_per_minute,
    })
}
