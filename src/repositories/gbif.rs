use super::{or_query, trimmed_base};
use crate::core::extract::Extractor;
use crate::core::paginator::{Pagination, SearchPlan};
use crate::core::pipeline::{Columns, ErrorPolicy, RepositorySpec};
use crate::domain::model::PageRequest;

pub const PAGE_SIZE: usize = 20;

pub fn search_query(terms: &[String]) -> String {
    or_query(terms, str::to_string)
}

pub fn spec(terms: &[String], base: &str) -> RepositorySpec {
    RepositorySpec {
        name: "GBIF".to_string(),
        file_label: "GBIF".to_string(),
        file_kind: "Datasets".to_string(),
        searches: vec![SearchPlan {
            label: "GBIF dataset".to_string(),
            request: PageRequest::get(format!("{}/dataset/search", trimmed_base(base)))
                .param("q", search_query(terms))
                .param("limit", PAGE_SIZE.to_string())
                .param("offset", "0"),
            pagination: Pagination::OffsetEndFlag {
                offset_param: "offset".to_string(),
                page_size: PAGE_SIZE,
                end_pointer: "/endOfRecords".to_string(),
            },
            records_pointer: "/results".to_string(),
            carry_params: Vec::new(),
        }],
        extractor: Extractor::field("/doi"),
        columns: Columns::IdentifierOnly,
        on_fetch_error: ErrorPolicy::Abort,
        enrichment: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_starts_at_offset_zero() {
        let terms = vec!["Example University".to_string(), "EU".to_string()];
        let spec = spec(&terms, "https://api.gbif.org/v1");
        let request = &spec.searches[0].request;

        assert_eq!(request.url, "https://api.gbif.org/v1/dataset/search");
        assert_eq!(request.query_value("q"), Some("Example University OR EU"));
        assert_eq!(request.query_value("offset"), Some("0"));
        assert_eq!(request.query_value("limit"), Some("20"));
    }
}
