use super::{or_query, trimmed_base};
use crate::core::extract::Extractor;
use crate::core::paginator::{Pagination, SearchPlan};
use crate::core::pipeline::{Columns, ErrorPolicy, RepositorySpec};
use crate::domain::model::PageRequest;
use serde_json::json;

pub const PAGE_LIMIT: usize = 1000;

pub const NO_DOI_MARKER: &str = "no DOI: ";

pub fn search_query(terms: &[String]) -> String {
    or_query(terms, |t| format!(":search_term: {}", t))
}

/// Figshare failures keep what was already collected.
pub fn spec(terms: &[String], base: &str, max_pages: usize) -> RepositorySpec {
    RepositorySpec {
        name: "Figshare".to_string(),
        file_label: "Figshare".to_string(),
        file_kind: "Datasets".to_string(),
        searches: vec![SearchPlan {
            label: "Figshare dataset".to_string(),
            request: PageRequest::post_json(
                format!("{}/articles/search", trimmed_base(base)),
                json!({
                    "search_for": search_query(terms),
                    "offset": 0,
                    "limit": PAGE_LIMIT,
                }),
            ),
            pagination: Pagination::LimitSentinel {
                offset_param: "offset".to_string(),
                limit: PAGE_LIMIT,
                max_pages: Some(max_pages),
            },
            records_pointer: String::new(),
            carry_params: Vec::new(),
        }],
        extractor: Extractor::DoiOrUrl {
            doi_pointer: "/doi".to_string(),
            url_pointer: "/url".to_string(),
            marker: NO_DOI_MARKER.to_string(),
        },
        columns: Columns::IdentifierOnly,
        on_fetch_error: ErrorPolicy::KeepPartial,
        enrichment: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_marks_each_term() {
        let terms = vec!["Example University".to_string(), "EU".to_string()];
        assert_eq!(
            search_query(&terms),
            ":search_term: Example University OR :search_term: EU"
        );
    }

    #[test]
    fn test_spec_posts_search_body() {
        let spec = spec(&["EU".to_string()], "https://api.figshare.com/v2", 2);
        let request = &spec.searches[0].request;
        assert_eq!(request.url, "https://api.figshare.com/v2/articles/search");
        assert_eq!(
            request.body,
            Some(json!({"search_for": ":search_term: EU", "offset": 0, "limit": 1000}))
        );
        assert_eq!(spec.on_fetch_error, ErrorPolicy::KeepPartial);
    }
}
