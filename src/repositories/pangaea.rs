use super::{or_query, trimmed_base};
use crate::core::extract::Extractor;
use crate::core::paginator::{Pagination, SearchPlan, Window};
use crate::core::pipeline::{Columns, ErrorPolicy, RepositorySpec};
use crate::domain::model::PageRequest;

/// Pangaea URIs come back as `doi:10.1594/...`.
const IDENTIFIER_PREFIX_LEN: usize = 4;

/// Two fixed windows; the second overlaps the first by 500 records and
/// nothing past offset 1500 is requested.
pub const WINDOWS: [Window; 2] = [
    Window {
        offset: 0,
        limit: 1000,
    },
    Window {
        offset: 500,
        limit: 1000,
    },
];

pub fn search_query(terms: &[String]) -> String {
    or_query(terms, str::to_string)
}

pub fn spec(terms: &[String], base: &str) -> RepositorySpec {
    RepositorySpec {
        name: "Pangaea".to_string(),
        file_label: "Pangaea".to_string(),
        file_kind: "Datasets".to_string(),
        searches: vec![SearchPlan {
            label: "Pangaea dataset".to_string(),
            request: PageRequest::get(format!("{}/advanced/search.php", trimmed_base(base)))
                .param("q", search_query(terms)),
            pagination: Pagination::FixedWindows {
                offset_param: "offset".to_string(),
                limit_param: "count".to_string(),
                windows: WINDOWS.to_vec(),
            },
            records_pointer: "/results".to_string(),
            carry_params: Vec::new(),
        }],
        extractor: Extractor::Field {
            pointer: "/URI".to_string(),
            secondary_pointer: None,
            strip_chars: IDENTIFIER_PREFIX_LEN,
        },
        columns: Columns::IdentifierOnly,
        on_fetch_error: ErrorPolicy::Abort,
        enrichment: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_joins_terms_with_or() {
        let terms = vec!["Example University".to_string(), "Univ. Example".to_string()];
        assert_eq!(search_query(&terms), "Example University OR Univ. Example");
    }

    #[test]
    fn test_spec_uses_advanced_search() {
        let spec = spec(&["X".to_string()], "https://www.pangaea.de");
        assert_eq!(
            spec.searches[0].request.url,
            "https://www.pangaea.de/advanced/search.php"
        );
    }
}
