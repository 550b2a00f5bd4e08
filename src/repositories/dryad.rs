use super::trimmed_base;
use crate::config::{ror_id, ROR_PREFIX};
use crate::core::extract::Extractor;
use crate::core::paginator::{Pagination, SearchPlan};
use crate::core::pipeline::{Columns, ErrorPolicy, RepositorySpec};
use crate::domain::model::PageRequest;

/// Dryad identifiers come back as `doi:10.5061/...`.
const IDENTIFIER_PREFIX_LEN: usize = 4;

/// Dryad's affiliation filter only matches the full ROR URL.
fn ror_url(ror: &str) -> String {
    format!("{}{}", ROR_PREFIX, ror_id(ror))
}

pub fn spec(ror: &str, base: &str) -> RepositorySpec {
    let base = trimmed_base(base);
    let ror = ror_url(ror);
    RepositorySpec {
        name: "Dryad".to_string(),
        file_label: "Dryad".to_string(),
        file_kind: "Datasets".to_string(),
        searches: vec![SearchPlan {
            label: "Dryad dataset".to_string(),
            request: PageRequest::get(format!("{}/api/v2/search", base))
                .param("q", ror.as_str())
                .param("affiliation", ror.as_str()),
            pagination: Pagination::EmbeddedLink {
                next_pointer: "/_links/next/href".to_string(),
                host: base.to_string(),
            },
            records_pointer: "/_embedded/stash:datasets".to_string(),
            carry_params: Vec::new(),
        }],
        extractor: Extractor::Field {
            pointer: "/identifier".to_string(),
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
    fn test_spec_searches_by_full_ror() {
        let spec = spec("https://ror.org/03yrm5c26", "https://datadryad.org");
        let request = &spec.searches[0].request;
        assert_eq!(request.url, "https://datadryad.org/api/v2/search");
        assert_eq!(request.query_value("q"), Some("https://ror.org/03yrm5c26"));
        assert_eq!(request.query_value("affiliation"), Some("https://ror.org/03yrm5c26"));
        assert_eq!(
            spec.searches[0].pagination,
            Pagination::EmbeddedLink {
                next_pointer: "/_links/next/href".to_string(),
                host: "https://datadryad.org".to_string(),
            }
        );
    }

    #[test]
    fn test_bare_ror_id_is_sent_as_full_url() {
        let spec = spec("03yrm5c26", "https://datadryad.org");
        let request = &spec.searches[0].request;
        assert_eq!(request.query_value("q"), Some("https://ror.org/03yrm5c26"));
        assert_eq!(request.query_value("affiliation"), Some("https://ror.org/03yrm5c26"));
    }
}
