use super::trimmed_base;
use crate::config::ror_id;
use crate::core::extract::Extractor;
use crate::core::paginator::{Pagination, SearchPlan};
use crate::core::pipeline::{Columns, ErrorPolicy, RepositorySpec};
use crate::domain::model::PageRequest;

/// DataCite query matching datasets whose creators are affiliated with the ROR.
pub fn search_query(ror: &str) -> String {
    format!(
        "creators.affiliation.affiliationIdentifier:*{}* AND types.resourceTypeGeneral:Dataset",
        ror_id(ror)
    )
}

pub fn spec(ror: &str, base: &str) -> RepositorySpec {
    RepositorySpec {
        name: "DataCite".to_string(),
        file_label: "Datacite".to_string(),
        file_kind: "Datasets".to_string(),
        searches: vec![SearchPlan {
            label: "DataCite".to_string(),
            request: PageRequest::get(format!("{}/dois", trimmed_base(base)))
                .param("query", search_query(ror)),
            pagination: Pagination::CursorLink {
                next_pointer: "/links/next".to_string(),
            },
            records_pointer: "/data".to_string(),
            carry_params: Vec::new(),
        }],
        extractor: Extractor::field("/id"),
        columns: Columns::IdentifierOnly,
        on_fetch_error: ErrorPolicy::Abort,
        enrichment: None,
    }
}
