use super::trimmed_base;
use crate::core::extract::Extractor;
use crate::core::paginator::{Pagination, SearchPlan};
use crate::core::pipeline::{Columns, ErrorPolicy, RepositorySpec};
use crate::domain::model::PageRequest;

pub const NODE_ID_HEADER: &str = "OSF Node ID";

pub fn spec(osf_id: &str, access_token: &str, base: &str) -> RepositorySpec {
    RepositorySpec {
        name: "OSF".to_string(),
        file_label: "OSF".to_string(),
        file_kind: "Datasets".to_string(),
        searches: vec![SearchPlan {
            label: "OSF project".to_string(),
            request: PageRequest::get(format!(
                "{}/institutions/{}/nodes/",
                trimmed_base(base),
                osf_id
            ))
            .param("access_token", access_token),
            pagination: Pagination::CursorLink {
                next_pointer: "/links/next".to_string(),
            },
            records_pointer: "/data".to_string(),
            carry_params: vec!["access_token".to_string()],
        }],
        extractor: Extractor::IdentifierLink {
            id_pointer: "/id".to_string(),
            link_pointer: "/relationships/identifiers/links/related/href".to_string(),
            entries_pointer: "/data".to_string(),
            skip_category: "ark".to_string(),
        },
        columns: Columns::SecondaryThenIdentifier {
            secondary_header: NODE_ID_HEADER.to_string(),
        },
        on_fetch_error: ErrorPolicy::Abort,
        enrichment: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_institution_nodes_with_token() {
        let spec = spec("uni", "tok", "https://api.osf.io/v2");
        let plan = &spec.searches[0];

        assert_eq!(plan.request.url, "https://api.osf.io/v2/institutions/uni/nodes/");
        assert_eq!(
            plan.carried_query(),
            vec![("access_token".to_string(), "tok".to_string())]
        );
        assert_eq!(spec.file_name("UNI"), "UNI_OSF_Datasets.csv");
    }
}
