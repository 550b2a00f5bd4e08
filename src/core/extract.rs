use crate::domain::model::{PageRequest, ResultRecord};
use crate::domain::ports::PageFetcher;
use crate::utils::error::Result;
use serde_json::Value;

pub const NO_DOI: &str = "No DOI";

/// How one raw API record becomes a [`ResultRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum Extractor {
    /// Read a field, optionally dropping a fixed number of leading characters.
    Field {
        pointer: String,
        secondary_pointer: Option<String>,
        strip_chars: usize,
    },
    /// Use the DOI when present, else `marker` followed by the record URL.
    DoiOrUrl {
        doi_pointer: String,
        url_pointer: String,
        marker: String,
    },
    /// Follow the record's identifiers link and pick a DOI, skipping a
    /// leading ARK entry.
    IdentifierLink {
        id_pointer: String,
        link_pointer: String,
        entries_pointer: String,
        skip_category: String,
    },
}

impl Extractor {
    pub fn field(pointer: &str) -> Self {
        Extractor::Field {
            pointer: pointer.to_string(),
            secondary_pointer: None,
            strip_chars: 0,
        }
    }

    /// `carried` holds the credentials to send along with follow-up requests.
    pub async fn extract(
        &self,
        record: &Value,
        fetcher: &dyn PageFetcher,
        carried: &[(String, String)],
    ) -> Result<ResultRecord> {
        match self {
            Extractor::Field {
                pointer,
                secondary_pointer,
                strip_chars,
            } => {
                let raw = text_at(record, pointer).unwrap_or_default();
                let identifier = raw.chars().skip(*strip_chars).collect::<String>();
                Ok(ResultRecord {
                    identifier,
                    secondary_id: secondary_pointer
                        .as_deref()
                        .and_then(|p| text_at(record, p)),
                })
            }
            Extractor::DoiOrUrl {
                doi_pointer,
                url_pointer,
                marker,
            } => {
                let identifier = match text_at(record, doi_pointer).filter(|doi| !doi.is_empty()) {
                    Some(doi) => doi,
                    None => format!(
                        "{}{}",
                        marker,
                        text_at(record, url_pointer).unwrap_or_default()
                    ),
                };
                Ok(ResultRecord::new(identifier))
            }
            Extractor::IdentifierLink {
                id_pointer,
                link_pointer,
                entries_pointer,
                skip_category,
            } => {
                let node_id = text_at(record, id_pointer).unwrap_or_default();
                let Some(link) = text_at(record, link_pointer).filter(|l| !l.is_empty()) else {
                    tracing::debug!("record {} has no identifiers link", node_id);
                    return Ok(ResultRecord::with_secondary(NO_DOI, node_id));
                };

                let mut request = PageRequest::get(link);
                request.query = carried.to_vec();
                let body = fetcher.fetch(&request).await?;

                let identifier = pick_identifier(&body, entries_pointer, skip_category)
                    .unwrap_or_else(|| NO_DOI.to_string());
                Ok(ResultRecord::with_secondary(identifier, node_id))
            }
        }
    }
}

/// First entry's value, or the second's when the first has `skip_category`.
fn pick_identifier(body: &Value, entries_pointer: &str, skip_category: &str) -> Option<String> {
    let entries = body.pointer(entries_pointer)?.as_array()?;
    let first = entries.first()?;
    let chosen = if text_at(first, "/attributes/category").as_deref() == Some(skip_category) {
        entries.get(1)?
    } else {
        first
    };
    text_at(chosen, "/attributes/value")
}

/// Strings as-is, numbers and other scalars rendered, `null`/absent as `None`.
pub fn text_at(value: &Value, pointer: &str) -> Option<String> {
    match value.pointer(pointer)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
