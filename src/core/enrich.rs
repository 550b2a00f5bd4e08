//! Optional per-record detail stage: one extra request per record, throttled.

use crate::core::extract::text_at;
use crate::domain::model::{CsvTable, PageRequest, ResultRecord};
use crate::domain::ports::PageFetcher;
use crate::utils::error::Result;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde_json::Value;
use std::num::NonZeroU32;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailField {
    Text(String),
    /// Array at the pointer, each item read at `item_pointer` and joined with "; ".
    List { pointer: String, item_pointer: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailColumn {
    pub header: String,
    pub field: DetailField,
}

impl DetailColumn {
    pub fn text(header: &str, pointer: &str) -> Self {
        Self {
            header: header.to_string(),
            field: DetailField::Text(pointer.to_string()),
        }
    }

    pub fn list(header: &str, pointer: &str, item_pointer: &str) -> Self {
        Self {
            header: header.to_string(),
            field: DetailField::List {
                pointer: pointer.to_string(),
                item_pointer: item_pointer.to_string(),
            },
        }
    }

    fn render(&self, detail: &Value) -> String {
        match &self.field {
            DetailField::Text(pointer) => text_at(detail, pointer).unwrap_or_default(),
            DetailField::List {
                pointer,
                item_pointer,
            } => detail
                .pointer(pointer)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| text_at(item, item_pointer))
                        .collect::<Vec<_>>()
                        .join("; ")
                })
                .unwrap_or_default(),
        }
    }
}

/// Evenly spaced calls with no burst, so no 60-second window exceeds the limit.
fn spaced_quota(calls_per_minute: NonZeroU32) -> Quota {
    Quota::per_minute(calls_per_minute).allow_burst(NonZeroU32::MIN)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    /// Detail URL is `{record_url_prefix}/{secondary_id}`.
    pub record_url_prefix: String,
    pub columns: Vec<DetailColumn>,
    pub calls_per_minute: NonZeroU32,
}

pub struct Enricher<'a> {
    enrichment: &'a Enrichment,
    fetcher: &'a dyn PageFetcher,
    limiter: DefaultDirectRateLimiter,
}

impl<'a> Enricher<'a> {
    pub fn new(enrichment: &'a Enrichment, fetcher: &'a dyn PageFetcher) -> Self {
        Self {
            enrichment,
            fetcher,
            limiter: RateLimiter::direct(spaced_quota(enrichment.calls_per_minute)),
        }
    }

    pub fn header(&self) -> Vec<String> {
        self.enrichment
            .columns
            .iter()
            .map(|c| c.header.clone())
            .collect()
    }

    /// Records without a secondary ID keep their identifier in the first
    /// column and leave the rest blank.
    pub async fn row(&self, record: &ResultRecord, carried: &[(String, String)]) -> Result<Vec<String>> {
        let Some(id) = record.secondary_id.as_deref() else {
            let mut row = vec![String::new(); self.enrichment.columns.len()];
            if let Some(first) = row.first_mut() {
                *first = record.identifier.clone();
            }
            return Ok(row);
        };

        self.limiter.until_ready().await;
        let mut request = PageRequest::get(format!(
            "{}/{}",
            self.enrichment.record_url_prefix.trim_end_matches('/'),
            id
        ));
        request.query = carried.to_vec();
        let detail = self.fetcher.fetch(&request).await?;

        Ok(self
            .enrichment
            .columns
            .iter()
            .map(|column| column.render(&detail))
            .collect())
    }

    pub async fn table(&self, records: &[ResultRecord], carried: &[(String, String)]) -> Result<CsvTable> {
        let mut table = CsvTable::new(&self.header());
        for record in records {
            table.push(self.row(record, carried).await?);
        }
        Ok(table)
    }
}
