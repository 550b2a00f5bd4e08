//! Generic page walker shared by every repository.
//!
//! A [`SearchPlan`] describes the first request, where records live in each
//! response and how the next request is derived. [`Paginator::next_page`]
//! walks one step at a time and reports a [`PageOutcome`], so "no more
//! pages" is an ordinary outcome rather than a caught lookup failure.

use crate::domain::model::{Page, PageRequest};
use crate::domain::ports::PageFetcher;
use crate::utils::error::{HarvestError, Result};
use serde_json::Value;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pagination {
    /// Follow the absolute URL found at `next_pointer` until it is absent.
    CursorLink { next_pointer: String },
    /// Follow a host-relative link found at `next_pointer`.
    EmbeddedLink { next_pointer: String, host: String },
    /// Advance `offset_param` by `page_size` until the flag at
    /// `end_pointer` is true.
    OffsetEndFlag {
        offset_param: String,
        page_size: usize,
        end_pointer: String,
    },
    /// Request the next `limit` records only while pages come back full.
    LimitSentinel {
        offset_param: String,
        limit: usize,
        max_pages: Option<usize>,
    },
    /// A fixed list of offset/limit windows, fetched once each.
    FixedWindows {
        offset_param: String,
        limit_param: String,
        windows: Vec<Window>,
    },
}

#[derive(Debug, Clone)]
pub struct SearchPlan {
    /// Progress/log label, e.g. "Zenodo software".
    pub label: String,
    pub request: PageRequest,
    pub pagination: Pagination,
    /// JSON pointer to the record array; empty for a top-level array.
    pub records_pointer: String,
    /// Query parameters re-sent on followed links (credentials).
    pub carry_params: Vec<String>,
}

impl SearchPlan {
    pub fn carried_query(&self) -> Vec<(String, String)> {
        self.request
            .query
            .iter()
            .filter(|(k, _)| self.carry_params.contains(k))
            .cloned()
            .collect()
    }
}

#[derive(Debug)]
pub enum PageOutcome {
    Page(Page),
    NoMorePages,
    FetchFailed(HarvestError),
}

pub struct Paginator<'a> {
    fetcher: &'a dyn PageFetcher,
    plan: &'a SearchPlan,
    pending: Option<PageRequest>,
    index: usize,
}

impl<'a> Paginator<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, plan: &'a SearchPlan) -> Self {
        let mut first = plan.request.clone();
        let pending = match &plan.pagination {
            Pagination::FixedWindows {
                offset_param,
                limit_param,
                windows,
            } => windows.first().map(|window| {
                apply_window(&mut first, offset_param, limit_param, *window);
                first
            }),
            _ => Some(first),
        };

        Self {
            fetcher,
            plan,
            pending,
            index: 0,
        }
    }

    /// Number of requests issued so far.
    pub fn pages_fetched(&self) -> usize {
        self.index
    }

    pub async fn next_page(&mut self) -> PageOutcome {
        let Some(request) = self.pending.take() else {
            return PageOutcome::NoMorePages;
        };

        let body = match self.fetcher.fetch(&request).await {
            Ok(body) => body,
            Err(e) => return PageOutcome::FetchFailed(e),
        };
        let records = match records_at(&body, &self.plan.records_pointer, &request.url) {
            Ok(records) => records,
            Err(e) => return PageOutcome::FetchFailed(e),
        };

        self.pending = self.next_request(&request, &body, records.len());
        let page = Page {
            index: self.index,
            records,
        };
        self.index += 1;
        PageOutcome::Page(page)
    }

    fn next_request(&self, current: &PageRequest, body: &Value, page_len: usize) -> Option<PageRequest> {
        match &self.plan.pagination {
            Pagination::CursorLink { next_pointer } => {
                let next = link_at(body, next_pointer)?;
                Some(self.follow(next.to_string()))
            }
            Pagination::EmbeddedLink { next_pointer, host } => {
                let next = link_at(body, next_pointer)?;
                match Url::parse(host).and_then(|base| base.join(next)) {
                    Ok(url) => Some(self.follow(url.to_string())),
                    Err(e) => {
                        tracing::warn!(
                            "{}: cannot resolve next link '{}' against {}: {}",
                            self.plan.label,
                            next,
                            host,
                            e
                        );
                        None
                    }
                }
            }
            Pagination::OffsetEndFlag {
                offset_param,
                page_size,
                end_pointer,
            } => {
                let end_of_records = body
                    .pointer(end_pointer)
                    .and_then(Value::as_bool)
                    .unwrap_or(true);
                if end_of_records {
                    return None;
                }
                if page_len == 0 {
                    tracing::warn!(
                        "{}: empty page without end-of-records flag, stopping",
                        self.plan.label
                    );
                    return None;
                }
                let offset = current.numeric_value(offset_param).unwrap_or(0) + page_size;
                let mut next = current.clone();
                next.set(offset_param, &*offset.to_string());
                Some(next)
            }
            Pagination::LimitSentinel {
                offset_param,
                limit,
                max_pages,
            } => {
                if page_len != *limit {
                    return None;
                }
                if max_pages.is_some_and(|max| self.index + 1 >= max) {
                    tracing::warn!(
                        "{}: page cap reached with a full page; results beyond {} records are not collected",
                        self.plan.label,
                        (self.index + 1) * limit
                    );
                    return None;
                }
                let offset = current.numeric_value(offset_param).unwrap_or(0) + limit;
                let mut next = current.clone();
                next.set(offset_param, &*offset.to_string());
                Some(next)
            }
            Pagination::FixedWindows {
                offset_param,
                limit_param,
                windows,
            } => {
                let window = windows.get(self.index + 1)?;
                let mut next = current.clone();
                apply_window(&mut next, offset_param, limit_param, *window);
                Some(next)
            }
        }
    }

    fn follow(&self, url: String) -> PageRequest {
        let mut request = PageRequest::get(url);
        request.query = self.plan.carried_query();
        request
    }
}

fn apply_window(request: &mut PageRequest, offset_param: &str, limit_param: &str, window: Window) {
    request.set(limit_param, &*window.limit.to_string());
    request.set(offset_param, &*window.offset.to_string());
}

/// A `null` or empty link counts as absent.
fn link_at<'v>(body: &'v Value, pointer: &str) -> Option<&'v str> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|link| !link.is_empty())
}

fn records_at(body: &Value, pointer: &str, url: &str) -> Result<Vec<Value>> {
    let node = if pointer.is_empty() {
        Some(body)
    } else {
        body.pointer(pointer)
    };

    match node {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(other) => Err(HarvestError::ResponseError {
            url: url.to_string(),
            message: format!(
                "expected an array at '{}', found {}",
                pointer,
                json_kind(other)
            ),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
