use serde_json::Value;

/// One extracted identifier, optionally paired with the repository's own ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub identifier: String,
    pub secondary_id: Option<String>,
}

impl ResultRecord {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secondary_id: None,
        }
    }

    pub fn with_secondary(identifier: impl Into<String>, secondary_id: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secondary_id: Some(secondary_id.into()),
        }
    }
}

/// Records in API response order: page order, then order within the page.
pub type ResultSet = Vec<ResultRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    /// POST with a JSON body.
    PostJson,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl PageRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::PostJson,
            url: url.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Replace a query parameter, or a top-level field of the JSON body.
    pub fn set(&mut self, key: &str, value: impl Into<String> + Copy) {
        if let Some(Value::Object(body)) = self.body.as_mut() {
            let value: String = value.into();
            let json = value
                .parse::<u64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(value));
            body.insert(key.to_string(), json);
            return;
        }
        match self.query.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.into(),
            None => self.query.push((key.to_string(), value.into())),
        }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Numeric parameter from the query string or, failing that, the JSON body.
    pub fn numeric_value(&self, key: &str) -> Option<usize> {
        if let Some(value) = self.query_value(key) {
            return value.parse().ok();
        }
        self.body
            .as_ref()?
            .get(key)?
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
    }
}

/// Records from one fetched page; `index` counts from zero.
#[derive(Debug, Clone)]
pub struct Page {
    pub index: usize,
    pub records: Vec<Value>,
}

/// Header plus rows, ready for the CSV writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            header: header.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
