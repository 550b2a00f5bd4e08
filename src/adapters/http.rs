use crate::config::toml_config::HttpConfig;
use crate::domain::model::{HttpMethod, PageRequest};
use crate::domain::ports::PageFetcher;
use crate::utils::error::{HarvestError, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent());
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| HarvestError::ConfigError {
            message: format!("Failed to build HTTP client: {}", e),
        })?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<Value> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::PostJson => {
                let body = request.body.clone().unwrap_or(Value::Null);
                self.client.post(&request.url).json(&body)
            }
        };

        tracing::debug!(
            "{:?} {} params={:?}",
            request.method,
            request.url,
            redacted(&request.query)
        );
        let response = builder
            .query(&request.query)
            .send()
            .await
            .map_err(|e| HarvestError::from_transport(&request.url, &e))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(HarvestError::from_status(&request.url, status, text));
        }

        let text = response
            .text()
            .await
            .map_err(|e| HarvestError::from_transport(&request.url, &e))?;
        serde_json::from_str(&text).map_err(|e| HarvestError::ResponseError {
            url: request.url.clone(),
            message: format!("Response is not valid JSON: {}", e),
        })
    }
}

fn redacted(query: &[(String, String)]) -> Vec<(&str, &str)> {
    query
        .iter()
        .map(|(k, v)| {
            if k == "access_token" {
                (k.as_str(), "***")
            } else {
                (k.as_str(), v.as_str())
            }
        })
        .collect()
}
