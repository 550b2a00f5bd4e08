use crate::domain::model::PageRequest;
use crate::domain::ports::PageFetcher;
use crate::utils::error::{HarvestError, Result};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays canned responses in order and records every request it sees.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<Value>>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, body: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(body));
        self
    }

    pub fn fail(self, err: HarvestError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(HarvestError::FatalQuery {
                    url: request.url.clone(),
                    status: 404,
                    message: "no scripted response left".to_string(),
                })
            })
    }
}

pub fn transient(url: &str) -> HarvestError {
    HarvestError::TransientFetch {
        url: url.to_string(),
        message: "connection reset".to_string(),
    }
}
