//! Inference client with a canned answer

use async_trait::async_trait;
use std::sync::Mutex;

use vidgrab::chat::{InferenceClient, LlmError};

pub struct MockInference {
    answer: Result<String, fn() -> LlmError>,
    prompts: Mutex<Vec<String>>,
}

impl MockInference {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(make: fn() -> LlmError) -> Self {
        Self {
            answer: Err(make),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for MockInference {
    async fn complete(&self, user_message: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(user_message.to_string());
        match &self.answer {
            Ok(answer) => Ok(answer.clone()),
            Err(make) => Err(make()),
        }
    }
}
