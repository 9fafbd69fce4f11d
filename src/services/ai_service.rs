use crate::config::Config;
use crate::dto::generation_dto::{response_schema, GeneratedQuestion, McqResponse};
use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::future::Future;
use std::time::Duration;
use validator::Validate;

const MCQ_SYSTEM_PROMPT: &str = r#"You are an expert educational assessment creator specializing in generating high-quality multiple choice questions (MCQs).

Your task is to analyze the provided document and create multiple choice questions that test understanding of the key concepts, facts, and ideas presented.

Guidelines for creating MCQs:
1. Each question must have exactly {option_count} options
2. Exactly one option must be correct for each question
3. All incorrect options (distractors) should be plausible but clearly wrong
4. Questions should cover different aspects and difficulty levels of the material
5. Questions should be clear, unambiguous, and test meaningful understanding
6. Avoid trivial questions or those that can be answered without reading the document
7. Do NOT include explanations - only the question and options
8. Vary question types: recall, comprehension, application, and analysis
9. Keep options similar in length and structure so the answer is not given away"#;

/// The seam the generation job depends on.
#[cfg_attr(test, mockall::automock)]
pub trait QuestionGenerator: Send + Sync {
    fn generate(
        &self,
        text: &str,
        num_questions: usize,
    ) -> impl Future<Output = Result<Vec<GeneratedQuestion>>> + Send;
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub option_count: usize,
    pub thinking_budget: u32,
    pub timeout: Duration,
}

impl GeminiSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            api_key: config.require_api_key()?.to_string(),
            model: config.gemini_model.clone(),
            api_base: config.gemini_api_base.clone(),
            option_count: config.option_count,
            thinking_budget: config.thinking_budget,
            timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }
}

#[derive(Clone)]
pub struct AIService {
    client: Client,
    settings: GeminiSettings,
}

impl AIService {
    pub fn new(settings: GeminiSettings, client: Client) -> Self {
        Self { client, settings }
    }

    pub fn build_request(&self, text: &str, num_questions: usize) -> JsonValue {
        let system_prompt =
            MCQ_SYSTEM_PROMPT.replace("{option_count}", &self.settings.option_count.to_string());

        let prompt = format!(
            "Analyze the provided material and generate exactly {n} multiple choice questions.\n\n\
             Each question should:\n\
             - Test a meaningful concept from the material\n\
             - Have exactly {k} options with only one correct answer\n\
             - Be clear and unambiguous\n\
             - Not include any explanation\n\n\
             Generate diverse questions covering different topics and difficulty levels.",
            n = num_questions,
            k = self.settings.option_count,
        );

        let mut generation_config = serde_json::json!({
            "responseMimeType": "application/json",
            "responseSchema": response_schema(self.settings.option_count),
        });
        if self.settings.thinking_budget > 0 {
            generation_config["thinkingConfig"] =
                serde_json::json!({ "thinkingBudget": self.settings.thinking_budget });
        }

        serde_json::json!({
            "systemInstruction": {
                "parts": [{ "text": system_prompt }]
            },
            "contents": [
                {
                    "role": "user",
                    "parts": [
                        { "text": text },
                        { "text": prompt }
                    ]
                }
            ],
            "generationConfig": generation_config
        })
    }

    async fn generate_content(&self, payload: JsonValue) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.model
        );

        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&payload)
            .timeout(self.settings.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Generation(format!("Gemini API error {}: {}", status, text)));
        }

        let body: JsonValue = res.json().await?;
        response_text(&body)
            .ok_or_else(|| Error::Generation("no response text received from Gemini API".to_string()))
    }

    /// Decodes and validates a structured response. The batch is all or nothing.
    pub fn parse_response(&self, text: &str, num_questions: usize) -> Result<Vec<GeneratedQuestion>> {
        let response: McqResponse = serde_json::from_str(text)
            .map_err(|e| Error::Generation(format!("malformed structured output: {}", e)))?;

        response
            .validate()
            .map_err(|e| Error::Generation(format!("invalid questions in response: {}", e)))?;

        if response.questions.len() != num_questions {
            return Err(Error::Generation(format!(
                "expected {} questions, received {}",
                num_questions,
                response.questions.len()
            )));
        }

        if let Some((idx, q)) = response
            .questions
            .iter()
            .enumerate()
            .find(|(_, q)| q.options.len() != self.settings.option_count)
        {
            return Err(Error::Generation(format!(
                "question {} has {} options, expected {}",
                idx + 1,
                q.options.len(),
                self.settings.option_count
            )));
        }

        let mut questions = response.questions;
        let mut rng = rand::thread_rng();
        for q in questions.iter_mut() {
            q.options.shuffle(&mut rng);
        }

        Ok(questions)
    }
}

impl QuestionGenerator for AIService {
    async fn generate(&self, text: &str, num_questions: usize) -> Result<Vec<GeneratedQuestion>> {
        tracing::info!(
            model = %self.settings.model,
            num_questions,
            chars = text.len(),
            "requesting questions from Gemini"
        );
        let payload = self.build_request(text, num_questions);
        let response_text = self.generate_content(payload).await?;
        tracing::info!("response received, validating");
        let questions = self.parse_response(&response_text, num_questions)?;
        tracing::info!(count = questions.len(), "questions validated");
        Ok(questions)
    }
}

/// Concatenated text of the first candidate, leaving out thought summaries.
fn response_text(body: &JsonValue) -> Option<String> {
    let parts = body
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())?;

    let text: String = parts
        .iter()
        .filter(|p| !p.get("thought").and_then(|t| t.as_bool()).unwrap_or(false))
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
