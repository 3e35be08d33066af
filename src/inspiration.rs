use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::{future::Future, pin::Pin};
use tracing::{error, warn};

pub const EMPTY_FALLBACK: &str = "持续构建。在这个充满干扰的世界里，自律是唯一的套利机会。";
pub const FAILURE_FALLBACK: &str = "行动本身就是奖励。专注于下一个微小的动作。";

#[derive(Debug, thiserror::Error)]
pub enum InspirationError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("generation endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("{0}")]
    Other(String),
}

pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = Result<String, InspirationError>> + Send + 'a>>;

/// Text-generation capability: prompt in, text out or failure.
pub trait TextGenerator: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a>;
}

pub fn build_prompt(summary: &str) -> String {
    format!(
        "你是一位针对顶尖创作者的高级教练。根据本周进度：{summary}，请提供一段简短（最多2句话）、有力且极具启发性的“创作者洞见”。要求：语气要像一位精英表现教练，充满鼓舞性，必须使用中文回复。"
    )
}

/// Always resolves to display text; failures are logged and replaced.
pub async fn get_inspiration(generator: &dyn TextGenerator, summary: &str) -> String {
    let prompt = build_prompt(summary);
    match generator.generate(&prompt).await {
        Ok(text) if text.trim().is_empty() => EMPTY_FALLBACK.to_string(),
        Ok(text) => text,
        Err(err) => {
            error!("inspiration request failed: {err}");
            FAILURE_FALLBACK.to_string()
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        if api_key.is_none() {
            warn!("no Gemini API key set; inspiration will use the fallback text");
        }
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }

    async fn request(&self, prompt: &str) -> Result<String, InspirationError> {
        let api_key = self.api_key.as_deref().ok_or(InspirationError::MissingApiKey)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "thinkingConfig": { "thinkingBudget": 0 } }
        });

        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(InspirationError::Status(resp.status()));
        }

        let payload: GenerateResponse = resp.json().await?;
        Ok(payload.text())
    }
}

impl TextGenerator for GeminiClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(self.request(prompt))
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Result<&'static str, &'static str>);

    impl TextGenerator for Canned {
        fn generate<'a>(&'a self, _prompt: &'a str) -> GenerateFuture<'a> {
            let result = self
                .0
                .map(str::to_string)
                .map_err(|msg| InspirationError::Other(msg.to_string()));
            Box::pin(async move { result })
        }
    }

    #[tokio::test]
    async fn failing_generator_yields_failure_fallback() {
        let text = get_inspiration(&Canned(Err("offline")), "本周已完成 3 个习惯打卡项。").await;
        assert_eq!(text, FAILURE_FALLBACK);
    }

    #[tokio::test]
    async fn empty_response_yields_empty_fallback() {
        assert_eq!(get_inspiration(&Canned(Ok("  ")), "x").await, EMPTY_FALLBACK);
    }

    #[tokio::test]
    async fn generated_text_passes_through() {
        assert_eq!(get_inspiration(&Canned(Ok("继续前进。\n")), "x").await, "继续前进。\n");
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let client = GeminiClient::new("http://127.0.0.1:1", "m", None);
        let err = client.generate("hi").await.unwrap_err();
        assert!(matches!(err, InspirationError::MissingApiKey));
    }

    #[test]
    fn prompt_embeds_summary() {
        assert!(build_prompt("本周已完成 5 个习惯打卡项。").contains("本周已完成 5 个习惯打卡项。"));
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let payload: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "专注" }, { "text": "当下。" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(payload.text(), "专注当下。");

        let empty: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.text(), "");
    }
}
