use anyhow::{Context, Result, anyhow};
use musli::json;
use musli::{Decode, Encode};
use reqwest::blocking::Client;
use std::io::{self, BufReader};
use std::time::Duration;

use super::stream::read_stream_to_string;
use super::{CommitRequest, LlmClient, prompt_builder};

#[derive(Debug, Encode, Decode)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Decode)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Decode)]
struct OllamaStreamResponse {
    message: Option<OllamaMessage>,
    done: Option<bool>,
}

#[derive(Debug, Encode)]
struct OllamaChatRequest {
    model: String,
    stream: bool,
    messages: Vec<OllamaMessage>,
}

/// Synchronous Ollama client using /api/chat.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
    stream: bool,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: impl Into<String>, stream: bool) -> Result<Self> {
        // Local models can take a while to load on first use.
        let http = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            stream,
        })
    }

    fn chat(&self, system_prompt: String, user_prompt: String) -> Result<String> {
        let req_body = OllamaChatRequest {
            model: self.model.clone(),
            stream: self.stream,
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: system_prompt,
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: user_prompt,
                },
            ],
        };

        let body_str = json::to_string(&req_body)
            .map_err(|e| anyhow!("Failed to encode Ollama JSON request: {e}"))?;

        log::trace!("Ollama request body: {body_str}");
        log::info!("Calling Ollama model {:?} (stream={})", self.model, self.stream);

        let url = format!("{}/api/chat", self.base_url);

        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body_str)
            .send()
            .map_err(|e| anyhow!("Error calling Ollama at {url}: {e}"))?
            .error_for_status()
            .map_err(|e| anyhow!("Ollama HTTP error from {url}: {e}"))?;

        if self.stream {
            let reader = BufReader::new(resp);
            return read_stream_to_string(reader, &mut io::stderr(), parse_stream_line);
        }

        let resp_text = resp
            .text()
            .map_err(|e| anyhow!("Failed to read Ollama response body: {e}"))?;

        log::trace!("Ollama raw JSON response: {resp_text}");

        let parsed: OllamaChatResponse =
            json::from_str(&resp_text).map_err(|e| anyhow!("Failed to decode Ollama JSON: {e}"))?;

        Ok(parsed.message.content)
    }
}

fn parse_stream_line(line: &str) -> Result<Option<String>> {
    let parsed: OllamaStreamResponse =
        json::from_str(line).map_err(|e| anyhow!("Failed to decode Ollama stream JSON: {e}"))?;

    if parsed.done.unwrap_or(false) {
        return Ok(None);
    }

    let content = parsed.message.map(|m| m.content).filter(|c| !c.is_empty());

    Ok(content)
}

impl LlmClient for OllamaClient {
    fn generate_commit_message(&self, request: &CommitRequest<'_>) -> Result<String> {
        let prompts = prompt_builder::commit_message_prompt(request);
        self.chat(prompts.system, prompts.user)
    }
}
