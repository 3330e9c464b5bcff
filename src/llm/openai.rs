use super::stream::read_stream_to_string;
use super::{CommitRequest, LlmClient, prompt_builder};
use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::io::{self, BufReader};
use std::time::Duration;

/// Minimal request/response structs for OpenAI Chat Completions API.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct StreamResponse {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

/// OpenAI-compatible implementation of LlmClient.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base_url: String,
    stream: bool,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, api_base_url: &str, stream: bool) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .context("failed to build HTTP client")?;

        Ok(OpenAiClient {
            client,
            api_key,
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            stream,
        })
    }

    fn chat_url(&self) -> String {
        if self.api_base_url.ends_with("/v1") {
            format!("{}/chat/completions", self.api_base_url)
        } else {
            format!("{}/v1/chat/completions", self.api_base_url)
        }
    }

    fn call_chat(&self, req: &ChatRequest) -> Result<String> {
        let url = self.chat_url();

        log::info!("Calling OpenAI model {:?} (stream={})", &req.model, req.stream);

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .context("failed to send request to OpenAI")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(anyhow!(
                "OpenAI API error: HTTP {} - {}",
                status.as_u16(),
                text
            ));
        }

        if req.stream {
            let reader = BufReader::new(resp);
            return read_stream_to_string(reader, &mut io::stderr(), parse_stream_line);
        }

        let chat_resp: ChatResponse = resp.json().context("failed to parse OpenAI response")?;

        if let Some(usage) = &chat_resp.usage {
            log::info!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("no choices returned from OpenAI"))
    }
}

fn parse_stream_line(line: &str) -> Result<Option<String>> {
    let Some(data) = line.trim_start().strip_prefix("data:") else {
        return Ok(None);
    };

    let data = data.trim();
    if data == "[DONE]" {
        return Ok(None);
    }

    let chunk: StreamResponse =
        serde_json::from_str(data).context("failed to parse OpenAI streaming chunk")?;
    let content = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content);

    Ok(content)
}

impl LlmClient for OpenAiClient {
    fn generate_commit_message(&self, request: &CommitRequest<'_>) -> Result<String> {
        let prompts = prompt_builder::commit_message_prompt(request);

        log::trace!(
            "Commit-message prompt:\n{}\n---\n{}",
            prompts.system,
            truncate(&prompts.user, 3000)
        );

        let req = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: prompts.system,
                },
                ChatMessage {
                    role: "user".into(),
                    content: prompts.user,
                },
            ],
            stream: self.stream,
        };

        self.call_chat(&req)
    }
}

/// Truncate long strings for debug logging.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...\n[truncated {} chars]", &s[..cut], s.len() - cut)
}
