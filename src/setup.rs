use anyhow::{Result, anyhow};
use log::info;

use crate::config::{Config, Provider};
use crate::llm::LlmClient;
use crate::llm::noop::NoopClient;
use crate::llm::ollama::OllamaClient;
use crate::llm::openai::OpenAiClient;

/// Build the LLM client based on CLI + config.
pub fn build_llm_client(cfg: &Config, no_model: bool) -> Result<Box<dyn LlmClient>> {
    if no_model || cfg.model.eq_ignore_ascii_case("none") {
        info!("Using NoopClient (no model calls)");
        return Ok(Box::new(NoopClient));
    }

    match cfg.provider {
        Provider::OpenAi => {
            let key = cfg.api_key.clone().ok_or_else(|| {
                anyhow!("OCO_API_KEY (or OPENAI_API_KEY / --api-key) is required for the OpenAI provider; use --no-model to skip the model")
            })?;
            info!("Using OpenAiClient with model {} at {}", cfg.model, cfg.api_url);
            Ok(Box::new(OpenAiClient::new(
                key,
                cfg.model.clone(),
                &cfg.api_url,
                cfg.stream,
            )?))
        }
        Provider::Ollama => {
            info!("Using OllamaClient with model {} at {}", cfg.model, cfg.api_url);
            Ok(Box::new(OllamaClient::new(
                &cfg.api_url,
                cfg.model.clone(),
                cfg.stream,
            )?))
        }
    }
}
