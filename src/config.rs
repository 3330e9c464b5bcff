use crate::Cli;
use crate::template::DEFAULT_PLACEHOLDER;
use anyhow::{Result, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Prompt-level diff cap, distinct from the per-file size gate.
pub const DEFAULT_MAX_DIFF_CHARS: usize = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[value(name = "openai")]
    #[serde(rename = "openai")]
    OpenAi,
    Ollama,
}

impl Provider {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "ollama" => Ok(Provider::Ollama),
            other => bail!("unknown provider {other:?} (expected 'openai' or 'ollama')"),
        }
    }

    fn default_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => DEFAULT_OPENAI_URL,
            Provider::Ollama => DEFAULT_OLLAMA_URL,
        }
    }
}

/// Final resolved configuration for opencommit.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Provider,
    pub model: String,
    pub api_key: Option<String>,
    pub api_url: String,
    pub language: String,
    pub emoji: bool,
    pub stream: bool,
    pub max_diff_chars: usize,
    pub message_template_placeholder: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub language: Option<String>,
    pub emoji: Option<bool>,
    pub stream: Option<bool>,
    pub max_diff_chars: Option<usize>,
    pub message_template_placeholder: Option<String>,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--model`, `--provider`, `--api-key`)
    ///   2. Env vars (`OCO_MODEL`, `OCO_AI_PROVIDER`, `OCO_API_KEY`/`OPENAI_API_KEY`, ...)
    ///   3. TOML `~/.config/opencommit.toml`
    ///   4. Hardcoded defaults
    pub fn from_sources(cli: &Cli) -> Result<Self> {
        let file_cfg = load_file_config().unwrap_or_default();
        Self::resolve(cli, |key| env::var(key).ok(), file_cfg)
    }

    pub fn resolve<E>(cli: &Cli, env: E, file_cfg: FileConfig) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let provider = match (cli.provider, env("OCO_AI_PROVIDER")) {
            (Some(p), _) => p,
            (None, Some(v)) => Provider::parse(&v)?,
            (None, None) => file_cfg.provider.unwrap_or(Provider::OpenAi),
        };

        let model = cli
            .model
            .clone()
            .or_else(|| env("OCO_MODEL"))
            .or(file_cfg.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_key = cli
            .api_key
            .clone()
            .or_else(|| env("OPENAI_API_KEY"))
            .or(file_cfg.api_key)
            .filter(|k| !k.trim().is_empty());

        let api_url = env("OCO_API_URL")
            .or(file_cfg.api_url)
            .unwrap_or_else(|| provider.default_url().to_string());

        let language = env("OCO_LANGUAGE")
            .or(file_cfg.language)
            .unwrap_or_else(|| "en".to_string());

        let emoji = match env("OCO_EMOJI") {
            Some(v) => parse_bool(&v),
            None => file_cfg.emoji.unwrap_or(false),
        };

        let stream = match env("OCO_STREAM") {
            Some(v) => parse_bool(&v),
            None => file_cfg.stream.unwrap_or(false),
        };

        let max_diff_chars = match env("OCO_MAX_DIFF_CHARS") {
            Some(v) => match v.trim().parse() {
                Ok(n) => n,
                Err(_) => bail!("OCO_MAX_DIFF_CHARS must be a positive integer, got {v:?}"),
            },
            None => file_cfg.max_diff_chars.unwrap_or(DEFAULT_MAX_DIFF_CHARS),
        };

        let message_template_placeholder = env("OCO_MESSAGE_TEMPLATE_PLACEHOLDER")
            .or(file_cfg.message_template_placeholder)
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string());

        Ok(Config {
            provider,
            model,
            api_key,
            api_url,
            language,
            emoji,
            stream,
            max_diff_chars,
            message_template_placeholder,
        })
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Return `~/.config/opencommit.toml`
pub fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("opencommit.toml"))
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return None;
    }

    let data = match fs::read_to_string(&path) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("Could not read {}: {e}", path.display());
            return None;
        }
    };

    match toml::from_str::<FileConfig>(&data) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("Ignoring invalid config {}: {e}", path.display());
            None
        }
    }
}
