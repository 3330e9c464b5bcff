pub mod format;
pub mod noop;
pub mod ollama;
pub mod openai;
mod prompt_builder;
mod prompts;
mod stream;

pub use format::format_commit_message;

use crate::filter::DiffBundle;
use anyhow::Result;

/// Everything the model gets to see for one commit message.
#[derive(Debug, Clone, Copy)]
pub struct CommitRequest<'a> {
    pub branch: Option<&'a str>,
    pub bundle: &'a DiffBundle,
    /// Free text from the author, e.g. the ticket being worked on.
    pub context: Option<&'a str>,
    pub language: &'a str,
    pub emoji: bool,
    /// Prompt-level cap on the diff body; separate from the per-file size gate.
    pub max_diff_chars: usize,
}

/// Trait for talking to an LLM.
pub trait LlmClient: Send + Sync {
    /// Generate a commit message from the filtered diff. Returns the raw reply.
    fn generate_commit_message(&self, request: &CommitRequest<'_>) -> Result<String>;
}
