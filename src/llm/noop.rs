use anyhow::Result;

use super::{CommitRequest, LlmClient};

/// Dummy client for `--no-model`: builds a message from the file list without any network call.
pub struct NoopClient;

impl LlmClient for NoopClient {
    fn generate_commit_message(&self, request: &CommitRequest<'_>) -> Result<String> {
        let included: Vec<&str> = request
            .bundle
            .decisions
            .iter()
            .filter(|d| d.included)
            .map(|d| d.path.as_str())
            .collect();

        let mut msg = format!("chore: update {} file(s)\n\n", included.len());
        for path in included {
            msg.push_str(&format!("- `{path}`\n"));
        }
        if request.bundle.excluded_count > 0 {
            msg.push_str(&format!(
                "\n{} more file(s) not shown to the model\n",
                request.bundle.excluded_count
            ));
        }

        Ok(msg)
    }
}
