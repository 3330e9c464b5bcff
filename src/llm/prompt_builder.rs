use std::borrow::Cow;

use crate::llm::prompts;
use crate::llm::CommitRequest;

pub struct PromptPair {
    pub system: String,
    pub user: String,
}

pub fn commit_message_prompt(req: &CommitRequest<'_>) -> PromptPair {
    let mut system = String::from(prompts::IDENTITY);
    system.push_str("\n\n");
    system.push_str(prompts::CONVENTIONAL_COMMIT_RULES);
    system.push_str("\n\nAllowed types:\n");
    for (name, description) in prompts::COMMIT_TYPES {
        system.push_str(&format!("- {name}: {description}\n"));
    }

    if req.emoji {
        system.push('\n');
        system.push_str(prompts::GITMOJI_RULE);
        system.push('\n');
    }

    if req.bundle.omission_note().is_some() {
        system.push('\n');
        system.push_str(prompts::OMITTED_FILES_RULE);
        system.push('\n');
    }

    if !req.language.eq_ignore_ascii_case("en") && !req.language.trim().is_empty() {
        system.push_str(&format!(
            "\nWrite the description and body in the '{}' language; keep the type keywords in English.\n",
            req.language.trim()
        ));
    }

    if let Some(ctx) = req.context.filter(|c| !c.trim().is_empty()) {
        system.push_str("\nAdditional context from the author: ");
        system.push_str(ctx.trim());
        system.push('\n');
    }

    let body = truncate_diff(req.bundle.llm_diff_body(), req.max_diff_chars);

    let mut user = String::new();
    if let Some(branch) = req.branch {
        user.push_str(&format!("Branch: {branch}\n\n"));
    }
    user.push_str(prompts::DIFF_INTRO);
    user.push_str(&format!("\n```diff\n{}", body));
    if !body.ends_with('\n') {
        user.push('\n');
    }
    user.push_str("```\n");
    if let Some(note) = req.bundle.omission_note() {
        user.push('\n');
        user.push_str(note);
    }

    PromptPair { system, user }
}

/// Cut an overly long diff at the last full line that fits in `max_len` bytes.
///
/// Applies to the whole prompt diff, independently of the per-file size gate.
pub fn truncate_diff(diff: &str, max_len: usize) -> Cow<'_, str> {
    if diff.len() <= max_len {
        return Cow::Borrowed(diff);
    }

    let mut cut = max_len;
    while !diff.is_char_boundary(cut) {
        cut -= 1;
    }
    if let Some(nl) = diff[..cut].rfind('\n') {
        cut = nl + 1;
    }

    Cow::Owned(format!(
        "{}[diff truncated: {} bytes omitted]\n",
        &diff[..cut],
        diff.len() - cut
    ))
}
