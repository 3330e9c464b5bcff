/// Best-effort cleanup of a model's free-text reply into a commit message.
///
/// Strips code fences and wrapping quotes, trims every line, keeps exactly one
/// blank line between the subject and the body and collapses blank runs in the
/// body. Never rejects the text; an empty result means the model said nothing.
pub fn format_commit_message(raw: &str) -> String {
    let text = strip_fences(raw.trim());
    let text = strip_quotes(text);

    let mut lines = text
        .lines()
        .map(str::trim_end)
        .skip_while(|l| l.trim().is_empty());

    let Some(subject) = lines.next() else {
        return String::new();
    };

    let mut out = subject.trim().to_string();
    let mut body: Vec<&str> = Vec::new();
    for line in lines {
        if line.is_empty() && body.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        body.push(line);
    }
    while body.last().is_some_and(|l| l.is_empty()) {
        body.pop();
    }

    if !body.is_empty() {
        out.push_str("\n\n");
        out.push_str(&body.join("\n"));
    }
    out
}

fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an info string such as ```text on the opening fence.
    let rest = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Only a quote pair that wraps the whole reply; `'a' and 'b'` stays as is.
fn strip_quotes(text: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(q)
            .and_then(|t| t.strip_suffix(q))
            .filter(|inner| !inner.contains(q))
        {
            return inner.trim();
        }
    }
    text
}
