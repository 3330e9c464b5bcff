//! Commit message templates smuggled through the `git commit` passthrough args.
//!
//! A passthrough argument that contains the placeholder is not a git flag: it
//! is a template, and the generated message is substituted into it. Both the
//! bare form (`--git-arg '$msg (#205)'`) and the flag form
//! (`--git-arg '--template-msg=$msg (#205)'`) are recognized.

/// Default placeholder, overridable with `OCO_MESSAGE_TEMPLATE_PLACEHOLDER`.
pub const DEFAULT_PLACEHOLDER: &str = "$msg";

const TEMPLATE_FLAG: &str = "--template-msg=";

/// Passthrough args with the template pulled out.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommitArgs {
    pub template: Option<String>,
    pub git_args: Vec<String>,
}

impl CommitArgs {
    /// Substitute `message` into the template, or return it unchanged.
    pub fn render(&self, message: &str, placeholder: &str) -> String {
        match &self.template {
            Some(t) => apply_template(message, t, placeholder),
            None => message.to_string(),
        }
    }
}

/// First passthrough arg carrying the placeholder. An empty placeholder never matches.
pub fn check_message_template<'a>(args: &'a [String], placeholder: &str) -> Option<&'a str> {
    if placeholder.is_empty() {
        return None;
    }
    args.iter()
        .map(String::as_str)
        .find(|a| a.contains(placeholder))
}

/// Split the template arg out of `args`; everything else goes to `git commit` in order.
pub fn split_commit_args(args: &[String], placeholder: &str) -> CommitArgs {
    let Some(found) = args
        .iter()
        .position(|a| !placeholder.is_empty() && a.contains(placeholder))
    else {
        return CommitArgs {
            template: None,
            git_args: args.to_vec(),
        };
    };

    let raw = &args[found];
    let template = raw.strip_prefix(TEMPLATE_FLAG).unwrap_or(raw).to_string();
    log::debug!("Using commit message template {template:?}");

    let git_args = args
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != found)
        .map(|(_, a)| a.clone())
        .collect();

    CommitArgs {
        template: Some(template),
        git_args,
    }
}

pub fn apply_template(message: &str, template: &str, placeholder: &str) -> String {
    if placeholder.is_empty() {
        return message.to_string();
    }
    template.replace(placeholder, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_template_arg() {
        let extra = args(&["-a", "--no-verify", "--template-msg=$msg"]);
        assert_eq!(
            check_message_template(&extra, DEFAULT_PLACEHOLDER),
            Some("--template-msg=$msg")
        );

        let extra = args(&["-a", "--no-verify", "--template-msg=$custom"]);
        assert_eq!(
            check_message_template(&extra, "$custom"),
            Some("--template-msg=$custom")
        );

        let extra = args(&["-a", "--no-verify"]);
        assert_eq!(check_message_template(&extra, DEFAULT_PLACEHOLDER), None);
        assert_eq!(check_message_template(&extra, ""), None);
    }

    #[test]
    fn applies_template() {
        assert_eq!(
            apply_template(
                "Test commit message",
                "Subject: {message}\n\nDetails go here",
                "{message}"
            ),
            "Subject: Test commit message\n\nDetails go here"
        );
        assert_eq!(
            apply_template("fix: typo", "$msg (#205)", DEFAULT_PLACEHOLDER),
            "fix: typo (#205)"
        );
    }

    #[test]
    fn template_arg_is_not_passed_to_git() {
        let split = split_commit_args(
            &args(&["--no-verify", "--template-msg=[JIRA-1] $msg", "--signoff"]),
            DEFAULT_PLACEHOLDER,
        );
        assert_eq!(split.template.as_deref(), Some("[JIRA-1] $msg"));
        assert_eq!(split.git_args, args(&["--no-verify", "--signoff"]));
        assert_eq!(
            split.render("feat: add cache", DEFAULT_PLACEHOLDER),
            "[JIRA-1] feat: add cache"
        );
    }

    #[test]
    fn bare_template_and_no_template() {
        let split = split_commit_args(&args(&["$msg #205"]), DEFAULT_PLACEHOLDER);
        assert_eq!(split.template.as_deref(), Some("$msg #205"));
        assert!(split.git_args.is_empty());

        let split = split_commit_args(&args(&["--no-verify"]), DEFAULT_PLACEHOLDER);
        assert_eq!(split.template, None);
        assert_eq!(split.git_args, args(&["--no-verify"]));
        assert_eq!(split.render("chore: x", DEFAULT_PLACEHOLDER), "chore: x");
    }
}
