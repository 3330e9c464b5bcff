use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Provider;

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "opencommit",
    version,
    about = "Generate conventional commit messages for your staged changes with an LLM"
)]
#[command(group(
    ArgGroup::new("model_group")
        .args(["model", "no_model"])
        .multiple(false)
))]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Model name to use (e.g. gpt-4o-mini, llama3)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// LLM provider
    #[arg(long, value_enum, global = true)]
    pub provider: Option<Provider>,

    /// Disable model calls; generate a placeholder message instead
    #[arg(long, global = true)]
    pub no_model: bool,

    /// API key (otherwise uses OCO_API_KEY or OPENAI_API_KEY)
    #[arg(long, env = "OCO_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Extra context for the model, e.g. what the ticket is about
    #[arg(long, short = 'c')]
    pub context: Option<String>,

    /// Stage all changes (git add -A) before generating
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Commit without asking for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Write the message into .git/COMMIT_EDITMSG instead of committing
    #[arg(long, conflicts_with = "message_file")]
    pub apply: bool,

    /// Write the message to this file instead of committing (used by the git hook)
    #[arg(long, value_name = "PATH")]
    pub message_file: Option<PathBuf>,

    /// Show what would be sent to the model, then stop
    #[arg(long)]
    pub dry_run: bool,

    /// Extra argument passed through to `git commit` (repeatable)
    #[arg(long = "git-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub git_args: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands, e.g. `opencommit hook set`
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the prepare-commit-msg git hook
    Hook {
        #[command(subcommand)]
        action: HookAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    /// Install the hook in the current repository
    Set,
    /// Remove the hook installed by opencommit
    Unset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_commit_flags() {
        let cli = Cli::try_parse_from([
            "opencommit",
            "-y",
            "--context",
            "JIRA-12",
            "--git-arg",
            "--no-verify",
            "-vv",
        ])
        .unwrap();

        assert!(cli.yes);
        assert_eq!(cli.context.as_deref(), Some("JIRA-12"));
        assert_eq!(cli.git_args, vec!["--no-verify"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.command.is_none());
    }

    #[test]
    fn model_and_no_model_conflict() {
        assert!(Cli::try_parse_from(["opencommit", "--model", "x", "--no-model"]).is_err());
    }

    #[test]
    fn parses_hook_subcommand() {
        let cli = Cli::try_parse_from(["opencommit", "hook", "unset"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Hook {
                action: HookAction::Unset
            })
        ));
    }
}
