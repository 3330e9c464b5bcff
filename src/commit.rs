//! Drives one run: enumerate, filter, ask the model, confirm, commit.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::Cli;
use crate::config::Config;
use crate::filter::{DiffBundle, IgnoreRuleSet, build_diff_bundle};
use crate::git::GitRepo;
use crate::llm::{CommitRequest, format_commit_message};
use crate::{setup, template};

/// Enumerate and filter the staged changes of `repo`.
///
/// `Ok(None)` means nothing is staged.
pub fn collect_bundle(repo: &GitRepo) -> Result<Option<DiffBundle>> {
    let staged = repo.list_staged()?;
    if staged.is_empty() {
        return Ok(None);
    }

    let rules = IgnoreRuleSet::load(repo.root());
    log::debug!("{} ignore pattern(s) active", rules.len());

    Ok(Some(build_diff_bundle(&staged, &rules, repo)))
}

pub fn run(cli: &Cli, cfg: &Config, dir: &Path) -> Result<()> {
    let repo = GitRepo::discover(dir)?;

    if cli.all {
        repo.stage_all()?;
    }

    let Some(bundle) = collect_bundle(&repo)? else {
        println!("No staged changes found.");
        return Ok(());
    };

    report_exclusions(&bundle);

    if cli.dry_run {
        print!("{}", bundle.llm_diff);
        return Ok(());
    }

    let placeholder = cfg.message_template_placeholder.as_str();
    let commit_args = template::split_commit_args(&cli.git_args, placeholder);

    // Under the prepare-commit-msg hook a failure here would abort the user's
    // commit, so leave the file alone and let git open the editor instead.
    if let Some(path) = &cli.message_file {
        let written = generate_message(&repo, cli, cfg, &bundle)
            .and_then(|m| write_message_file(path, &commit_args.render(&m, placeholder)));
        if let Err(e) = written {
            log::warn!("No message generated for {}: {e:#}", path.display());
            eprintln!(
                "{} {e:#}; write the commit message yourself",
                "warning:".yellow().bold()
            );
        }
        return Ok(());
    }

    let message = commit_args.render(&generate_message(&repo, cli, cfg, &bundle)?, placeholder);

    print_preview(&message);

    if cli.apply {
        let path = repo.write_commit_editmsg(&message)?;
        println!("Commit message written to {}", path.display());
        return Ok(());
    }

    if !cli.yes && !confirm("Commit with this message? [Y/n] ")? {
        println!("Commit cancelled.");
        return Ok(());
    }

    let out = repo.commit(&message, &commit_args.git_args)?;
    print!("{out}");
    Ok(())
}

/// Ask the configured model for a message describing `bundle`.
fn generate_message(
    repo: &GitRepo,
    cli: &Cli,
    cfg: &Config,
    bundle: &DiffBundle,
) -> Result<String> {
    if !bundle.has_llm_content() {
        bail!(
            "all {} staged file(s) were excluded from LLM context (binary, ignored or over 1 MiB); \
             nothing to generate a message from. Adjust .opencommitignore or write the message yourself.",
            bundle.excluded_count
        );
    }

    let llm = setup::build_llm_client(cfg, cli.no_model)?;
    let branch = repo.current_branch().ok();

    let request = CommitRequest {
        branch: branch.as_deref(),
        bundle,
        context: cli.context.as_deref(),
        language: &cfg.language,
        emoji: cfg.emoji,
        max_diff_chars: cfg.max_diff_chars,
    };

    let raw = with_spinner(!cfg.stream, "Generating commit message...", || {
        llm.generate_commit_message(&request)
    })?;
    let message = format_commit_message(&raw);
    if message.is_empty() {
        bail!("the model returned an empty commit message");
    }
    Ok(message)
}

fn report_exclusions(bundle: &DiffBundle) {
    if bundle.excluded_count > 0 {
        eprintln!(
            "{}",
            format!(
                "{} of {} staged file(s) excluded from LLM context (still committed):",
                bundle.excluded_count,
                bundle.decisions.len()
            )
            .yellow()
        );
        for d in bundle.excluded() {
            eprintln!("  {} {}", d.path, format!("({})", d.reason).bright_black());
        }
    }

    if bundle.is_incomplete() {
        eprintln!(
            "{} could not diff {}; the message is based on incomplete context",
            "warning:".yellow().bold(),
            bundle.failed_paths.join(", ")
        );
    }
}

fn with_spinner<T>(enabled: bool, msg: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    if !enabled {
        return f();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = f();
    pb.finish_and_clear();
    result
}

fn print_preview(message: &str) {
    println!();
    println!("----- Commit Message Preview -----");
    println!("{message}");
    println!("----------------------------------");
}

/// Git strips `#` lines, so the message can go in above whatever git put there.
fn write_message_file(path: &Path, message: &str) -> Result<()> {
    let existing = fs::read_to_string(path).unwrap_or_default();
    let mut content = String::from(message);
    content.push('\n');
    if !existing.trim().is_empty() {
        content.push('\n');
        content.push_str(&existing);
    }
    fs::write(path, content)
        .with_context(|| format!("failed to write commit message to {:?}", path))
}

/// Ask a yes/no question; an empty answer means yes.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(matches!(buf.trim().to_ascii_lowercase().as_str(), "" | "y" | "yes"))
}
