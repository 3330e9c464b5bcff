use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::env;

use opencommit::cli_args::{Cli, Command, HookAction};
use opencommit::config::Config;
use opencommit::git::GitRepo;
use opencommit::{commit, hook, logging};

fn run_hook(action: HookAction) -> Result<()> {
    let cwd = env::current_dir().context("failed to read current directory")?;
    let repo = GitRepo::discover(&cwd)?;

    match action {
        HookAction::Set => {
            let path = hook::install(&repo)?;
            println!("{} hook installed at {}", "Success:".green().bold(), path.display());
        }
        HookAction::Unset => match hook::uninstall(&repo)? {
            Some(path) => {
                println!("{} hook removed from {}", "Success:".green().bold(), path.display())
            }
            None => println!("{} no {} hook found", "Warning:".yellow().bold(), hook::HOOK_NAME),
        },
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match &cli.command {
        Some(Command::Hook { action }) => run_hook(*action),
        None => {
            let cfg = Config::from_sources(&cli)?;
            let cwd = env::current_dir().context("failed to read current directory")?;
            commit::run(&cli, &cfg, &cwd)
        }
    }
}
