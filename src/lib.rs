//! Generate conventional commit messages for staged changes.
//!
//! The interesting part lives in [`filter`]: every staged file is committed,
//! but only the ones worth reading (not binary, not ignored, under 1 MiB)
//! end up in the diff sent to the model.

pub mod cli_args;
pub mod commit;
pub mod config;
pub mod error;
pub mod filter;
pub mod git;
pub mod hook;
pub mod llm;
pub mod logging;
pub mod setup;
pub mod template;

pub use cli_args::Cli;
pub use error::GitError;
pub use filter::{DiffBundle, FilterDecision, FilterReason, IgnoreRuleSet, build_diff_bundle};
pub use git::{GitRepo, StagedFile, list_staged};
