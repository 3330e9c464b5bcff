//! Typed failures raised while talking to git.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("not a git repository: {}", path.display())]
    NotARepository { path: PathBuf },

    #[error("git executable not found; make sure git is installed and on your PATH")]
    GitNotFound,

    #[error("failed to run git: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("git {args} exited with status {code:?}: {stderr}")]
    CommandFailed {
        args: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to retrieve staged diff for {path}: {reason}")]
    DiffRetrievalFailed { path: String, reason: String },
}
