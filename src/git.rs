use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command as GitCommand;

use crate::error::GitError;
use crate::filter::DiffSource;

/// A staged path as seen by the index at the time of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Repository-relative, forward-slash separated.
    pub path: String,
    pub is_binary: bool,
    /// Size of the working-tree file; 0 when it was deleted or can't be read.
    pub size_bytes: u64,
}

/// Handle on the working tree of a repository. Every command runs from its root.
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Find the repository containing `start`.
    pub fn discover(start: &Path) -> Result<Self, GitError> {
        if !start.is_dir() {
            return Err(GitError::NotARepository {
                path: start.to_path_buf(),
            });
        }

        match run_git(start, &["rev-parse", "--show-toplevel"]) {
            Ok(out) => {
                let root = out.trim();
                if root.is_empty() {
                    // Inside .git itself, or a bare repository: no working tree.
                    return Err(GitError::NotARepository {
                        path: start.to_path_buf(),
                    });
                }
                Ok(GitRepo {
                    root: PathBuf::from(root),
                })
            }
            Err(GitError::CommandFailed { .. }) => Err(GitError::NotARepository {
                path: start.to_path_buf(),
            }),
            Err(e) => Err(e),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run a git command in the repository root and capture stdout as String.
    pub fn output(&self, args: &[&str]) -> Result<String, GitError> {
        run_git(&self.root, args)
    }

    /// Enumerate staged paths with their binary classification and on-disk size.
    ///
    /// Symlinks are sized as the link itself, which is what git stages.
    /// Nothing staged is an empty list, not an error.
    pub fn list_staged(&self) -> Result<Vec<StagedFile>, GitError> {
        let numstat = self.output(&["diff", "--cached", "--numstat", "--no-renames", "-z"])?;

        let files = parse_numstat(&numstat)
            .into_iter()
            .map(|(path, is_binary)| {
                let size_bytes = fs::symlink_metadata(self.root.join(&path))
                    .map(|m| m.len())
                    .unwrap_or(0);
                StagedFile {
                    path,
                    is_binary,
                    size_bytes,
                }
            })
            .collect();

        Ok(files)
    }

    /// Get the staged diff of a single path.
    pub fn staged_diff_for_path(&self, path: &str) -> Result<String, GitError> {
        self.output(&[
            "--literal-pathspecs",
            "diff",
            "--cached",
            "--no-renames",
            "--no-color",
            "--no-ext-diff",
            "--",
            path,
        ])
        .map_err(|e| GitError::DiffRetrievalFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Get the current branch name. Works on an unborn branch too.
    pub fn current_branch(&self) -> Result<String, GitError> {
        let name = self.output(&["symbolic-ref", "--short", "HEAD"])?;
        Ok(name.trim().to_string())
    }

    /// Stage all new, modified, and deleted files
    pub fn stage_all(&self) -> Result<(), GitError> {
        log::warn!("Staging all changes");
        self.output(&["add", "-A"])?;
        Ok(())
    }

    /// Commit the staged index with `message`. Extra arguments go straight to `git commit`.
    pub fn commit(&self, message: &str, extra_args: &[String]) -> Result<String, GitError> {
        let mut args = vec!["commit", "-m", message];
        args.extend(extra_args.iter().map(String::as_str));
        self.output(&args)
    }

    /// Get the absolute path to the Git directory (e.g. .git)
    pub fn git_dir(&self) -> Result<PathBuf, GitError> {
        let dir = self.output(&["rev-parse", "--absolute-git-dir"])?;
        Ok(PathBuf::from(dir.trim()))
    }

    /// Directory git runs hooks from, honoring `core.hooksPath`.
    pub fn hooks_dir(&self) -> Result<PathBuf, GitError> {
        let dir = self.output(&["rev-parse", "--git-path", "hooks"])?;
        Ok(self.root.join(dir.trim()))
    }

    /// Write the commit message into .git/COMMIT_EDITMSG so the next `git commit`
    /// will use it as the default message in the editor.
    pub fn write_commit_editmsg(&self, message: &str) -> Result<PathBuf> {
        let path = self.git_dir()?.join("COMMIT_EDITMSG");
        fs::write(&path, message)
            .with_context(|| format!("failed to write commit message to {:?}", path))?;
        Ok(path)
    }
}

impl DiffSource for GitRepo {
    fn staged_diff_for_path(&self, path: &str) -> Result<String, GitError> {
        GitRepo::staged_diff_for_path(self, path)
    }
}

/// List the staged files of the repository containing `repo_root`.
pub fn list_staged(repo_root: &Path) -> Result<Vec<StagedFile>, GitError> {
    GitRepo::discover(repo_root)?.list_staged()
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String, GitError> {
    log::trace!("git {:?} (in {})", args, dir.display());

    let output = GitCommand::new("git")
        .args(["-c", "core.quotepath=false"])
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => GitError::GitNotFound,
            _ => GitError::Spawn(e),
        })?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            args: args.join(" "),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Parse `git diff --numstat -z` output into `(path, is_binary)` pairs.
///
/// Each record is `added<TAB>deleted<TAB>path<NUL>`; git prints `-` for both
/// counts when it considers the file binary.
fn parse_numstat(output: &str) -> Vec<(String, bool)> {
    output
        .split('\0')
        .filter(|record| !record.is_empty())
        .filter_map(|record| {
            let mut fields = record.splitn(3, '\t');
            let added = fields.next()?.trim_start_matches('\n');
            let deleted = fields.next()?;
            let path = fields.next()?;
            if path.is_empty() {
                return None;
            }
            Some((path.to_string(), added == "-" && deleted == "-"))
        })
        .collect()
}
