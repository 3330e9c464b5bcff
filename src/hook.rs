//! `prepare-commit-msg` hook that fills in the message during a plain `git commit`.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::PathBuf;

use crate::git::GitRepo;

pub const HOOK_NAME: &str = "prepare-commit-msg";
const HOOK_MARKER: &str = "# installed by opencommit";

pub fn hook_script() -> String {
    format!(
        r#"#!/bin/sh
{HOOK_MARKER}
# Fills in the commit message for staged changes. Set SKIP_OC=1 to bypass.

# $2 is set when git already has a message: -m/-F, a template, merge, squash or amend.
case "$2" in
  message|template|merge|squash|commit) exit 0 ;;
esac

if [ -n "$SKIP_OC" ]; then
  exit 0
fi

exec opencommit --message-file "$1"
"#
    )
}

/// Whether the hook file at hand was written by us.
pub fn is_ours(content: &str) -> bool {
    content.lines().take(3).any(|l| l.trim() == HOOK_MARKER)
}

/// Install the hook; refuses to overwrite a hook someone else wrote.
pub fn install(repo: &GitRepo) -> Result<PathBuf> {
    let dir = repo.hooks_dir()?;
    let path = dir.join(HOOK_NAME);

    if let Ok(existing) = fs::read_to_string(&path) {
        if !is_ours(&existing) {
            bail!(
                "{} already exists and was not installed by opencommit; remove it first",
                path.display()
            );
        }
    }

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create hooks directory {:?}", dir))?;
    fs::write(&path, hook_script())
        .with_context(|| format!("failed to write hook to {:?}", path))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("failed to make {:?} executable", path))?;
    }

    Ok(path)
}

/// Remove our hook. `Ok(None)` when there was nothing to remove.
pub fn uninstall(repo: &GitRepo) -> Result<Option<PathBuf>> {
    let path = repo.hooks_dir()?.join(HOOK_NAME);

    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("failed to read {:?}", path)),
    };

    if !is_ours(&content) {
        bail!(
            "{} was not installed by opencommit; leaving it alone",
            path.display()
        );
    }

    fs::remove_file(&path).with_context(|| format!("failed to remove {:?}", path))?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_carries_marker_and_skips() {
        let script = hook_script();
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(is_ours(&script));
        assert!(script.contains("SKIP_OC"));
        assert!(script.contains("opencommit --message-file \"$1\""));
    }

    #[test]
    fn foreign_hooks_are_not_ours() {
        assert!(!is_ours("#!/bin/sh\nnpx commitlint --edit \"$1\"\n"));
    }
}
