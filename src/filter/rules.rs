use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;

use super::pattern::Pattern;

/// Per-repository ignore file, read from the repository root.
pub const IGNORE_FILE_NAME: &str = ".opencommitignore";

/// Noise that never helps a model describe a change.
pub const DEFAULT_PATTERNS: &[&str] = &[
    // Lock files
    "*.lock",
    "*.lockb",
    "*-lock.json",
    "*-lock.yaml",
    "package-lock.json",
    "yarn.lock",
    "poetry.lock",
    "Cargo.lock",
    "Gemfile.lock",
    "composer.lock",
    "pnpm-lock.yaml",
    // Compiled output
    "*.wasm",
    "*.class",
    "*.jar",
    "*.war",
    "*.ear",
    "*.exe",
    "*.dll",
    "*.so",
    "*.dylib",
    "*.o",
    "*.obj",
    "*.pyc",
    // Minified assets
    "*.min.js",
    "*.min.css",
    "*.map",
    // Archives
    "*.gz",
    "*.tgz",
    "*.zip",
    "*.tar",
    "*.7z",
    "*.rar",
    // Images
    "*.jpg",
    "*.jpeg",
    "*.png",
    "*.gif",
    "*.bmp",
    "*.ico",
    "*.svg",
    "*.webp",
    // Media and documents
    "*.pdf",
    "*.psd",
    "*.ai",
    "*.mp3",
    "*.mp4",
    "*.mov",
    "*.avi",
    // Generated and vendored directories
    ".git/**",
    "**/node_modules/**",
    "dist/**",
    "build/**",
    "target/**",
    "vendor/**",
    "**/__pycache__/**",
];

static COMPILED_DEFAULTS: LazyLock<Vec<IgnoreRule>> = LazyLock::new(|| {
    DEFAULT_PATTERNS
        .iter()
        .map(|p| IgnoreRule {
            pattern: Pattern::new(p),
            source: PatternSource::BuiltIn,
        })
        .collect()
});

/// Where a pattern came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSource {
    BuiltIn,
    UserFile,
}

#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pub pattern: Pattern,
    pub source: PatternSource,
}

/// Built-in defaults plus whatever the repository's ignore file adds.
///
/// Order is kept for diagnostics only; any matching rule excludes the path.
#[derive(Debug, Clone)]
pub struct IgnoreRuleSet {
    rules: Vec<IgnoreRule>,
}

impl Default for IgnoreRuleSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl IgnoreRuleSet {
    /// Only the built-in patterns.
    pub fn defaults() -> Self {
        IgnoreRuleSet {
            rules: COMPILED_DEFAULTS.clone(),
        }
    }

    /// Defaults plus `<repo_root>/.opencommitignore`, if it exists and can be read.
    ///
    /// A missing file is normal. An unreadable one is logged and skipped.
    pub fn load(repo_root: &Path) -> Self {
        let mut set = Self::defaults();
        let path = repo_root.join(IGNORE_FILE_NAME);

        match fs::read_to_string(&path) {
            Ok(content) => {
                let patterns = parse_ignore_file(&content);
                log::debug!(
                    "Loaded {} pattern(s) from {}",
                    patterns.len(),
                    path.display()
                );
                set.extend_user_patterns(patterns);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::trace!("No {} in {}", IGNORE_FILE_NAME, repo_root.display());
            }
            Err(e) => {
                log::warn!(
                    "Could not read {}: {e}; using default ignore patterns only",
                    path.display()
                );
            }
        }

        set
    }

    pub fn extend_user_patterns<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rules.extend(patterns.into_iter().map(|p| IgnoreRule {
            pattern: Pattern::new(p.as_ref()),
            source: PatternSource::UserFile,
        }));
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.matching_rule(path).is_some()
    }

    /// First rule that excludes `path`.
    pub fn matching_rule(&self, path: &str) -> Option<&IgnoreRule> {
        self.rules.iter().find(|r| r.pattern.matches(path))
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One pattern per line; blank lines and `#` comments are skipped.
pub fn parse_ignore_file(content: &str) -> Vec<String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}
