//! Glob-style ignore patterns evaluated against repository-relative paths.
//!
//! Semantics:
//! - `*` matches any run of characters except `/`, `**` also crosses `/`,
//!   including inside a segment (`src/**.rs` matches `src/a/b.rs`).
//! - A pattern without `/` is tested against every path component, so
//!   `*.lock` matches `a/b/c.lock` and `node_modules` matches anything below
//!   a `node_modules` directory at any depth.
//! - A pattern ending in `/` or `/**` matches that directory and everything
//!   beneath it.
//! - Any other pattern is anchored at the repository root.
//!
//! Globs are compiled through `globset`, whose regex engine runs in linear
//! time, so hostile ignore files can't trigger catastrophic backtracking.
//! A pattern that fails to compile (an unclosed `[`, say) degrades to a
//! literal string comparison.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// One compiled pattern, remembering the text it came from.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    kind: PatternKind,
}

#[derive(Debug, Clone)]
enum PatternKind {
    Component(Matcher),
    Anchored(Matcher),
    Directory(Matcher),
}

#[derive(Debug, Clone)]
enum Matcher {
    Glob(GlobSet),
    Literal(String),
}

impl Matcher {
    fn compile(glob: &str) -> Self {
        match build_glob_set(glob) {
            Ok(set) => Matcher::Glob(set),
            Err(e) => {
                log::debug!("treating {glob:?} as a literal path: {e}");
                Matcher::Literal(glob.to_string())
            }
        }
    }

    fn is_match(&self, candidate: &str) -> bool {
        match self {
            Matcher::Glob(g) => g.is_match(candidate),
            Matcher::Literal(lit) => lit == candidate,
        }
    }
}

impl Pattern {
    pub fn new(pattern: &str) -> Self {
        let raw = pattern.to_string();
        let normalized = normalize_pattern(pattern);

        let kind = if let Some(dir) = normalized
            .strip_suffix("/**")
            .or_else(|| normalized.strip_suffix('/'))
        {
            if dir.is_empty() || dir == "**" {
                PatternKind::Anchored(Matcher::compile("**"))
            } else {
                PatternKind::Directory(Matcher::compile(dir))
            }
        } else if normalized.contains('/') {
            PatternKind::Anchored(Matcher::compile(&normalized))
        } else {
            PatternKind::Component(Matcher::compile(&normalized))
        };

        Pattern { raw, kind }
    }

    /// The pattern as written by its author.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, path: &str) -> bool {
        let path = normalize_path(path);
        if path.is_empty() {
            return false;
        }

        match &self.kind {
            PatternKind::Component(m) => path.split('/').any(|c| m.is_match(c)),
            PatternKind::Anchored(m) => m.is_match(&path),
            PatternKind::Directory(m) => ancestors_and_self(&path).any(|p| m.is_match(p)),
        }
    }
}

fn build_glob_set(glob: &str) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for variant in expand_inner_double_star(glob) {
        builder.add(GlobBuilder::new(&variant).literal_separator(true).build()?);
    }
    builder.build()
}

/// globset reads a `**` that touches other characters in its segment as `*`.
/// Rewrite each such `**` into a same-segment form and a form that descends
/// through directories: `src/**.rs` becomes `src/*.rs` and `src/*/**/*.rs`.
fn expand_inner_double_star(glob: &str) -> Vec<String> {
    let bytes = glob.as_bytes();
    let inner = glob.match_indices("**").map(|(i, _)| i).find(|&i| {
        let before = i.checked_sub(1).map(|j| bytes[j]);
        let after = bytes.get(i + 2).copied();
        before.is_some_and(|b| b != b'/') || after.is_some_and(|b| b != b'/' && b != b'*')
    });

    let Some(i) = inner else {
        return vec![glob.to_string()];
    };

    let (prefix, suffix) = (&glob[..i], &glob[i + 2..]);
    expand_inner_double_star(suffix)
        .into_iter()
        .flat_map(|rest| {
            [
                format!("{prefix}*{rest}"),
                format!("{prefix}*/**/*{rest}"),
            ]
        })
        .collect()
}

/// Test a single path against a single pattern.
pub fn matches(pattern: &str, path: &str) -> bool {
    Pattern::new(pattern).matches(path)
}

fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.trim_start_matches("./").trim_start_matches('/').to_string()
}

fn normalize_pattern(pattern: &str) -> String {
    let pattern = pattern.trim().replace('\\', "/");
    pattern
        .trim_start_matches("./")
        .trim_start_matches('/')
        .to_string()
}

/// `a/b/c` yields `a`, `a/b`, `a/b/c`.
fn ancestors_and_self(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/')
        .map(move |(i, _)| &path[..i])
        .chain(std::iter::once(path))
}
