//! Decides which staged changes are shown to the model.
//!
//! The real commit always takes the whole index. Filtering only shapes the
//! diff text handed to the LLM: binaries, ignored paths and oversized files
//! are left out of it, and a trailing note tells the model they exist.

pub mod pattern;
pub mod rules;
pub mod size;

use std::fmt;

use crate::error::GitError;
use crate::git::StagedFile;

pub use pattern::{Pattern, matches};
pub use rules::{IgnoreRule, IgnoreRuleSet, PatternSource};

/// Why a staged file was kept out of the model's context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    None,
    IgnorePattern,
    SizeLimit,
    Binary,
    /// git could not produce a diff for the path.
    DiffUnavailable,
}

impl FilterReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterReason::None => "included",
            FilterReason::IgnorePattern => "ignore pattern",
            FilterReason::SizeLimit => "over size limit",
            FilterReason::Binary => "binary",
            FilterReason::DiffUnavailable => "diff unavailable",
        }
    }
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDecision {
    pub path: String,
    pub included: bool,
    pub reason: FilterReason,
}

impl FilterDecision {
    fn included(path: &str) -> Self {
        FilterDecision {
            path: path.to_string(),
            included: true,
            reason: FilterReason::None,
        }
    }

    fn excluded(path: &str, reason: FilterReason) -> Self {
        FilterDecision {
            path: path.to_string(),
            included: false,
            reason,
        }
    }
}

/// Diff texts for one commit-message run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffBundle {
    /// Diff of every staged path that git could diff.
    pub full_diff: String,
    /// Diff of the included paths, followed by the omission note if anything was left out.
    pub llm_diff: String,
    pub excluded_count: usize,
    /// Excluded paths in staged order.
    pub excluded_paths: Vec<String>,
    /// One decision per staged file, in staged order.
    pub decisions: Vec<FilterDecision>,
    /// Paths whose diff could not be retrieved.
    pub failed_paths: Vec<String>,
    llm_body_len: usize,
}

impl DiffBundle {
    /// Whether any staged file made it into the model's context.
    ///
    /// When this is false `llm_diff` holds at most the omission note and the
    /// model should not be called.
    pub fn has_llm_content(&self) -> bool {
        self.decisions.iter().any(|d| d.included)
    }

    /// The context is missing paths git failed to diff.
    pub fn is_incomplete(&self) -> bool {
        !self.failed_paths.is_empty()
    }

    /// `llm_diff` without the trailing omission note.
    pub fn llm_diff_body(&self) -> &str {
        &self.llm_diff[..self.llm_body_len]
    }

    /// The omission note appended to `llm_diff`, if any.
    pub fn omission_note(&self) -> Option<&str> {
        let note = self.llm_diff[self.llm_body_len..].trim_start_matches('\n');
        (!note.is_empty()).then_some(note)
    }

    pub fn excluded(&self) -> impl Iterator<Item = &FilterDecision> {
        self.decisions.iter().filter(|d| !d.included)
    }
}

/// Supplies the staged diff of a single path.
pub trait DiffSource {
    fn staged_diff_for_path(&self, path: &str) -> Result<String, GitError>;
}

/// Classify one staged file. Binary beats ignore pattern beats size limit.
pub fn decide(file: &StagedFile, rules: &IgnoreRuleSet) -> FilterDecision {
    if file.is_binary {
        return FilterDecision::excluded(&file.path, FilterReason::Binary);
    }
    if let Some(rule) = rules.matching_rule(&file.path) {
        log::trace!("{} matches {:?}", file.path, rule.pattern.as_str());
        return FilterDecision::excluded(&file.path, FilterReason::IgnorePattern);
    }
    if size::exceeds_limit(file.size_bytes) {
        return FilterDecision::excluded(&file.path, FilterReason::SizeLimit);
    }
    FilterDecision::included(&file.path)
}

/// Partition the staged files and assemble both diff texts.
///
/// Read-only with respect to the repository. A path git fails to diff is
/// dropped from both texts and reported in `failed_paths` instead of
/// aborting the whole run.
pub fn build_diff_bundle(
    staged: &[StagedFile],
    rules: &IgnoreRuleSet,
    source: &dyn DiffSource,
) -> DiffBundle {
    let mut bundle = DiffBundle::default();

    for file in staged {
        let mut decision = decide(file, rules);

        match source.staged_diff_for_path(&file.path) {
            Ok(diff) => {
                bundle.full_diff.push_str(&diff);
                if decision.included {
                    bundle.llm_diff.push_str(&diff);
                }
            }
            Err(e) => {
                log::warn!("{e}");
                bundle.failed_paths.push(file.path.clone());
                decision = FilterDecision::excluded(&file.path, FilterReason::DiffUnavailable);
            }
        }

        log::debug!("{}: {}", decision.path, decision.reason);

        if !decision.included {
            bundle.excluded_paths.push(decision.path.clone());
        }
        bundle.decisions.push(decision);
    }

    bundle.excluded_count = bundle.excluded_paths.len();
    bundle.llm_body_len = bundle.llm_diff.len();

    if bundle.excluded_count > 0 {
        let note = render_omission_note(bundle.excluded());
        if !bundle.llm_diff.is_empty() {
            if !bundle.llm_diff.ends_with('\n') {
                bundle.llm_diff.push('\n');
            }
            bundle.llm_diff.push('\n');
        }
        bundle.llm_diff.push_str(&note);
    }

    bundle
}

fn render_omission_note<'a>(excluded: impl Iterator<Item = &'a FilterDecision>) -> String {
    let excluded: Vec<&FilterDecision> = excluded.collect();
    let mut note = format!(
        "# Note: {} staged file(s) were omitted from this diff and are not shown, \
         but they are part of the commit:\n",
        excluded.len()
    );
    for d in excluded {
        note.push_str(&format!("#   {} ({})\n", d.path, d.reason));
    }
    note
}
