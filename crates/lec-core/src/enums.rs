//! Status enums, material kinds, formats, and audit vocabulary for Lectern.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `TaskStatus` carries the task state machine; every transition check in the
//! system goes through `TaskStatus::can_transition_to`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Status of a generation task.
///
/// ```text
/// pending → in_progress → completed
///                       → failed → pending (retry)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Failed,
    ];

    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::InProgress],
            Self::InProgress => &[Self::Completed, Self::Failed],
            Self::Failed => &[Self::Pending],
            Self::Completed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Open tasks form the backlog an operator triages.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MaterialKind
// ---------------------------------------------------------------------------

/// Kind of educational material a task produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Notes,
    Quiz,
    Presentation,
}

impl MaterialKind {
    pub const ALL: [Self; 3] = [Self::Notes, Self::Quiz, Self::Presentation];

    /// Format used when the producer does not report one.
    #[must_use]
    pub const fn default_format(self) -> OutputFormat {
        match self {
            Self::Notes => OutputFormat::Pdf,
            Self::Quiz => OutputFormat::Docx,
            Self::Presentation => OutputFormat::Pptx,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Quiz => "quiz",
            Self::Presentation => "presentation",
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OutputFormat
// ---------------------------------------------------------------------------

/// File format of a produced material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Pdf,
    Md,
    Docx,
    Pptx,
}

impl OutputFormat {
    /// Infer the format from a storage path's extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, ext) = path.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "md" | "markdown" => Some(Self::Md),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Md => "md",
            Self::Docx => "docx",
            Self::Pptx => "pptx",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BloomLevel
// ---------------------------------------------------------------------------

/// Bloom's taxonomy cognitive level of a learning outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BloomLevel {
    Remember,
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

impl BloomLevel {
    pub const ALL: [Self; 6] = [
        Self::Remember,
        Self::Understand,
        Self::Apply,
        Self::Analyze,
        Self::Evaluate,
        Self::Create,
    ];

    /// Action verbs that signal this level.
    #[must_use]
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Remember => &[
                "define", "list", "label", "name", "identify", "recall", "state", "recognize",
                "match", "select", "reproduce",
            ],
            Self::Understand => &[
                "explain", "describe", "summarize", "interpret", "contrast", "classify",
                "discuss", "distinguish", "illustrate",
            ],
            Self::Apply => &[
                "apply", "demonstrate", "solve", "use", "execute", "implement", "calculate",
                "complete", "practice",
            ],
            Self::Analyze => &[
                "analyze", "examine", "compare", "categorize", "differentiate", "investigate",
                "organize", "deconstruct", "attribute", "outline",
            ],
            Self::Evaluate => &[
                "evaluate", "assess", "justify", "critique", "judge", "defend", "recommend",
                "appraise", "argue", "support",
            ],
            Self::Create => &[
                "design", "create", "develop", "formulate", "construct", "propose", "generate",
                "compose", "plan", "produce", "invent",
            ],
        }
    }

    /// Infer a level from the first word of an outcome statement.
    #[must_use]
    pub fn infer(text: &str) -> Option<Self> {
        let verb = text
            .split_whitespace()
            .next()?
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.keywords().contains(&verb.as_str()))
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remember => "remember",
            Self::Understand => "understand",
            Self::Apply => "apply",
            Self::Analyze => "analyze",
            Self::Evaluate => "evaluate",
            Self::Create => "create",
        }
    }
}

impl fmt::Display for BloomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    StatusChanged,
    VersionRecorded,
    Deleted,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::StatusChanged => "status_changed",
            Self::VersionRecorded => "version_recorded",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity in the ledger, used in the audit trail and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Subject,
    Topic,
    Material,
    Task,
    Clo,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Topic => "topic",
            Self::Material => "material",
            Self::Task => "task",
            Self::Clo => "clo",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_transition_table() {
        use TaskStatus::{Completed, Failed, InProgress, Pending};

        let legal = [
            (Pending, InProgress),
            (InProgress, Completed),
            (InProgress, Failed),
            (Failed, Pending),
        ];
        for from in TaskStatus::ALL {
            for to in TaskStatus::ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{from} -> {to} should be {}",
                    if expected { "legal" } else { "illegal" }
                );
            }
        }
    }

    #[test]
    fn pending_cannot_jump_to_completed() {
        assert!(!TaskStatus::Pending.can_transition_to(TaskStatus::Completed));
    }

    #[test]
    fn completed_is_terminal() {
        assert!(TaskStatus::Completed.allowed_next_states().is_empty());
        assert!(TaskStatus::Completed.is_terminal());
        assert!(!TaskStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        for status in TaskStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json.as_str(), Some(status.as_str()));
        }
    }

    #[test]
    fn format_inferred_from_extension() {
        assert_eq!(
            OutputFormat::from_path("subjects/chem/alkene-reactions.PDF"),
            Some(OutputFormat::Pdf)
        );
        assert_eq!(OutputFormat::from_path("quiz.docx"), Some(OutputFormat::Docx));
        assert_eq!(OutputFormat::from_path("no_extension"), None);
        assert_eq!(OutputFormat::from_path("weird.txt"), None);
    }

    #[test]
    fn kind_default_formats() {
        assert_eq!(MaterialKind::Notes.default_format(), OutputFormat::Pdf);
        assert_eq!(MaterialKind::Quiz.default_format(), OutputFormat::Docx);
        assert_eq!(MaterialKind::Presentation.default_format(), OutputFormat::Pptx);
    }

    #[test]
    fn bloom_level_inferred_from_leading_verb() {
        assert_eq!(
            BloomLevel::infer("Analyze the structure of binary search trees"),
            Some(BloomLevel::Analyze)
        );
        assert_eq!(
            BloomLevel::infer("Design balanced tree solutions"),
            Some(BloomLevel::Create)
        );
        assert_eq!(BloomLevel::infer("Trees are nice"), None);
        assert_eq!(BloomLevel::infer(""), None);
    }

    #[test]
    fn bloom_keywords_are_disjoint() {
        let mut seen = std::collections::HashSet::new();
        for level in BloomLevel::ALL {
            for word in level.keywords() {
                assert!(seen.insert(*word), "keyword '{word}' appears twice");
            }
        }
    }
}
