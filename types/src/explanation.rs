use std::fmt;

/// Coarse urgency classification attached to an explanation.
///
/// Ordering is by urgency: `Info < Warning < Critical`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExplanationError {
    #[error("explanation title must not be empty")]
    EmptyTitle,
    #[error("explanation content must not be empty")]
    EmptyContent,
}

/// Short structured text payload describing the medical rationale for the
/// current stage.
///
/// The provider's JSON reply uses `warningLevel` for the severity field;
/// the serde alias accepts both spellings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Explanation {
    pub title: String,
    pub content: String,
    #[serde(alias = "warningLevel")]
    pub severity: Severity,
}

impl Explanation {
    /// Build an explanation, rejecting empty title or content.
    pub fn try_new(
        title: impl Into<String>,
        content: impl Into<String>,
        severity: Severity,
    ) -> Result<Self, ExplanationError> {
        let title = title.into();
        let content = content.into();
        if title.trim().is_empty() {
            return Err(ExplanationError::EmptyTitle);
        }
        if content.trim().is_empty() {
            return Err(ExplanationError::EmptyContent);
        }
        Ok(Self {
            title,
            content,
            severity,
        })
    }
}
