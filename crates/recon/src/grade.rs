//! Grade vocabularies and the fixed translation table between them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ReconError;

/// Grade terms of the student-facing export (`exceeded`, `failed`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Exceeded,
    Failed,
    Passed,
    Ungradeable,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Self::Exceeded, Self::Failed, Self::Passed, Self::Ungradeable];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exceeded => "exceeded",
            Self::Failed => "failed",
            Self::Passed => "passed",
            Self::Ungradeable => "ungradeable",
        }
    }

    /// Submission statuses considered equivalent to this grade.
    pub fn equivalents(&self) -> &'static [SubmissionStatus] {
        use SubmissionStatus::{Distinction, Incomplete, Submitted, Ungraded};
        match self {
            Self::Ungradeable => &[Incomplete, Ungraded, Submitted],
            Self::Failed => &[Incomplete],
            Self::Passed => &[SubmissionStatus::Passed],
            Self::Exceeded => &[Distinction],
        }
    }
}

impl FromStr for Grade {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| ReconError::UnknownGrade(s.to_string()))
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status terms of the submission-tracking export (`PASSED`, `DISTINCTION`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Incomplete,
    Ungraded,
    Submitted,
    Passed,
    Distinction,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 5] = [
        Self::Incomplete,
        Self::Ungraded,
        Self::Submitted,
        Self::Passed,
        Self::Distinction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incomplete => "INCOMPLETE",
            Self::Ungraded => "UNGRADED",
            Self::Submitted => "SUBMITTED",
            Self::Passed => "PASSED",
            Self::Distinction => "DISTINCTION",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translate a grade term into the submission-status terms it is equivalent to.
///
/// Fails with [`ReconError::UnknownGrade`] outside the four-term grade set.
pub fn translate(grade: &str) -> Result<Vec<&'static str>, ReconError> {
    let grade: Grade = grade.parse()?;
    Ok(grade.equivalents().iter().map(|s| s.as_str()).collect())
}

/// A candidate status recognized in either vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTerm {
    Grade(Grade),
    Submission(SubmissionStatus),
}

impl StatusTerm {
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(grade) = s.parse::<Grade>() {
            return Some(Self::Grade(grade));
        }
        SubmissionStatus::parse(s).map(Self::Submission)
    }

    /// Whether `indexed` (the stored status of the matched record) is an
    /// equivalent of this term under the translation table.
    ///
    /// A grade is translated and `indexed` tested for membership. A submission
    /// status is tested against the translation of `indexed`, which therefore
    /// has to be a grade term itself; anything else never agrees.
    pub fn agrees_with(&self, indexed: &str) -> Result<bool, ReconError> {
        match self {
            Self::Grade(grade) => Ok(translate(grade.as_str())?.iter().any(|s| *s == indexed)),
            Self::Submission(status) => {
                Ok(translate(indexed).is_ok_and(|terms| terms.contains(&status.as_str())))
            }
        }
    }
}
