use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Judge verdicts, exactly as the platform spells them on the wire.
///
/// `Pending` and `Processing` are the only non-terminal states: once any
/// other status is observed, the submission will never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Pending,
    Processing,
    Accepted,
    #[serde(rename = "Wrong Answer")]
    WrongAnswer,
    #[serde(rename = "Time Limit Exceeded")]
    TimeLimitExceeded,
    #[serde(rename = "Memory Limit Exceeded")]
    MemoryLimitExceeded,
    #[serde(rename = "Runtime Error")]
    RuntimeError,
    #[serde(rename = "Compilation Error")]
    CompilationError,
    #[serde(rename = "Internal Error")]
    InternalError,
}

impl SubmissionStatus {
    /// Whether the judge is done with this submission.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Processing)
    }
}

/// A submission record as returned by `GET /submissions/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub user_id: i64,
    pub problem_id: i64,
    pub language_id: i64,
    pub status: SubmissionStatus,
    /// Compile or runtime diagnostics, when the verdict produced any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Milliseconds.
    #[serde(default)]
    pub runtime: Option<i64>,
    /// Kilobytes.
    #[serde(default)]
    pub memory: Option<i64>,
    #[serde(default)]
    pub passed_test_cases: i64,
    #[serde(default)]
    pub total_test_cases: i64,
    pub created_at: DateTime<Utc>,
}

/// Per-test-case outcome of an inline run (`POST /problems/{id}/run`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    /// `"Passed"` or `"Failed"`.
    pub status: String,
    #[serde(default)]
    pub is_sample: bool,
}

/// Result of running code against the sample tests without creating a
/// submission record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub passed_test_cases: i64,
    pub total_test_cases: i64,
    #[serde(default)]
    pub results: Vec<TestCaseResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_strings_round_trip() {
        for (status, wire) in [
            (SubmissionStatus::Pending, "\"Pending\""),
            (SubmissionStatus::WrongAnswer, "\"Wrong Answer\""),
            (SubmissionStatus::TimeLimitExceeded, "\"Time Limit Exceeded\""),
            (SubmissionStatus::InternalError, "\"Internal Error\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), wire);
            let back: SubmissionStatus = serde_json::from_str(wire).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn terminality() {
        assert!(!SubmissionStatus::Pending.is_terminal());
        assert!(!SubmissionStatus::Processing.is_terminal());
        assert!(SubmissionStatus::Accepted.is_terminal());
        assert!(SubmissionStatus::WrongAnswer.is_terminal());
        assert!(SubmissionStatus::CompilationError.is_terminal());
    }
}
