//! # Assertion Evaluation Module / 断言评估模块
//!
//! Evaluates declarative assertions against what was observed from a driven
//! process. Evaluation never stops at the first failure: every assertion yields
//! at most one failure entry, so N failing assertions produce N entries.
//!
//! 根据从被驱动进程观测到的内容评估声明式断言。
//! 评估不会在第一个失败处停止：每个断言最多产生一条失败记录，
//! 因此 N 个失败的断言会产生 N 条记录。

use std::path::Path;

use crate::core::config::{Assertion, Expected, Subject};
use crate::core::models::{Failure, FailureKind};

/// Longest excerpt of actual text quoted in a failure message.
const EXCERPT_LIMIT: usize = 200;

/// State of a scenario's artifact after the process exited.
/// 进程退出后场景产物的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactState<'a> {
    /// The scenario declares no artifact.
    NotDeclared,
    /// The artifact file does not exist.
    Missing(&'a Path),
    /// The artifact file exists but could not be read.
    Unreadable(&'a Path),
    /// The artifact text.
    Present(&'a str),
}

/// Everything an assertion can look at.
/// 断言可以检查的全部内容。
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    pub exit_code: i32,
    pub stdout: &'a str,
    pub stderr: &'a str,
    pub artifact: ArtifactState<'a>,
}

/// The text an assertion's subject resolves to.
enum Resolved<'a> {
    Code(i32),
    Text(&'a str),
    /// Optional artifact that does not exist: the assertion is skipped.
    Skip,
    Unavailable(Failure),
}

fn resolve<'a>(subject: Subject, observed: &Observation<'a>) -> Resolved<'a> {
    match subject {
        Subject::ExitCode => Resolved::Code(observed.exit_code),
        Subject::Stdout => Resolved::Text(observed.stdout),
        Subject::Stderr => Resolved::Text(observed.stderr),
        Subject::Artifact | Subject::ArtifactOptional => match observed.artifact {
            ArtifactState::Present(text) => Resolved::Text(text),
            ArtifactState::Missing(_) if subject == Subject::ArtifactOptional => Resolved::Skip,
            ArtifactState::Missing(path) => Resolved::Unavailable(Failure::new(
                FailureKind::ArtifactMissing,
                format!("{subject} unavailable: file not found ({})", path.display()),
            )),
            ArtifactState::Unreadable(path) => Resolved::Unavailable(Failure::new(
                FailureKind::ArtifactUnreadable,
                format!("{subject} unavailable: file unreadable ({})", path.display()),
            )),
            ArtifactState::NotDeclared => Resolved::Unavailable(Failure::new(
                FailureKind::ArtifactMissing,
                format!("{subject} unavailable: scenario declares no artifact"),
            )),
        },
    }
}

/// Evaluates one assertion, returning the failure if it does not hold.
///
/// # Arguments
/// * `assertion` - The assertion to check
/// * `observed` - The observation of the finished process
///
/// # Returns
/// `None` if the assertion holds (or is skipped), otherwise exactly one `Failure`
///
/// 评估单个断言；若不成立则返回失败信息。
pub fn evaluate(assertion: &Assertion, observed: &Observation<'_>) -> Option<Failure> {
    let subject = assertion.subject();
    let actual = match resolve(subject, observed) {
        Resolved::Skip => return None,
        Resolved::Unavailable(failure) => return Some(failure),
        resolved => resolved,
    };

    match (assertion, actual) {
        (Assertion::Equals { value: Expected::Code(expected), .. }, Resolved::Code(code)) => {
            (i64::from(code) != *expected).then(|| {
                Failure::assertion(format!("{subject} expected {expected}, got {code}"))
            })
        }
        (Assertion::Equals { value: Expected::Text(expected), .. }, Resolved::Text(text)) => {
            (text.trim() != expected.trim()).then(|| {
                Failure::assertion(format!(
                    "{subject} expected {:?}, got {:?}",
                    expected,
                    excerpt(text)
                ))
            })
        }
        (Assertion::Equals { value, .. }, _) => Some(Failure::assertion(format!(
            "{subject} cannot be compared with {value}"
        ))),
        (Assertion::ContainsAll { values, .. }, Resolved::Text(text)) => {
            let missing: Vec<&str> = values
                .iter()
                .map(String::as_str)
                .filter(|needle| !text.contains(needle))
                .collect();
            (!missing.is_empty()).then(|| {
                Failure::assertion(format!("{subject} missing expected substrings: {missing:?}"))
            })
        }
        (Assertion::ContainsNone { values, .. }, Resolved::Text(text)) => {
            let found: Vec<&str> = values
                .iter()
                .map(String::as_str)
                .filter(|needle| text.contains(needle))
                .collect();
            (!found.is_empty()).then(|| {
                Failure::assertion(format!("{subject} contains forbidden substrings: {found:?}"))
            })
        }
        (Assertion::Nonempty { .. }, Resolved::Text(text)) => (text.trim().is_empty())
            .then(|| Failure::assertion(format!("{subject} is empty"))),
        (_, _) => Some(Failure::assertion(format!(
            "{subject} does not support this check"
        ))),
    }
}

/// Evaluates every assertion and collects all failures, in assertion order.
/// 评估所有断言并按断言顺序收集全部失败。
pub fn evaluate_all(assertions: &[Assertion], observed: &Observation<'_>) -> Vec<Failure> {
    assertions
        .iter()
        .filter_map(|assertion| evaluate(assertion, observed))
        .collect()
}

/// Shortens long output for failure messages.
/// 为失败消息截短过长的输出。
pub fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(EXCERPT_LIMIT) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
