//! # Suite Configuration Module / 测试套件配置模块
//!
//! This module defines the scenario suite loaded from a TOML file: the target
//! executable, the working directory artifacts are resolved against, the default
//! timeout, and the ordered list of scenarios with their assertions.
//!
//! 此模块定义从 TOML 文件加载的场景套件：目标可执行文件、解析产物路径所用的工作目录、
//! 默认超时时间，以及按顺序排列的场景及其断言。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// The part of a run an assertion looks at.
/// 断言所检查的运行结果部分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    /// The exit code of the driven process.
    /// 被驱动进程的退出码。
    ExitCode,
    /// Everything the process wrote to standard output.
    /// 进程写入标准输出的全部内容。
    Stdout,
    /// Everything the process wrote to standard error.
    /// 进程写入标准错误的全部内容。
    Stderr,
    /// The text of the scenario's artifact. An absent file fails the assertion.
    /// 场景产物文件的文本。文件不存在时断言失败。
    Artifact,
    /// The text of the scenario's artifact, checked only when the file exists.
    /// 场景产物文件的文本，仅在文件存在时检查。
    ArtifactOptional,
}

impl Subject {
    /// The name used for this subject in failure messages.
    pub fn label(self) -> &'static str {
        match self {
            Subject::ExitCode => "exit_code",
            Subject::Stdout => "stdout_text",
            Subject::Stderr => "stderr_text",
            Subject::Artifact | Subject::ArtifactOptional => "artifact_text",
        }
    }

    pub fn is_artifact(self) -> bool {
        matches!(self, Subject::Artifact | Subject::ArtifactOptional)
    }

    pub fn is_text(self) -> bool {
        !matches!(self, Subject::ExitCode)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The expected value of an `equals` assertion.
/// An integer compares against `exit_code`, a string against a text subject.
///
/// `equals` 断言的期望值。
/// 整数与 `exit_code` 比较，字符串与文本类主体比较。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Expected {
    Code(i64),
    Text(String),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Code(code) => write!(f, "{code}"),
            Expected::Text(text) => write!(f, "{text:?}"),
        }
    }
}

/// A declarative check evaluated after the driven process has exited.
///
/// In the suite file each assertion is a table tagged by `kind`:
///
/// ```toml
/// [[scenarios.assertions]]
/// kind = "contains_all"
/// subject = "artifact"
/// values = ["rnbqkbnr"]
/// ```
///
/// 在驱动进程退出后评估的声明式检查。
/// 在套件文件中，每个断言是一个以 `kind` 标记的表。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assertion {
    /// The subject equals the value exactly (text is compared trimmed).
    /// 主体与值完全相等（文本比较时去除首尾空白）。
    Equals { subject: Subject, value: Expected },
    /// Every listed substring occurs in the subject.
    /// 每个列出的子串都出现在主体中。
    ContainsAll { subject: Subject, values: Vec<String> },
    /// None of the listed substrings occurs in the subject.
    /// 列出的子串都不出现在主体中。
    ContainsNone { subject: Subject, values: Vec<String> },
    /// The subject contains at least one non-whitespace character.
    /// 主体至少包含一个非空白字符。
    Nonempty { subject: Subject },
}

impl Assertion {
    pub fn exit_code(code: i64) -> Self {
        Assertion::Equals {
            subject: Subject::ExitCode,
            value: Expected::Code(code),
        }
    }

    pub fn equals_text(subject: Subject, text: impl Into<String>) -> Self {
        Assertion::Equals {
            subject,
            value: Expected::Text(text.into()),
        }
    }

    pub fn contains_all<I, S>(subject: Subject, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Assertion::ContainsAll {
            subject,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains_none<I, S>(subject: Subject, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Assertion::ContainsNone {
            subject,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn nonempty(subject: Subject) -> Self {
        Assertion::Nonempty { subject }
    }

    pub fn subject(&self) -> Subject {
        match self {
            Assertion::Equals { subject, .. }
            | Assertion::ContainsAll { subject, .. }
            | Assertion::ContainsNone { subject, .. }
            | Assertion::Nonempty { subject } => *subject,
        }
    }

    /// Checks that the assertion is well-formed on its own.
    /// 检查断言本身是否格式正确。
    fn validate(&self) -> std::result::Result<(), String> {
        match self {
            Assertion::Equals { subject, value } => match (subject.is_text(), value) {
                (false, Expected::Text(text)) => Err(format!(
                    "`equals` on exit_code needs an integer value, got {text:?}"
                )),
                (true, Expected::Code(code)) => Err(format!(
                    "`equals` on {subject} needs a string value, got {code}"
                )),
                _ => Ok(()),
            },
            Assertion::ContainsAll { subject, values }
            | Assertion::ContainsNone { subject, values } => {
                if !subject.is_text() {
                    Err("substring checks cannot target exit_code".to_string())
                } else if values.is_empty() {
                    Err(format!("substring list for {subject} is empty"))
                } else {
                    Ok(())
                }
            }
            Assertion::Nonempty { subject } => {
                if subject.is_text() {
                    Ok(())
                } else {
                    Err("`nonempty` cannot target exit_code".to_string())
                }
            }
        }
    }
}

/// One complete test case: a scripted command sequence plus the assertions
/// checked after the process exits.
///
/// 一个完整的测试用例：一段脚本化的命令序列，以及进程退出后检查的断言。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Scenario {
    /// Unique name, used in logs and reports.
    /// 唯一名称，用于日志和报告。
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Protocol lines sent verbatim, in order, each terminated by a newline.
    /// 按顺序原样发送的协议行，每行以换行符结尾。
    pub script: Vec<String>,
    /// The file the process is expected to produce, relative to the working directory.
    /// 进程预期生成的文件，相对于工作目录。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    /// Overrides the suite-wide timeout for this scenario.
    /// 为此场景覆盖套件级别的超时时间。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub assertions: Vec<Assertion>,
}

impl Scenario {
    pub fn new<I, S>(name: impl Into<String>, script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: None,
            script: script.into_iter().map(Into::into).collect(),
            artifact: None,
            timeout_secs: None,
            assertions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_artifact(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact = Some(path.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// The assertions actually evaluated for this scenario.
    ///
    /// A nonzero exit always fails a scenario, so when no assertion targets
    /// `exit_code` an implicit `exit_code equals 0` is placed first.
    ///
    /// 此场景实际评估的断言。
    /// 非零退出码总会导致场景失败，因此当没有断言针对 `exit_code` 时，
    /// 会在最前面隐式加入 `exit_code equals 0`。
    pub fn effective_assertions(&self) -> Vec<Assertion> {
        let mut assertions = Vec::with_capacity(self.assertions.len() + 1);
        if !self.assertions.iter().any(|a| a.subject() == Subject::ExitCode) {
            assertions.push(Assertion::exit_code(0));
        }
        assertions.extend(self.assertions.iter().cloned());
        assertions
    }

    /// Whether any assertion looks at the artifact text.
    pub fn inspects_artifact(&self) -> bool {
        self.assertions.iter().any(|a| a.subject().is_artifact())
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("scenario names must not be empty");
        }
        if self.timeout_secs == Some(0) {
            bail!("scenario '{}': timeout_secs must be greater than zero", self.name);
        }
        if self.script.is_empty() {
            warn!(scenario = %self.name, "scenario has an empty script; the process will receive no input");
        }
        for (index, assertion) in self.assertions.iter().enumerate() {
            if let Err(reason) = assertion.validate() {
                bail!("scenario '{}', assertion {}: {}", self.name, index + 1, reason);
            }
            if assertion.subject().is_artifact() && self.artifact.is_none() {
                bail!(
                    "scenario '{}', assertion {}: {} is checked but no `artifact` path is set",
                    self.name,
                    index + 1,
                    assertion.subject()
                );
            }
        }
        Ok(())
    }
}

/// Everything the driver and inspector need, passed in explicitly at construction.
/// 驱动器和检查器所需的全部设置，在构造时显式传入。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    /// The executable under test.
    /// 被测试的可执行文件。
    pub executable: PathBuf,
    /// The directory the process runs in and artifact paths are relative to.
    /// 进程运行所在的目录，产物路径也相对于此目录。
    pub working_dir: PathBuf,
    /// Timeout applied to scenarios that do not set their own.
    /// 应用于未设置自身超时的场景的超时时间。
    pub default_timeout: Duration,
}

impl RunnerSettings {
    pub fn new(executable: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            working_dir: working_dir.into(),
            default_timeout: Duration::from_secs(default_timeout_secs()),
        }
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// The timeout that applies to `scenario`.
    pub fn timeout_for(&self, scenario: &Scenario) -> Duration {
        scenario
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
    }
}

/// The whole suite file.
/// 整个套件文件。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SuiteConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Path of the executable to drive.
    /// 要驱动的可执行文件路径。
    pub executable: PathBuf,
    /// Working directory, relative to the suite file's directory when not absolute.
    /// 工作目录，非绝对路径时相对于套件文件所在目录。
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
    /// Default per-scenario timeout in seconds.
    /// 默认的单个场景超时时间（秒）。
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_timeout_secs() -> u64 {
    30
}

impl SuiteConfig {
    /// Builds the runner settings, resolving a relative working directory
    /// against `base_dir`.
    ///
    /// 构建运行器设置，将相对工作目录基于 `base_dir` 解析。
    pub fn settings(&self, base_dir: &Path) -> RunnerSettings {
        let working_dir = if self.working_dir.is_absolute() {
            self.working_dir.clone()
        } else {
            base_dir.join(&self.working_dir)
        };
        RunnerSettings {
            executable: self.executable.clone(),
            working_dir,
            default_timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Rejects suites that cannot be run meaningfully.
    /// 拒绝无法有意义地运行的套件。
    pub fn validate(&self) -> Result<()> {
        if self.scenarios.is_empty() {
            bail!("the suite defines no scenarios");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if self.executable.as_os_str().is_empty() {
            bail!("`executable` must not be empty");
        }

        let mut names = HashSet::new();
        let mut artifact_owners: HashMap<&Path, &str> = HashMap::new();
        for scenario in &self.scenarios {
            scenario.validate()?;
            if !names.insert(scenario.name.as_str()) {
                bail!("duplicate scenario name '{}'", scenario.name);
            }
            if let Some(artifact) = &scenario.artifact {
                if let Some(owner) = artifact_owners.insert(artifact.as_path(), &scenario.name) {
                    warn!(
                        artifact = %artifact.display(),
                        first = owner,
                        second = %scenario.name,
                        "two scenarios share an artifact path; results may interfere"
                    );
                }
            }
        }
        Ok(())
    }
}

/// Reads, parses and validates a suite file.
///
/// # Arguments
/// * `path` - Path to the TOML suite file
///
/// # Returns
/// The validated `SuiteConfig`
///
/// 读取、解析并验证套件文件。
pub fn load_suite(path: &Path) -> Result<SuiteConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read suite file: {}", path.display()))?;
    let suite = parse_suite(&content)
        .with_context(|| format!("Invalid suite file: {}", path.display()))?;
    Ok(suite)
}

/// Parses and validates suite TOML from a string.
/// 从字符串解析并验证套件 TOML。
pub fn parse_suite(content: &str) -> Result<SuiteConfig> {
    let suite: SuiteConfig = toml::from_str(content).context("Failed to parse suite TOML")?;
    suite.validate()?;
    Ok(suite)
}
