//! # Process Driver Module / 进程驱动模块
//!
//! Launches the executable under test, feeds it a command script over stdin and
//! captures stdout, stderr and the exit status, killing the process when it
//! exceeds its timeout.
//!
//! 启动被测可执行文件，通过 stdin 向其发送命令脚本，并捕获 stdout、stderr 和退出状态；
//! 进程超出超时时间时将其终止。

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::models::{ProcessOutput, TIMEOUT_EXIT_CODE, TIMEOUT_MESSAGE};

/// How long to wait for the output pumps after the process is gone.
/// A grandchild holding the pipes open must not hang the runner.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Joins a command script into the stdin stream sent to the process:
/// every line is terminated by a newline.
///
/// 将命令脚本拼接为发送给进程的 stdin 流：每一行都以换行符结尾。
pub fn render_script<S: AsRef<str>>(script: &[S]) -> String {
    let mut input = String::new();
    for line in script {
        input.push_str(line.as_ref());
        input.push('\n');
    }
    input
}

/// Drives one executable in one working directory.
/// 在一个工作目录中驱动一个可执行文件。
#[derive(Debug, Clone)]
pub struct ProcessDriver {
    executable: PathBuf,
    working_dir: PathBuf,
}

impl ProcessDriver {
    /// A relative `working_dir` is anchored to the current directory here, so
    /// the child's `current_dir` and the program path cannot both apply it.
    ///
    /// 相对的 `working_dir` 在此处基于当前目录变为绝对路径，
    /// 避免子进程的 `current_dir` 与程序路径重复应用同一前缀。
    pub fn new(executable: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        let working_dir = std::path::absolute(&working_dir).unwrap_or(working_dir);
        Self {
            executable: executable.into(),
            working_dir,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The program path handed to the OS.
    ///
    /// A relative path with a directory part (`./src/engine`) is resolved against
    /// the working directory; a bare name (`engine`) is left for `PATH` lookup.
    ///
    /// 交给操作系统的程序路径。
    /// 带目录部分的相对路径（`./src/engine`）基于工作目录解析；
    /// 裸名称（`engine`）留给 `PATH` 查找。
    pub fn program(&self) -> PathBuf {
        if self.executable.is_relative() && self.executable.components().count() > 1 {
            self.working_dir.join(&self.executable)
        } else {
            self.executable.clone()
        }
    }

    /// Runs the executable once with `script` as its complete standard input.
    ///
    /// # Arguments
    /// * `script` - Protocol lines, sent in order, each newline-terminated
    /// * `timeout` - Wall-clock limit after which the process is killed
    ///
    /// # Returns
    /// The captured `ProcessOutput`, or the I/O error if the process could not be started.
    /// A timeout is not an error: it yields `timed_out = true`, exit code
    /// `TIMEOUT_EXIT_CODE` and `TIMEOUT_MESSAGE` appended to stderr.
    ///
    /// 以 `script` 作为完整的标准输入运行一次可执行文件。
    /// 超时不是错误：结果中 `timed_out = true`，退出码为 `TIMEOUT_EXIT_CODE`，
    /// 并在 stderr 后追加 `TIMEOUT_MESSAGE`。
    pub async fn run<S: AsRef<str>>(&self, script: &[S], timeout: Duration) -> io::Result<ProcessOutput> {
        let program = self.program();
        let input = render_script(script);

        let mut cmd = Command::new(&program);
        cmd.current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start = Instant::now();
        let mut child = cmd.spawn()?;
        debug!(
            program = %program.display(),
            pid = ?child.id(),
            lines = script.len(),
            "spawned process"
        );

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("failed to open the child's stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("failed to capture the child's stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("failed to capture the child's stderr"))?;

        // Both pumps also append to the shared transcript so the interleaving survives.
        // 两个读取任务同时写入共享的 transcript，以保留交错顺序。
        let transcript = Arc::new(Mutex::new(String::new()));
        let stdout_buf = Arc::new(Mutex::new(String::new()));
        let stderr_buf = Arc::new(Mutex::new(String::new()));

        let writer = tokio::spawn(feed_stdin(stdin, input));
        let stdout_handle = tokio::spawn(pump_lines(
            stdout,
            Arc::clone(&stdout_buf),
            Arc::clone(&transcript),
        ));
        let stderr_handle = tokio::spawn(pump_lines(
            stderr,
            Arc::clone(&stderr_buf),
            Arc::clone(&transcript),
        ));

        let (status, timed_out) = match tokio::time::timeout(timeout, child.wait()).await {
            Ok(status) => (Some(status?), false),
            Err(_) => {
                warn!(
                    program = %program.display(),
                    timeout_secs = timeout.as_secs_f64(),
                    "process exceeded its timeout, killing it"
                );
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "failed to kill timed out process");
                }
                (None, true)
            }
        };

        drain(stdout_handle).await;
        drain(stderr_handle).await;
        drain(writer).await;
        let duration = start.elapsed();

        let exit_code = status.map(exit_code_of).unwrap_or(TIMEOUT_EXIT_CODE);
        let stdout = stdout_buf.lock().await.clone();
        let mut stderr = stderr_buf.lock().await.clone();
        let mut transcript = transcript.lock().await.clone();
        if timed_out {
            stderr.push_str(TIMEOUT_MESSAGE);
            stderr.push('\n');
            transcript.push_str(TIMEOUT_MESSAGE);
            transcript.push('\n');
        }

        debug!(
            program = %program.display(),
            exit_code,
            timed_out,
            elapsed_ms = duration.as_millis() as u64,
            "process finished"
        );

        Ok(ProcessOutput {
            exit_code,
            stdout,
            stderr,
            transcript,
            timed_out,
            duration,
        })
    }
}

/// Writes the whole script and closes stdin so the process sees end of input.
async fn feed_stdin(mut stdin: ChildStdin, input: String) {
    if let Err(e) = stdin.write_all(input.as_bytes()).await {
        // A process may exit before reading everything it was sent.
        // 进程可能在读取全部输入之前就已退出。
        debug!(error = %e, "could not write the full script to stdin");
        return;
    }
    if let Err(e) = stdin.shutdown().await {
        debug!(error = %e, "could not close stdin");
    }
}

/// Reads a stream line by line with lossy UTF-8 decoding until end of file.
/// 以有损 UTF-8 解码逐行读取流，直到文件结束。
async fn pump_lines<R>(stream: R, own: Arc<Mutex<String>>, transcript: Arc<Mutex<String>>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                own.lock().await.push_str(&text);
                transcript.lock().await.push_str(&text);
            }
            Err(e) => {
                debug!(error = %e, "stopped reading process output");
                break;
            }
        }
    }
}

async fn drain(handle: JoinHandle<()>) {
    let abort = handle.abort_handle();
    match tokio::time::timeout(DRAIN_GRACE, handle).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "process I/O task failed"),
        Err(_) => {
            warn!("process output was still open after exit; abandoning it");
            abort.abort();
        }
    }
}

/// Maps an exit status to an integer exit code.
/// On Unix a signal-terminated process reports `128 + signal`.
///
/// 将退出状态映射为整数退出码。在 Unix 上，被信号终止的进程报告 `128 + 信号值`。
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}
