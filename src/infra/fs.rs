//! # Artifact Inspection Module / 产物检查模块
//!
//! Reads and removes the files a driven process produces. Every path is
//! resolved against the working directory the process ran in.
//!
//! 读取和删除被驱动进程生成的文件。所有路径都基于进程运行所在的工作目录解析。

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads artifact files relative to one working directory.
/// 基于一个工作目录读取产物文件。
#[derive(Debug, Clone)]
pub struct ArtifactInspector {
    working_dir: PathBuf,
}

impl ArtifactInspector {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Resolves `path` against the working directory; absolute paths are kept.
    /// 将 `path` 基于工作目录解析；绝对路径保持不变。
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }

    /// Reads the full text of a file if it exists.
    ///
    /// # Arguments
    /// * `path` - Artifact path, relative to the working directory
    ///
    /// # Returns
    /// `Ok(None)` if the file does not exist, `Ok(Some(text))` with invalid UTF-8
    /// replaced lossily otherwise, or an error if the file exists but cannot be read.
    ///
    /// 如果文件存在则读取其全部文本。
    /// 文件不存在时返回 `Ok(None)`；存在但无法读取时返回错误。
    pub fn read_if_exists(&self, path: &Path) -> Result<Option<String>> {
        let full = self.resolve(path);
        match fs::read(&full) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read artifact: {}", full.display())),
        }
    }

    /// Deletes a file if it exists. Returns whether anything was removed.
    /// 如果文件存在则删除它，返回是否确实删除了文件。
    pub fn remove_if_exists(&self, path: &Path) -> Result<bool> {
        let full = self.resolve(path);
        match fs::remove_file(&full) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove artifact: {}", full.display()))
            }
        }
    }
}
