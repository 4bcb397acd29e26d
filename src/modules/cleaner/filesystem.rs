use crate::modules::common::error::PurgeError;
use crate::modules::common::utils;
use glob::MatchOptions;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件系统操作
pub trait FileSystem {
    /// 展开环境变量与通配符，返回实际存在的路径
    fn resolve(&self, pattern: &str) -> Result<Vec<PathBuf>, PurgeError>;

    /// 强制递归删除，返回释放的字节数
    fn remove(&self, path: &Path) -> Result<u64, PurgeError>;

    /// 在 root 下递归查找文件名 (ASCII 大小写不敏感) 等于 names 之一的文件
    fn find_files(&self, root: &Path, names: &[String]) -> Vec<PathBuf>;
}

/// 本地文件系统
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn resolve(&self, pattern: &str) -> Result<Vec<PathBuf>, PurgeError> {
        let expanded = utils::expand_env_vars(pattern);

        let options = MatchOptions {
            case_sensitive: false,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let paths = glob::glob_with(&expanded, options)
            .map_err(|e| PurgeError::Config(format!("无效的路径模式 {}: {}", pattern, e)))?;

        let mut matches = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) => matches.push(path),
                Err(e) => tracing::debug!("匹配 {} 时跳过: {}", expanded, e),
            }
        }

        Ok(matches)
    }

    fn remove(&self, path: &Path) -> Result<u64, PurgeError> {
        let metadata = std::fs::symlink_metadata(path)?;
        let file_type = metadata.file_type();

        if file_type.is_symlink() {
            // Windows 上的目录链接需要 remove_dir
            std::fs::remove_file(path).or_else(|_| std::fs::remove_dir(path))?;
            return Ok(0);
        }

        if file_type.is_dir() {
            let bytes_freed = utils::calculate_dir_size(path).unwrap_or(0);
            clear_readonly_recursive(path);
            std::fs::remove_dir_all(path)?;
            Ok(bytes_freed)
        } else {
            let bytes_freed = metadata.len();
            clear_readonly(path);
            std::fs::remove_file(path)?;
            Ok(bytes_freed)
        }
    }

    fn find_files(&self, root: &Path, names: &[String]) -> Vec<PathBuf> {
        let mut found = Vec::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("搜索时跳过: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if names.iter().any(|name| name.eq_ignore_ascii_case(&file_name)) {
                found.push(entry.into_path());
            }
        }

        found
    }
}

/// 去掉只读属性，否则 Windows 上无法删除
#[cfg(windows)]
fn clear_readonly(path: &Path) {
    if let Ok(metadata) = std::fs::metadata(path) {
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            permissions.set_readonly(false);
            let _ = std::fs::set_permissions(path, permissions);
        }
    }
}

#[cfg(not(windows))]
fn clear_readonly(_path: &Path) {}

fn clear_readonly_recursive(path: &Path) {
    if !cfg!(windows) {
        return;
    }

    for entry in WalkDir::new(path).follow_links(false).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            clear_readonly(entry.path());
        }
    }
}
