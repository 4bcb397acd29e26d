use crate::modules::common::error::PurgeError;
use crate::modules::common::utils;
use std::path::{Component, Path, PathBuf};

/// 禁止整体删除的目录
const CRITICAL_PATHS: &[&str] = &[
    r"C:\Windows",
    r"C:\Windows\System32",
    r"C:\Windows\SysWOW64",
    r"C:\Windows\WinSxS",
    r"C:\Program Files",
    r"C:\Program Files (x86)",
    r"C:\ProgramData",
    r"C:\Users",
];

/// 禁止作为可执行文件搜索根目录的位置 (包括其子目录)
const FORBIDDEN_SWEEP_ROOTS: &[&str] = &[r"C:\Windows"];

/// 规范化要删除的路径并做删除前检查，返回实际应当删除的路径
///
/// 最后一个组件不跟随链接，删除链接时只删除链接本身。
pub fn checked_delete_target(path: &Path) -> Result<PathBuf, PurgeError> {
    let path = real_path(path, false)?;
    pre_delete_check(&path)?;
    Ok(path)
}

/// 规范化搜索根目录并检查，返回实际应当遍历的目录
pub fn checked_sweep_root(path: &Path) -> Result<PathBuf, PurgeError> {
    let path = real_path(path, true)?;
    sweep_root_check(&path)?;
    Ok(path)
}

/// 删除前检查
pub fn pre_delete_check(path: &Path) -> Result<(), PurgeError> {
    if utils::is_filesystem_root(path) {
        return Err(PurgeError::CriticalSystemItem(format!(
            "不能删除文件系统根目录: {}",
            path.display()
        )));
    }

    if is_critical_path(&path.to_string_lossy()) {
        return Err(PurgeError::CriticalSystemItem(format!(
            "不能删除关键系统目录: {}",
            path.display()
        )));
    }

    Ok(())
}

/// 搜索根目录检查，搜索范围不能是文件系统根或系统目录
pub fn sweep_root_check(path: &Path) -> Result<(), PurgeError> {
    if utils::is_filesystem_root(path) {
        return Err(PurgeError::CriticalSystemItem(format!(
            "拒绝从文件系统根目录开始搜索: {}",
            path.display()
        )));
    }

    let path_upper = normalize_upper(&path.to_string_lossy());
    for forbidden in FORBIDDEN_SWEEP_ROOTS {
        let forbidden = forbidden.to_uppercase();
        if path_upper == forbidden || path_upper.starts_with(&format!("{}\\", forbidden)) {
            return Err(PurgeError::CriticalSystemItem(format!(
                "拒绝在系统目录中搜索: {}",
                path.display()
            )));
        }
    }

    Ok(())
}

/// 拒绝相对路径，消解 `.` 与 `..` 并解析链接，去掉 `\\?\` 前缀
fn real_path(path: &Path, follow_final_link: bool) -> Result<PathBuf, PurgeError> {
    if !path.is_absolute() {
        return Err(PurgeError::CriticalSystemItem(format!(
            "拒绝处理相对路径: {}",
            path.display()
        )));
    }

    let lexical = lexical_normalize(path);

    let resolved = if follow_final_link {
        std::fs::canonicalize(&lexical).ok()
    } else {
        match (lexical.parent(), lexical.file_name()) {
            (Some(parent), Some(name)) => std::fs::canonicalize(parent)
                .ok()
                .map(|parent| parent.join(name)),
            _ => None,
        }
    };

    // 路径不存在时只能按字面规范化
    Ok(resolved.map(strip_verbatim).unwrap_or(lexical))
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // 根目录的上级仍是根目录
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

fn strip_verbatim(path: PathBuf) -> PathBuf {
    let text = path.to_string_lossy().into_owned();

    if let Some(rest) = text.strip_prefix(r"\\?\UNC\") {
        PathBuf::from(format!(r"\\{}", rest))
    } else if let Some(rest) = text.strip_prefix(r"\\?\") {
        PathBuf::from(rest)
    } else {
        path
    }
}

/// 检查是否为关键系统路径
fn is_critical_path(path: &str) -> bool {
    let path_upper = normalize_upper(path);

    CRITICAL_PATHS
        .iter()
        .any(|critical| path_upper == critical.to_uppercase())
}

fn normalize_upper(path: &str) -> String {
    utils::normalize_path(path)
        .trim_end_matches('\\')
        .to_uppercase()
}
