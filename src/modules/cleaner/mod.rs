pub mod filesystem;
pub mod safety;

use crate::modules::common::error::PurgeError;
use crate::modules::config::PurgeConfig;
use crate::modules::purger::models::{OperationResult, Stage, StageReport};
use filesystem::FileSystem;
use std::path::Path;

const STAGE: Stage = Stage::KnownPathDeletion;

/// 按顺序删除已知安装路径
pub fn delete_known_paths(config: &PurgeConfig, fs: &dyn FileSystem) -> StageReport {
    let mut report = StageReport::default();

    for pattern in &config.known_paths {
        let matches = match fs.resolve(pattern) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("无法解析路径 {}: {}", pattern, e);
                report.push(OperationResult::failed(STAGE, pattern.clone(), e.to_string()));
                continue;
            }
        };

        if matches.is_empty() {
            tracing::debug!("路径不存在: {}", pattern);
            report.push(OperationResult::not_found(STAGE, pattern.clone()));
            continue;
        }

        for path in matches {
            report.push(delete_path(STAGE, fs, &path).with_detail(pattern.clone()));
        }
    }

    report
}

/// 删除单个路径，所有错误转换为操作结果
pub fn delete_path(stage: Stage, fs: &dyn FileSystem, path: &Path) -> OperationResult {
    let target = path.to_string_lossy().to_string();

    let path = match safety::checked_delete_target(path) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("跳过关键系统项: {}", e);
            return OperationResult::failed(stage, target, e.to_string());
        }
    };

    match fs.remove(&path) {
        Ok(bytes_freed) => {
            tracing::info!("已删除: {}", target);
            OperationResult::succeeded(stage, target).with_bytes_freed(bytes_freed)
        }
        Err(PurgeError::FileSystem(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            OperationResult::not_found(stage, target)
        }
        Err(e) => {
            tracing::error!("删除失败 {}: {}", target, e);
            OperationResult::failed(stage, target, e.to_string())
        }
    }
}
