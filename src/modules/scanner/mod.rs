//! 残留可执行文件搜索
//!
//! 只在配置的根目录及其子目录中搜索，根目录解析为文件系统根或系统目录时拒绝搜索。

use crate::modules::cleaner::{self, filesystem::FileSystem, safety};
use crate::modules::config::PurgeConfig;
use crate::modules::purger::models::{OperationResult, Stage, StageReport};
use std::collections::HashSet;

const STAGE: Stage = Stage::ExecutableSweep;

pub fn sweep_executables(config: &PurgeConfig, fs: &dyn FileSystem) -> StageReport {
    let mut report = StageReport::default();
    let mut walked = HashSet::new();

    for pattern in &config.search_roots {
        let roots = match fs.resolve(pattern) {
            Ok(roots) => roots,
            Err(e) => {
                tracing::warn!("无法解析搜索目录 {}: {}", pattern, e);
                report.push(OperationResult::failed(STAGE, pattern.clone(), e.to_string()));
                continue;
            }
        };

        if roots.is_empty() {
            tracing::debug!("搜索目录不存在: {}", pattern);
            report.push(OperationResult::not_found(STAGE, pattern.clone()));
            continue;
        }

        for root in roots {
            // 检查和遍历都使用规范化后的路径，`..` 不能越过检查
            let root = match safety::checked_sweep_root(&root) {
                Ok(root) => root,
                Err(e) => {
                    tracing::warn!("{}", e);
                    report.push(OperationResult::failed(
                        STAGE,
                        root.to_string_lossy().to_string(),
                        e.to_string(),
                    ));
                    continue;
                }
            };

            if !walked.insert(root.to_string_lossy().to_lowercase()) {
                continue;
            }

            tracing::info!("正在搜索: {}", root.display());
            let found = fs.find_files(&root, &config.executable_names);
            tracing::debug!("{} 中找到 {} 个匹配文件", root.display(), found.len());

            for path in found {
                report.push(
                    cleaner::delete_path(STAGE, fs, &path)
                        .with_detail(root.to_string_lossy().to_string()),
                );
            }
        }
    }

    report
}
