pub mod models;
pub mod store;

use crate::modules::common::utils;
use crate::modules::config::PurgeConfig;
use crate::modules::purger::models::{OperationResult, Stage, StageReport};
use store::PackageManager;

const STAGE: Stage = Stage::PackageRemoval;

/// 移除名称匹配的已安装应用包与预配应用包
pub fn remove_packages(config: &PurgeConfig, manager: &dyn PackageManager) -> StageReport {
    let mut report = StageReport::default();
    let target = &config.target_substring;

    match manager.installed_packages() {
        Ok(packages) => {
            for package in packages
                .iter()
                .filter(|p| utils::contains_ignore_case(&p.name, target))
            {
                tracing::info!("正在移除应用包: {}", package.package_full_name);
                let result = match manager.remove_installed(package) {
                    Ok(()) => OperationResult::succeeded(STAGE, package.package_full_name.clone()),
                    Err(e) => {
                        tracing::warn!("移除应用包 {} 失败: {}", package.package_full_name, e);
                        OperationResult::failed(STAGE, package.package_full_name.clone(), e.to_string())
                    }
                };
                report.push(result.with_detail("已安装应用包"));
            }
        }
        Err(e) => {
            tracing::warn!("无法列出已安装应用包: {}", e);
            report.push(OperationResult::failed(STAGE, "已安装应用包", e.to_string()));
        }
    }

    match manager.provisioned_packages() {
        Ok(packages) => {
            for package in packages
                .iter()
                .filter(|p| utils::contains_ignore_case(&p.display_name, target))
            {
                tracing::info!("正在移除预配应用包: {}", package.package_name);
                let result = match manager.remove_provisioned(package) {
                    Ok(()) => OperationResult::succeeded(STAGE, package.package_name.clone()),
                    Err(e) => {
                        tracing::warn!("移除预配应用包 {} 失败: {}", package.package_name, e);
                        OperationResult::failed(STAGE, package.package_name.clone(), e.to_string())
                    }
                };
                report.push(result.with_detail("预配应用包"));
            }
        }
        Err(e) => {
            tracing::warn!("无法列出预配应用包: {}", e);
            report.push(OperationResult::failed(STAGE, "预配应用包", e.to_string()));
        }
    }

    report
}
