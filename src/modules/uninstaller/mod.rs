pub mod msi;
pub mod process;

use crate::modules::config::PurgeConfig;
use crate::modules::lister::{self, models::UninstallHive, registry::RegistryReader};
use crate::modules::purger::models::{OperationResult, Stage, StageReport};
use msi::UninstallInvocation;
use process::ProcessRunner;

const STAGE: Stage = Stage::RegistryUninstall;

/// 枚举三个卸载注册表位置，对显示名称匹配的程序执行卸载命令
pub fn run_registry_uninstallers(
    config: &PurgeConfig,
    registry: &dyn RegistryReader,
    runner: &dyn ProcessRunner,
) -> StageReport {
    let mut report = StageReport::default();
    let mut invoked = std::collections::HashSet::new();

    for hive in UninstallHive::ALL {
        let entries = match registry.uninstall_entries(hive) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("跳过注册表位置 {}: {}", hive, e);
                report.push(OperationResult::not_found(STAGE, hive.to_string()).with_detail(e.to_string()));
                continue;
            }
        };

        for entry in entries
            .iter()
            .filter(|entry| lister::matches_display_name(entry, &config.target_substring))
        {
            let Some(command) = entry.uninstall_command.as_deref() else {
                report.warn(format!("{} 没有卸载命令 ({}\\{})", entry.display_name, hive, entry.key_name));
                report.push(
                    OperationResult::not_found(STAGE, entry.display_name.clone())
                        .with_detail("缺少 UninstallString"),
                );
                continue;
            };

            // 同一程序可能同时登记在多个位置
            if !invoked.insert(command.trim().to_lowercase()) {
                tracing::debug!("卸载命令已执行过，跳过: {}", command);
                report.push(
                    OperationResult::not_found(STAGE, entry.display_name.clone())
                        .with_detail("命令已执行"),
                );
                continue;
            }

            let invocation = UninstallInvocation::from_command(command);
            tracing::info!("正在卸载 {}: {}", entry.display_name, invocation);

            let result = match runner.run(&invocation, config.uninstall_timeout()) {
                Ok(exit) if exit.is_success() => {
                    OperationResult::succeeded(STAGE, entry.display_name.clone())
                }
                Ok(exit) => OperationResult::failed(
                    STAGE,
                    entry.display_name.clone(),
                    match exit.code {
                        Some(code) => format!("卸载程序退出码 {}", code),
                        None => "卸载程序被终止".to_string(),
                    },
                ),
                Err(e) => {
                    tracing::warn!("卸载 {} 失败: {}", entry.display_name, e);
                    OperationResult::failed(STAGE, entry.display_name.clone(), e.to_string())
                }
            };

            report.push(result.with_detail(invocation.to_string()));
        }
    }

    report
}
