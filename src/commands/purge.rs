//! purge 命令 - 依次执行五个清除阶段并汇总结果

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use super::ConfigArgs;
use crate::modules::common::error::PurgeError;
use crate::modules::common::utils;
use crate::modules::config::PurgeConfig;
use crate::modules::purger::models::{OutcomeStatus, Stage};
use crate::modules::reporter::{self, models::PurgeReport};

#[derive(Parser, Debug)]
pub struct PurgeCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// 以 JSON 格式输出报告 (进度信息输出到 stderr)
    #[arg(long)]
    pub json: bool,

    /// 生成 HTML 报告到指定路径
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub async fn execute(cmd: PurgeCommand) -> Result<()> {
    let config = cmd.config.resolve()?;
    let json = cmd.json;

    status(json, &format!("=== 清除运行时: {} ===\n", config.target_substring));

    // 各阶段都是阻塞的系统调用，整体放到阻塞线程中顺序执行
    let report = tokio::task::spawn_blocking(move || run_pipeline(&config, json)).await??;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(path) = cmd.report {
        let html = reporter::html::generate_html_report(&report);
        tokio::fs::write(&path, html).await?;
        status(json, &format!("\n报告已生成: {}", path.display()));
    }

    Ok(())
}

#[cfg(windows)]
fn run_pipeline(config: &PurgeConfig, json: bool) -> Result<PurgeReport, PurgeError> {
    use crate::modules::cleaner::filesystem::LocalFileSystem;
    use crate::modules::environment::store::WindowsEnvironment;
    use crate::modules::lister::registry::WindowsRegistry;
    use crate::modules::packages::store::PowerShellPackageManager;
    use crate::modules::purger::{Backends, Purger};
    use crate::modules::uninstaller::process::SystemProcessRunner;

    let purger = Purger::new(
        config,
        Backends {
            registry: &WindowsRegistry,
            packages: &PowerShellPackageManager,
            filesystem: &LocalFileSystem,
            process: &SystemProcessRunner,
            environment: &WindowsEnvironment,
        },
    );

    Ok(purger.run_with(|stage| {
        status(json, &format!("[{}/5] {}...", stage.index(), stage.title()));
    }))
}

#[cfg(not(windows))]
fn run_pipeline(_config: &PurgeConfig, _json: bool) -> Result<PurgeReport, PurgeError> {
    Err(PurgeError::Unsupported(
        "清除操作依赖 Windows 注册表与应用包管理".to_string(),
    ))
}

/// 进度信息；JSON 模式下输出到 stderr 以保持 stdout 可解析
fn status(json: bool, line: &str) {
    if json {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

fn print_report(report: &PurgeReport) {
    for stage in Stage::ALL {
        println!("\n[{}/5] {}", stage.index(), stage.title());

        let mut any = false;
        for op in report.stage_operations(stage) {
            any = true;
            let status = match &op.status {
                OutcomeStatus::Succeeded => "成功".to_string(),
                OutcomeStatus::NotFound => "不存在".to_string(),
                OutcomeStatus::Failed(reason) => format!("失败: {}", reason),
            };
            let size = if op.bytes_freed > 0 {
                format!(" ({})", utils::format_size(op.bytes_freed))
            } else {
                String::new()
            };
            println!("  - [{}] {}{}", status, op.target, size);
        }

        if !any {
            println!("  - 没有匹配项");
        }
    }

    println!("\n--- 清除完成 ---");
    println!("  成功: {}", report.succeeded_count());
    println!("  不存在: {}", report.not_found_count());
    println!("  失败: {}", report.failed_count());
    println!("  释放空间: {}", utils::format_size(report.total_bytes_freed()));

    if report.failed_count() > 0 {
        println!("\n未能完成的操作:");
        for op in report.failures() {
            if let OutcomeStatus::Failed(reason) = &op.status {
                println!("  - [{}] {}: {}", op.stage, op.target, reason);
            }
        }
    }

    if !report.warnings.is_empty() {
        println!("\n警告:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }

    println!("\n提示: PATH 的更改只对新启动的进程生效，建议重启计算机。");
}
