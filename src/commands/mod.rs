pub mod config;
pub mod purge;

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::modules::common::error::PurgeError;
use crate::modules::config::{self as purge_config, ConfigOverrides, PurgeConfig};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 卸载目标运行时并清理所有残留
    Purge(purge::PurgeCommand),

    /// 输出生效的配置 (JSON)
    Config(config::ConfigCommand),
}

/// 各命令共用的配置参数
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// 目标名称 (用于所有名称匹配)
    #[arg(short, long, env = "RUNTIME_PURGE_TARGET")]
    pub target: Option<String>,

    /// JSON 配置文件
    #[arg(short, long, env = "RUNTIME_PURGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// 单个卸载程序的等待超时 (秒)
    #[arg(long, env = "RUNTIME_PURGE_TIMEOUT")]
    pub timeout: Option<u64>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<PurgeConfig, PurgeError> {
        let file = self
            .config
            .as_deref()
            .map(purge_config::load_config_file)
            .transpose()?;

        PurgeConfig::resolve(
            file,
            ConfigOverrides {
                target: self.target.clone(),
                uninstall_timeout_secs: self.timeout,
            },
        )
    }
}
