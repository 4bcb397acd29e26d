//! 清除配置
//!
//! 目标名称、已知路径、搜索根目录和可执行文件名均可通过 JSON 配置文件覆盖，
//! 未指定的字段按目标名称生成默认值。

use crate::modules::common::error::PurgeError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 默认清除目标
pub const DEFAULT_TARGET: &str = "python";

/// 默认卸载程序超时 (秒)
pub const DEFAULT_UNINSTALL_TIMEOUT_SECS: u64 = 600;

/// 已知安装路径模板，`{target}` 替换为目标名称
const KNOWN_PATH_TEMPLATES: &[&str] = &[
    r"%LOCALAPPDATA%\Programs\{target}",
    r"%ProgramFiles%\{target}*",
    r"%ProgramFiles(x86)%\{target}*",
    r"C:\{target}*",
    r"%APPDATA%\{target}",
    r"%LOCALAPPDATA%\pip",
    r"%LOCALAPPDATA%\Microsoft\WindowsApps\{target}*.exe",
];

/// 可执行文件搜索根目录
const SEARCH_ROOT_TEMPLATES: &[&str] = &[
    r"%ProgramFiles%",
    r"%ProgramFiles(x86)%",
    r"%LOCALAPPDATA%\Programs",
    r"C:\Users\*\AppData\Local\Programs",
];

/// 可执行文件名模板
const EXECUTABLE_NAME_TEMPLATES: &[&str] = &["{target}.exe", "{target}3.exe"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeConfig {
    /// 所有名称匹配使用的子串 (大小写不敏感)
    pub target_substring: String,
    /// 按顺序删除的路径模式
    pub known_paths: Vec<String>,
    /// 可执行文件搜索根目录
    pub search_roots: Vec<String>,
    /// 需要删除的可执行文件名
    pub executable_names: Vec<String>,
    /// 单个卸载程序的最长等待时间
    pub uninstall_timeout_secs: u64,
}

/// 配置文件内容，所有字段可选
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    pub target_substring: Option<String>,
    pub known_paths: Option<Vec<String>>,
    pub search_roots: Option<Vec<String>>,
    pub executable_names: Option<Vec<String>>,
    pub uninstall_timeout_secs: Option<u64>,
}

/// 命令行覆盖项
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub target: Option<String>,
    pub uninstall_timeout_secs: Option<u64>,
}

impl PurgeConfig {
    /// 按目标名称生成默认配置
    pub fn for_target(target: &str) -> Self {
        let fill = |templates: &[&str]| -> Vec<String> {
            templates
                .iter()
                .map(|t| t.replace("{target}", target))
                .collect()
        };

        Self {
            target_substring: target.to_string(),
            known_paths: fill(KNOWN_PATH_TEMPLATES),
            search_roots: fill(SEARCH_ROOT_TEMPLATES),
            executable_names: fill(EXECUTABLE_NAME_TEMPLATES),
            uninstall_timeout_secs: DEFAULT_UNINSTALL_TIMEOUT_SECS,
        }
    }

    /// 合并默认值、配置文件和命令行覆盖项 (优先级依次升高)
    pub fn resolve(file: Option<ConfigFile>, overrides: ConfigOverrides) -> Result<Self, PurgeError> {
        let file = file.unwrap_or_default();

        let target = overrides
            .target
            .or(file.target_substring)
            .unwrap_or_else(|| DEFAULT_TARGET.to_string());

        let mut config = Self::for_target(target.trim());

        if let Some(paths) = file.known_paths {
            config.known_paths = paths;
        }
        if let Some(roots) = file.search_roots {
            config.search_roots = roots;
        }
        if let Some(names) = file.executable_names {
            config.executable_names = names;
        }
        if let Some(timeout) = overrides.uninstall_timeout_secs.or(file.uninstall_timeout_secs) {
            config.uninstall_timeout_secs = timeout;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&mut self) -> Result<(), PurgeError> {
        if self.target_substring.trim().is_empty() {
            return Err(PurgeError::Config("目标名称不能为空".to_string()));
        }

        // PATH 按分号切分，含分号的目标不可能匹配任何单个片段
        if self.target_substring.contains(';') {
            return Err(PurgeError::Config(format!(
                "目标名称不能包含分号: {:?}",
                self.target_substring
            )));
        }

        if self.uninstall_timeout_secs == 0 {
            return Err(PurgeError::Config("卸载超时必须大于 0".to_string()));
        }

        if self.executable_names.is_empty() {
            return Err(PurgeError::Config("可执行文件名列表不能为空".to_string()));
        }

        for name in &self.executable_names {
            if name.trim().is_empty() || name.contains(['\\', '/']) {
                return Err(PurgeError::Config(format!("无效的可执行文件名: {:?}", name)));
            }
        }

        // 可执行文件名是集合语义
        let mut seen = std::collections::HashSet::new();
        self.executable_names
            .retain(|name| seen.insert(name.to_lowercase()));

        Ok(())
    }

    pub fn uninstall_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.uninstall_timeout_secs)
    }
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self::for_target(DEFAULT_TARGET)
    }
}

/// 读取 JSON 配置文件
pub fn load_config_file(path: &Path) -> Result<ConfigFile, PurgeError> {
    let content = std::fs::read_to_string(path)?;
    let file: ConfigFile = serde_json::from_str(&content)
        .map_err(|e| PurgeError::Config(format!("{}: {}", path.display(), e)))?;

    tracing::debug!("已读取配置文件: {}", path.display());
    Ok(file)
}
