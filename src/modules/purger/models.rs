use serde::{Deserialize, Serialize};

/// 清除流水线的阶段，按执行顺序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// 调用注册表中的卸载程序
    RegistryUninstall,
    /// 移除应用包 (已安装与预配)
    PackageRemoval,
    /// 删除已知安装路径
    KnownPathDeletion,
    /// 搜索并删除残留可执行文件
    ExecutableSweep,
    /// 清理 PATH 环境变量
    PathSanitization,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::RegistryUninstall,
        Stage::PackageRemoval,
        Stage::KnownPathDeletion,
        Stage::ExecutableSweep,
        Stage::PathSanitization,
    ];

    /// 阶段序号 (从 1 开始)
    pub fn index(&self) -> usize {
        match self {
            Stage::RegistryUninstall => 1,
            Stage::PackageRemoval => 2,
            Stage::KnownPathDeletion => 3,
            Stage::ExecutableSweep => 4,
            Stage::PathSanitization => 5,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Stage::RegistryUninstall => "调用注册表卸载程序",
            Stage::PackageRemoval => "移除应用包",
            Stage::KnownPathDeletion => "删除已知安装路径",
            Stage::ExecutableSweep => "搜索残留可执行文件",
            Stage::PathSanitization => "清理 PATH 环境变量",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::RegistryUninstall => write!(f, "RegistryUninstall"),
            Stage::PackageRemoval => write!(f, "PackageRemoval"),
            Stage::KnownPathDeletion => write!(f, "KnownPathDeletion"),
            Stage::ExecutableSweep => write!(f, "ExecutableSweep"),
            Stage::PathSanitization => write!(f, "PathSanitization"),
        }
    }
}

/// 单个操作的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Succeeded,
    /// 目标不存在，跳过
    NotFound,
    Failed(String),
}

impl OutcomeStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, OutcomeStatus::Failed(_))
    }
}

/// 一次尝试的操作
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult {
    pub id: String,
    pub stage: Stage,
    /// 操作对象 (程序名、路径、应用包名等)
    pub target: String,
    pub status: OutcomeStatus,
    pub detail: String,
    pub bytes_freed: u64,
}

impl OperationResult {
    pub fn new(stage: Stage, target: impl Into<String>, status: OutcomeStatus) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            stage,
            target: target.into(),
            status,
            detail: String::new(),
            bytes_freed: 0,
        }
    }

    pub fn succeeded(stage: Stage, target: impl Into<String>) -> Self {
        Self::new(stage, target, OutcomeStatus::Succeeded)
    }

    pub fn not_found(stage: Stage, target: impl Into<String>) -> Self {
        Self::new(stage, target, OutcomeStatus::NotFound)
    }

    pub fn failed(stage: Stage, target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(stage, target, OutcomeStatus::Failed(reason.into()))
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn with_bytes_freed(mut self, bytes: u64) -> Self {
        self.bytes_freed = bytes;
        self
    }
}

/// 单个阶段的产出
#[derive(Debug, Clone, Default)]
pub struct StageReport {
    pub operations: Vec<OperationResult>,
    pub warnings: Vec<String>,
}

impl StageReport {
    pub fn push(&mut self, result: OperationResult) {
        self.operations.push(result);
    }

    pub fn warn(&mut self, warning: String) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}
