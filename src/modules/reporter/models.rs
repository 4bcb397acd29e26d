use crate::modules::purger::models::{OperationResult, OutcomeStatus, Stage, StageReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 清除报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeReport {
    pub id: String,
    pub target: String,
    pub generated_at: DateTime<Utc>,
    pub operations: Vec<OperationResult>,
    pub warnings: Vec<String>,
}

impl PurgeReport {
    pub fn new(target: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            target,
            generated_at: Utc::now(),
            operations: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn absorb(&mut self, stage_report: StageReport) {
        self.operations.extend(stage_report.operations);
        self.warnings.extend(stage_report.warnings);
    }

    pub fn succeeded_count(&self) -> usize {
        self.count(|status| *status == OutcomeStatus::Succeeded)
    }

    pub fn not_found_count(&self) -> usize {
        self.count(|status| *status == OutcomeStatus::NotFound)
    }

    pub fn failed_count(&self) -> usize {
        self.count(OutcomeStatus::is_failure)
    }

    pub fn total_bytes_freed(&self) -> u64 {
        self.operations.iter().map(|op| op.bytes_freed).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &OperationResult> {
        self.operations.iter().filter(|op| op.status.is_failure())
    }

    pub fn stage_operations(&self, stage: Stage) -> impl Iterator<Item = &OperationResult> {
        self.operations.iter().filter(move |op| op.stage == stage)
    }

    fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&OutcomeStatus) -> bool,
    {
        self.operations
            .iter()
            .filter(|op| predicate(&op.status))
            .count()
    }
}
