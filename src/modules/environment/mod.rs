pub mod path_var;
pub mod store;

use crate::modules::config::PurgeConfig;
use crate::modules::purger::models::{OperationResult, Stage, StageReport};
use store::{EnvScope, EnvironmentStore};

const STAGE: Stage = Stage::PathSanitization;

/// 从用户和系统 PATH 中移除包含目标子串的片段
pub fn sanitize_path_variables(config: &PurgeConfig, env: &dyn EnvironmentStore) -> StageReport {
    let mut report = StageReport::default();
    let target = &config.target_substring;

    for scope in EnvScope::ALL {
        let raw = match env.read_path(scope) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                report.push(OperationResult::not_found(STAGE, scope.to_string()));
                continue;
            }
            Err(e) => {
                tracing::warn!("无法读取{}: {}", scope, e);
                report.push(OperationResult::failed(STAGE, scope.to_string(), e.to_string()));
                continue;
            }
        };

        let Some(filtered) = path_var::filter_path_value(&raw, target) else {
            tracing::debug!("{} 中没有包含 {} 的片段", scope, target);
            report.push(OperationResult::not_found(STAGE, scope.to_string()));
            continue;
        };

        let removed = path_var::removed_segments(&raw, target).join(path_var::PATH_DELIMITER);
        tracing::info!("正在更新{}，移除: {}", scope, removed);

        let result = match env.write_path(scope, &filtered) {
            Ok(()) => OperationResult::succeeded(STAGE, scope.to_string()),
            Err(e) => {
                tracing::warn!("写入{}失败: {}", scope, e);
                OperationResult::failed(STAGE, scope.to_string(), e.to_string())
            }
        };
        report.push(result.with_detail(format!("移除: {}", removed)));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::common::error::PurgeError;
    use crate::modules::purger::models::OutcomeStatus;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeEnvironment {
        values: RefCell<HashMap<EnvScope, String>>,
        writes: RefCell<Vec<EnvScope>>,
        machine_read_only: bool,
    }

    impl EnvironmentStore for FakeEnvironment {
        fn read_path(&self, scope: EnvScope) -> Result<Option<String>, PurgeError> {
            Ok(self.values.borrow().get(&scope).cloned())
        }

        fn write_path(&self, scope: EnvScope, value: &str) -> Result<(), PurgeError> {
            if scope == EnvScope::Machine && self.machine_read_only {
                return Err(PurgeError::Environment("拒绝访问".to_string()));
            }
            self.writes.borrow_mut().push(scope);
            self.values.borrow_mut().insert(scope, value.to_string());
            Ok(())
        }
    }

    fn env_with(user: &str, machine: &str) -> FakeEnvironment {
        let env = FakeEnvironment::default();
        env.values.borrow_mut().insert(EnvScope::User, user.to_string());
        env.values.borrow_mut().insert(EnvScope::Machine, machine.to_string());
        env
    }

    #[test]
    fn rewrites_only_scopes_that_reference_target() {
        let env = env_with(
            r"C:\Users\me\AppData\Local\Programs\Python\Python311;C:\Users\me\bin",
            r"C:\Windows;C:\Tools",
        );

        let report = sanitize_path_variables(&PurgeConfig::default(), &env);

        assert_eq!(*env.writes.borrow(), vec![EnvScope::User]);
        assert_eq!(
            env.values.borrow().get(&EnvScope::User).cloned(),
            Some(r"C:\Users\me\bin".to_string())
        );
        assert_eq!(
            env.values.borrow().get(&EnvScope::Machine).cloned(),
            Some(r"C:\Windows;C:\Tools".to_string())
        );
        assert_eq!(report.operations[0].status, OutcomeStatus::Succeeded);
        assert_eq!(report.operations[1].status, OutcomeStatus::NotFound);
    }

    #[test]
    fn machine_write_failure_keeps_previous_value() {
        let env = FakeEnvironment {
            machine_read_only: true,
            ..env_with("", r"C:\Windows;C:\Python39;C:\Tools")
        };

        let report = sanitize_path_variables(&PurgeConfig::default(), &env);

        assert!(report.operations[1].status.is_failure());
        assert_eq!(
            env.values.borrow().get(&EnvScope::Machine).cloned(),
            Some(r"C:\Windows;C:\Python39;C:\Tools".to_string())
        );
    }

    #[test]
    fn missing_variable_is_not_found() {
        let env = FakeEnvironment::default();
        let report = sanitize_path_variables(&PurgeConfig::default(), &env);
        assert!(report
            .operations
            .iter()
            .all(|op| op.status == OutcomeStatus::NotFound));
        assert!(env.writes.borrow().is_empty());
    }
}
