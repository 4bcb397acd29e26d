//! 清除流水线
//!
//! 五个阶段依次执行，互不依赖；任何阶段中的失败都只记录为操作结果。

pub mod models;

use crate::modules::cleaner::{self, filesystem::FileSystem};
use crate::modules::config::PurgeConfig;
use crate::modules::environment::{self, store::EnvironmentStore};
use crate::modules::lister::registry::RegistryReader;
use crate::modules::packages::{self, store::PackageManager};
use crate::modules::reporter::models::PurgeReport;
use crate::modules::scanner;
use crate::modules::uninstaller::{self, process::ProcessRunner};
use models::{Stage, StageReport};

/// 流水线依赖的系统接口
pub struct Backends<'a> {
    pub registry: &'a dyn RegistryReader,
    pub packages: &'a dyn PackageManager,
    pub filesystem: &'a dyn FileSystem,
    pub process: &'a dyn ProcessRunner,
    pub environment: &'a dyn EnvironmentStore,
}

pub struct Purger<'a> {
    config: &'a PurgeConfig,
    backends: Backends<'a>,
}

impl<'a> Purger<'a> {
    pub fn new(config: &'a PurgeConfig, backends: Backends<'a>) -> Self {
        Self { config, backends }
    }

    pub fn run_stage(&self, stage: Stage) -> StageReport {
        let config = self.config;
        let b = &self.backends;

        match stage {
            Stage::RegistryUninstall => {
                uninstaller::run_registry_uninstallers(config, b.registry, b.process)
            }
            Stage::PackageRemoval => packages::remove_packages(config, b.packages),
            Stage::KnownPathDeletion => cleaner::delete_known_paths(config, b.filesystem),
            Stage::ExecutableSweep => scanner::sweep_executables(config, b.filesystem),
            Stage::PathSanitization => {
                environment::sanitize_path_variables(config, b.environment)
            }
        }
    }

    /// 执行全部阶段，`on_stage` 在每个阶段开始前调用
    pub fn run_with<F>(&self, mut on_stage: F) -> PurgeReport
    where
        F: FnMut(Stage),
    {
        let mut report = PurgeReport::new(self.config.target_substring.clone());

        for stage in Stage::ALL {
            on_stage(stage);
            let stage_report = self.run_stage(stage);
            tracing::debug!(
                "阶段 {} 完成: {} 项操作",
                stage,
                stage_report.operations.len()
            );
            report.absorb(stage_report);
        }

        report
    }

    pub fn run(&self) -> PurgeReport {
        self.run_with(|_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::cleaner::filesystem::LocalFileSystem;
    use crate::modules::common::error::PurgeError;
    use crate::modules::environment::store::EnvScope;
    use crate::modules::lister::models::{UninstallEntry, UninstallHive};
    use crate::modules::packages::models::{AppPackage, ProvisionedPackage};
    use crate::modules::uninstaller::msi::UninstallInvocation;
    use crate::modules::uninstaller::process::ProcessExit;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    /// 模拟一台装有 Python 的机器，卸载和移除操作会真正改变状态
    struct FakeMachine {
        entries: RefCell<Vec<UninstallEntry>>,
        packages: RefCell<Vec<AppPackage>>,
        provisioned: RefCell<Vec<ProvisionedPackage>>,
        paths: RefCell<HashMap<EnvScope, String>>,
        invocations: RefCell<Vec<UninstallInvocation>>,
    }

    impl FakeMachine {
        fn new() -> Self {
            let mut paths = HashMap::new();
            paths.insert(
                EnvScope::User,
                r"C:\Users\me\AppData\Local\Programs\Python\Python311\Scripts\;C:\Users\me\bin".to_string(),
            );
            paths.insert(EnvScope::Machine, r"C:\Windows\system32;C:\Python27".to_string());

            Self {
                entries: RefCell::new(vec![
                    UninstallEntry::new(
                        UninstallHive::LocalMachine,
                        "{11111111-2222-3333-4444-555555555555}".to_string(),
                        "Python 3.11.4 (64-bit)".to_string(),
                    )
                    .with_uninstall_command("MsiExec.exe /X{11111111-2222-3333-4444-555555555555}"),
                    UninstallEntry::new(
                        UninstallHive::LocalMachine,
                        "7-Zip".to_string(),
                        "7-Zip 23.01".to_string(),
                    )
                    .with_uninstall_command(r#""C:\Program Files\7-Zip\Uninstall.exe""#),
                ]),
                packages: RefCell::new(vec![AppPackage {
                    name: "PythonSoftwareFoundation.Python.3.12".to_string(),
                    package_full_name: "PythonSoftwareFoundation.Python.3.12_x64".to_string(),
                }]),
                provisioned: RefCell::new(Vec::new()),
                paths: RefCell::new(paths),
                invocations: RefCell::new(Vec::new()),
            }
        }
    }

    impl RegistryReader for FakeMachine {
        fn uninstall_entries(&self, hive: UninstallHive) -> Result<Vec<UninstallEntry>, PurgeError> {
            Ok(self
                .entries
                .borrow()
                .iter()
                .filter(|entry| entry.hive == hive)
                .cloned()
                .collect())
        }
    }

    impl ProcessRunner for FakeMachine {
        fn run(
            &self,
            invocation: &UninstallInvocation,
            _timeout: Duration,
        ) -> Result<ProcessExit, PurgeError> {
            self.invocations.borrow_mut().push(invocation.clone());
            if let UninstallInvocation::Msi { product_code } = invocation {
                self.entries
                    .borrow_mut()
                    .retain(|entry| !entry.uninstall_command.as_deref().unwrap_or_default().contains(product_code.as_str()));
            }
            Ok(ProcessExit { code: Some(0) })
        }
    }

    impl PackageManager for FakeMachine {
        fn installed_packages(&self) -> Result<Vec<AppPackage>, PurgeError> {
            Ok(self.packages.borrow().clone())
        }

        fn remove_installed(&self, package: &AppPackage) -> Result<(), PurgeError> {
            self.packages.borrow_mut().retain(|p| p != package);
            Ok(())
        }

        fn provisioned_packages(&self) -> Result<Vec<ProvisionedPackage>, PurgeError> {
            Ok(self.provisioned.borrow().clone())
        }

        fn remove_provisioned(&self, package: &ProvisionedPackage) -> Result<(), PurgeError> {
            self.provisioned.borrow_mut().retain(|p| p != package);
            Ok(())
        }
    }

    impl EnvironmentStore for FakeMachine {
        fn read_path(&self, scope: EnvScope) -> Result<Option<String>, PurgeError> {
            Ok(self.paths.borrow().get(&scope).cloned())
        }

        fn write_path(&self, scope: EnvScope, value: &str) -> Result<(), PurgeError> {
            self.paths.borrow_mut().insert(scope, value.to_string());
            Ok(())
        }
    }

    fn temp_install_tree() -> PathBuf {
        let root = std::env::temp_dir().join(format!("runtime-purge-pipeline-{}", uuid::Uuid::new_v4()));
        assert!(fs::create_dir_all(root.join("Programs").join("Python").join("Python311")).is_ok());
        assert!(fs::write(
            root.join("Programs").join("Python").join("Python311").join("python.exe"),
            b"MZ"
        )
        .is_ok());
        assert!(fs::create_dir_all(root.join("Programs").join("stray")).is_ok());
        assert!(fs::write(root.join("Programs").join("stray").join("python3.exe"), b"MZ").is_ok());
        assert!(fs::write(root.join("Programs").join("stray").join("node.exe"), b"MZ").is_ok());
        root
    }

    fn config_for(root: &Path) -> PurgeConfig {
        let root_str = root.to_string_lossy();
        PurgeConfig {
            known_paths: vec![
                format!("{}/Programs/Python", root_str),
                format!("{}/pip", root_str),
            ],
            search_roots: vec![format!("{}/Programs", root_str)],
            ..PurgeConfig::default()
        }
    }

    #[test]
    fn full_run_covers_every_stage_in_order() {
        let root = temp_install_tree();
        let config = config_for(&root);
        let machine = FakeMachine::new();
        let purger = Purger::new(
            &config,
            Backends {
                registry: &machine,
                packages: &machine,
                filesystem: &LocalFileSystem,
                process: &machine,
                environment: &machine,
            },
        );

        let mut seen = Vec::new();
        let report = purger.run_with(|stage| seen.push(stage));

        assert_eq!(seen, Stage::ALL.to_vec());
        assert_eq!(report.failed_count(), 0);
        assert_eq!(machine.invocations.borrow().len(), 1);
        assert!(machine.packages.borrow().is_empty());
        assert!(!root.join("Programs").join("Python").exists());
        assert!(!root.join("Programs").join("stray").join("python3.exe").exists());
        assert!(root.join("Programs").join("stray").join("node.exe").exists());
        assert_eq!(
            machine.paths.borrow().get(&EnvScope::User).cloned(),
            Some(r"C:\Users\me\bin".to_string())
        );
        assert_eq!(
            machine.paths.borrow().get(&EnvScope::Machine).cloned(),
            Some(r"C:\Windows\system32".to_string())
        );

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn second_run_is_clean_and_changes_nothing() {
        let root = temp_install_tree();
        let config = config_for(&root);
        let machine = FakeMachine::new();
        let purger = Purger::new(
            &config,
            Backends {
                registry: &machine,
                packages: &machine,
                filesystem: &LocalFileSystem,
                process: &machine,
                environment: &machine,
            },
        );

        purger.run();
        let paths_after_first = machine.paths.borrow().clone();
        let invocations_after_first = machine.invocations.borrow().len();

        let second = purger.run();

        assert_eq!(second.failed_count(), 0);
        assert_eq!(second.succeeded_count(), 0);
        assert!(second.warnings.is_empty());
        assert_eq!(machine.invocations.borrow().len(), invocations_after_first);
        assert_eq!(*machine.paths.borrow(), paths_after_first);

        let _ = fs::remove_dir_all(&root);
    }
}
