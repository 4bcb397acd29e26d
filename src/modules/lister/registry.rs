use super::models::{UninstallEntry, UninstallHive};
use crate::modules::common::error::PurgeError;

/// 读取注册表卸载信息
pub trait RegistryReader {
    /// 枚举某个位置下的所有卸载项；位置不存在时返回错误
    fn uninstall_entries(&self, hive: UninstallHive) -> Result<Vec<UninstallEntry>, PurgeError>;
}

#[cfg(windows)]
pub use self::windows_impl::WindowsRegistry;

#[cfg(windows)]
mod windows_impl {
    use super::*;
    use winreg::enums::*;
    use winreg::RegKey;

    /// 基于 winreg 的实现
    #[derive(Debug, Default, Clone, Copy)]
    pub struct WindowsRegistry;

    impl RegistryReader for WindowsRegistry {
        fn uninstall_entries(
            &self,
            hive: UninstallHive,
        ) -> Result<Vec<UninstallEntry>, PurgeError> {
            let root = match hive {
                UninstallHive::CurrentUser => HKEY_CURRENT_USER,
                UninstallHive::LocalMachine | UninstallHive::LocalMachineWow64 => {
                    HKEY_LOCAL_MACHINE
                }
            };

            let key = RegKey::predef(root)
                .open_subkey(hive.subkey())
                .map_err(|e| PurgeError::Registry(format!("{}: {}", hive, e)))?;

            let mut entries = Vec::new();

            for name in key.enum_keys().filter_map(|k| k.ok()) {
                match key.open_subkey(&name) {
                    Ok(subkey) => {
                        if let Some(entry) = parse_registry_entry(hive, &name, &subkey) {
                            entries.push(entry);
                        }
                    }
                    Err(e) => tracing::debug!("无法打开卸载项 {}\\{}: {}", hive, name, e),
                }
            }

            Ok(entries)
        }
    }

    /// 解析注册表项，没有 DisplayName 的项被忽略
    fn parse_registry_entry(
        hive: UninstallHive,
        key_name: &str,
        subkey: &RegKey,
    ) -> Option<UninstallEntry> {
        let display_name: String = subkey.get_value("DisplayName").ok()?;

        let mut entry = UninstallEntry::new(hive, key_name.to_string(), display_name);
        entry.uninstall_command = subkey
            .get_value::<String, _>("UninstallString")
            .ok()
            .filter(|command| !command.trim().is_empty());

        Some(entry)
    }
}
