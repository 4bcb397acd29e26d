use crate::modules::common::error::PurgeError;
use serde::{Deserialize, Serialize};

/// 环境变量作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvScope {
    /// HKCU\Environment
    User,
    /// HKLM\SYSTEM\CurrentControlSet\Control\Session Manager\Environment
    Machine,
}

impl EnvScope {
    pub const ALL: [EnvScope; 2] = [EnvScope::User, EnvScope::Machine];

    pub fn subkey(&self) -> &'static str {
        match self {
            EnvScope::User => "Environment",
            EnvScope::Machine => r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment",
        }
    }
}

impl std::fmt::Display for EnvScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvScope::User => write!(f, "用户 PATH"),
            EnvScope::Machine => write!(f, "系统 PATH"),
        }
    }
}

/// 持久化环境变量存储
pub trait EnvironmentStore {
    /// 读取 PATH，变量不存在时返回 None
    fn read_path(&self, scope: EnvScope) -> Result<Option<String>, PurgeError>;

    /// 覆盖写入 PATH
    fn write_path(&self, scope: EnvScope, value: &str) -> Result<(), PurgeError>;
}

#[cfg(windows)]
pub use self::windows_impl::WindowsEnvironment;

#[cfg(windows)]
mod windows_impl {
    use super::*;
    use winreg::enums::*;
    use winreg::types::{FromRegValue, ToRegValue};
    use winreg::RegKey;

    const PATH_VALUE: &str = "Path";

    /// 通过注册表读写 PATH，写入后广播 WM_SETTINGCHANGE
    #[derive(Debug, Default, Clone, Copy)]
    pub struct WindowsEnvironment;

    fn root(scope: EnvScope) -> RegKey {
        match scope {
            EnvScope::User => RegKey::predef(HKEY_CURRENT_USER),
            EnvScope::Machine => RegKey::predef(HKEY_LOCAL_MACHINE),
        }
    }

    impl EnvironmentStore for WindowsEnvironment {
        fn read_path(&self, scope: EnvScope) -> Result<Option<String>, PurgeError> {
            let key = root(scope)
                .open_subkey(scope.subkey())
                .map_err(|e| PurgeError::Environment(format!("{}: {}", scope, e)))?;

            match key.get_raw_value(PATH_VALUE) {
                Ok(raw) => {
                    let value = String::from_reg_value(&raw)
                        .map_err(|e| PurgeError::Environment(format!("{}: {}", scope, e)))?;
                    Ok(Some(value))
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(PurgeError::Environment(format!("{}: {}", scope, e))),
            }
        }

        fn write_path(&self, scope: EnvScope, value: &str) -> Result<(), PurgeError> {
            let key = root(scope)
                .open_subkey_with_flags(scope.subkey(), KEY_READ | KEY_WRITE)
                .map_err(|e| PurgeError::Environment(format!("{}: {}", scope, e)))?;

            // 保留原有值类型，REG_EXPAND_SZ 中的 %SystemRoot% 等引用才能继续展开
            let vtype = key
                .get_raw_value(PATH_VALUE)
                .map(|raw| raw.vtype)
                .unwrap_or(REG_EXPAND_SZ);

            let mut reg_value = value.to_reg_value();
            reg_value.vtype = vtype;

            key.set_raw_value(PATH_VALUE, &reg_value)
                .map_err(|e| PurgeError::Environment(format!("{}: {}", scope, e)))?;

            broadcast_environment_change();
            Ok(())
        }
    }

    /// 通知其他进程环境变量已更改，新启动的进程才能读到新值
    fn broadcast_environment_change() {
        use windows::Win32::Foundation::{LPARAM, WPARAM};
        use windows::Win32::UI::WindowsAndMessaging::{
            SendMessageTimeoutW, HWND_BROADCAST, SMTO_ABORTIFHUNG, WM_SETTINGCHANGE,
        };

        let section: Vec<u16> = "Environment\0".encode_utf16().collect();

        // SAFETY: section 以 NUL 结尾，且在整个同步调用期间保持存活
        let result = unsafe {
            SendMessageTimeoutW(
                HWND_BROADCAST,
                WM_SETTINGCHANGE,
                WPARAM(0),
                LPARAM(section.as_ptr() as isize),
                SMTO_ABORTIFHUNG,
                5000,
                None,
            )
        };

        if result.0 == 0 {
            tracing::debug!("广播 WM_SETTINGCHANGE 未完成");
        }
    }
}
