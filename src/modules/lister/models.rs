use serde::{Deserialize, Serialize};

/// 卸载信息所在的注册表位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UninstallHive {
    /// HKCU\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall
    CurrentUser,
    /// HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall
    LocalMachine,
    /// HKLM\SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall
    LocalMachineWow64,
}

impl UninstallHive {
    pub const ALL: [UninstallHive; 3] = [
        UninstallHive::CurrentUser,
        UninstallHive::LocalMachine,
        UninstallHive::LocalMachineWow64,
    ];

    pub fn subkey(&self) -> &'static str {
        match self {
            UninstallHive::CurrentUser | UninstallHive::LocalMachine => {
                r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall"
            }
            UninstallHive::LocalMachineWow64 => {
                r"SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall"
            }
        }
    }
}

impl std::fmt::Display for UninstallHive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let root = match self {
            UninstallHive::CurrentUser => "HKCU",
            UninstallHive::LocalMachine | UninstallHive::LocalMachineWow64 => "HKLM",
        };
        write!(f, "{}\\{}", root, self.subkey())
    }
}

/// 注册表中的一条卸载信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UninstallEntry {
    pub hive: UninstallHive,
    /// 子键名 (通常是产品 GUID 或程序名)
    pub key_name: String,
    pub display_name: String,
    pub uninstall_command: Option<String>,
}

impl UninstallEntry {
    pub fn new(hive: UninstallHive, key_name: String, display_name: String) -> Self {
        Self {
            hive,
            key_name,
            display_name,
            uninstall_command: None,
        }
    }

    pub fn with_uninstall_command(mut self, command: impl Into<String>) -> Self {
        self.uninstall_command = Some(command.into());
        self
    }
}
