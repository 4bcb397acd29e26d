//! 卸载命令解析
//!
//! MSI 安装的程序通过产品代码静默卸载，其余命令经 cmd 执行并追加静默参数。

use regex::Regex;
use std::sync::OnceLock;

/// 追加到普通卸载命令后的静默、不重启参数
pub const SILENT_FLAGS: &str = "/quiet /norestart";

fn product_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{[0-9A-Fa-f-]+\}").expect("valid product code regex"))
}

/// 命令是否使用 Windows Installer
pub fn is_installer_command(command: &str) -> bool {
    command.to_lowercase().contains("msiexec")
}

/// 提取花括号包裹的产品代码 (包含花括号)
pub fn extract_product_code(command: &str) -> Option<String> {
    product_code_pattern()
        .find(command)
        .map(|m| m.as_str().to_string())
}

/// 实际要启动的卸载进程
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallInvocation {
    /// msiexec.exe /x {code} /qn /norestart
    Msi { product_code: String },
    /// cmd.exe /C "<command line>"
    Shell { command_line: String },
}

impl UninstallInvocation {
    /// 根据注册表中的卸载命令构造调用方式
    pub fn from_command(command: &str) -> Self {
        let command = command.trim();

        if is_installer_command(command) {
            if let Some(product_code) = extract_product_code(command) {
                return UninstallInvocation::Msi { product_code };
            }
            tracing::debug!("MSI 卸载命令中未找到产品代码，改用 cmd 执行: {}", command);
        }

        UninstallInvocation::Shell {
            command_line: format!("{} {}", command, SILENT_FLAGS),
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            UninstallInvocation::Msi { .. } => "msiexec.exe",
            UninstallInvocation::Shell { .. } => "cmd.exe",
        }
    }

    pub fn args(&self) -> Vec<String> {
        match self {
            UninstallInvocation::Msi { product_code } => vec![
                "/x".to_string(),
                product_code.clone(),
                "/qn".to_string(),
                "/norestart".to_string(),
            ],
            UninstallInvocation::Shell { command_line } => {
                vec!["/C".to_string(), command_line.clone()]
            }
        }
    }
}

impl std::fmt::Display for UninstallInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.program(), self.args().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bracketed_product_code() {
        let command = "MsiExec.exe /X{A1B2C3D4-1111-2222-3333-444455556666}";
        assert_eq!(
            extract_product_code(command),
            Some("{A1B2C3D4-1111-2222-3333-444455556666}".to_string())
        );
    }

    #[test]
    fn extraction_yields_none_without_braces() {
        assert_eq!(extract_product_code("MsiExec.exe /I python.msi"), None);
        assert_eq!(extract_product_code("{not-a-guid!}"), None);
    }

    #[test]
    fn msi_command_with_code_uses_installer() {
        let invocation =
            UninstallInvocation::from_command("MsiExec.exe /I{0D3E2F1A-AAAA-BBBB-CCCC-DDDDEEEEFFFF}");
        assert_eq!(
            invocation,
            UninstallInvocation::Msi {
                product_code: "{0D3E2F1A-AAAA-BBBB-CCCC-DDDDEEEEFFFF}".to_string()
            }
        );
        assert_eq!(invocation.program(), "msiexec.exe");
        assert_eq!(
            invocation.args(),
            vec!["/x", "{0D3E2F1A-AAAA-BBBB-CCCC-DDDDEEEEFFFF}", "/qn", "/norestart"]
        );
    }

    #[test]
    fn msi_command_without_code_falls_back_to_shell() {
        let invocation = UninstallInvocation::from_command("msiexec /i python.msi");
        assert_eq!(
            invocation,
            UninstallInvocation::Shell {
                command_line: "msiexec /i python.msi /quiet /norestart".to_string()
            }
        );
    }

    #[test]
    fn plain_command_goes_through_shell_with_silent_flags() {
        let invocation = UninstallInvocation::from_command(
            r#""C:\Users\demo\AppData\Local\Package Cache\{guid}\python-3.11.4-amd64.exe" /uninstall"#,
        );
        assert_eq!(invocation.program(), "cmd.exe");
        assert_eq!(
            invocation.args()[1],
            r#""C:\Users\demo\AppData\Local\Package Cache\{guid}\python-3.11.4-amd64.exe" /uninstall /quiet /norestart"#
        );
    }
}
