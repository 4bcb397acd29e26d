use super::models::{AppPackage, ProvisionedPackage};
use crate::modules::common::error::PurgeError;
use serde::de::DeserializeOwned;
use std::process::Command;

/// 平台应用包管理
pub trait PackageManager {
    fn installed_packages(&self) -> Result<Vec<AppPackage>, PurgeError>;
    fn remove_installed(&self, package: &AppPackage) -> Result<(), PurgeError>;
    fn provisioned_packages(&self) -> Result<Vec<ProvisionedPackage>, PurgeError>;
    fn remove_provisioned(&self, package: &ProvisionedPackage) -> Result<(), PurgeError>;
}

/// 通过 PowerShell Appx 模块管理应用包
#[derive(Debug, Default, Clone, Copy)]
pub struct PowerShellPackageManager;

impl PackageManager for PowerShellPackageManager {
    fn installed_packages(&self) -> Result<Vec<AppPackage>, PurgeError> {
        let json = run_powershell(
            "Get-AppxPackage -AllUsers | Select-Object Name, PackageFullName | ConvertTo-Json -Depth 2",
        )?;
        parse_json_list(&json)
    }

    fn remove_installed(&self, package: &AppPackage) -> Result<(), PurgeError> {
        run_powershell(&format!(
            "Remove-AppxPackage -Package {} -AllUsers -ErrorAction Stop",
            quote(&package.package_full_name)
        ))
        .map(|_| ())
    }

    fn provisioned_packages(&self) -> Result<Vec<ProvisionedPackage>, PurgeError> {
        let json = run_powershell(
            "Get-AppxProvisionedPackage -Online | Select-Object DisplayName, PackageName | ConvertTo-Json -Depth 2",
        )?;
        parse_json_list(&json)
    }

    fn remove_provisioned(&self, package: &ProvisionedPackage) -> Result<(), PurgeError> {
        run_powershell(&format!(
            "Remove-AppxProvisionedPackage -Online -PackageName {} -ErrorAction Stop | Out-Null",
            quote(&package.package_name)
        ))
        .map(|_| ())
    }
}

fn run_powershell(script: &str) -> Result<String, PurgeError> {
    let output = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", script])
        .output()
        .map_err(|e| PurgeError::Package(format!("执行 PowerShell 失败: {}", e)))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        Err(PurgeError::Package(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

/// PowerShell 单引号字符串
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// ConvertTo-Json 对单个对象不输出数组；无法解析时返回错误，不能当作"没有应用包"
fn parse_json_list<T: DeserializeOwned>(json_str: &str) -> Result<Vec<T>, PurgeError> {
    let trimmed = json_str.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<T>>(trimmed)
    } else {
        serde_json::from_str::<T>(trimmed).map(|item| vec![item])
    }
    .map_err(|e| PurgeError::Package(format!("无法解析应用包列表: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_and_single_object_output() {
        let many = parse_json_list::<AppPackage>(
            r#"[
                {"Name": "PythonSoftwareFoundation.Python.3.11", "PackageFullName": "PythonSoftwareFoundation.Python.3.11_3.11.2544.0_x64__qbz5n2kfra8p0"},
                {"Name": "Microsoft.WindowsCalculator", "PackageFullName": "Microsoft.WindowsCalculator_11.2307.4.0_x64__8wekyb3d8bbwe"}
            ]"#,
        );
        assert_eq!(many.map(|list| list.len()).ok(), Some(2));

        let single = parse_json_list::<ProvisionedPackage>(
            r#"{"DisplayName": "PythonSoftwareFoundation.Python.3.12", "PackageName": "PythonSoftwareFoundation.Python.3.12_3.12.0.0_neutral_~_qbz5n2kfra8p0"}"#,
        );
        let single = single.unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].display_name, "PythonSoftwareFoundation.Python.3.12");
    }

    #[test]
    fn empty_output_yields_no_packages() {
        assert_eq!(parse_json_list::<AppPackage>("").ok(), Some(Vec::new()));
        assert_eq!(parse_json_list::<AppPackage>("null").ok(), Some(Vec::new()));
    }

    #[test]
    fn unparseable_output_is_an_error() {
        assert!(matches!(
            parse_json_list::<AppPackage>("not json"),
            Err(PurgeError::Package(_))
        ));

        // 一条记录缺少 Name 时整个列表不可信，不能静默返回空列表
        let result = parse_json_list::<AppPackage>(
            r#"[
                {"Name": "PythonSoftwareFoundation.Python.3.11", "PackageFullName": "PythonSoftwareFoundation.Python.3.11_3.11.2544.0_x64__qbz5n2kfra8p0"},
                {"Name": null, "PackageFullName": "Broken_1.0.0.0_x64__abc"}
            ]"#,
        );
        assert!(matches!(result, Err(PurgeError::Package(_))));
    }

    #[test]
    fn quote_escapes_single_quotes() {
        assert_eq!(quote("it's"), "'it''s'");
    }
}
