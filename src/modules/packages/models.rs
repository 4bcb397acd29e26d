use serde::{Deserialize, Serialize};

/// 已安装的应用包 (Get-AppxPackage)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPackage {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "PackageFullName")]
    pub package_full_name: String,
}

/// 为所有新用户预配的应用包 (Get-AppxProvisionedPackage)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedPackage {
    #[serde(rename = "DisplayName")]
    pub display_name: String,

    #[serde(rename = "PackageName")]
    pub package_name: String,
}
