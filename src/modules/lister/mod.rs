pub mod models;
pub mod registry;

use crate::modules::common::utils;
use models::UninstallEntry;

/// 卸载项的显示名称是否包含目标子串 (大小写不敏感，非整词匹配)
pub fn matches_display_name(entry: &UninstallEntry, target: &str) -> bool {
    utils::contains_ignore_case(&entry.display_name, target)
}
