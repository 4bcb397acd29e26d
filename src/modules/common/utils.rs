use std::path::Path;

/// 格式化文件大小
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 计算目录大小
pub fn calculate_dir_size(path: &Path) -> std::io::Result<u64> {
    let mut size = 0u64;

    if path.is_file() {
        return path.metadata().map(|m| m.len());
    }

    for entry in walkdir::WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            if let Ok(metadata) = entry.metadata() {
                size += metadata.len();
            }
        }
    }

    Ok(size)
}

/// 大小写不敏感的子串匹配
pub fn contains_ignore_case(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(&needle.to_lowercase())
}

/// 展开 `%VAR%` 形式的环境变量，未定义的变量原样保留
pub fn expand_env_vars(input: &str) -> String {
    expand_env_vars_with(input, |name| std::env::var(name).ok())
}

pub fn expand_env_vars_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('%') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match after.find('%') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => output.push_str(&value),
                    None => {
                        output.push('%');
                        output.push_str(name);
                        output.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            // "%%" 或孤立的 '%'
            _ => {
                output.push('%');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}

/// 检查路径是否为文件系统根 (如 `C:\`、`/`) 或空路径
pub fn is_filesystem_root(path: &Path) -> bool {
    path.as_os_str().is_empty() || path.parent().is_none()
}

/// 规范化路径分隔符
pub fn normalize_path(path: &str) -> String {
    let mut normalized = path.replace('/', "\\");

    while normalized.contains("\\\\") {
        normalized = normalized.replace("\\\\", "\\");
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_env(name: &str) -> Option<String> {
        match name {
            "LOCALAPPDATA" => Some(r"C:\Users\demo\AppData\Local".to_string()),
            "ProgramFiles(x86)" => Some(r"C:\Program Files (x86)".to_string()),
            _ => None,
        }
    }

    #[test]
    fn expand_env_vars_substitutes_known_variables() {
        assert_eq!(
            expand_env_vars_with(r"%LOCALAPPDATA%\Programs\Python", fake_env),
            r"C:\Users\demo\AppData\Local\Programs\Python"
        );
        assert_eq!(
            expand_env_vars_with(r"%ProgramFiles(x86)%\Python*", fake_env),
            r"C:\Program Files (x86)\Python*"
        );
    }

    #[test]
    fn expand_env_vars_keeps_unknown_and_stray_percent() {
        assert_eq!(
            expand_env_vars_with(r"%NOPE%\Python", fake_env),
            r"%NOPE%\Python"
        );
        assert_eq!(expand_env_vars_with("100%", fake_env), "100%");
        assert_eq!(expand_env_vars_with("a%%b", fake_env), "a%%b");
    }

    #[test]
    fn contains_ignore_case_is_plain_substring() {
        assert!(contains_ignore_case("IronPython 2.7", "python"));
        assert!(contains_ignore_case("Python 3.11.4", "PYTHON"));
        assert!(!contains_ignore_case("Py", "python"));
    }

    #[test]
    fn filesystem_root_detection() {
        assert!(is_filesystem_root(Path::new("")));
        assert!(is_filesystem_root(Path::new("/")));
        assert!(!is_filesystem_root(Path::new("/opt/python")));
    }

    #[test]
    fn format_size_uses_binary_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
