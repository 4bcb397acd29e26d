/// PATH 分隔符
pub const PATH_DELIMITER: &str = ";";

/// 过滤 PATH 值中包含目标子串 (大小写不敏感) 的片段
///
/// 没有片段包含目标子串时返回 `None`，表示无需写回。其余片段 (包括空片段)
/// 原样保留并维持原有顺序。
pub fn filter_path_value(raw: &str, target: &str) -> Option<String> {
    let target_lower = target.to_lowercase();

    if !raw.to_lowercase().contains(&target_lower) {
        return None;
    }

    let segments: Vec<&str> = raw.split(PATH_DELIMITER).collect();
    let kept: Vec<&str> = segments
        .iter()
        .copied()
        .filter(|segment| !segment.to_lowercase().contains(&target_lower))
        .collect();

    // 目标跨越分隔符时原值中能找到，但没有片段被移除
    if kept.len() == segments.len() {
        return None;
    }

    Some(kept.join(PATH_DELIMITER))
}

/// 被过滤掉的片段，用于报告
pub fn removed_segments<'a>(raw: &'a str, target: &str) -> Vec<&'a str> {
    let target_lower = target.to_lowercase();

    raw.split(PATH_DELIMITER)
        .filter(|segment| segment.to_lowercase().contains(&target_lower))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_matching_segments() {
        assert_eq!(
            filter_path_value(r"C:\Windows;C:\Python39;C:\Tools", "python"),
            Some(r"C:\Windows;C:\Tools".to_string())
        );
    }

    #[test]
    fn untouched_when_nothing_matches() {
        assert_eq!(filter_path_value(r"C:\Windows;C:\Tools", "python"), None);
        assert_eq!(filter_path_value("", "python"), None);
    }

    #[test]
    fn target_spanning_delimiter_is_not_a_match() {
        assert_eq!(filter_path_value(r"C:\Python;C:\Tools", r"python;c:"), None);
    }

    #[test]
    fn preserves_order_and_verbatim_segments() {
        let raw = r"%SystemRoot%\system32;;C:\Users\me\AppData\Local\Programs\Python\Python311\Scripts\;D:\bin;C:\PYTHON27;%USERPROFILE%\.cargo\bin;";
        assert_eq!(
            filter_path_value(raw, "Python"),
            Some(r"%SystemRoot%\system32;;D:\bin;%USERPROFILE%\.cargo\bin;".to_string())
        );
    }

    #[test]
    fn every_segment_matching_yields_empty_value() {
        assert_eq!(
            filter_path_value(r"C:\Python39;C:\Python39\Scripts", "python"),
            Some(String::new())
        );
    }

    #[test]
    fn removed_segments_lists_dropped_entries() {
        assert_eq!(
            removed_segments(r"C:\Windows;C:\Python39;C:\Python39\Scripts", "PYTHON"),
            vec![r"C:\Python39", r"C:\Python39\Scripts"]
        );
    }

    #[test]
    fn surviving_segments_keep_relative_order() {
        let segments = ["a", "python-x", "b", "c", "PyThOn", "d"];
        let raw = segments.join(";");
        let filtered = filter_path_value(&raw, "python").unwrap_or_default();
        assert_eq!(filtered, "a;b;c;d");
    }
}
