/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a date string for display.
///
/// RFC 3339 timestamps become e.g. `Mar 01, 2024`. Any other string longer
/// than 10 characters is cut to its first 10, which keeps the `YYYY-MM-DD`
/// part of the backend's date formats; shorter strings pass through.
pub fn format_date(date: &str) -> String {
    // Try to parse ISO format and convert to readable
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 && date.is_char_boundary(10) {
        // Try to parse YYYY-MM-DD format
        date[..10].to_string()
    } else {
        date.to_string()
    }
}

/// Case-insensitive substring check
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Human-readable byte count (KiB/MiB/GiB)
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{} B", bytes)
    } else if b < KIB * KIB {
        format!("{:.1} KiB", b / KIB)
    } else if b < KIB * KIB * KIB {
        format!("{:.1} MiB", b / (KIB * KIB))
    } else {
        format!("{:.1} GiB", b / (KIB * KIB * KIB))
    }
}

/// Render a fixed-width text progress bar, e.g. `[#####.....]  50%`
pub fn progress_bar(percent: u8, width: usize) -> String {
    let percent = percent.min(100);
    let filled = width * percent as usize / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(width - filled),
        percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Diseñador gráfico", 9), "Diseña...");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-01T10:00:00Z"), "Mar 01, 2024");
        assert_eq!(format_date("2024-03-01 10:00"), "2024-03-01");
        assert_eq!(format_date("soon"), "soon");
        assert_eq!(format_date("2024-03-01"), "2024-03-01");
        // Display only: unrecognized long strings are cut
        assert_eq!(format_date("next week maybe"), "next week ");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Rust Developer", "rust"));
        assert!(contains_ignore_case("REMOTO", "remoto"));
        assert!(!contains_ignore_case("Java", "rust"));
        assert!(contains_ignore_case("anything", ""));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 10), "[..........]   0%");
        assert_eq!(progress_bar(50, 10), "[#####.....]  50%");
        assert_eq!(progress_bar(100, 10), "[##########] 100%");
        assert_eq!(progress_bar(250, 4), "[####] 100%");
    }
}
