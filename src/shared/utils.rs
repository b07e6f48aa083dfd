/// Strips everything but digits from a phone number. The formatted
/// string is kept for display; all comparisons go through this.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Truncates `text` to `max` characters, appending an ellipsis when
/// anything was cut.
pub fn summarize(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_phone_strips_formatting() {
        assert_eq!(normalize_phone("+44 7700 900123"), "447700900123");
        assert_eq!(normalize_phone("(555) 012-3456"), "5550123456");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn summarize_truncates_long_text() {
        let long = "a".repeat(60);
        let summary = summarize(&long, 50);
        assert_eq!(summary.chars().count(), 53);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn summarize_keeps_short_text() {
        assert_eq!(summarize("hello", 50), "hello");
    }
}
