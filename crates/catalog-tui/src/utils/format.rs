use chrono::NaiveDate;

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
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

/// Format an optional string, returning a default if None or blank
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if let Some(day) = date
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    {
        day.format("%b %d, %Y").to_string()
    } else {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Zürich Institute", 6), "Zür...");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(&Some("MIT".to_string()), "-"), "MIT");
        assert_eq!(format_optional(&Some("  ".to_string()), "-"), "-");
        assert_eq!(format_optional(&None, "-"), "-");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-15T10:00:00Z"), "Jan 15, 2024");
        assert_eq!(format_date("2021-05-01T00:00:00"), "May 01, 2021");
        assert_eq!(format_date("2021-05-01"), "May 01, 2021");
        assert_eq!(format_date("soon"), "soon");
    }
}
