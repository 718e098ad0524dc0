use std::cmp::Ordering;

/// Case-insensitive string comparison without allocating lowercase copies.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().flat_map(|c| c.to_lowercase());
    let mut bi = b.chars().flat_map(|c| c.to_lowercase());
    loop {
        match (ai.next(), bi.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match x.cmp(&y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

/// Case-insensitive substring check. The needle should already be lowercased.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a monetary amount with currency: "12.50 USD"
pub fn format_money(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// Format an ISO date string to a more readable format
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 {
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

/// Format an ISO datetime string with time: "Mar 04, 2026 @ 02:30 PM"
pub fn format_datetime(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y @ %I:%M %p").to_string()
    } else {
        date.chars().take(16).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmp_ignore_case() {
        assert_eq!(cmp_ignore_case("abc", "ABC"), Ordering::Equal);
        assert_eq!(cmp_ignore_case("abc", "abd"), Ordering::Less);
        assert_eq!(cmp_ignore_case("Zoo", "apple"), Ordering::Greater);
        assert_eq!(cmp_ignore_case("", "a"), Ordering::Less);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Conference Room A", "room"));
        assert!(!contains_ignore_case("Projector", "room"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(12.5, "USD"), "12.50 USD");
        assert_eq!(format_money(0.0, "EUR"), "0.00 EUR");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2026-03-04T14:30:00Z"), "Mar 04, 2026");
        assert_eq!(format_date("2026-03-04"), "2026-03-04");
        assert_eq!(format_date("bad"), "bad");
    }
}
