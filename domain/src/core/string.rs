//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Return the first line of `s`, truncated to `max_len` bytes.
///
/// Used for compact command previews in audit records and log lines.
pub fn first_line(s: &str, max_len: usize) -> String {
    let line = s.lines().next().unwrap_or("");
    let suffix = if s.lines().nth(1).is_some() { " ..." } else { "" };
    format!("{}{}", truncate(line, max_len), suffix)
}
