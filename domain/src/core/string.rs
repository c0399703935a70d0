//! String utilities for the domain layer.

/// Truncate a string to at most `max_chars` characters (UTF-8 safe).
///
/// Counts characters rather than bytes, so multi-byte text is never split
/// mid-character and never exceeds the character limit.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => s[..end].to_string(),
        None => s.to_string(),
    }
}
