//! Count formatting for log lines.

#[inline]
fn suffix(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// `"1 path"`, `"0 paths"`, `"12 pixels"`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", suffix(count))
}
