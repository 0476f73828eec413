// src/core/sanitize.rs

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Case-insensitive substring test. `needle_lc` must already be lowercase.
pub fn contains_lc(haystack_lc: &str, needle_lc: &str) -> bool {
    !needle_lc.is_empty() && haystack_lc.contains(needle_lc)
}

/// True if any of `needles` occurs in `s`, ignoring case.
pub fn contains_any_ci<S: AsRef<str>>(s: &str, needles: &[S]) -> bool {
    let lc = s.to_lowercase();
    needles
        .iter()
        .any(|n| contains_lc(&lc, &n.as_ref().to_lowercase()))
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First `n` chars of `s` (whole string if shorter).
pub fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
