use unicode_normalization::UnicodeNormalization;

/// Makes human readable text safe to use as a single file or directory name.
///
/// Text is folded to ASCII through NFKD, so accents are dropped and other
/// non-ASCII characters removed. Path separators become spaces, reserved and
/// control characters are dropped and runs of whitespace collapse.
pub fn sanitize_name(s: &str) -> String {
    let replaced: String = s
        .nfkd()
        .filter(char::is_ascii)
        .filter_map(|c| match c {
            '/' | '\\' => Some(' '),
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();

    // Keep this last to remove duplicate spaces
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    // Trailing dots are not allowed on Windows
    collapsed.trim_end_matches('.').to_string()
}

/// Removes the path separators from a field scraped off a page.
pub fn strip_separators(s: &str) -> String {
    s.replace(['/', '\\'], "").trim().to_string()
}
