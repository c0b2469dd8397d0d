/// Word-wrap `text` to `max_width` columns, measured in characters so
/// multi-byte UTF-8 is not split mid-glyph. Words longer than the
/// width get a line of their own.
pub(crate) fn word_wrap(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }
    let mut out = Vec::new();
    for line in text.lines() {
        let mut current = String::new();
        let mut current_len = 0usize;
        for word in line.split_whitespace() {
            let word_len = word.chars().count();
            if current.is_empty() {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= max_width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                out.push(std::mem::take(&mut current));
                current.push_str(word);
                current_len = word_len;
            }
        }
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

/// Truncate a string to `max_len` chars, adding … if truncated
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_word_boundaries() {
        let wrapped = word_wrap("three nested loops over the same set", 12);
        assert_eq!(wrapped, vec!["three nested", "loops over", "the same set"]);
    }

    #[test]
    fn short_text_passes_through() {
        assert_eq!(word_wrap("short", 20), vec!["short"]);
    }

    #[test]
    fn zero_width_is_a_noop() {
        assert_eq!(word_wrap("anything at all", 0), vec!["anything at all"]);
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("héllo wörld", 6), "héllo…");
        assert_eq!(truncate("short", 10), "short");
    }
}
