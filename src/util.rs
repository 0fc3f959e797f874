/// Truncate to at most `max_bytes`, never splitting a character.
pub fn truncate_string(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut truncated = String::new();
    for ch in text.chars() {
        if truncated.len() + ch.len_utf8() > max_bytes {
            break;
        }
        truncated.push(ch);
    }
    truncated
}

/// First non-empty line of command output, trimmed.
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_respects_char_boundaries() {
        assert_eq!(truncate_string("abc", 10), "abc");
        assert_eq!(truncate_string("abcdef", 4), "abcd");
        // "é" is two bytes; a cut at 2 must not split it.
        assert_eq!(truncate_string("aé", 2), "a");
    }

    #[test]
    fn first_line_skips_blank_lines() {
        assert_eq!(
            first_line("\n  \n fatal: not a git repository \nmore"),
            "fatal: not a git repository"
        );
        assert_eq!(first_line(""), "");
    }
}
