//! Quote and escape handling for literal text inside scripts

/// Strip quoting and escapes from a script literal
///
/// `\` makes the next character literal; unescaped double quotes only group
/// characters and are dropped.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut escaped = false;
    for c in text.chars() {
        match c {
            '\\' if !escaped => {
                escaped = true;
                continue;
            }
            '"' if !escaped => {}
            _ => out.push(c),
        }
        escaped = false;
    }
    out
}

/// Whether `text` is one token: no whitespace outside quotes, no open quote
pub fn is_single_word(text: &str) -> bool {
    let mut quoted = false;
    let mut escaped = false;
    for c in text.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => return false,
            _ => {}
        }
    }
    !quoted
}

/// Whether every character of `pattern` appears in `text`, in order
pub fn is_subsequence(pattern: &str, text: &str) -> bool {
    let mut wanted = pattern.chars().peekable();
    for c in text.chars() {
        match wanted.peek() {
            Some(&w) if w == c => {
                wanted.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    wanted.peek().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape("\"two words\""), "two words");
        assert_eq!(unescape("a\\\"b"), "a\"b");
        assert_eq!(unescape("back\\\\slash"), "back\\slash");
        assert_eq!(unescape("a\\ b"), "a b");
    }

    #[test]
    fn test_is_single_word() {
        assert!(is_single_word("word"));
        assert!(is_single_word("\"two words\""));
        assert!(is_single_word("escaped\\ space"));
        assert!(!is_single_word("two words"));
        assert!(!is_single_word("\"open"));
    }

    #[test]
    fn test_is_subsequence() {
        assert!(is_subsequence("ace", "abcde"));
        assert!(is_subsequence("abc", "abc"));
        assert!(is_subsequence("", "anything"));
        assert!(!is_subsequence("aec", "abcde"));
        assert!(!is_subsequence("abcd", "abc"));
    }
}
