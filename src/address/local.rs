/// atext ASCII + '.' that is neither leading, trailing nor doubled.
pub(crate) fn is_local_strict(s: &str) -> bool {
    if s.starts_with('.') || s.ends_with('.') || s.contains("..") {
        return false;
    }
    s.chars().all(|c| {
        c.is_ascii_alphanumeric()
            || matches!(
                c,
                '!' | '#'
                    | '$'
                    | '%'
                    | '&'
                    | '\''
                    | '*'
                    | '+'
                    | '-'
                    | '/'
                    | '='
                    | '?'
                    | '^'
                    | '_'
                    | '`'
                    | '{'
                    | '|'
                    | '}'
                    | '~'
                    | '.'
            )
    })
}

/// Accepts a quoted-string without escapes, otherwise `is_local_strict`.
pub(crate) fn is_local_relaxed(s: &str) -> bool {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        let inner = &s[1..s.len() - 1];
        !inner.contains('"') && !inner.contains('\\') && inner.is_ascii()
    } else {
        is_local_strict(s)
    }
}
