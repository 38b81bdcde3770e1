use memchr::memchr;

/// Find the end of a quoted literal starting at `i` (which must point to `'`
/// or `"`). A doubled quote continues the literal. Returns the position after
/// the closing quote, or `bytes.len()` when the literal is never closed.
pub(crate) fn skip_quoted(bytes: &[u8], i: usize) -> usize {
    let quote = bytes[i];
    let mut j = i + 1;
    while j < bytes.len() {
        let Some(offset) = memchr(quote, &bytes[j..]) else {
            return bytes.len();
        };
        let end = j + offset;
        if bytes.get(end + 1) == Some(&quote) {
            j = end + 2;
            continue;
        }
        return end + 1;
    }
    bytes.len()
}

/// Whether `word` is a digit run, an optional fraction and a trailing
/// exponent marker, i.e. the head of a literal like `1.5e-3`.
pub(crate) fn is_exponent_head(word: &str) -> bool {
    let Some(mantissa) = word
        .strip_suffix('e')
        .or_else(|| word.strip_suffix('E'))
    else {
        return false;
    };
    let mut seen_digit = false;
    let mut seen_dot = false;
    for ch in mantissa.chars() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}
