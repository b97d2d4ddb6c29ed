//! Minimal RTF-to-text decoder.
//!
//! Only the control words needed for plain-text recovery are interpreted:
//! `\'XX` hex escapes, `\uN` Unicode code points and the escaped delimiters
//! `\\`, `\{`, `\}`. Every other control word (and its numeric parameter) is
//! dropped. Group braces are stripped.

pub fn rtf_to_text(data: &[u8]) -> String {
    let mut out: Vec<u8> = Vec::with_capacity(data.len());
    let mut i = 0;

    while i < data.len() {
        let b = data[i];
        match b {
            b'{' | b'}' => i += 1,
            b'\\' => i = read_control(data, i, &mut out),
            _ => {
                if b >= 32 || b == b'\n' || b == b'\t' {
                    out.push(b);
                }
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Consumes the control sequence starting at `start` (a backslash) and returns
/// the index of the first byte after it.
fn read_control(data: &[u8], start: usize, out: &mut Vec<u8>) -> usize {
    let Some(&next) = data.get(start + 1) else {
        return start + 1;
    };

    match next {
        b'\'' => {
            if let Some(byte) = hex_byte(data, start + 2) {
                push_char(out, char::from(byte));
            }
            (start + 4).min(data.len())
        }
        b'\\' | b'{' | b'}' => {
            out.push(next);
            start + 2
        }
        c if c.is_ascii_alphabetic() => read_control_word(data, start + 1, out),
        // Other control symbols (`\~`, `\-`, `\*`, line breaks) carry no text.
        _ => start + 2,
    }
}

fn read_control_word(data: &[u8], name_start: usize, out: &mut Vec<u8>) -> usize {
    let mut j = name_start;
    while j < data.len() && data[j].is_ascii_alphabetic() {
        j += 1;
    }
    let name = &data[name_start..j];

    let negative = data.get(j) == Some(&b'-');
    if negative {
        j += 1;
    }
    let num_start = j;
    while j < data.len() && data[j].is_ascii_digit() {
        j += 1;
    }
    let param = std::str::from_utf8(&data[num_start..j])
        .ok()
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
        .map(|n| if negative { -n } else { n });

    // A single space terminates the control word and is not part of the text.
    if data.get(j) == Some(&b' ') {
        j += 1;
    }

    if name.eq_ignore_ascii_case(b"u") {
        if let Some(mut code) = param {
            if code < 0 {
                code += 65536;
            }
            if let Some(c) = u32::try_from(code).ok().and_then(char::from_u32) {
                push_char(out, c);
            }
            j = skip_fallback(data, j);
        }
    }

    j
}

/// Skips the single ANSI fallback character that follows a `\uN` escape.
fn skip_fallback(data: &[u8], at: usize) -> usize {
    match data.get(at) {
        Some(b'\\') if data.get(at + 1) == Some(&b'\'') => (at + 4).min(data.len()),
        Some(b'\\' | b'{' | b'}') | None => at,
        Some(_) => at + 1,
    }
}

fn hex_byte(data: &[u8], at: usize) -> Option<u8> {
    let hi = hex_val(*data.get(at)?)?;
    let lo = hex_val(*data.get(at + 1)?)?;
    Some((hi << 4) | lo)
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_groups_and_control_words() {
        let rtf = br"{\rtf1\ansi{\fonttbl\f0\fswiss Helvetica;}\f0\pard Senior Rust Engineer\par}";
        let text = rtf_to_text(rtf);
        assert!(text.contains("Senior Rust Engineer"));
        assert!(!text.contains("rtf1"));
        assert!(!text.contains('{'));
        assert!(!text.contains('\\'));
    }

    #[test]
    fn test_decodes_hex_escapes_as_latin1() {
        let text = rtf_to_text(br"caf\'e9 menu");
        assert_eq!(text, "café menu");
    }

    #[test]
    fn test_decodes_unicode_escape_and_skips_fallback() {
        let text = rtf_to_text(br"na\u239?ve");
        assert_eq!(text, "naïve");
    }

    #[test]
    fn test_negative_unicode_parameter_wraps() {
        // \u-3913 is U+F0B7 in the 16-bit signed form Word emits for symbol bullets.
        let text = rtf_to_text(br"\u-3913?x");
        assert_eq!(text, "\u{F0B7}x");
    }

    #[test]
    fn test_escaped_delimiters_are_literal() {
        let text = rtf_to_text(br"C\{\}\\ done");
        assert_eq!(text, r"C{}\ done");
    }

    #[test]
    fn test_keeps_newlines_and_tabs_drops_other_controls() {
        let text = rtf_to_text(b"a\tb\nc\x01d");
        assert_eq!(text, "a\tb\ncd");
    }

    #[test]
    fn test_truncated_input_does_not_panic() {
        assert_eq!(rtf_to_text(br"abc\'e"), "abc");
        assert_eq!(rtf_to_text(b"abc\\"), "abc");
    }
}
