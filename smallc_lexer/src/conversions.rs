//! Symbol decoding for table headers and literal rendering for diagnostics

/// Decode a header symbol written as a hex escape, e.g. `0x20` for space.
///
/// Every `0x` marker is removed and the rest is read as base 16. Returns
/// `None` when the remainder is empty, not hexadecimal, or not a valid
/// character.
pub fn hex_token_to_char(token: &str) -> Option<char> {
    let digits = token.replace("0x", "");
    if digits.is_empty() {
        return None;
    }

    u32::from_str_radix(&digits, 16)
        .ok()
        .and_then(char::from_u32)
}

/// Render a lexeme as a quoted, escaped string literal
pub fn to_literal(input: &str) -> String {
    let mut literal = String::with_capacity(input.len() + 2);
    literal.push('"');

    for ch in input.chars() {
        match ch {
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            '\0' => literal.push_str("\\0"),
            '\\' => literal.push_str("\\\\"),
            '"' => literal.push_str("\\\""),
            c if c.is_control() => literal.push_str(&format!("\\u{{{:04x}}}", c as u32)),
            c => literal.push(c),
        }
    }

    literal.push('"');
    literal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_token_to_char() {
        assert_eq!(hex_token_to_char("0x20"), Some(' '));
        assert_eq!(hex_token_to_char("0x0A"), Some('\n'));
        assert_eq!(hex_token_to_char("0x2c"), Some(','));
        assert_eq!(hex_token_to_char("0x"), None);
        assert_eq!(hex_token_to_char("0xZZ"), None);
        assert_eq!(hex_token_to_char("0xD800"), None);
    }

    #[test]
    fn test_to_literal_escapes() {
        assert_eq!(to_literal("abc"), "\"abc\"");
        assert_eq!(to_literal("a\nb\t"), "\"a\\nb\\t\"");
        assert_eq!(to_literal("say \"hi\"\\"), "\"say \\\"hi\\\"\\\\\"");
        assert_eq!(to_literal("\u{7}"), "\"\\u{0007}\"");
        assert_eq!(to_literal(""), "\"\"");
    }
}
