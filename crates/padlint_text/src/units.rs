//! UTF-16 unit helpers.
//!
//! Rust strings are UTF-8, while offsets coming from the checker and
//! columns coming from the host are UTF-16 code units.

/// Returns the length of `text` in UTF-16 code units.
#[inline]
pub fn utf16_len(text: &str) -> u32 {
    text.chars().map(|ch| ch.len_utf16() as u32).sum()
}

/// Converts a UTF-16 column into a byte index into `text`.
///
/// Returns `None` when the column lies past the end of `text` or points
/// into the middle of a surrogate pair.
pub fn utf16_to_byte(text: &str, column: u32) -> Option<usize> {
    let mut units = 0u32;

    for (byte_idx, ch) in text.char_indices() {
        if units == column {
            return Some(byte_idx);
        }
        if units > column {
            return None;
        }
        units += ch.len_utf16() as u32;
    }

    (units == column).then_some(text.len())
}

/// Returns the longest prefix of `text` that fits in `max_units` UTF-16
/// code units without splitting a character.
pub fn truncate_utf16(text: &str, max_units: usize) -> &str {
    let mut units = 0usize;

    for (byte_idx, ch) in text.char_indices() {
        units += ch.len_utf16();
        if units > max_units {
            return &text[..byte_idx];
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::ascii("hello", 5)]
    #[case::empty("", 0)]
    #[case::bmp("日本語", 3)]
    #[case::astral("a🎉b", 4)]
    fn test_utf16_len(#[case] text: &str, #[case] expected: u32) {
        assert_eq!(utf16_len(text), expected);
    }

    #[test]
    fn test_utf16_to_byte_ascii() {
        assert_eq!(utf16_to_byte("hello", 0), Some(0));
        assert_eq!(utf16_to_byte("hello", 3), Some(3));
        assert_eq!(utf16_to_byte("hello", 5), Some(5));
        assert_eq!(utf16_to_byte("hello", 6), None);
    }

    #[test]
    fn test_utf16_to_byte_multibyte() {
        // 'あ' is 3 bytes in UTF-8, 1 unit in UTF-16
        assert_eq!(utf16_to_byte("あいう", 1), Some(3));
        assert_eq!(utf16_to_byte("あいう", 3), Some(9));
    }

    #[test]
    fn test_utf16_to_byte_inside_surrogate_pair() {
        // '🎉' occupies units 1 and 2
        assert_eq!(utf16_to_byte("a🎉b", 1), Some(1));
        assert_eq!(utf16_to_byte("a🎉b", 2), None);
        assert_eq!(utf16_to_byte("a🎉b", 3), Some(5));
    }

    #[rstest]
    #[case::shorter("abc", 10, "abc")]
    #[case::exact("abc", 3, "abc")]
    #[case::cut("abcdef", 4, "abcd")]
    #[case::zero("abc", 0, "")]
    #[case::keeps_pair_whole("a🎉b", 2, "a")]
    fn test_truncate_utf16(#[case] text: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(truncate_utf16(text, max), expected);
    }
}
