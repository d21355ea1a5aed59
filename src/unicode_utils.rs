//! Unicode utilities for PDF text rendering
//!
//! Provides conversion from Unicode (UTF-8) to WinAnsiEncoding, the encoding
//! the standard Helvetica fonts are declared with. Covers every Portuguese
//! letter (ç, ã, õ, á, é, ê, í, ó, ô, ú, ü, à) plus ², º and ª.

/// Map a single character to its WinAnsiEncoding byte, if it has one
pub fn winansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    match ch {
        // Standard ASCII (0x20-0x7E); control characters are not printable
        _ if (0x20..=0x7E).contains(&code) => Some(code as u8),

        // Latin-1 supplement maps 1:1 in WinAnsi
        _ if (0xA0..=0xFF).contains(&code) => Some(code as u8),

        // WinAnsi 0x80-0x9F block
        '€' => Some(0x80),
        '‚' => Some(0x82),
        'ƒ' => Some(0x83),
        '„' => Some(0x84),
        '…' => Some(0x85),
        '†' => Some(0x86),
        '‡' => Some(0x87),
        'ˆ' => Some(0x88),
        '‰' => Some(0x89),
        'Š' => Some(0x8A),
        '‹' => Some(0x8B),
        'Œ' => Some(0x8C),
        'Ž' => Some(0x8E),
        '\u{2018}' => Some(0x91), // Left single quotation mark
        '\u{2019}' => Some(0x92), // Right single quotation mark
        '\u{201C}' => Some(0x93), // Left double quotation mark
        '\u{201D}' => Some(0x94), // Right double quotation mark
        '•' => Some(0x95),
        '–' => Some(0x96),
        '—' => Some(0x97),
        '˜' => Some(0x98),
        '™' => Some(0x99),
        'š' => Some(0x9A),
        '›' => Some(0x9B),
        'œ' => Some(0x9C),
        'ž' => Some(0x9E),
        'Ÿ' => Some(0x9F),
        '\t' => Some(b' '),
        _ => None,
    }
}

/// Convert Unicode string to WinAnsiEncoding bytes for PDF text rendering
///
/// Characters not in WinAnsiEncoding are replaced with '?'.
pub fn unicode_to_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| winansi_byte(ch).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portuguese_characters() {
        let text = "ç ã õ ê ô";
        let result = unicode_to_winansi(text);
        assert_eq!(result, vec![0xE7, 0x20, 0xE3, 0x20, 0xF5, 0x20, 0xEA, 0x20, 0xF4]);
    }

    #[test]
    fn test_ascii() {
        let text = "Hello World";
        let result = unicode_to_winansi(text);
        assert_eq!(result, text.as_bytes());
    }

    #[test]
    fn test_mixed() {
        let text = "Cabo (mm²) Nº";
        let result = unicode_to_winansi(text);
        assert_eq!(result[8], 0xB2); // ²
        assert_eq!(result[12], 0xBA); // º
    }

    #[test]
    fn test_unmapped_becomes_question_mark() {
        assert_eq!(unicode_to_winansi("a⚡b"), b"a?b".to_vec());
        assert_eq!(unicode_to_winansi("—"), vec![0x97]);
    }
}
