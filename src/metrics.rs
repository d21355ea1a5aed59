//! Text measurement for the standard Helvetica faces
//!
//! The PDF surface draws with the built-in Helvetica and Helvetica-Bold Type1
//! fonts, so their AFM advance widths are the ground truth for wrapping.
//! Every measurement the layout code makes goes through this module, and the
//! surfaces split text with the same functions before drawing it.

use crate::geometry::POINTS_PER_MM;
use crate::surface::FontWeight;

/// Line advance as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f64 = 1.15;

/// Helvetica widths for 0x20..=0x7E, in 1/1000 em
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold widths for 0x20..=0x7E, in 1/1000 em
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Accented Latin letters share the advance of their base letter
fn base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        _ => return None,
    };
    Some(base)
}

/// Advance width of one character in 1/1000 em
pub fn char_width(ch: char, weight: FontWeight) -> u16 {
    let table = match weight {
        FontWeight::Regular => &HELVETICA,
        FontWeight::Bold => &HELVETICA_BOLD,
    };
    let lookup = |c: char| table[(c as u32 - 0x20) as usize];

    match ch {
        ' '..='~' => lookup(ch),
        '\t' => lookup(' '),
        '¹' | '²' | '³' => 333,
        'º' => 365,
        'ª' => 370,
        '°' => 400,
        '–' => 556,
        '—' | '…' => 1000,
        '•' => 350,
        '\u{2018}' | '\u{2019}' | '‚' => 278,
        '\u{201C}' | '\u{201D}' | '„' => 500,
        _ => base_letter(ch).map(lookup).unwrap_or(556),
    }
}

/// Width of a single line of text in millimetres
pub fn text_width(text: &str, weight: FontWeight, size_pt: f64) -> f64 {
    let units: u32 = text.chars().map(|ch| char_width(ch, weight) as u32).sum();
    units as f64 / 1000.0 * size_pt / POINTS_PER_MM
}

/// Vertical advance of one line in millimetres
pub fn line_height(size_pt: f64) -> f64 {
    size_pt * LINE_HEIGHT_FACTOR / POINTS_PER_MM
}

/// Distance from the top of a line box to its baseline, in millimetres
/// (Helvetica ascender is 718/1000 em)
pub fn ascent(size_pt: f64) -> f64 {
    size_pt * 0.718 / POINTS_PER_MM
}

/// Greedy word wrap. Explicit newlines always break; a word wider than the
/// line is broken between characters. Always returns at least one line.
pub fn split_to_width(text: &str, max_width: f64, weight: FontWeight, size_pt: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let space = text_width(" ", weight, size_pt);

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = text_width(word, weight, size_pt);

            if !current.is_empty() && current_width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if word_width <= max_width {
                current.push_str(word);
                current_width = word_width;
            } else {
                // Hard-break an oversized word
                let mut chunk = String::new();
                let mut chunk_width = 0.0;
                for ch in word.chars() {
                    let w = char_width(ch, weight) as f64 / 1000.0 * size_pt / POINTS_PER_MM;
                    if !chunk.is_empty() && chunk_width + w > max_width {
                        lines.push(std::mem::take(&mut chunk));
                        chunk_width = 0.0;
                    }
                    chunk.push(ch);
                    chunk_width += w;
                }
                current = chunk;
                current_width = chunk_width;
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(char_width('A', FontWeight::Regular), 667);
        assert_eq!(char_width('A', FontWeight::Bold), 722);
        assert_eq!(char_width('i', FontWeight::Regular), 222);
        assert_eq!(char_width('~', FontWeight::Bold), 584);
    }

    #[test]
    fn test_accents_use_base_letter() {
        assert_eq!(char_width('ç', FontWeight::Regular), char_width('c', FontWeight::Regular));
        assert_eq!(char_width('Ã', FontWeight::Bold), char_width('A', FontWeight::Bold));
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let small = text_width("Disjuntor", FontWeight::Regular, 10.0);
        let large = text_width("Disjuntor", FontWeight::Regular, 20.0);
        assert!((large - 2.0 * small).abs() < 1e-9);
    }

    #[test]
    fn test_split_wraps_words() {
        let width = text_width("Tomadas cozinha", FontWeight::Regular, 10.0) + 0.01;
        let lines = split_to_width("Tomadas cozinha e lavanderia", width, FontWeight::Regular, 10.0);
        assert_eq!(lines, vec!["Tomadas cozinha".to_string(), "e lavanderia".to_string()]);
    }

    #[test]
    fn test_split_respects_newlines_and_empty() {
        let lines = split_to_width("a\nb", 100.0, FontWeight::Regular, 10.0);
        assert_eq!(lines, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(split_to_width("", 100.0, FontWeight::Regular, 10.0), vec![String::new()]);
    }

    #[test]
    fn test_split_breaks_oversized_word() {
        let lines = split_to_width("AAAAAAAAAA", text_width("AAA", FontWeight::Regular, 10.0), FontWeight::Regular, 10.0);
        assert!(lines.len() >= 3);
        assert_eq!(lines.concat(), "AAAAAAAAAA");
    }
}
