//! Helvetica metrics and WinAnsi encoding
//!
//! Widths are the standard Helvetica AFM advances in 1/1000 em, enough to
//! centre text without loading a font program.

/// Advance widths for codes 32..=126
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0 - 9
    278, 278, 584, 584, 584, 556, 1015, // : - @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A - M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N - Z
    278, 278, 278, 469, 556, 333, // [ - `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a - m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n - z
    334, 260, 334, 584, // { - ~
];

/// Advance widths for codes 0x80..=0xFF; unassigned codes use the default
const HIGH_WIDTHS: [u16; 128] = [
    556, 556, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 556, 611, 556, // 0x80
    556, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 556, 500, 667, // 0x90
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 0xF0
];

/// Width used for control codes
const DEFAULT_WIDTH: u16 = 556;

/// Advance width of one WinAnsi code in 1/1000 em
pub fn code_width(code: u8) -> u16 {
    match code {
        32..=126 => ASCII_WIDTHS[(code - 32) as usize],
        0x80..=0xFF => HIGH_WIDTHS[(code - 0x80) as usize],
        _ => DEFAULT_WIDTH,
    }
}

/// Encode text as WinAnsi; characters outside the code page become `?`
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        })
        .collect()
}

/// Width of `text` in points when set in Helvetica at `font_size`
pub fn text_width(text: &str, font_size: f64) -> f64 {
    let units: u32 = to_win_ansi(text)
        .into_iter()
        .map(|code| code_width(code) as u32)
        .sum();
    units as f64 * font_size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(code_width(b' '), 278);
        assert_eq!(code_width(b'A'), 667);
        assert_eq!(code_width(b'W'), 944);
        assert_eq!(code_width(b'i'), 222);
        assert_eq!(code_width(b'~'), 584);
    }

    #[test]
    fn test_accented_capitals_are_wider() {
        assert_eq!(code_width(0xC9), 667); // É
        assert_eq!(code_width(0xC0), 667); // À
        assert_eq!(code_width(0xC7), 722); // Ç
        assert_eq!(code_width(0xD6), 778); // Ö
        assert_eq!(text_width("Éé", 1000.0), 1223.0);
    }

    #[test]
    fn test_windows_punctuation_widths() {
        assert_eq!(code_width(0x85), 1000); // ellipsis
        assert_eq!(code_width(0x91), 222);
        assert_eq!(code_width(0x95), 350);
        assert_eq!(code_width(0x99), 1000); // trademark
        assert_eq!(code_width(0xA0), 278);
        // Œ u v r e ™
        assert_eq!(text_width("Œuvre™", 1000.0), 3945.0);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        // H = 722, i = 222
        assert_eq!(text_width("Hi", 1000.0), 944.0);
        assert_eq!(text_width("Hi", 12.0), 944.0 * 12.0 / 1000.0);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(to_win_ansi("• café"), vec![0x95, b' ', b'c', b'a', b'f', 0xE9]);
        assert_eq!(to_win_ansi("日本"), b"??".to_vec());
        assert_eq!(to_win_ansi("Š™"), vec![0x8A, 0x99]);
    }

    #[test]
    fn test_empty_text_has_no_width() {
        assert_eq!(text_width("", 24.0), 0.0);
    }
}
