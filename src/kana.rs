//! Character classes and syllable splitting for Japanese text.

/// Geminate markers (sokuon).
pub const GEMINATE: [char; 2] = ['っ', 'ッ'];

/// Moraic nasals (hatsuon).
pub const NASAL: [char; 2] = ['ん', 'ン'];

/// Small kana and the long-vowel mark: never a syllable of their own.
const DEPENDENT: [char; 17] = [
    'ゃ', 'ゅ', 'ょ', 'ぁ', 'ぃ', 'ぅ', 'ぇ', 'ぉ', 'ー', 'ャ', 'ュ', 'ョ', 'ァ', 'ィ', 'ゥ', 'ェ', 'ォ',
];

/// Circled-number glyphs used as singer/part markers. They look numeric but are never numerals.
pub const CIRCLED_NUMBERS: [char; 30] = [
    '①', '②', '③', '④', '⑤', '⑥', '⑦', '⑧', '⑨', '⑩', '⑪', '⑫', '⑬', '⑭', '⑮', '⑯', '⑰', '⑱',
    '⑲', '⑳', '㉑', '㉒', '㉓', '㉔', '㉕', '㉖', '㉗', '㉘', '㉙', '㉚',
];

pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// True when every character is kana. The middle dot and double hyphen are punctuation.
pub fn is_kana(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| (is_hiragana(c) || is_katakana(c)) && c != '・' && c != '゠')
}

/// True for a non-empty run of ASCII letters.
pub fn is_latin(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn is_circled_number(c: char) -> bool {
    CIRCLED_NUMBERS.contains(&c)
}

pub fn ends_with_geminate(text: &str) -> bool {
    text.chars().last().is_some_and(|c| GEMINATE.contains(&c))
}

/// Split text into syllable units.
///
/// Small kana and `ー` attach to the preceding unit. Geminates attach unless `sokuon_split`,
/// nasals attach unless `hatsuon_split`. A dependent character at the very start opens its own
/// unit. Every other character is a unit of its own.
pub fn split_syllables(text: &str, sokuon_split: bool, hatsuon_split: bool) -> Vec<String> {
    let mut units: Vec<String> = Vec::new();
    for c in text.chars() {
        let dependent = DEPENDENT.contains(&c)
            || (!sokuon_split && GEMINATE.contains(&c))
            || (!hatsuon_split && NASAL.contains(&c));
        match units.last_mut() {
            Some(last) if dependent => last.push(c),
            _ => units.push(c.to_string()),
        }
    }
    units
}
