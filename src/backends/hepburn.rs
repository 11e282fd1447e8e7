use crate::backend::Romanizer;

/// Table-driven kana to Hepburn transliteration.
///
/// Handles hiragana and katakana, small-kana digraphs (including extended katakana such as
/// ファ and ティ), the long-vowel mark and mid-word geminates. Characters that are not kana pass
/// through lowercased. A trailing geminate produces nothing; callers resolve it against the
/// following syllable.
#[derive(Debug, Default, Clone, Copy)]
pub struct HepburnRomanizer;

impl HepburnRomanizer {
    pub fn new() -> Self {
        Self
    }
}

impl Romanizer for HepburnRomanizer {
    fn romanize(&self, kana: &str) -> String {
        let mut syllables: Vec<String> = Vec::new();
        let mut pending_geminate = false;

        for c in kana.chars().map(to_hiragana) {
            match c {
                'っ' => pending_geminate = true,
                'ゃ' | 'ゅ' | 'ょ' => {
                    let vowel = small_vowel(c);
                    match syllables.last_mut() {
                        Some(prev) if prev.len() > 1 && prev.ends_with('i') => {
                            prev.pop();
                            if !(prev.ends_with("sh") || prev.ends_with("ch") || prev.ends_with('j'))
                            {
                                prev.push('y');
                            }
                            prev.push(vowel);
                        }
                        _ => syllables.push(format!("y{vowel}")),
                    }
                }
                'ぁ' | 'ぃ' | 'ぅ' | 'ぇ' | 'ぉ' => {
                    let vowel = small_vowel(c);
                    match syllables.last_mut() {
                        Some(prev) if prev.as_str() == "u" => *prev = format!("w{vowel}"),
                        Some(prev) if prev.as_str() == "i" => *prev = format!("y{vowel}"),
                        Some(prev) if prev.len() > 1 && prev.ends_with(is_vowel) => {
                            prev.pop();
                            prev.push(vowel);
                        }
                        _ => syllables.push(vowel.to_string()),
                    }
                }
                'ー' => {
                    let last_vowel = syllables
                        .last()
                        .and_then(|prev| prev.chars().last())
                        .filter(|&v| is_vowel(v));
                    if let Some(v) = last_vowel {
                        syllables.push(v.to_string());
                    }
                }
                _ => {
                    let syllable = match kana_syllable(c) {
                        Some(s) => s.to_string(),
                        None => c.to_lowercase().collect(),
                    };
                    let syllable = if pending_geminate {
                        pending_geminate = false;
                        geminate(&syllable)
                    } else {
                        syllable
                    };
                    syllables.push(syllable);
                }
            }
        }

        syllables.concat()
    }
}

/// Double the onset consonant; `ch` doubles as `tch`.
fn geminate(syllable: &str) -> String {
    if syllable.starts_with("ch") {
        return format!("t{syllable}");
    }
    match syllable.chars().next() {
        Some(c) if c.is_ascii_alphabetic() && !is_vowel(c) && c != 'n' => format!("{c}{syllable}"),
        _ => syllable.to_string(),
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'i' | 'u' | 'e' | 'o')
}

fn to_hiragana(c: char) -> char {
    match c {
        'ァ'..='ヶ' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
        _ => c,
    }
}

fn small_vowel(c: char) -> char {
    match c {
        'ぁ' | 'ゃ' => 'a',
        'ぃ' => 'i',
        'ぅ' | 'ゅ' => 'u',
        'ぇ' => 'e',
        _ => 'o',
    }
}

fn kana_syllable(c: char) -> Option<&'static str> {
    let s = match c {
        'あ' => "a",
        'い' => "i",
        'う' => "u",
        'え' => "e",
        'お' => "o",
        'か' | 'ゕ' => "ka",
        'き' => "ki",
        'く' => "ku",
        'け' | 'ゖ' => "ke",
        'こ' => "ko",
        'が' => "ga",
        'ぎ' => "gi",
        'ぐ' => "gu",
        'げ' => "ge",
        'ご' => "go",
        'さ' => "sa",
        'し' => "shi",
        'す' => "su",
        'せ' => "se",
        'そ' => "so",
        'ざ' => "za",
        'じ' | 'ぢ' => "ji",
        'ず' | 'づ' => "zu",
        'ぜ' => "ze",
        'ぞ' => "zo",
        'た' => "ta",
        'ち' => "chi",
        'つ' => "tsu",
        'て' => "te",
        'と' => "to",
        'だ' => "da",
        'で' => "de",
        'ど' => "do",
        'な' => "na",
        'に' => "ni",
        'ぬ' => "nu",
        'ね' => "ne",
        'の' => "no",
        'は' => "ha",
        'ひ' => "hi",
        'ふ' => "fu",
        'へ' => "he",
        'ほ' => "ho",
        'ば' => "ba",
        'び' => "bi",
        'ぶ' => "bu",
        'べ' => "be",
        'ぼ' => "bo",
        'ぱ' => "pa",
        'ぴ' => "pi",
        'ぷ' => "pu",
        'ぺ' => "pe",
        'ぽ' => "po",
        'ま' => "ma",
        'み' => "mi",
        'む' => "mu",
        'め' => "me",
        'も' => "mo",
        'や' => "ya",
        'ゆ' => "yu",
        'よ' => "yo",
        'ら' => "ra",
        'り' => "ri",
        'る' => "ru",
        'れ' => "re",
        'ろ' => "ro",
        'わ' | 'ゎ' => "wa",
        'ゐ' => "i",
        'ゑ' => "e",
        'を' => "o",
        'ん' => "n",
        'ゔ' => "vu",
        _ => return None,
    };
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn romanize(kana: &str) -> String {
        HepburnRomanizer.romanize(kana)
    }

    #[test]
    fn plain_kana() {
        assert_eq!(romanize("はば"), "haba");
        assert_eq!(romanize("むものは"), "mumonoha");
        assert_eq!(romanize("カタカナ"), "katakana");
        assert_eq!(romanize("しちつふ"), "shichitsufu");
    }

    #[test]
    fn digraphs() {
        assert_eq!(romanize("きょう"), "kyou");
        assert_eq!(romanize("しゃ"), "sha");
        assert_eq!(romanize("ちょ"), "cho");
        assert_eq!(romanize("じゅ"), "ju");
        assert_eq!(romanize("ファ"), "fa");
        assert_eq!(romanize("ティ"), "ti");
        assert_eq!(romanize("ウィ"), "wi");
        assert_eq!(romanize("ヴァ"), "va");
    }

    #[test]
    fn long_vowels_and_geminates() {
        assert_eq!(romanize("ラーメン"), "raamen");
        assert_eq!(romanize("かった"), "katta");
        assert_eq!(romanize("マッチ"), "matchi");
        assert_eq!(romanize("かっ"), "ka");
    }

    #[test]
    fn non_kana_pass_through_lowercased() {
        assert_eq!(romanize("A"), "a");
        assert_eq!(romanize(""), "");
    }
}
