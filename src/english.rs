//! English word syllabification and romanized pronunciation.
//!
//! Orthographic syllables come from a [`Hyphenator`]; phonemes come from a
//! [`PronouncingDictionary`] and are grouped into syllables around their vowels, then mapped
//! to a Japanese-friendly romanization.

use tracing::warn;

use crate::backend::{Hyphenator, PronouncingDictionary};

const VOWELS: [&str; 15] = [
    "AA", "AE", "AH", "AO", "AW", "AY", "EH", "ER", "EY", "IH", "IY", "OW", "OY", "UH", "UW",
];

/// Drop the ARPAbet stress digit.
fn base_phoneme(ph: &str) -> &str {
    ph.trim_end_matches(['0', '1', '2'])
}

fn is_vowel(ph: &str) -> bool {
    VOWELS.contains(&base_phoneme(ph))
}

/// Romanization of one phoneme. Unknown phonemes map to nothing.
pub fn romanize_phoneme(ph: &str) -> &'static str {
    match base_phoneme(ph) {
        "AA" | "AE" | "AH" | "ER" => "a",
        "AO" | "OW" => "o",
        "AW" => "au",
        "AY" => "ai",
        "B" => "b",
        "CH" => "ch",
        "D" => "d",
        "DH" | "Z" => "z",
        "EH" => "e",
        "EY" => "ei",
        "F" => "f",
        "G" => "g",
        "HH" => "h",
        "IH" | "IY" => "i",
        "JH" | "ZH" => "j",
        "K" => "k",
        "L" | "R" => "r",
        "M" => "m",
        "N" => "n",
        "NG" => "ng",
        "OY" => "oi",
        "P" => "p",
        "S" | "TH" => "s",
        "SH" => "sh",
        "T" => "t",
        "UH" | "UW" => "u",
        "V" => "v",
        "W" => "w",
        "Y" => "y",
        _ => "",
    }
}

/// Group phonemes into syllables, one per vowel.
///
/// Consonants before the first vowel open the first syllable and consonants after the last
/// vowel close the last one. Between two vowels a lone consonant opens the next syllable; in a
/// cluster the first consonant closes the previous syllable and the rest open the next.
pub fn split_phoneme_syllables<S: AsRef<str>>(phonemes: &[S]) -> Vec<Vec<String>> {
    let owned: Vec<String> = phonemes.iter().map(|p| p.as_ref().to_string()).collect();
    let vowel_positions: Vec<usize> = owned
        .iter()
        .enumerate()
        .filter(|(_, ph)| is_vowel(ph))
        .map(|(i, _)| i)
        .collect();

    let Some(&first) = vowel_positions.first() else {
        return vec![owned];
    };

    let mut syllables: Vec<Vec<String>> = vec![owned[..=first].to_vec()];
    let mut prev = first;

    for &vowel in &vowel_positions[1..] {
        let consonants = &owned[prev + 1..vowel];
        let mut onset_start = 0;
        if consonants.len() > 1 {
            if let Some(last) = syllables.last_mut() {
                last.push(consonants[0].clone());
            }
            onset_start = 1;
        }
        let mut syllable = consonants[onset_start..].to_vec();
        syllable.push(owned[vowel].clone());
        syllables.push(syllable);
        prev = vowel;
    }

    if prev + 1 < owned.len() {
        if let Some(last) = syllables.last_mut() {
            last.extend_from_slice(&owned[prev + 1..]);
        }
    }

    syllables
}

/// Pair surface syllables with pronunciation syllables.
///
/// Equal counts zip directly. Otherwise the longer list is merged into as many groups as the
/// shorter one has, with the remainder going to the trailing groups.
pub fn align_syllables(surface: &[String], pronunciation: &[String]) -> Vec<(String, String)> {
    use std::cmp::Ordering;

    match surface.len().cmp(&pronunciation.len()) {
        Ordering::Equal => surface
            .iter()
            .cloned()
            .zip(pronunciation.iter().cloned())
            .collect(),
        Ordering::Greater => {
            warn!(
                word = %surface.concat(),
                surface = surface.len(),
                pronunciation = pronunciation.len(),
                "syllable counts differ; merging surface syllables"
            );
            merge_evenly(surface, pronunciation.len())
                .into_iter()
                .zip(pronunciation.iter().cloned())
                .collect()
        }
        Ordering::Less => {
            warn!(
                word = %surface.concat(),
                surface = surface.len(),
                pronunciation = pronunciation.len(),
                "syllable counts differ; merging pronunciation syllables"
            );
            surface
                .iter()
                .cloned()
                .zip(merge_evenly(pronunciation, surface.len()))
                .collect()
        }
    }
}

/// Concatenate `items` into `groups` contiguous groups, sized as evenly as possible.
fn merge_evenly(items: &[String], groups: usize) -> Vec<String> {
    if groups == 0 {
        return Vec::new();
    }
    let base = items.len() / groups;
    let extra = items.len() % groups;

    let mut merged = Vec::with_capacity(groups);
    let mut start = 0;
    for i in 0..groups {
        let size = base + usize::from(i >= groups - extra);
        merged.push(items[start..start + size].concat());
        start += size;
    }
    merged
}

/// Syllabifies and pronounces English words.
pub struct WordPhonetics<'a> {
    dictionary: &'a dyn PronouncingDictionary,
    hyphenator: &'a dyn Hyphenator,
}

impl<'a> WordPhonetics<'a> {
    pub fn new(dictionary: &'a dyn PronouncingDictionary, hyphenator: &'a dyn Hyphenator) -> Self {
        Self {
            dictionary,
            hyphenator,
        }
    }

    /// `(surface syllable, pronunciation syllable)` pairs for one word.
    pub fn syllables(&self, word: &str) -> Vec<(String, String)> {
        if let Some(fixed) = fixed_reading(word) {
            return vec![(word.to_string(), fixed.to_string())];
        }

        let surface = self.surface_syllables(word);
        match self.romanized_syllables(word) {
            Some(pronunciation) => align_syllables(&surface, &pronunciation),
            None => {
                warn!(word, "word not in the pronouncing dictionary; reading it as spelled");
                surface
                    .iter()
                    .map(|syl| (syl.clone(), spelled_reading(syl)))
                    .collect()
            }
        }
    }

    /// The whole word's pronunciation, without a surface split.
    pub fn pronounce(&self, word: &str) -> String {
        if let Some(fixed) = fixed_reading(word) {
            return fixed.to_string();
        }

        match self.romanized_syllables(word) {
            Some(syllables) => syllables.concat(),
            None => {
                warn!(word, "word not in the pronouncing dictionary; reading it as spelled");
                self.surface_syllables(word)
                    .iter()
                    .map(|syl| spelled_reading(syl))
                    .collect()
            }
        }
    }

    fn surface_syllables(&self, word: &str) -> Vec<String> {
        let syllables = self.hyphenator.syllabify(word);
        if syllables.is_empty() {
            vec![word.to_string()]
        } else {
            syllables
        }
    }

    fn romanized_syllables(&self, word: &str) -> Option<Vec<String>> {
        let phonemes = self.dictionary.lookup(&word.to_lowercase())?;
        Some(
            split_phoneme_syllables(&phonemes)
                .iter()
                .map(|syl| syl.iter().map(|ph| romanize_phoneme(ph)).collect())
                .collect(),
        )
    }
}

/// The indefinite article is read as written; a capital `A` is read as the letter name.
fn fixed_reading(word: &str) -> Option<&'static str> {
    match word {
        "a" => Some("a"),
        "A" => Some("ei"),
        _ => None,
    }
}

fn spelled_reading(syllable: &str) -> String {
    syllable.replace('\'', "").to_lowercase()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct Dict(HashMap<&'static str, &'static str>);

    impl PronouncingDictionary for Dict {
        fn lookup(&self, word: &str) -> Option<Vec<String>> {
            self.0
                .get(word)
                .map(|p| p.split_whitespace().map(str::to_string).collect())
        }
    }

    struct Hyphens(HashMap<&'static str, &'static [&'static str]>);

    impl Hyphenator for Hyphens {
        fn syllabify(&self, word: &str) -> Vec<String> {
            match self.0.get(word) {
                Some(parts) => parts.iter().map(|p| p.to_string()).collect(),
                None => vec![word.to_string()],
            }
        }
    }

    fn fixtures() -> (Dict, Hyphens) {
        let dict = Dict(HashMap::from([
            ("love", "L AH1 V"),
            ("music", "M Y UW1 Z IH0 K"),
            ("extra", "EH1 K S T R AH0"),
            ("jump", "JH AH1 M P"),
        ]));
        let hyphens = Hyphens(HashMap::from([
            ("music", &["mu", "sic"][..]),
            ("extra", &["ex", "tra"][..]),
            ("wonderful", &["won", "der", "ful"][..]),
        ]));
        (dict, hyphens)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_phonemes_with_maximal_onset() {
        let syllables = split_phoneme_syllables(&["M", "Y", "UW1", "Z", "IH0", "K"]);
        assert_eq!(
            syllables,
            vec![strings(&["M", "Y", "UW1"]), strings(&["Z", "IH0", "K"])]
        );

        let syllables = split_phoneme_syllables(&["EH1", "K", "S", "T", "R", "AH0"]);
        assert_eq!(
            syllables,
            vec![strings(&["EH1", "K"]), strings(&["S", "T", "R", "AH0"])]
        );
    }

    #[test]
    fn vowelless_phonemes_form_one_syllable() {
        assert_eq!(
            split_phoneme_syllables(&["HH", "M"]),
            vec![strings(&["HH", "M"])]
        );
    }

    #[test]
    fn phoneme_map_strips_stress_and_drops_unknowns() {
        assert_eq!(romanize_phoneme("AY1"), "ai");
        assert_eq!(romanize_phoneme("L"), "r");
        assert_eq!(romanize_phoneme("XX"), "");
    }

    #[test]
    fn dictionary_word_pairs_surface_with_pronunciation() {
        let (dict, hyphens) = fixtures();
        let phonetics = WordPhonetics::new(&dict, &hyphens);
        assert_eq!(
            phonetics.syllables("Music"),
            vec![("Music".to_string(), "myuzik".to_string())]
        );
        assert_eq!(
            phonetics.syllables("extra"),
            vec![
                ("ex".to_string(), "ek".to_string()),
                ("tra".to_string(), "stra".to_string())
            ]
        );
    }

    #[test]
    fn syllabification_is_deterministic() {
        let (dict, hyphens) = fixtures();
        let phonetics = WordPhonetics::new(&dict, &hyphens);
        let first = phonetics.syllables("extra");
        for _ in 0..3 {
            assert_eq!(phonetics.syllables("extra"), first);
        }
    }

    #[test]
    fn unknown_word_falls_back_to_spelling() {
        let (dict, hyphens) = fixtures();
        let phonetics = WordPhonetics::new(&dict, &hyphens);
        assert_eq!(
            phonetics.syllables("wonderful"),
            vec![
                ("won".to_string(), "won".to_string()),
                ("der".to_string(), "der".to_string()),
                ("ful".to_string(), "ful".to_string())
            ]
        );
        assert_eq!(phonetics.pronounce("Don't"), "dont");
    }

    #[test]
    fn article_readings_are_fixed() {
        let (dict, hyphens) = fixtures();
        let phonetics = WordPhonetics::new(&dict, &hyphens);
        assert_eq!(
            phonetics.syllables("A"),
            vec![("A".to_string(), "ei".to_string())]
        );
        assert_eq!(phonetics.pronounce("a"), "a");
    }

    #[test]
    fn mismatched_counts_merge_toward_the_tail() {
        let merged = align_syllables(
            &strings(&["a", "b", "c", "d", "e"]),
            &strings(&["x", "y"]),
        );
        assert_eq!(
            merged,
            vec![
                ("ab".to_string(), "x".to_string()),
                ("cde".to_string(), "y".to_string())
            ]
        );

        let merged = align_syllables(&strings(&["mu"]), &strings(&["x", "y", "z"]));
        assert_eq!(merged, vec![("mu".to_string(), "xyz".to_string())]);
    }
}
