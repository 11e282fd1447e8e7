use crate::backend::Hyphenator;

/// Consonant pairs that open a syllable together.
const ONSET_DIGRAPHS: [&str; 5] = ["ch", "sh", "th", "ph", "wh"];

/// Consonant pairs that close a syllable together.
const CODA_DIGRAPHS: [&str; 2] = ["ck", "ng"];

/// A deterministic orthographic syllabifier for English words.
///
/// Vowel groups are syllable nuclei (`y` counts as a vowel except word-initially, and a silent
/// final `e` does not count). A single consonant between nuclei opens the next syllable; in a
/// cluster the first consonant closes the previous one. Words of three letters or fewer are
/// never split.
#[derive(Debug, Default, Clone, Copy)]
pub struct VowelGroupHyphenator;

impl VowelGroupHyphenator {
    pub fn new() -> Self {
        Self
    }
}

impl Hyphenator for VowelGroupHyphenator {
    fn syllabify(&self, word: &str) -> Vec<String> {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() <= 3 {
            return vec![word.to_string()];
        }

        let lower: Vec<char> = chars.iter().map(|c| c.to_ascii_lowercase()).collect();
        let mut vowel: Vec<bool> = lower
            .iter()
            .enumerate()
            .map(|(i, &c)| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u') || (c == 'y' && i > 0))
            .collect();

        let last = lower.len() - 1;
        if lower[last] == 'e' && !vowel[last - 1] && vowel[..last - 1].iter().any(|&v| v) {
            vowel[last] = false;
        }

        // (start, end) of each maximal vowel run, end exclusive.
        let mut groups: Vec<(usize, usize)> = Vec::new();
        for (i, &is_vowel) in vowel.iter().enumerate() {
            if !is_vowel {
                continue;
            }
            match groups.last_mut() {
                Some((_, end)) if *end == i => *end = i + 1,
                _ => groups.push((i, i + 1)),
            }
        }
        if groups.len() < 2 {
            return vec![word.to_string()];
        }

        let mut cuts = Vec::with_capacity(groups.len() - 1);
        for pair in groups.windows(2) {
            let (prev_end, next_start) = (pair[0].1, pair[1].0);
            let consonants = next_start - prev_end;
            let cut = if consonants <= 1 {
                prev_end
            } else {
                let head: String = lower[prev_end..prev_end + 2].iter().collect();
                if ONSET_DIGRAPHS.contains(&head.as_str()) {
                    prev_end
                } else if CODA_DIGRAPHS.contains(&head.as_str()) {
                    prev_end + 2
                } else {
                    prev_end + 1
                }
            };
            cuts.push(cut);
        }

        let mut syllables = Vec::with_capacity(cuts.len() + 1);
        let mut start = 0;
        for cut in cuts {
            if cut > start && cut < chars.len() {
                syllables.push(chars[start..cut].iter().collect());
                start = cut;
            }
        }
        syllables.push(chars[start..].iter().collect());
        syllables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syllabify(word: &str) -> Vec<String> {
        VowelGroupHyphenator.syllabify(word)
    }

    #[test]
    fn splits_between_vowel_groups() {
        assert_eq!(syllabify("music"), vec!["mu", "sic"]);
        assert_eq!(syllabify("wonderful"), vec!["won", "der", "ful"]);
        assert_eq!(syllabify("Extra"), vec!["Ex", "tra"]);
    }

    #[test]
    fn digraphs_stay_together() {
        assert_eq!(syllabify("mother"), vec!["mo", "ther"]);
        assert_eq!(syllabify("singer"), vec!["sing", "er"]);
    }

    #[test]
    fn silent_e_and_short_words_are_single_syllables() {
        assert_eq!(syllabify("love"), vec!["love"]);
        assert_eq!(syllabify("more"), vec!["more"]);
        assert_eq!(syllabify("you"), vec!["you"]);
        assert_eq!(syllabify("jump"), vec!["jump"]);
    }

    #[test]
    fn syllables_spell_the_word() {
        for word in ["happiness", "don't", "Everything", "rhythm", "yesterday"] {
            assert_eq!(syllabify(word).concat(), word);
        }
    }
}
