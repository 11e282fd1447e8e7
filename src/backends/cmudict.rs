use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::Result;
use crate::backend::PronouncingDictionary;

/// Entries for every word the numeral expander can produce.
const NUMBER_WORDS: &str = "\
ZERO  Z IH1 R OW0
ONE  W AH1 N
TWO  T UW1
THREE  TH R IY1
FOUR  F AO1 R
FIVE  F AY1 V
SIX  S IH1 K S
SEVEN  S EH1 V AH0 N
EIGHT  EY1 T
NINE  N AY1 N
TEN  T EH1 N
ELEVEN  IH0 L EH1 V AH0 N
TWELVE  T W EH1 L V
THIRTEEN  TH ER1 T IY1 N
FOURTEEN  F AO1 R T IY1 N
FIFTEEN  F IH0 F T IY1 N
SIXTEEN  S IH0 K S T IY1 N
SEVENTEEN  S EH1 V AH0 N T IY1 N
EIGHTEEN  EY0 T IY1 N
NINETEEN  N AY1 N T IY1 N
TWENTY  T W EH1 N T IY0
THIRTY  TH ER1 D IY0
FORTY  F AO1 R T IY0
FIFTY  F IH1 F T IY0
SIXTY  S IH1 K S T IY0
SEVENTY  S EH1 V AH0 N T IY0
EIGHTY  EY1 T IY0
NINETY  N AY1 N T IY0
HUNDRED  HH AH1 N D R AH0 D
THOUSAND  TH AW1 Z AH0 N D
MILLION  M IH1 L Y AH0 N
BILLION  B IH1 L Y AH0 N
TRILLION  T R IH1 L Y AH0 N
AND  AH0 N D
MINUS  M AY1 N AH0 S
POINT  P OY1 N T
";

/// An in-memory CMU pronouncing dictionary.
///
/// Only the first pronunciation of each word is kept; `WORD(1)` style alternates are skipped.
#[derive(Debug, Default, Clone)]
pub struct CmuDict {
    entries: HashMap<String, Vec<String>>,
}

impl CmuDict {
    /// A dictionary that only knows the English number words.
    pub fn builtin() -> Self {
        let mut dict = Self::default();
        dict.merge_text(NUMBER_WORDS);
        dict
    }

    /// Parse a dictionary in CMU text format.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut dict = Self::default();
        for line in BufReader::new(reader).lines() {
            dict.insert_line(&line?);
        }
        Ok(dict)
    }

    /// Load a dictionary file and add the built-in number words it lacks.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let mut dict = Self::from_reader(file)?;
        dict.merge_text(NUMBER_WORDS);
        Ok(dict)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn merge_text(&mut self, text: &str) {
        for line in text.lines() {
            self.insert_line(line);
        }
    }

    fn insert_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with(";;;") {
            return;
        }

        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return;
        };
        if word.ends_with(')') {
            return;
        }

        let phonemes: Vec<String> = parts.map(str::to_string).collect();
        if phonemes.is_empty() {
            return;
        }
        self.entries
            .entry(word.to_lowercase())
            .or_insert(phonemes);
    }
}

impl PronouncingDictionary for CmuDict {
    fn lookup(&self, word: &str) -> Option<Vec<String>> {
        self.entries.get(&word.to_lowercase()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_and_skips_comments_and_alternates() -> anyhow::Result<()> {
        let text = ";;; comment\nLOVE  L AH1 V\nLOVE(1)  L OW1 V\nDON'T  D OW1 N T\n";
        let dict = CmuDict::from_reader(text.as_bytes())?;
        assert_eq!(dict.len(), 2);
        assert_eq!(
            dict.lookup("love"),
            Some(vec!["L".to_string(), "AH1".to_string(), "V".to_string()])
        );
        assert!(dict.lookup("Don't").is_some());
        assert_eq!(dict.lookup("hate"), None);
        Ok(())
    }

    #[test]
    fn builtin_covers_number_words() {
        let dict = CmuDict::builtin();
        for word in ["zero", "seventeen", "ninety", "hundred", "trillion", "and", "minus", "point"] {
            assert!(dict.lookup(word).is_some(), "missing {word}");
        }
    }
}
