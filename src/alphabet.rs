//! Letter inventory used to name segmented glyphs.
//!
//! Identity is positional: the n-th region in reading order becomes the n-th
//! letter of the alphabet. The alphabet is passed to the segmenter explicitly so
//! callers (and tests) can supply a different one.

use crate::error::{HandfontError, HandfontResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letter {
    pub name: String,
    pub codepoint: char,
}

impl Letter {
    pub fn new(name: impl Into<String>, codepoint: char) -> Self {
        Self {
            name: name.into(),
            codepoint,
        }
    }

    /// Output file name for this letter at position `index`, e.g. `00_alef.png`.
    pub fn file_name(&self, index: usize, extension: &str) -> String {
        format!("{:02}_{}.{}", index, self.name, extension)
    }
}

/// Hebrew consonants in sheet order, followed by the five final forms.
const HEBREW: [(&str, char); 27] = [
    ("alef", '\u{05D0}'),
    ("bet", '\u{05D1}'),
    ("gimel", '\u{05D2}'),
    ("dalet", '\u{05D3}'),
    ("he", '\u{05D4}'),
    ("vav", '\u{05D5}'),
    ("zayin", '\u{05D6}'),
    ("het", '\u{05D7}'),
    ("tet", '\u{05D8}'),
    ("yod", '\u{05D9}'),
    ("kaf", '\u{05DB}'),
    ("lamed", '\u{05DC}'),
    ("mem", '\u{05DE}'),
    ("nun", '\u{05E0}'),
    ("samekh", '\u{05E1}'),
    ("ayin", '\u{05E2}'),
    ("pe", '\u{05E4}'),
    ("tsadi", '\u{05E6}'),
    ("qof", '\u{05E7}'),
    ("resh", '\u{05E8}'),
    ("shin", '\u{05E9}'),
    ("tav", '\u{05EA}'),
    ("final_kaf", '\u{05DA}'),
    ("final_mem", '\u{05DD}'),
    ("final_nun", '\u{05DF}'),
    ("final_pe", '\u{05E3}'),
    ("final_tsadi", '\u{05E5}'),
];

/// Fixed, ordered letter sequence. Never reordered after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterAlphabet {
    letters: Vec<Letter>,
}

impl LetterAlphabet {
    pub const HEBREW_LEN: usize = 27;

    /// The 27-letter Hebrew inventory including final forms.
    pub fn hebrew() -> Self {
        Self {
            letters: HEBREW
                .iter()
                .map(|(name, cp)| Letter::new(*name, *cp))
                .collect(),
        }
    }

    /// Build a custom alphabet. Names must be non-empty, unique, and usable in
    /// file names.
    pub fn new(letters: Vec<Letter>) -> HandfontResult<Self> {
        if letters.is_empty() {
            return Err(HandfontError::config("alphabet must contain at least one letter"));
        }
        for (i, letter) in letters.iter().enumerate() {
            if letter.name.is_empty()
                || letter.name.contains(|c: char| c == '/' || c == '\\' || c == '.')
            {
                return Err(HandfontError::config(format!(
                    "letter name {:?} cannot be used in a file name",
                    letter.name
                )));
            }
            if letters[..i].iter().any(|l| l.name == letter.name) {
                return Err(HandfontError::config(format!(
                    "duplicate letter name {:?}",
                    letter.name
                )));
            }
        }
        Ok(Self { letters })
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Letter> {
        self.letters.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Letter> {
        self.letters.iter()
    }

    pub fn by_name(&self, name: &str) -> Option<&Letter> {
        self.letters.iter().find(|l| l.name == name)
    }

    /// File name for the letter at `index`, e.g. `00_alef.png`.
    pub fn file_name(&self, index: usize, extension: &str) -> Option<String> {
        self.get(index).map(|letter| letter.file_name(index, extension))
    }
}

impl Default for LetterAlphabet {
    fn default() -> Self {
        Self::hebrew()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hebrew_has_27_letters_in_sheet_order() {
        let abc = LetterAlphabet::hebrew();
        assert_eq!(abc.len(), LetterAlphabet::HEBREW_LEN);
        assert_eq!(abc.get(0).unwrap().name, "alef");
        assert_eq!(abc.get(19).unwrap().name, "resh");
        assert_eq!(abc.get(22).unwrap().name, "final_kaf");
        assert_eq!(abc.get(26).unwrap().name, "final_tsadi");
    }

    #[test]
    fn final_forms_map_to_their_own_codepoints() {
        let abc = LetterAlphabet::hebrew();
        assert_eq!(abc.by_name("kaf").unwrap().codepoint, '\u{05DB}');
        assert_eq!(abc.by_name("final_kaf").unwrap().codepoint, '\u{05DA}');
        assert_eq!(abc.by_name("final_tsadi").unwrap().codepoint, '\u{05E5}');
    }

    #[test]
    fn file_names_are_zero_padded() {
        let abc = LetterAlphabet::hebrew();
        assert_eq!(abc.file_name(0, "png").as_deref(), Some("00_alef.png"));
        assert_eq!(abc.file_name(26, "png").as_deref(), Some("26_final_tsadi.png"));
        assert_eq!(abc.file_name(27, "png"), None);
    }

    #[test]
    fn custom_alphabet_rejects_duplicates() {
        let err = LetterAlphabet::new(vec![Letter::new("a", 'a'), Letter::new("a", 'b')]);
        assert!(err.is_err());
        assert!(LetterAlphabet::new(Vec::new()).is_err());
        assert!(LetterAlphabet::new(vec![Letter::new("../x", 'x')]).is_err());
    }
}
