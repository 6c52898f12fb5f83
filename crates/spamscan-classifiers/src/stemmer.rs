//! Token stemming
//!
//! Two algorithms are supported: Porter's original suffix stripper, which
//! the reference vocabularies are fitted with, and the Snowball English
//! (Porter2) stemmer from `rust-stemmers`. The vectorizer export names the
//! one its vocabulary was built with.

use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stemming algorithm a vocabulary was fitted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemmerKind {
    /// Porter (1980)
    #[default]
    Porter,
    /// Snowball English, a.k.a. Porter2
    Snowball,
}

impl StemmerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StemmerKind::Porter => "porter",
            StemmerKind::Snowball => "snowball",
        }
    }
}

impl fmt::Display for StemmerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stems one token at a time
pub enum TokenStemmer {
    Porter,
    Snowball(Stemmer),
}

impl TokenStemmer {
    pub fn new(kind: StemmerKind) -> Self {
        match kind {
            StemmerKind::Porter => TokenStemmer::Porter,
            StemmerKind::Snowball => TokenStemmer::Snowball(Stemmer::create(Algorithm::English)),
        }
    }

    pub fn kind(&self) -> StemmerKind {
        match self {
            TokenStemmer::Porter => StemmerKind::Porter,
            TokenStemmer::Snowball(_) => StemmerKind::Snowball,
        }
    }

    /// Stem one token. Both algorithms work on lower-case input.
    pub fn stem(&self, token: &str) -> String {
        let lowered = token.to_lowercase();
        match self {
            TokenStemmer::Porter => porter::stem(&lowered),
            TokenStemmer::Snowball(stemmer) => stemmer.stem(&lowered).into_owned(),
        }
    }
}

mod porter {
    /// Porter's algorithm over a lower-case word. Words of one or two
    /// characters are returned unchanged.
    pub fn stem(word: &str) -> String {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() <= 2 {
            return word.to_string();
        }

        let mut w = Word { b: chars };
        w.step1a();
        w.step1b();
        w.step1c();
        w.step2();
        w.step3();
        w.step4();
        w.step5();
        w.b.into_iter().collect()
    }

    struct Word {
        b: Vec<char>,
    }

    const STEP2: &[(&str, &str)] = &[
        ("ational", "ate"),
        ("tional", "tion"),
        ("enci", "ence"),
        ("anci", "ance"),
        ("izer", "ize"),
        ("bli", "ble"),
        ("alli", "al"),
        ("entli", "ent"),
        ("eli", "e"),
        ("ousli", "ous"),
        ("ization", "ize"),
        ("ation", "ate"),
        ("ator", "ate"),
        ("alism", "al"),
        ("iveness", "ive"),
        ("fulness", "ful"),
        ("ousness", "ous"),
        ("aliti", "al"),
        ("iviti", "ive"),
        ("biliti", "ble"),
        ("logi", "log"),
    ];

    const STEP3: &[(&str, &str)] = &[
        ("icate", "ic"),
        ("ative", ""),
        ("alize", "al"),
        ("iciti", "ic"),
        ("ical", "ic"),
        ("ful", ""),
        ("ness", ""),
    ];

    const STEP4: &[&str] = &[
        "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion",
        "ou", "ism", "ate", "iti", "ous", "ive", "ize",
    ];

    impl Word {
        fn is_consonant(&self, i: usize) -> bool {
            match self.b[i] {
                'a' | 'e' | 'i' | 'o' | 'u' => false,
                'y' => i == 0 || !self.is_consonant(i - 1),
                _ => true,
            }
        }

        /// Number of vowel-consonant sequences in `b[..len]`
        fn measure(&self, len: usize) -> usize {
            let mut i = 0;
            while i < len && self.is_consonant(i) {
                i += 1;
            }
            let mut n = 0;
            loop {
                while i < len && !self.is_consonant(i) {
                    i += 1;
                }
                if i >= len {
                    return n;
                }
                while i < len && self.is_consonant(i) {
                    i += 1;
                }
                n += 1;
            }
        }

        fn has_vowel(&self, len: usize) -> bool {
            (0..len).any(|i| !self.is_consonant(i))
        }

        fn ends_double_consonant(&self, len: usize) -> bool {
            len >= 2 && self.b[len - 1] == self.b[len - 2] && self.is_consonant(len - 1)
        }

        /// consonant-vowel-consonant ending, last consonant not w, x or y
        fn ends_cvc(&self, len: usize) -> bool {
            len >= 3
                && self.is_consonant(len - 1)
                && !self.is_consonant(len - 2)
                && self.is_consonant(len - 3)
                && !matches!(self.b[len - 1], 'w' | 'x' | 'y')
        }

        fn ends_with(&self, suffix: &str) -> bool {
            let n = suffix.chars().count();
            n <= self.b.len() && self.b[self.b.len() - n..].iter().copied().eq(suffix.chars())
        }

        /// Length of the word without `suffix`
        fn stem_len(&self, suffix: &str) -> usize {
            self.b.len() - suffix.chars().count()
        }

        fn replace(&mut self, suffix: &str, replacement: &str) {
            let len = self.stem_len(suffix);
            self.b.truncate(len);
            self.b.extend(replacement.chars());
        }

        /// First suffix in `rules` that matches is replaced when the
        /// remaining stem has a measure above zero
        fn replace_first(&mut self, rules: &[(&str, &str)]) {
            if let Some((suffix, replacement)) = rules.iter().find(|(s, _)| self.ends_with(s)) {
                if self.measure(self.stem_len(suffix)) > 0 {
                    self.replace(suffix, replacement);
                }
            }
        }

        fn step1a(&mut self) {
            if self.ends_with("sses") {
                self.replace("sses", "ss");
            } else if self.ends_with("ies") {
                self.replace("ies", "i");
            } else if !self.ends_with("ss") && self.ends_with("s") {
                self.replace("s", "");
            }
        }

        fn step1b(&mut self) {
            if self.ends_with("eed") {
                if self.measure(self.stem_len("eed")) > 0 {
                    self.replace("eed", "ee");
                }
                return;
            }

            let suffix = if self.ends_with("ed") {
                "ed"
            } else if self.ends_with("ing") {
                "ing"
            } else {
                return;
            };
            if !self.has_vowel(self.stem_len(suffix)) {
                return;
            }
            self.replace(suffix, "");

            let len = self.b.len();
            if self.ends_with("at") || self.ends_with("bl") || self.ends_with("iz") {
                self.b.push('e');
            } else if self.ends_double_consonant(len)
                && !matches!(self.b[len - 1], 'l' | 's' | 'z')
            {
                self.b.pop();
            } else if self.measure(len) == 1 && self.ends_cvc(len) {
                self.b.push('e');
            }
        }

        fn step1c(&mut self) {
            if self.ends_with("y") && self.has_vowel(self.stem_len("y")) {
                self.replace("y", "i");
            }
        }

        fn step2(&mut self) {
            self.replace_first(STEP2);
        }

        fn step3(&mut self) {
            self.replace_first(STEP3);
        }

        fn step4(&mut self) {
            let Some(suffix) = STEP4.iter().copied().find(|s| self.ends_with(s)) else {
                return;
            };
            let len = self.stem_len(suffix);
            if suffix == "ion" && (len == 0 || !matches!(self.b[len - 1], 's' | 't')) {
                return;
            }
            if self.measure(len) > 1 {
                self.b.truncate(len);
            }
        }

        fn step5(&mut self) {
            if self.ends_with("e") {
                let len = self.stem_len("e");
                let m = self.measure(len);
                if m > 1 || (m == 1 && !self.ends_cvc(len)) {
                    self.b.truncate(len);
                }
            }

            let len = self.b.len();
            if self.measure(len) > 1 && self.ends_double_consonant(len) && self.b[len - 1] == 'l' {
                self.b.pop();
            }
        }
    }
}
