use std::borrow::Cow;
use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Applied to lowercased text. Holder names vary between projects and
    // would otherwise skew the similarity score.
    static ref COPYRIGHT_PATTERN: Regex =
        Regex::new(r"\s*copyright (?:©|\(c\))? ?(?:[0-9]{4}|\[year\])[^\n]*")
            .expect("copyright regex should compile");
    static ref WORD_PATTERN: Regex =
        Regex::new(r"[A-Za-z0-9_']+").expect("word regex should compile");
}

/// The distinct words of a text, each remembering the position of its first
/// occurrence in the token stream.
///
/// Only set membership matters for scoring; the rank is kept so unmatched
/// words can be listed in roughly the order they appear in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSet {
    ranks: HashMap<String, usize>,
}

impl WordSet {
    /// Normalize `text` and collect its words: lowercase, drop copyright
    /// lines, then split on anything that is not a word character or an
    /// apostrophe.
    pub fn from_text(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let stripped = strip_copyright(&lowered);

        let mut ranks = HashMap::new();
        for (rank, m) in WORD_PATTERN.find_iter(&stripped).enumerate() {
            ranks.entry(m.as_str().to_string()).or_insert(rank);
        }
        Self { ranks }
    }

    /// Like [`WordSet::from_text`] for raw file contents. Invalid UTF-8
    /// sequences become separators.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_text(&String::from_utf8_lossy(data))
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.ranks.contains_key(word)
    }

    /// Index of the first occurrence of `word`, if present.
    pub fn rank(&self, word: &str) -> Option<usize> {
        self.ranks.get(word).copied()
    }

    /// Number of words present in both sets.
    pub fn common(&self, other: &WordSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.ranks.keys().filter(|w| large.contains(w)).count()
    }

    /// Words of `self` absent from `other`, ordered by first occurrence in
    /// `self`.
    pub fn difference(&self, other: &WordSet) -> Vec<String> {
        let mut words: Vec<&String> = self.ranks.keys().filter(|w| !other.contains(w)).collect();
        words.sort_by_key(|w| self.rank(w));
        words.into_iter().cloned().collect()
    }
}

/// Remove copyright notice lines from already lowercased text.
pub fn strip_copyright(text: &str) -> Cow<'_, str> {
    COPYRIGHT_PATTERN.replace_all(text, "")
}
