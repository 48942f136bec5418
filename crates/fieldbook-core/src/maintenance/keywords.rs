use serde::{Deserialize, Serialize};

use crate::maintenance::logs::LogEntry;

/// Failure vocabulary used when the caller does not supply one.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "vibration",
    "pressure",
    "temp",
    "temperature",
    "bearing",
    "leak",
    "trip",
    "cavitation",
    "contamination",
    "clog",
];

/// Keywords to search log text for.
///
/// Stored lower-cased, without blanks or duplicates, in the order given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordVocabulary {
    keywords: Vec<String>,
}

impl KeywordVocabulary {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalised: Vec<String> = Vec::new();
        for kw in keywords {
            let kw = kw.as_ref().trim().to_lowercase();
            if !kw.is_empty() && !normalised.contains(&kw) {
                normalised.push(kw);
            }
        }
        KeywordVocabulary {
            keywords: normalised,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for KeywordVocabulary {
    fn default() -> Self {
        KeywordVocabulary::new(DEFAULT_KEYWORDS)
    }
}

impl From<Vec<String>> for KeywordVocabulary {
    fn from(keywords: Vec<String>) -> Self {
        KeywordVocabulary::new(keywords)
    }
}

impl From<KeywordVocabulary> for Vec<String> {
    fn from(vocabulary: KeywordVocabulary) -> Self {
        vocabulary.keywords
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u32,
}

/// Per-keyword entry counts, in the order each keyword was first matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordCounts {
    counts: Vec<KeywordCount>,
}

impl KeywordCounts {
    fn increment(&mut self, keyword: &str) {
        match self.counts.iter_mut().find(|c| c.keyword == keyword) {
            Some(existing) => existing.count += 1,
            None => self.counts.push(KeywordCount {
                keyword: keyword.to_string(),
                count: 1,
            }),
        }
    }

    /// Count for `keyword`, zero if it never matched.
    pub fn get(&self, keyword: &str) -> u32 {
        self.counts
            .iter()
            .find(|c| c.keyword == keyword)
            .map_or(0, |c| c.count)
    }

    /// Counts sorted most frequent first; ties keep first-matched order.
    pub fn most_common(&self) -> Vec<KeywordCount> {
        let mut sorted = self.counts.clone();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordCount> {
        self.counts.iter()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Count, for each keyword, how many entries mention it.
///
/// Matching is a case-insensitive substring test, and a keyword counts at
/// most once per entry however many times it appears.
pub fn keyword_frequency(entries: &[LogEntry], vocabulary: &KeywordVocabulary) -> KeywordCounts {
    let mut counts = KeywordCounts::default();
    for entry in entries {
        let text = entry.log_text.to_lowercase();
        for keyword in vocabulary.iter() {
            if text.contains(keyword) {
                counts.increment(keyword);
            }
        }
    }
    counts
}
