//! Keyword matching for message search.

/// Case-insensitive, all-words substring query.
///
/// Words are matched as substrings, not whole words: `"an"` matches `"anna"`.
/// An empty query matches every text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordQuery {
    words: Vec<String>,
}

impl KeywordQuery {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            words: words.iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Whether `text` contains every word of the query
    pub fn matches(&self, text: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        let haystack = text.to_lowercase();
        self.words.iter().all(|word| haystack.contains(word.as_str()))
    }
}
