// File: src/core/spellcheck.rs
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

lazy_static! {
    static ref NUMERIC_TOKEN: Regex = Regex::new(r"^[\d$.,%@#]+$").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^\w]").unwrap();
}

/// The external spellchecker, seen from this side.
pub trait SpellSuggester {
    /// `word` is already lowercased.
    fn is_known(&self, word: &str) -> bool;
    /// Best lowercase suggestion for a word that is not known, if any.
    fn correction(&self, word: &str) -> Option<String>;
}

/// Fixed word list plus explicit suggestions. Good enough for tests and for
/// devices that ship a small domain vocabulary.
#[derive(Debug, Clone, Default)]
pub struct WordListSpeller {
    known: HashSet<String>,
    suggestions: HashMap<String, String>,
}

impl WordListSpeller {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            known: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
            suggestions: HashMap::new(),
        }
    }

    pub fn with_suggestion(mut self, misspelled: &str, fix: &str) -> Self {
        self.suggestions.insert(misspelled.to_lowercase(), fix.to_lowercase());
        self
    }
}

impl SpellSuggester for WordListSpeller {
    fn is_known(&self, word: &str) -> bool {
        self.known.contains(word)
    }

    fn correction(&self, word: &str) -> Option<String> {
        self.suggestions.get(word).cloned()
    }
}

/// Runs the speller word by word, leaving alone anything that looks like a
/// number or price and any word of `min_len - 1` characters or fewer.
/// Surrounding punctuation and the word's capitalisation are preserved.
pub fn apply_spellcheck(text: &str, speller: &dyn SpellSuggester, min_len: usize) -> String {
    let corrected: Vec<String> = text
        .split_whitespace()
        .map(|word| check_word(word, speller, min_len))
        .collect();
    let result = corrected.join(" ");
    if result != text {
        debug!("spellcheck applied: '{}' -> '{}'", text, result);
    }
    result
}

fn check_word(word: &str, speller: &dyn SpellSuggester, min_len: usize) -> String {
    if NUMERIC_TOKEN.is_match(word) || word.chars().count() < min_len {
        return word.to_string();
    }

    let clean = NON_WORD.replace_all(word, "");
    if clean.is_empty() {
        return word.to_string();
    }

    let lower = clean.to_lowercase();
    if speller.is_known(&lower) {
        return word.to_string();
    }

    match speller.correction(&lower) {
        Some(fix) if fix != lower => {
            let cased = match_case(&clean, &fix);
            let fixed = word.replace(&*clean, &cased);
            debug!("spellcheck: '{}' -> '{}'", word, fixed);
            fixed
        }
        _ => word.to_string(),
    }
}

fn match_case(original: &str, fix: &str) -> String {
    let has_letters = original.chars().any(char::is_alphabetic);
    if has_letters && original.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase) {
        return fix.to_uppercase();
    }
    if original.chars().next().map_or(false, char::is_uppercase) {
        let mut chars = fix.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    fix.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speller() -> WordListSpeller {
        WordListSpeller::new(["the", "bird", "flew", "milk", "price"])
            .with_suggestion("brid", "bird")
            .with_suggestion("mlik", "milk")
    }

    #[test]
    fn corrects_unknown_words() {
        assert_eq!(apply_spellcheck("the brid flew", &speller(), 3), "the bird flew");
    }

    #[test]
    fn keeps_numbers_and_short_words() {
        assert_eq!(apply_spellcheck("$2.99 50% xq", &speller(), 3), "$2.99 50% xq");
    }

    #[test]
    fn preserves_case_and_punctuation() {
        assert_eq!(apply_spellcheck("Brid, MLIK!", &speller(), 3), "Bird, MILK!");
    }

    #[test]
    fn leaves_words_without_suggestion() {
        assert_eq!(apply_spellcheck("zzyzx price", &speller(), 3), "zzyzx price");
    }
}
