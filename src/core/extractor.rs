// File: src/core/extractor.rs
use crate::core::diff::{OpTag, SequenceMatcher};
use crate::core::types::{TrainingSample, WordSubstitution};
use tracing::debug;

/// Word-level substitutions between a sample's OCR text and its correction.
///
/// Only `replace` regions count. Inside a region, OCR and corrected tokens are
/// paired by position and any surplus on the longer side is dropped, so pure
/// insertions and deletions never produce an observation.
pub fn extract_substitutions(sample: &TrainingSample) -> Vec<WordSubstitution> {
    if !sample.is_corrected() {
        return Vec::new();
    }

    let ocr_words: Vec<&str> = sample.ocr_text.split_whitespace().collect();
    let correct_words: Vec<&str> = sample.corrected_text.split_whitespace().collect();
    let matcher = SequenceMatcher::new(&ocr_words, &correct_words);

    let mut found = Vec::new();
    for op in matcher.opcodes() {
        if op.tag != OpTag::Replace {
            continue;
        }
        let wrong = &ocr_words[op.a_start..op.a_end];
        let right = &correct_words[op.b_start..op.b_end];
        for (w, r) in wrong.iter().zip(right.iter()) {
            debug!(sample = %sample.id, "found '{}' -> '{}'", w, r);
            found.push(WordSubstitution::new(*w, *r));
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ocr: &str, corrected: &str) -> TrainingSample {
        let mut s = TrainingSample::new("sample_1", 1, ocr, "sample_1.jpg");
        s.corrected_text = corrected.to_string();
        s
    }

    #[test]
    fn uncorrected_sample_yields_nothing() {
        let s = TrainingSample::new("sample_1", 1, "price tag q2.qq", "x.jpg");
        assert!(extract_substitutions(&s).is_empty());
    }

    #[test]
    fn single_word_fix_yields_one_pair() {
        let found = extract_substitutions(&sample("teh cat sat", "the cat sat"));
        assert_eq!(found, vec![WordSubstitution::new("teh", "the")]);
    }

    #[test]
    fn punctuation_stays_on_the_token() {
        let found = extract_substitutions(&sample("total: qq cents", "total: 99 cents"));
        assert_eq!(found, vec![WordSubstitution::new("qq", "99")]);

        let found = extract_substitutions(&sample("price tag q2.qq", "price tag $2.99"));
        assert_eq!(found, vec![WordSubstitution::new("q2.qq", "$2.99")]);
    }

    #[test]
    fn insertions_and_deletions_are_ignored() {
        assert!(extract_substitutions(&sample("the cat sat", "the big cat sat")).is_empty());
        assert!(extract_substitutions(&sample("the the cat", "the cat")).is_empty());
    }

    #[test]
    fn uneven_replace_region_pairs_positionally() {
        // Two OCR tokens replaced by three corrected ones: only two pairs.
        let found = extract_substitutions(&sample("a xx yy b", "a one two three b"));
        assert_eq!(
            found,
            vec![WordSubstitution::new("xx", "one"), WordSubstitution::new("yy", "two")]
        );
    }

    #[test]
    fn whitespace_only_differences_yield_nothing() {
        assert!(extract_substitutions(&sample("the  cat\nsat", "the cat sat")).is_empty());
    }
}
