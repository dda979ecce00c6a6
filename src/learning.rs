// File: src/learning.rs
use crate::core::extractor::extract_substitutions;
use crate::core::synthesizer::{FrequencyTable, RetainedReplacement, RuleSynthesizer};
use crate::core::types::{CorrectionRuleSet, TrainingSample, WordSubstitution};
use crate::error::Result;
use crate::persistence::{save_rule_set, SampleStore, SkippedRecord};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct LearningReport {
    pub rules: CorrectionRuleSet,
    /// Samples whose corrected text differs from the OCR text.
    pub corrected_samples: usize,
    pub observations: Vec<WordSubstitution>,
    pub retained: Vec<RetainedReplacement>,
}

#[derive(Debug, Clone)]
pub enum LearningOutcome {
    /// No samples to learn from.
    EmptyCorpus,
    /// Samples exist but none carries a word-level correction.
    NoCorrections { samples: usize },
    Learned(LearningReport),
}

/// Turns a corpus of corrected samples into a [`CorrectionRuleSet`].
pub struct LearningEngine {
    synthesizer: RuleSynthesizer,
}

impl LearningEngine {
    pub fn new() -> Self {
        Self { synthesizer: RuleSynthesizer::new() }
    }

    pub fn with_min_occurrences(min_occurrences: u64) -> Self {
        Self { synthesizer: RuleSynthesizer::with_min_occurrences(min_occurrences) }
    }

    /// Pure analysis; nothing is written.
    pub fn learn(&self, samples: &[TrainingSample]) -> LearningOutcome {
        if samples.is_empty() {
            return LearningOutcome::EmptyCorpus;
        }

        let mut table = FrequencyTable::new();
        let mut observations = Vec::new();
        let mut corrected_samples = 0;

        for sample in samples.iter().filter(|s| s.is_corrected()) {
            corrected_samples += 1;
            let found = extract_substitutions(sample);
            table.extend(&found);
            observations.extend(found);
        }
        info!("total corrections analyzed: {}", corrected_samples);

        if table.is_empty() {
            return LearningOutcome::NoCorrections { samples: samples.len() };
        }

        let (rules, retained) = self.synthesizer.synthesize(&table, samples);
        LearningOutcome::Learned(LearningReport { rules, corrected_samples, observations, retained })
    }

    /// Learns from `samples` and, when there is something to learn, writes
    /// the rule set to `rules_path`. The previous file is left untouched
    /// otherwise.
    pub fn learn_and_save(&self, samples: &[TrainingSample], rules_path: &Path) -> Result<LearningOutcome> {
        let outcome = self.learn(samples);
        if let LearningOutcome::Learned(report) = &outcome {
            save_rule_set(&report.rules, rules_path)?;
        }
        Ok(outcome)
    }
}

impl Default for LearningEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the learning pass read from the store, plus what it skipped.
pub struct Corpus {
    pub samples: Vec<TrainingSample>,
    pub skipped: Vec<SkippedRecord>,
}

pub fn load_corpus(store: &SampleStore) -> Result<Corpus> {
    let listing = store.list_sorted()?;
    Ok(Corpus { samples: listing.samples, skipped: listing.skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, ocr: &str, corrected: &str) -> TrainingSample {
        let mut s = TrainingSample::new(id, 1, ocr, format!("{}.jpg", id));
        s.corrected_text = corrected.to_string();
        s
    }

    #[test]
    fn empty_corpus() {
        assert!(matches!(LearningEngine::new().learn(&[]), LearningOutcome::EmptyCorpus));
    }

    #[test]
    fn uncorrected_corpus_is_reported_separately() {
        let samples = [sample("a", "the cat", "the cat"), sample("b", "a dog", "a dog")];
        match LearningEngine::new().learn(&samples) {
            LearningOutcome::NoCorrections { samples } => assert_eq!(samples, 2),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn insert_only_corrections_count_as_no_corrections() {
        let samples = [sample("a", "the cat", "the big cat")];
        assert!(matches!(
            LearningEngine::new().learn(&samples),
            LearningOutcome::NoCorrections { .. }
        ));
    }

    #[test]
    fn learns_repeated_word_fix() {
        let samples = [sample("a", "teh cat sat", "the cat sat"), sample("b", "teh dog ran", "the dog ran")];
        let LearningOutcome::Learned(report) = LearningEngine::new().learn(&samples) else {
            panic!("expected rules");
        };
        assert_eq!(report.corrected_samples, 2);
        assert_eq!(report.observations.len(), 2);
        assert_eq!(report.rules.word_replacements.len(), 1);
        assert_eq!(report.rules.word_replacements["teh"], "the");
        assert!(report.rules.pattern_fixes.is_empty());
    }

    #[test]
    fn nothing_is_written_without_corrections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learned_corrections.json");
        let samples = [sample("a", "same", "same")];
        LearningEngine::new().learn_and_save(&samples, &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn write_failure_is_reported_and_old_rules_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learned_corrections.json");
        let samples = [sample("a", "teh cat", "the cat"), sample("b", "teh dog", "the dog")];
        LearningEngine::new().learn_and_save(&samples, &path).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let blocked = path.join("nested.json");
        let err = LearningEngine::new().learn_and_save(&samples, &blocked).unwrap_err();
        assert!(matches!(err, crate::error::LearnError::Io { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);

        LearningEngine::new().learn_and_save(&[sample("c", "same", "same")], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn raised_threshold_drops_pairs() {
        let samples = [sample("a", "teh cat", "the cat"), sample("b", "teh dog", "the dog")];
        let LearningOutcome::Learned(report) = LearningEngine::with_min_occurrences(3).learn(&samples) else {
            panic!("expected rules");
        };
        assert!(report.rules.word_replacements.is_empty());
    }
}
