// File: src/core/synthesizer.rs
use crate::core::types::{CorrectionRuleSet, PatternFix, TrainingSample, WordSubstitution};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::info;

/// Replacements seen fewer times than this are treated as one-off edits.
pub const DEFAULT_MIN_OCCURRENCES: u64 = 2;

/// wrong word -> (right word, count) in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<String, Vec<(String, u64)>>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, observation: &WordSubstitution) {
        let rights = self.counts.entry(observation.wrong.clone()).or_default();
        match rights.iter_mut().find(|(right, _)| *right == observation.right) {
            Some((_, count)) => *count += 1,
            None => rights.push((observation.right.clone(), 1)),
        }
    }

    pub fn extend<'a>(&mut self, observations: impl IntoIterator<Item = &'a WordSubstitution>) {
        for obs in observations {
            self.record(obs);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, wrong: &str, right: &str) -> u64 {
        self.counts
            .get(wrong)
            .and_then(|rights| rights.iter().find(|(r, _)| r == right))
            .map_or(0, |(_, c)| *c)
    }

    /// The most frequent right word for every wrong word.
    /// On a tie the right word seen first is kept.
    pub fn most_common(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.counts.iter().filter_map(|(wrong, rights)| {
            let mut best: Option<&(String, u64)> = None;
            for entry in rights {
                if best.map_or(true, |b| entry.1 > b.1) {
                    best = Some(entry);
                }
            }
            best.map(|(right, count)| (wrong.as_str(), right.as_str(), *count))
        })
    }
}

lazy_static! {
    static ref DIGIT_L_DIGIT: Regex = Regex::new(r"\d[lI]\d").unwrap();
    static ref DIGIT_ONE_DIGIT: Regex = Regex::new(r"\d1\d").unwrap();
    static ref DIGIT_O_DIGIT: Regex = Regex::new(r"\dO\d").unwrap();
    static ref DIGIT_ZERO_DIGIT: Regex = Regex::new(r"\d0\d").unwrap();
}

/// A character-confusion class and the rule it contributes once a sample
/// in the corpus shows it happening.
pub struct Hypothesis {
    pub name: &'static str,
    evidence: fn(&TrainingSample) -> bool,
    pub pattern: &'static str,
    pub replacement: &'static str,
    pub description: &'static str,
}

impl Hypothesis {
    pub fn is_supported_by(&self, sample: &TrainingSample) -> bool {
        (self.evidence)(sample)
    }

    pub fn to_rule(&self) -> PatternFix {
        PatternFix {
            pattern: self.pattern.to_string(),
            replacement: self.replacement.to_string(),
            description: self.description.to_string(),
        }
    }
}

/// Checked in this order; supported entries land in `pattern_fixes` in the same order.
pub static HYPOTHESES: &[Hypothesis] = &[
    Hypothesis {
        name: "price_qq",
        evidence: |s| s.ocr_text.contains("qq") && s.corrected_text.contains("99"),
        pattern: r"(\d+)\.qq\b",
        replacement: r"\1.99",
        description: "qq at end of price -> 99",
    },
    Hypothesis {
        name: "dollar_o",
        evidence: |s| s.ocr_text.contains("$O") || s.ocr_text.contains("$o"),
        pattern: r"\$[Oo]",
        replacement: "$0",
        description: "$O or $o -> $0",
    },
    Hypothesis {
        name: "l_between_digits",
        evidence: |s| DIGIT_L_DIGIT.is_match(&s.ocr_text) && DIGIT_ONE_DIGIT.is_match(&s.corrected_text),
        pattern: r"(\d)[lI](\d)",
        replacement: r"\g<1>1\2",
        description: "l or I between numbers -> 1",
    },
    Hypothesis {
        name: "o_between_digits",
        evidence: |s| DIGIT_O_DIGIT.is_match(&s.ocr_text) && DIGIT_ZERO_DIGIT.is_match(&s.corrected_text),
        pattern: r"(\d)[Oo](\d)",
        replacement: r"\g<1>0\2",
        description: "O in numbers -> 0",
    },
];

/// A word replacement that made it into the rule set, with its evidence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainedReplacement {
    pub wrong: String,
    pub right: String,
    pub count: u64,
}

pub struct RuleSynthesizer {
    min_occurrences: u64,
}

impl RuleSynthesizer {
    pub fn new() -> Self {
        Self { min_occurrences: DEFAULT_MIN_OCCURRENCES }
    }

    pub fn with_min_occurrences(min_occurrences: u64) -> Self {
        Self { min_occurrences: min_occurrences.max(1) }
    }

    /// Builds the rule set from the aggregated word table and the raw corpus.
    pub fn synthesize(
        &self,
        table: &FrequencyTable,
        samples: &[TrainingSample],
    ) -> (CorrectionRuleSet, Vec<RetainedReplacement>) {
        let mut rules = CorrectionRuleSet::default();
        let mut retained = Vec::new();

        for (wrong, right, count) in table.most_common() {
            if count < self.min_occurrences {
                continue;
            }
            info!("'{}' -> '{}' (appeared {} times)", wrong, right, count);
            rules.word_replacements.insert(wrong.to_string(), right.to_string());
            retained.push(RetainedReplacement {
                wrong: wrong.to_string(),
                right: right.to_string(),
                count,
            });
        }

        for hypothesis in HYPOTHESES {
            if samples.iter().any(|s| hypothesis.is_supported_by(s)) {
                info!(rule = hypothesis.name, "{}", hypothesis.description);
                rules.pattern_fixes.push(hypothesis.to_rule());
            }
        }

        (rules, retained)
    }
}

impl Default for RuleSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ocr: &str, corrected: &str) -> TrainingSample {
        let mut s = TrainingSample::new("sample_1", 1, ocr, "sample_1.jpg");
        s.corrected_text = corrected.to_string();
        s
    }

    fn table(pairs: &[(&str, &str)]) -> FrequencyTable {
        let mut t = FrequencyTable::new();
        for (w, r) in pairs {
            t.record(&WordSubstitution::new(*w, *r));
        }
        t
    }

    #[test]
    fn single_observation_is_not_retained() {
        let (rules, _) = RuleSynthesizer::new().synthesize(&table(&[("teh", "the")]), &[]);
        assert!(rules.word_replacements.is_empty());
    }

    #[test]
    fn two_observations_are_retained() {
        let (rules, retained) =
            RuleSynthesizer::new().synthesize(&table(&[("teh", "the"), ("teh", "the")]), &[]);
        assert_eq!(rules.word_replacements.get("teh").map(String::as_str), Some("the"));
        assert_eq!(retained[0].count, 2);
    }

    #[test]
    fn most_frequent_right_word_wins() {
        let t = table(&[("c0de", "code"), ("c0de", "code"), ("c0de", "cove"), ("c0de", "cove"), ("c0de", "cove")]);
        let (rules, _) = RuleSynthesizer::new().synthesize(&t, &[]);
        assert_eq!(rules.word_replacements["c0de"], "cove");
    }

    #[test]
    fn ties_keep_the_first_seen_right_word() {
        let t = table(&[("rn", "m"), ("rn", "rn."), ("rn", "rn."), ("rn", "m")]);
        let best: Vec<_> = t.most_common().collect();
        assert_eq!(best, vec![("rn", "m", 2)]);
    }

    #[test]
    fn dollar_o_rule_requires_evidence() {
        let corpus = [sample("total 5 dollars", "total 5 dollars")];
        let (rules, _) = RuleSynthesizer::new().synthesize(&FrequencyTable::new(), &corpus);
        assert!(rules.pattern_fixes.iter().all(|p| p.pattern != r"\$[Oo]"));

        let corpus = [sample("now $o.50", "now $0.50")];
        let (rules, _) = RuleSynthesizer::new().synthesize(&FrequencyTable::new(), &corpus);
        assert_eq!(rules.pattern_fixes.len(), 1);
        assert_eq!(rules.pattern_fixes[0].replacement, "$0");
    }

    #[test]
    fn hypotheses_keep_catalogue_order() {
        let corpus = [
            sample("1O5 items", "105 items"),
            sample("price 3.qq", "price 3.99"),
            sample("room 2l4", "room 214"),
        ];
        let (rules, _) = RuleSynthesizer::new().synthesize(&FrequencyTable::new(), &corpus);
        let descriptions: Vec<_> = rules.pattern_fixes.iter().map(|p| p.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["qq at end of price -> 99", "l or I between numbers -> 1", "O in numbers -> 0"]
        );
    }

    #[test]
    fn qq_needs_99_in_the_correction() {
        let corpus = [sample("qq cents", "kk cents")];
        let (rules, _) = RuleSynthesizer::new().synthesize(&FrequencyTable::new(), &corpus);
        assert!(rules.pattern_fixes.is_empty());
        assert!(rules.context_corrections.is_empty());
    }
}
