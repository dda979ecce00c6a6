use crate::config::LearnerConfig;
use crate::core::applicator::CorrectionApplicator;
use crate::core::normalize::{basic_cleanup, normalize};
use crate::core::spellcheck::{apply_spellcheck, SpellSuggester};
use crate::core::types::CorrectionRuleSet;
use crate::persistence::load_rule_set_or_default;
use tracing::{debug, info};

const DEFAULT_SPELLCHECK_MIN_LEN: usize = 3;

/// Inference-time text pipeline: raw OCR text in, speakable text out.
///
/// The rule set is loaded once and never changes for the life of the engine.
pub struct CorrectionEngine {
    rules: CorrectionRuleSet,
    applicator: CorrectionApplicator,
    learning_enabled: bool,
    speller: Option<Box<dyn SpellSuggester>>,
    use_spellcheck: bool,
    spellcheck_min_len: usize,
}

impl CorrectionEngine {
    pub fn new(rules: CorrectionRuleSet) -> Self {
        let applicator = CorrectionApplicator::new(&rules);
        Self {
            rules,
            applicator,
            learning_enabled: true,
            speller: None,
            use_spellcheck: true,
            spellcheck_min_len: DEFAULT_SPELLCHECK_MIN_LEN,
        }
    }

    /// Reads the rule set named by `config`; a missing or unreadable file
    /// gives an engine with no learned rules.
    pub fn from_config(config: &LearnerConfig) -> Self {
        let rules = load_rule_set_or_default(&config.corrections_file());
        let mut engine = Self::new(rules);
        engine.learning_enabled = config.learning.enabled;
        engine.use_spellcheck = config.cleaning.use_spellcheck;
        engine.spellcheck_min_len = config.cleaning.spellcheck_min_len;
        info!(
            learning = engine.learning_enabled,
            rules = engine.applicator.rule_count(),
            "correction engine ready"
        );
        engine
    }

    pub fn with_learning(mut self, enabled: bool) -> Self {
        self.learning_enabled = enabled;
        self
    }

    pub fn with_speller(mut self, speller: Box<dyn SpellSuggester>) -> Self {
        self.speller = Some(speller);
        self
    }

    pub fn rules(&self) -> &CorrectionRuleSet {
        &self.rules
    }

    pub fn applicator(&self) -> &CorrectionApplicator {
        &self.applicator
    }

    pub fn apply_learned_corrections(&self, text: &str) -> String {
        if !self.learning_enabled {
            return text.to_string();
        }
        self.applicator.apply(text)
    }

    /// Cleanup, learned corrections, optional spellcheck, then normalization.
    pub fn clean_text(&self, raw: &str) -> String {
        let mut text = basic_cleanup(raw);

        text = self.apply_learned_corrections(&text);
        debug!("after learned corrections: {}", text);

        if let Some(speller) = self.speller.as_ref().filter(|_| self.use_spellcheck) {
            text = apply_spellcheck(&text, &**speller, self.spellcheck_min_len);
            debug!("after spellcheck: {}", text);
        }

        let cleaned = normalize(&text);
        debug!("final cleaned text: {}", cleaned);
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spellcheck::WordListSpeller;
    use crate::core::types::PatternFix;

    fn qq_rules() -> CorrectionRuleSet {
        let mut rules = CorrectionRuleSet::default();
        rules.pattern_fixes.push(PatternFix {
            pattern: r"(\d+)\.qq\b".into(),
            replacement: r"\1.99".into(),
            description: "qq at end of price -> 99".into(),
        });
        rules
    }

    #[test]
    fn full_pipeline_on_a_price_tag() {
        let engine = CorrectionEngine::new(qq_rules());
        assert_eq!(
            engine.clean_text("Total $ 12.qq & 5O% off"),
            "Total 12.99 dollars and 50 percent off"
        );
    }

    #[test]
    fn disabled_learning_skips_rules_but_still_normalizes() {
        let engine = CorrectionEngine::new(qq_rules()).with_learning(false);
        assert_eq!(engine.clean_text("cost  5.qq"), "cost 5.qq");
        assert_eq!(engine.apply_learned_corrections("5.qq"), "5.qq");
    }

    #[test]
    fn speller_runs_between_rules_and_normalization() {
        let speller = WordListSpeller::new(["total", "off"]).with_suggestion("tota1", "total");
        let engine = CorrectionEngine::new(CorrectionRuleSet::default()).with_speller(Box::new(speller));
        assert_eq!(engine.clean_text("Tota1 $3"), "Total 3 dollars");
    }

    #[test]
    fn missing_rule_file_gives_empty_engine() {
        let dir = tempfile::tempdir().unwrap();
        let engine = CorrectionEngine::from_config(&LearnerConfig::rooted_at(dir.path()));
        assert!(engine.rules().is_empty());
        assert_eq!(engine.clean_text("hello  world"), "hello world");
    }
}
