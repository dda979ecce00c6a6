// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a persisted training sample, e.g. `sample_1718000000`.
pub type SampleId = String;

/// One captured image's OCR output together with its human-verified text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredSample")]
pub struct TrainingSample {
    pub id: SampleId,
    /// Creation time in unix seconds.
    pub timestamp: i64,
    pub ocr_text: String,
    /// Equal to `ocr_text` until someone edits it in the correction UI.
    pub corrected_text: String,
    #[serde(rename = "image_path")]
    pub image_reference: String,
}

/// On-disk shape; older captures may lack `corrected_text`.
#[derive(Deserialize)]
struct StoredSample {
    id: SampleId,
    timestamp: i64,
    ocr_text: String,
    #[serde(default)]
    corrected_text: Option<String>,
    image_path: String,
}

impl From<StoredSample> for TrainingSample {
    fn from(stored: StoredSample) -> Self {
        Self {
            corrected_text: stored.corrected_text.unwrap_or_else(|| stored.ocr_text.clone()),
            id: stored.id,
            timestamp: stored.timestamp,
            ocr_text: stored.ocr_text,
            image_reference: stored.image_path,
        }
    }
}

impl TrainingSample {
    pub fn new(id: impl Into<String>, timestamp: i64, ocr_text: impl Into<String>, image_reference: impl Into<String>) -> Self {
        let ocr_text = ocr_text.into();
        Self {
            id: id.into(),
            timestamp,
            corrected_text: ocr_text.clone(),
            ocr_text,
            image_reference: image_reference.into(),
        }
    }

    /// True once the corrected text differs from what the OCR engine produced.
    pub fn is_corrected(&self) -> bool {
        self.ocr_text != self.corrected_text
    }
}

/// A single (wrong, right) word pair seen while aligning one sample.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WordSubstitution {
    pub wrong: String,
    pub right: String,
}

impl WordSubstitution {
    pub fn new(wrong: impl Into<String>, right: impl Into<String>) -> Self {
        Self { wrong: wrong.into(), right: right.into() }
    }
}

/// A regex rewrite learned from the corpus.
///
/// `replacement` uses backslash group references (`\1`, `\g<1>`), which is the
/// form stored on disk and shown to people editing the file by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFix {
    pub pattern: String,
    pub replacement: String,
    pub description: String,
}

/// The persisted artifact of a learning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRuleSet {
    /// Whole-word, case-sensitive replacements.
    #[serde(default)]
    pub word_replacements: BTreeMap<String, String>,
    /// Applied in stored order after the word replacements.
    #[serde(default)]
    pub pattern_fixes: Vec<PatternFix>,
    /// Always empty for now.
    #[serde(default)]
    pub context_corrections: BTreeMap<String, String>,
}

impl CorrectionRuleSet {
    pub fn is_empty(&self) -> bool {
        self.word_replacements.is_empty() && self.pattern_fixes.is_empty()
    }
}
