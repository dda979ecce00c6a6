// File: src/persistence.rs
use crate::core::types::{CorrectionRuleSet, TrainingSample};
use crate::error::{LearnError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::NamedTempFile;
use tracing::{info, warn};

const RECORD_EXTENSION: &str = "json";
const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

/// Serializes `value` as pretty JSON into a temp file beside `path`, then
/// renames it over `path`. Readers see either the old record or the new one.
fn write_json_atomically<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir).map_err(|e| LearnError::io(parent_dir, e))?;

    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| LearnError::io(parent_dir, e))?;
    {
        let mut writer = BufWriter::new(&temp_file);
        serde_json::to_writer_pretty(&mut writer, value).map_err(|e| LearnError::json(path, e))?;
        writer.flush().map_err(|e| LearnError::io(path, e))?;
    }

    temp_file.persist(path).map_err(|e| LearnError::io(path, e.error))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| LearnError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| LearnError::json(path, e))
}

pub fn save_rule_set(rules: &CorrectionRuleSet, path: &Path) -> Result<()> {
    write_json_atomically(rules, path)?;
    info!("saved corrections to {}", path.display());
    Ok(())
}

pub fn load_rule_set(path: &Path) -> Result<CorrectionRuleSet> {
    read_json(path)
}

/// A missing file means nothing has been learned yet. A corrupt one is
/// reported and treated the same way so the reader keeps working.
pub fn load_rule_set_or_default(path: &Path) -> CorrectionRuleSet {
    match load_rule_set(path) {
        Ok(rules) => {
            info!("loaded {} learned corrections", rules.word_replacements.len());
            rules
        }
        Err(LearnError::Io { ref source, .. }) if source.kind() == ErrorKind::NotFound => {
            info!("no learned corrections yet");
            CorrectionRuleSet::default()
        }
        Err(e) => {
            warn!("failed to load corrections: {}", e);
            CorrectionRuleSet::default()
        }
    }
}

/// A record `list_samples` could not use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct SampleListing {
    pub samples: Vec<TrainingSample>,
    pub skipped: Vec<SkippedRecord>,
}

impl SampleListing {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sort_by_timestamp(&mut self) {
        self.samples.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
    }
}

/// One JSON record per sample in a single directory, named `<id>.json`,
/// with the captured image stored beside it.
#[derive(Debug, Clone)]
pub struct SampleStore {
    dir: PathBuf,
}

impl SampleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    fn record_path(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(LearnError::InvalidSampleId(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", id, RECORD_EXTENSION)))
    }

    /// Every readable record, in directory order. Malformed records are
    /// reported in `skipped` and do not stop the listing.
    pub fn list_samples(&self) -> Result<SampleListing> {
        let mut listing = SampleListing::default();
        if !self.exists() {
            warn!("training directory not found: {}", self.dir.display());
            return Ok(listing);
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| LearnError::io(&self.dir, e))?;
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!("could not read entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            match read_json::<TrainingSample>(&path) {
                Ok(sample) => listing.samples.push(sample),
                Err(e) => {
                    warn!("could not load {}: {}", path.display(), e);
                    listing.skipped.push(SkippedRecord { path, reason: e.to_string() });
                }
            }
        }

        info!("loaded {} samples", listing.samples.len());
        Ok(listing)
    }

    /// Same as [`list_samples`](Self::list_samples), oldest first.
    pub fn list_sorted(&self) -> Result<SampleListing> {
        let mut listing = self.list_samples()?;
        listing.sort_by_timestamp();
        Ok(listing)
    }

    pub fn load(&self, id: &str) -> Result<TrainingSample> {
        let path = self.record_path(id)?;
        match read_json(&path) {
            Err(LearnError::Io { ref source, .. }) if source.kind() == ErrorKind::NotFound => {
                Err(LearnError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    pub fn save(&self, sample: &TrainingSample) -> Result<()> {
        let path = self.record_path(&sample.id)?;
        write_json_atomically(sample, &path)
    }

    /// Sets `corrected_text` and nothing else.
    pub fn update_correction(&self, id: &str, corrected_text: &str) -> Result<TrainingSample> {
        let mut sample = self.load(id)?;
        sample.corrected_text = corrected_text.to_string();
        self.save(&sample)?;
        Ok(sample)
    }

    /// Stores a freshly captured image and its OCR text as a new sample.
    pub fn record_capture(&self, image: &Path, ocr_text: &str) -> Result<TrainingSample> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        self.record_capture_at(image, ocr_text, timestamp)
    }

    pub fn record_capture_at(&self, image: &Path, ocr_text: &str, timestamp: i64) -> Result<TrainingSample> {
        fs::create_dir_all(&self.dir).map_err(|e| LearnError::io(&self.dir, e))?;

        let id = self.unused_id(timestamp)?;
        let extension = image
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or(DEFAULT_IMAGE_EXTENSION);
        let image_dest = self.dir.join(format!("{}.{}", id, extension));
        fs::copy(image, &image_dest).map_err(|e| LearnError::io(image, e))?;

        let sample = TrainingSample::new(id, timestamp, ocr_text, image_dest.to_string_lossy());
        self.save(&sample)?;
        info!("saved training sample: {}", sample.id);
        Ok(sample)
    }

    /// `sample_<ts>`, or `sample_<ts>_<n>` when that second is already taken.
    fn unused_id(&self, timestamp: i64) -> Result<String> {
        let base = format!("sample_{}", timestamp);
        if !self.record_path(&base)?.exists() {
            return Ok(base);
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}_{}", base, n);
            if !self.record_path(&candidate)?.exists() {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}
