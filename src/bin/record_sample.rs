// Store a captured image and its OCR text as a new training sample.
// Run with: cargo run --bin record_sample -- /tmp/image.jpg /tmp/text.txt
use anyhow::{bail, Context, Result};
use correction_core::config::LearnerConfig;
use correction_core::logging::{init_logging, LoggingConfig};
use correction_core::persistence::SampleStore;
use std::path::PathBuf;

fn main() -> Result<()> {
    init_logging(&LoggingConfig::default());

    let mut args = std::env::args_os().skip(1);
    let (Some(image), Some(text_path)) = (args.next(), args.next()) else {
        bail!("usage: record_sample <image> <ocr-text-file>");
    };
    let image = PathBuf::from(image);
    let text_path = PathBuf::from(text_path);

    let ocr_text = std::fs::read_to_string(&text_path)
        .with_context(|| format!("could not read {}", text_path.display()))?;

    let config = LearnerConfig::load().context("could not load configuration")?;
    let store = SampleStore::new(config.training_data_dir());
    let sample = store
        .record_capture(&image, ocr_text.trim())
        .context("could not save training sample")?;

    println!("{}", sample.id);
    Ok(())
}
