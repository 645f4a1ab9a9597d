use std::fs;
use std::path::Path;

use colored::Colorize;

use wk_models::CentroidClassifier;

pub fn run(data: &Path, out: &Path) -> Result<(), String> {
    let text = fs::read_to_string(data)
        .map_err(|e| format!("failed to read {}: {e}", data.display()))?;
    let samples = CentroidClassifier::parse_samples(&text)
        .map_err(|e| format!("{}: {e}", data.display()))?;
    let classifier = CentroidClassifier::train(&samples).map_err(|e| e.to_string())?;
    classifier
        .save(out)
        .map_err(|e| format!("failed to write {}: {e}", out.display()))?;

    println!(
        "  {} classifier on {} samples ({} intents) -> {}",
        "Trained".bold(),
        samples.len(),
        classifier.intents().count(),
        out.display()
    );

    Ok(())
}
