//! Check command - run the pipeline and report warnings.

use anyhow::Result;
use sitemeta_core::MetadataBuilder;
use std::path::Path;

/// Run the pipeline without writing artifacts and print the warnings
/// report. Warnings are advisory, so the exit code stays zero.
pub fn run(config_path: &Path, json: bool) -> Result<()> {
    let config = super::load_config(config_path)?;
    let metadata = MetadataBuilder::new(config).build()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata.warnings)?);
        return Ok(());
    }

    if metadata.warnings.is_empty() {
        println!("No warnings - all content is clean");
        return Ok(());
    }

    println!("{} warning(s):", metadata.warnings.len());
    for warning in &metadata.warnings {
        match &warning.context {
            Some(context) => println!("  [{}] {} ({})", warning.code, warning.message, context),
            None => println!("  [{}] {}", warning.code, warning.message),
        }
    }

    Ok(())
}
