//! Standalone Document AI check.
//!
//! Sends one local image through the processor without touching the database,
//! to confirm credentials and processor identity before starting the server.

use std::path::Path;

use console::style;

use crate::config::Settings;
use crate::extraction::{normalize_entities, DocumentAiClient, FieldValue};

/// Send `file` to Document AI and print the entities found.
pub async fn cmd_check(settings: &Settings, file: &Path) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("file not found: {}", file.display());
    }

    let image = tokio::fs::read(file).await?;
    println!(
        "{} Loaded {} ({} bytes)",
        style("→").cyan(),
        file.display(),
        image.len()
    );

    let client = DocumentAiClient::new(&settings.processor, &settings.credentials_path)?;
    println!("  Processor: {}", client.resource_name());

    let entities = match client.process(&image).await {
        Ok(entities) => entities,
        Err(e) => {
            eprintln!("  {} Document AI request failed: {}", style("✗").red(), e);
            return Err(e.into());
        }
    };

    println!(
        "  {} Document AI processed the image: {} entities",
        style("✓").green(),
        entities.len()
    );

    for (name, value) in normalize_entities(&entities) {
        let shown = match value {
            FieldValue::Flag(true) => "sim".to_string(),
            FieldValue::Flag(false) => "não".to_string(),
            FieldValue::Text(text) => text,
        };
        println!("    {:<22} {}", name, shown);
    }

    Ok(())
}
