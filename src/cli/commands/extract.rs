//! Extract command - split a completion into script sections.

use crate::script::{extract, StructuredScript};
use anyhow::{Context, Result};
use std::io::Read;

/// Run the extract command, printing the sections as JSON.
pub fn run_extract(file: Option<&str>) -> Result<()> {
    let text = read_input(file)?;
    let parsed: StructuredScript = extract(&text);
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

fn read_input(file: Option<&str>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path)),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
