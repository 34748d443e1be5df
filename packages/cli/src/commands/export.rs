use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use crate::client::ApiClient;

const FALLBACK_NAME: &str = "Report.pdf";

pub fn run(client: &ApiClient, output: Option<PathBuf>) -> Result<()> {
    let download = client.export_pdf()?;
    let path = output.unwrap_or_else(|| {
        PathBuf::from(download.file_name.as_deref().unwrap_or(FALLBACK_NAME))
    });

    std::fs::write(&path, &download.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} Saved report to {} ({} bytes)",
        style("✓").green().bold(),
        path.display(),
        download.bytes.len()
    );
    Ok(())
}
