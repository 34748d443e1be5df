use std::path::Path;

use anyhow::{Result, bail};
use console::style;

use crate::client::ApiClient;

pub fn run(client: &ApiClient, file: &Path) -> Result<()> {
    if !file.is_file() {
        bail!("{} is not a file", file.display());
    }

    let resp = client.upload(file)?;

    println!(
        "{} {} (batch #{}, {} records)",
        style("✓").green().bold(),
        resp.message,
        resp.id,
        resp.records
    );
    if !resp.evicted.is_empty() {
        let ids: Vec<String> = resp.evicted.iter().map(|id| format!("#{id}")).collect();
        println!(
            "  {} evicted to stay within the retention window: {}",
            style("!").yellow(),
            ids.join(", ")
        );
    }
    Ok(())
}
