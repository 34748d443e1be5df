use anyhow::Result;
use console::style;

use crate::client::ApiClient;
use crate::display::{distribution_lines, kpi_lines, record_lines};

pub fn run(client: &ApiClient, json: bool) -> Result<()> {
    let Some(summary) = client.summary()? else {
        println!("No data uploaded yet.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {}",
        style(&summary.filename).bold(),
        style(summary.uploaded_at.format("(uploaded %Y-%m-%d %H:%M:%S UTC)")).dim()
    );
    println!();
    for line in kpi_lines(&summary.stats) {
        println!("  {line}");
    }
    println!();
    println!("{}", style("Equipment types").bold());
    for line in distribution_lines(&summary.distribution) {
        println!("  {line}");
    }
    println!();
    println!("{}", style("Records").bold());
    for line in record_lines(&summary.data) {
        println!("  {line}");
    }
    Ok(())
}
