use anyhow::Result;

use crate::client::ApiClient;
use crate::display::history_line;

pub fn run(client: &ApiClient) -> Result<()> {
    let entries = client.history()?;
    if entries.is_empty() {
        println!("No uploads retained.");
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        println!("{}", history_line(i, entry));
    }
    Ok(())
}
