//! Providers command - list banks available through the provider

use anyhow::{Context, Result};
use comfy_table::Cell;

use super::{get_context, GlobalOpts};
use crate::output;

pub fn run(opts: GlobalOpts, json: bool) -> Result<()> {
    let ctx = get_context(opts)?;
    // Public endpoint, no session needed
    let providers = ctx.api.get_providers().context("Failed to list providers")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&providers)?);
        return Ok(());
    }

    if providers.is_empty() {
        output::warning("No providers available.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Code", "Name", "Country"]);
    for provider in &providers {
        table.add_row(vec![
            Cell::new(provider.code.as_deref().unwrap_or("")),
            Cell::new(provider.name.as_deref().unwrap_or("")),
            Cell::new(provider.country.as_deref().unwrap_or("")),
        ]);
    }
    println!("{table}");
    output::info(&format!("{} providers", providers.len()));
    Ok(())
}
