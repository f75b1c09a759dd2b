//! Accounts command - list bank accounts

use anyhow::Result;
use comfy_table::Cell;

use super::{get_context, with_session, GlobalOpts};
use crate::output;

pub fn run(opts: GlobalOpts, json: bool) -> Result<()> {
    let ctx = get_context(opts)?;
    let accounts = with_session(&ctx, |token| ctx.api.get_accounts(token))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    if accounts.is_empty() {
        output::warning("No accounts found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Number", "Name", "Currency", "Balance"]);
    for account in &accounts {
        table.add_row(vec![
            Cell::new(account.number.as_deref().unwrap_or("-")),
            Cell::new(account.name.as_deref().unwrap_or("")),
            Cell::new(account.currency_or_default()),
            output::amount_cell(account.balance),
        ]);
    }
    println!("{table}");
    Ok(())
}
