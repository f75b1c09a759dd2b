//! Cards command - list credit cards

use anyhow::Result;
use comfy_table::Cell;

use super::{get_context, with_session, GlobalOpts};
use crate::output;

pub fn run(opts: GlobalOpts, json: bool) -> Result<()> {
    let ctx = get_context(opts)?;
    let cards = with_session(&ctx, |token| ctx.api.get_credit_cards(token))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    if cards.is_empty() {
        output::warning("No credit cards found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Number", "Name", "Currency", "Local balance", "Dollar balance"]);
    for card in &cards {
        table.add_row(vec![
            Cell::new(card.number.as_deref().unwrap_or("-")),
            Cell::new(card.name.as_deref().unwrap_or("")),
            Cell::new(card.currency_or_default()),
            output::amount_cell(card.balance_local),
            output::amount_cell(card.balance_dollar),
        ]);
    }
    println!("{table}");
    Ok(())
}
