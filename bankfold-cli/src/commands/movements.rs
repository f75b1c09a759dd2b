//! Movements command - movements of one account or card

use std::collections::BTreeMap;

use anyhow::Result;
use comfy_table::Cell;

use bankfold_core::domain::DEFAULT_CURRENCY;
use bankfold_core::ports::MovementSource;
use bankfold_core::aggregate;

use super::{get_context, parse_window, with_session, GlobalOpts};
use crate::output;

pub fn run(
    opts: GlobalOpts,
    number: &str,
    card: bool,
    currency: Option<String>,
    from: Option<String>,
    to: Option<String>,
    json: bool,
) -> Result<()> {
    let window = parse_window(from.as_deref(), to.as_deref())?;
    let source = if card {
        MovementSource::CreditCard
    } else {
        MovementSource::Account
    };
    let ctx = get_context(opts)?;

    let (currency, movements) = with_session(&ctx, |token| {
        // Without --currency, use the one the provider lists for this number
        let currency = match currency {
            Some(c) => c,
            None => {
                let listed = match source {
                    MovementSource::Account => ctx
                        .api
                        .get_accounts(token)?
                        .into_iter()
                        .find(|a| a.number.as_deref() == Some(number))
                        .map(|a| a.currency_or_default().to_string()),
                    MovementSource::CreditCard => ctx
                        .api
                        .get_credit_cards(token)?
                        .into_iter()
                        .find(|c| c.number.as_deref() == Some(number))
                        .map(|c| c.currency_or_default().to_string()),
                };
                listed.unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
            }
        };
        let movements = ctx.api.get_movements(token, source, number, &currency, &window)?;
        Ok((currency, movements))
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&movements)?);
        return Ok(());
    }

    output::info(&format!("Movements for {} {} ({}, {})", source, number, currency, window));
    if movements.is_empty() {
        output::warning("No movements found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Detail", "Debit", "Credit"]);
    for movement in &movements {
        table.add_row(vec![
            Cell::new(output::display_value(movement.extra.get("date"))),
            Cell::new(output::display_value(movement.extra.get("detail"))),
            output::amount_cell(movement.debit),
            output::amount_cell(movement.credit),
        ]);
    }
    println!("{table}");

    let by_account = BTreeMap::from([(number.to_string(), movements)]);
    let totals = aggregate(&by_account);
    println!(
        "  Expenses: {}   Credits: {}   Balance: {}",
        output::format_amount(totals.expenses.get(number).copied()),
        output::format_amount(totals.credits.get(number).copied()),
        output::format_amount(totals.balance.get(number).copied()),
    );
    Ok(())
}
