//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Right-aligned amount cell; absent amounts render as "-"
pub fn amount_cell(amount: Option<Decimal>) -> Cell {
    Cell::new(format_amount(amount)).set_alignment(CellAlignment::Right)
}

/// Two-decimal rendering of an optional amount
pub fn format_amount(amount: Option<Decimal>) -> String {
    match amount {
        Some(a) => format!("{:.2}", a),
        None => "-".to_string(),
    }
}

/// Balance cell colored by sign
pub fn balance_cell(balance: Option<Decimal>) -> Cell {
    let text = format_amount(balance);
    let text = match balance {
        Some(b) if b.is_sign_negative() && !b.is_zero() => text.red().to_string(),
        Some(b) if !b.is_zero() => text.green().to_string(),
        _ => text,
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Plain text for a JSON scalar (strings without quotes)
pub fn display_value(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Print a flat JSON object as aligned key/value lines
pub fn print_object(value: &JsonValue) {
    match value.as_object() {
        Some(map) if !map.is_empty() => {
            let width = map.keys().map(String::len).max().unwrap_or(0);
            for (key, v) in map {
                println!("  {:width$}  {}", key.dimmed(), display_value(Some(v)), width = width);
            }
        }
        _ => println!("  {}", "(none)".dimmed()),
    }
}
