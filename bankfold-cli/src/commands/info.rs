//! Info command - show the logged-in user

use anyhow::Result;
use colored::Colorize;

use super::{get_context, with_session, GlobalOpts};
use crate::output;

pub fn run(opts: GlobalOpts, json: bool) -> Result<()> {
    let ctx = get_context(opts)?;
    let info = with_session(&ctx, |token| ctx.api.get_info(token))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} {}", "User at".bold(), ctx.config.credentials.provider);
    output::print_object(&info);
    Ok(())
}
