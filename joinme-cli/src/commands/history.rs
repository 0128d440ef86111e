use anyhow::Result;
use chrono::Utc;
use joinme_core::AppContext;
use owo_colors::OwoColorize;

use super::into_items;
use crate::render::{pluralize, render_event_line};

pub async fn run(ctx: &AppContext) -> Result<()> {
    let now = Utc::now();
    let history = ctx.history();
    history.refresh_at(now).await;

    let events = into_items(history.state())?;
    if events.is_empty() {
        println!("{}", "No past events".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", render_event_line(event, now));
    }
    println!(
        "\n{} past {}",
        events.len(),
        pluralize("event", events.len())
    );

    Ok(())
}
