use anyhow::Result;
use chrono::Utc;
use joinme_core::AppContext;
use owo_colors::OwoColorize;

use super::into_items;
use crate::render::render_event_line;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let now = Utc::now();
    let feed = ctx.feed();
    feed.refresh_at(now).await;

    let events = into_items(feed.state())?;
    if events.is_empty() {
        println!("{}", "No upcoming events".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", render_event_line(event, now));
    }

    Ok(())
}
