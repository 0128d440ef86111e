use anyhow::Result;
use joinme_core::AppContext;
use owo_colors::OwoColorize;

use crate::render::pluralize;

pub async fn run(ctx: &AppContext) -> Result<()> {
    if ctx.is_offline() {
        anyhow::bail!("Cannot sync while offline");
    }

    let (events, groups) = ctx.sync().await?;

    println!(
        "Synced {} {} and {} {} to {}",
        events,
        pluralize("event", events),
        groups,
        pluralize("group", groups),
        ctx.config.cache_dir()?.display().dimmed()
    );
    Ok(())
}
