use anyhow::Result;
use joinme_core::AppContext;
use joinme_core::group::leave_group;
use owo_colors::OwoColorize;

use super::into_items;
use crate::render::Render;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let view = ctx.groups_view();
    view.refresh().await;

    let groups = into_items(view.state())?;
    if groups.is_empty() {
        println!("{}", "No groups".dimmed());
        return Ok(());
    }

    for group in &groups {
        println!("  {}", group.render());
    }

    Ok(())
}

pub async fn leave(ctx: &AppContext, group_id: &str, user: &str) -> Result<()> {
    let source = ctx.group_source();
    let group = leave_group(source.as_ref(), group_id, user).await?;

    println!("{} left {}", user, group.name.bold());
    Ok(())
}
