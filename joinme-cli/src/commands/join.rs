use anyhow::Result;
use joinme_core::AppContext;
use joinme_core::event::{join_event, quit_event};
use owo_colors::OwoColorize;

pub async fn join(ctx: &AppContext, event_id: &str, user: &str) -> Result<()> {
    let source = ctx.event_source();
    let event = join_event(source.as_ref(), event_id, user).await?;

    println!(
        "{} joined {} {}",
        user,
        event.title.bold(),
        format!("({}/{})", event.participants.len(), event.max_participants).dimmed()
    );
    Ok(())
}

pub async fn quit(ctx: &AppContext, event_id: &str, user: &str) -> Result<()> {
    let source = ctx.event_source();
    let event = quit_event(source.as_ref(), event_id, user).await?;

    println!("{} left {}", user, event.title.bold());
    Ok(())
}
