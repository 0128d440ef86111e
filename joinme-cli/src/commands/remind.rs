use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use joinme_core::notify::{TokioWorkScheduler, WorkScheduler};
use joinme_core::{AppContext, Repository};
use owo_colors::OwoColorize;
use tracing::debug;

use crate::render::pluralize;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let events = ctx.event_source().list().await?;

    let (scheduler, mut fired) = TokioWorkScheduler::new()?;
    let scheduler = Arc::new(scheduler);
    let notifier = ctx.notifier(scheduler.clone());

    let scheduled = notifier.schedule_all(&events, Utc::now());
    if scheduled == 0 {
        println!("{}", "No upcoming events to remind you about".dimmed());
        return Ok(());
    }
    println!(
        "Waiting on {} {} (Ctrl-C to stop)",
        scheduled,
        pluralize("reminder", scheduled)
    );

    loop {
        tokio::select! {
            Some(notification) = fired.recv() => {
                debug!(event_id = %notification.event_id, "reminder fired");
                println!(
                    "{} {} starts at {}",
                    "Reminder:".bold(),
                    notification.title,
                    notification.starts_at.with_timezone(&chrono::Local).format("%H:%M")
                );
                if scheduler.pending().is_empty() {
                    return Ok(());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                for tag in scheduler.pending() {
                    scheduler.cancel(&tag);
                }
                return Ok(());
            }
        }
    }
}
