use anyhow::{Context, Result};
use chrono::Utc;
use joinme_core::deep_link::DeepLink;
use joinme_core::{AppContext, JoinMeConfig, Repository};

use crate::render::render_event_details;

/// Accepts a bare event id or a deep link to one.
pub async fn run(ctx: &AppContext, event: &str) -> Result<()> {
    let scheme = &ctx.config.deep_links.scheme;
    let event_id = if event.contains("://") {
        DeepLink::parse(event, scheme)?.event_id().to_string()
    } else {
        event.to_string()
    };

    let found = ctx
        .event_source()
        .get(&event_id)
        .await?
        .with_context(|| format!("Event '{event_id}' not found"))?;

    for line in render_event_details(&found, Utc::now()) {
        println!("{line}");
    }

    Ok(())
}

pub fn link(config: &JoinMeConfig, event_id: &str) -> Result<()> {
    let link = DeepLink::Event {
        id: event_id.to_string(),
    };
    println!("{}", link.to_uri(&config.deep_links.scheme));
    Ok(())
}
