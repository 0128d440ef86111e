mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use joinme_core::{AppContext, JoinMeConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "joinme")]
#[command(about = "Discover and join activities near you")]
struct Cli {
    /// Serve from the last synced snapshot instead of the remote store
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upcoming and ongoing events
    Events,
    /// Events that already ended, most recent first
    History,
    Groups,
    /// Show one event by id or deep link
    Show { event: String },
    /// Print the deep link for an event
    Link { event_id: String },
    Join {
        event_id: String,
        #[arg(short, long)]
        user: String,
    },
    Quit {
        event_id: String,
        #[arg(short, long)]
        user: String,
    },
    /// Leave a group
    Leave {
        group_id: String,
        #[arg(short, long)]
        user: String,
    },
    /// Refresh local snapshots from the remote store
    Sync,
    /// Stay running and print reminders before upcoming events start
    Remind,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = JoinMeConfig::load()?;

    match cli.command {
        Commands::Link { event_id } => commands::show::link(&config, &event_id),
        command => {
            debug!(offline = cli.offline, "building app context");
            let ctx = if cli.offline {
                AppContext::offline(config).await?
            } else {
                AppContext::from_config(config)?
            };
            run(command, &ctx).await
        }
    }
}

async fn run(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Events => commands::events::run(ctx).await,
        Commands::History => commands::history::run(ctx).await,
        Commands::Groups => commands::groups::run(ctx).await,
        Commands::Show { event } => commands::show::run(ctx, &event).await,
        Commands::Join { event_id, user } => commands::join::join(ctx, &event_id, &user).await,
        Commands::Quit { event_id, user } => commands::join::quit(ctx, &event_id, &user).await,
        Commands::Leave { group_id, user } => commands::groups::leave(ctx, &group_id, &user).await,
        Commands::Sync => commands::sync::run(ctx).await,
        Commands::Remind => commands::remind::run(ctx).await,
        Commands::Link { event_id } => commands::show::link(&ctx.config, &event_id),
    }
}
