use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{
    stats, DashboardClient, DashboardEvent, DurableFocusStore, EphemeralFocusStore, FocusStore,
    Snapshot,
};
use shared::domain::PanelId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser, Debug)]
struct Args {
    /// Backend base URL, e.g. http://localhost:8001
    #[arg(long)]
    server_url: Option<String>,
    /// SQLite database for the saved focus; omit to keep focus in memory
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut settings = config::load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(database_url) = args.database_url {
        settings.database_url = Some(database_url);
    }
    config::validate_server_url(&settings.server_url)?;

    let focus_store: Arc<dyn FocusStore> = match settings.database_url.as_deref() {
        Some(database_url) => DurableFocusStore::initialize(database_url).await?,
        None => Arc::new(EphemeralFocusStore::default()),
    };

    let client = DashboardClient::new(settings.server_url, focus_store);
    let mut events = BroadcastStream::new(client.subscribe_events());

    client.load_schedule().await?;
    if let Err(err) = client.connect().await {
        warn!("live updates unavailable: {err}");
    }

    render(&client.snapshot().await);
    println!("Type a panel number (1-4) to toggle focus, or q to quit.");

    let mut input_lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.next() => match event {
                Some(Ok(DashboardEvent::Error(message))) => warn!("dashboard error: {message}"),
                Some(Ok(DashboardEvent::ConnectionClosed)) => {
                    warn!("push channel closed; the dashboard is no longer live");
                }
                Some(Ok(_)) => render(&client.snapshot().await),
                Some(Err(_)) => {} // lagged behind; the next event re-renders anyway
                None => break,
            },
            line = input_lines.next_line() => match line? {
                Some(line) => {
                    let line = line.trim();
                    if line.eq_ignore_ascii_case("q") {
                        break;
                    }
                    match line.parse::<i64>() {
                        Ok(n @ 1..=4) => client.select_panel(PanelId(n)).await?,
                        _ => println!("expected a panel number 1-4, or q"),
                    }
                }
                None => break,
            },
        }
    }

    client.disconnect().await;
    Ok(())
}

fn render(snapshot: &Snapshot) {
    if snapshot.loading {
        println!("Loading...");
        return;
    }
    println!();
    for panel in stats::visible_panels(snapshot) {
        let marker = if snapshot.focus == Some(panel.id) {
            "*"
        } else {
            " "
        };
        println!("{marker} [{}] {:<24} {}", panel.id.0, panel.label, panel.value);
    }
}
