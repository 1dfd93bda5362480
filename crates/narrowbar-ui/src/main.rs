//! narrowbar - command line entry point.
//!
//! Renders a topic list from a JSON snapshot of client state.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use narrowbar_core::{AppConfig, StreamId};
use narrowbar_ui::{Element, Snapshot, TopicListBuilder};

/// narrowbar - search bar and topic list tools
#[derive(Parser, Debug)]
#[command(name = "narrowbar")]
#[command(version)]
#[command(about = "Render chat client widgets from state snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Render the recent topics of a stream
    Topics {
        /// JSON snapshot of streams, messages and unread counts
        snapshot: PathBuf,

        /// Stream to list topics for
        stream_id: u64,

        /// Topic to mark as active
        active_topic: Option<String>,
    },
}

// =============================================================================
// Configuration
// =============================================================================

/// Load the user's config, degrading to defaults on error.
fn load_config() -> AppConfig {
    match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Config error: {} - using defaults", e);
            AppConfig::default()
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Render the topic list for one stream and return the markup.
fn render_topics(
    config: &AppConfig,
    snapshot_path: &Path,
    stream_id: StreamId,
    active_topic: Option<&str>,
) -> Result<String, String> {
    let text = std::fs::read_to_string(snapshot_path)
        .map_err(|e| format!("Failed to read {}: {}", snapshot_path.display(), e))?;
    let snapshot = Snapshot::from_json(&text)
        .map_err(|e| format!("Invalid snapshot {}: {}", snapshot_path.display(), e))?;
    tracing::info!("Loaded snapshot from {}", snapshot_path.display());

    let builder = TopicListBuilder::new(snapshot.into_stores());
    let parent = Element::new("div");
    let widget = builder
        .build_widget(&parent, stream_id, active_topic, config.topics.max_topics)
        .map_err(|e| e.to_string())?;

    tracing::info!(
        "Rendered {} topic(s) for stream {}",
        widget.num_items(),
        widget.get_stream_id()
    );
    Ok(widget.get_dom().to_string())
}

fn run(command: Command, config: &AppConfig) -> Result<String, String> {
    match command {
        Command::Topics {
            snapshot,
            stream_id,
            active_topic,
        } => render_topics(
            config,
            &snapshot,
            StreamId(stream_id),
            active_topic.as_deref(),
        ),
    }
}

// =============================================================================
// Entry Point
// =============================================================================

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config();
    match run(cli.command, &config) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
