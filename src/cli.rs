//! Command-line interface for Switchboard
//!
//! Provides argument parsing and subcommand handling for the Switchboard binary.

use clap::{Parser, Subcommand};

/// Configuration and health dashboard for self-hosted AI endpoints
#[derive(Parser)]
#[command(name = "switchboard")]
#[command(version)]
#[command(about = "Configuration and health dashboard for self-hosted AI endpoints")]
#[command(
    long_about = "Switchboard registers AI-core services and model runners, polls their \
    health on a fixed interval, keeps a default target selected for the detail and chat \
    panels, and relays chat envelopes over an MQTT broker bridge."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Switchboard Configuration
# ==========================
#
# This file configures the HTTP server, endpoint stores, health probing,
# broker relay, and observability settings for Switchboard.

# ─────────────────────────────────────────────────────────────────────────────
# SERVER CONFIGURATION
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "127.0.0.1"

# Port to listen on
port = 3300

# Timeout for outbound requests such as system-prompt pushes, in seconds
request_timeout_seconds = 30

# ─────────────────────────────────────────────────────────────────────────────
# REGISTRY
# ─────────────────────────────────────────────────────────────────────────────
#
# Registered endpoints and message presets are persisted as flat JSON files
# (endpoints.json, presets.json) under this directory.

[registry]
data_dir = "data"

# ─────────────────────────────────────────────────────────────────────────────
# HEALTH PROBING
# ─────────────────────────────────────────────────────────────────────────────
#
# Every endpoint is probed concurrently each sweep. AI-core services are
# probed at {base_url}/health, model runners at {base_url}/api/tags.

[probe]
# Sweep period for the background scheduler
interval_seconds = 30

# Per-probe timeout; an endpoint that exceeds it is reported offline
timeout_seconds = 5

# ─────────────────────────────────────────────────────────────────────────────
# BROKER RELAY
# ─────────────────────────────────────────────────────────────────────────────
#
# Chat envelopes are published to publish_topic; assistant replies are
# expected on subscribe_topic.

[relay]
host = "127.0.0.1"
port = 1883
publish_topic = "switchboard/outbound"
subscribe_topic = "switchboard/inbound"

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"

# Prometheus metrics are always available at /metrics on the server port
"#
}
