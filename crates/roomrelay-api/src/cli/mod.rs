//! CLI command definitions for the `roomrelay` binary.
//!
//! Uses clap derive macros for argument parsing. Room commands operate on
//! the same database the HTTP server uses, so they work with or without a
//! running server.

pub mod room;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use roomrelay_types::message::{DEFAULT_ROOM_ID, DEFAULT_SENDER};

/// Relay chat rooms with 7-day history and AI replies.
#[derive(Parser)]
#[command(name = "roomrelay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Port to listen on (defaults to `server.port` from config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host` from config.toml).
        #[arg(long)]
        host: Option<String>,

        /// Export spans to stdout via OpenTelemetry.
        #[arg(long)]
        otel: bool,
    },

    /// Show a room's history (last 7 days).
    History {
        /// Room id.
        #[arg(default_value = DEFAULT_ROOM_ID)]
        room: String,
    },

    /// Send a message to a room and print the AI reply.
    Send {
        /// Room id.
        #[arg(long, short, default_value = DEFAULT_ROOM_ID)]
        room: String,

        /// Message text.
        text: String,

        /// Sender name.
        #[arg(long, default_value = DEFAULT_SENDER)]
        sender: String,
    },

    /// Append a message to a room without asking for a reply.
    Post {
        /// Room id.
        #[arg(long, short, default_value = DEFAULT_ROOM_ID)]
        room: String,

        /// Message text.
        text: String,

        /// Sender name.
        #[arg(long, default_value = DEFAULT_SENDER)]
        sender: String,
    },

    /// Show recent permanent log records for a room.
    Log {
        /// Room id.
        #[arg(default_value = DEFAULT_ROOM_ID)]
        room: String,

        /// Maximum number of records.
        #[arg(long, short = 'n', default_value_t = 20)]
        limit: u32,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
