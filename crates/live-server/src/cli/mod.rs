//! Command-line interface definition.
//!
//! `live-server` has a single command. Every setting is optional on the
//! command line so that values from `live-server.json` and `LIVE_SERVER_*`
//! variables are only overridden by flags the user actually typed.

mod validation;

use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

pub use validation::{normalize_port, parse_port};

/// live-server - a development web server with live reloading
#[derive(Parser, Debug)]
#[command(
    name = "live-server",
    version,
    about = "A simple development server with live reloading",
    long_about = "live-server serves a directory over HTTP and reloads every open page\n\
                  when a file under that directory is written or removed.\n\
                  HTML pages get a small script injected before </head> that listens\n\
                  for reload notices on /ws."
)]
pub struct Cli {
    /// Directory to serve and watch [default: ./]
    #[arg(short = 'd', long, value_name = "DIR")]
    pub watch_dir: Option<PathBuf>,

    /// Port to listen on, with or without the leading colon [default: :8080]
    ///
    /// `1080` and `:1080` are equivalent.
    #[arg(short, long, value_parser = parse_port, value_name = "PORT")]
    pub port: Option<String>,

    /// Interface to bind [default: 127.0.0.1]
    #[arg(long, value_name = "HOST")]
    pub host: Option<IpAddr>,

    /// Open the served page in the default browser [default: true]
    ///
    /// `--browser` alone enables it, `--browser=false` disables it.
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    pub browser: Option<bool>,

    /// Path, relative to the watched directory, to open in the browser
    #[arg(long, value_name = "PATH")]
    pub open_file: Option<String>,

    /// Also watch directories created after startup
    ///
    /// Off by default: only directories that exist when the server starts
    /// are watched.
    #[arg(long)]
    pub watch_new_dirs: bool,

    /// Milliseconds to wait for a burst of changes to settle before reloading
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Configuration file [default: ./live-server.json when present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level, including each HTTP request)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
