//! Logging setup for the live server.
//!
//! Uses the `tracing` ecosystem. Verbosity comes from the global CLI flags,
//! with `RUST_LOG` taking over when neither `--verbose` nor `--quiet` is set.
//!
//! # Example
//!
//! ```rust,no_run
//! use live_server::logger::init_logger;
//! use tracing::{debug, info};
//!
//! init_logger(false, false, false);
//!
//! info!("Serving ./public");
//! debug!(path = "index.html", "Injected reload script");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used with `--verbose`: our own debug output plus per-request traces.
pub const VERBOSE_FILTER: &str = "live_server=debug,tower_http=debug";

/// Filter used with `--quiet`.
pub const QUIET_FILTER: &str = "live_server=error";

/// Filter used when neither flag nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "live_server=info";

/// Initialize the tracing subscriber with the specified options.
///
/// Call once, before anything logs. The level is picked in this order:
/// 1. `--verbose`: debug for this crate and HTTP request traces
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. info for this crate
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(select_filter(verbose, quiet), no_color);
}

/// Initialize logger with a custom environment filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    // A second init (e.g. from a test harness) is not fatal.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn select_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Check if colored output should be enabled.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise the terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}
