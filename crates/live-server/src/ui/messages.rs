//! Status lines on stderr.

use owo_colors::{AnsiColors, OwoColorize};
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);
static COLOR: AtomicBool = AtomicBool::new(true);

/// Silence status lines (`--quiet`). Errors still reach the user through `main`.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Turn ANSI styling of status lines on or off (`--no-color`, `NO_COLOR`).
pub fn set_color(enabled: bool) {
    COLOR.store(enabled, Ordering::Relaxed);
}

pub fn color_enabled() -> bool {
    COLOR.load(Ordering::Relaxed)
}

fn line(symbol: &str, color: AnsiColors, message: &str, tint_message: bool) -> String {
    if !color_enabled() {
        return format!("{} {}", symbol, message);
    }
    if tint_message {
        format!("{} {}", symbol.color(color).bold(), message.color(color))
    } else {
        format!("{} {}", symbol.color(color).bold(), message)
    }
}

fn emit(symbol: &str, color: AnsiColors, message: &str, tint_message: bool) {
    if !is_quiet() {
        eprintln!("{}", line(symbol, color, message, tint_message));
    }
}

/// Print a success message.
///
/// ```no_run
/// live_server::ui::success("Serving ./public at http://localhost:8080");
/// ```
pub fn success(message: &str) {
    emit("✓", AnsiColors::Green, message, false);
}

pub fn info(message: &str) {
    emit("ℹ", AnsiColors::Blue, message, false);
}

pub fn warning(message: &str) {
    emit("⚠", AnsiColors::Yellow, message, true);
}
