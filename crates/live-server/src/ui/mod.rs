//! Human-facing status lines on stderr.
//!
//! Diagnostics go through `tracing`; these helpers are for the handful of
//! lines a user is expected to read (where the server lives, what it
//! watches, how to stop it).
//!
//! # Examples
//!
//! ```no_run
//! use live_server::ui;
//!
//! ui::success("Serving ./public at http://localhost:8080");
//! ui::info("Press Ctrl+C to stop");
//! ```

mod messages;

pub use messages::{color_enabled, info, is_quiet, set_color, set_quiet, success, warning};

/// Summarise a watch list for the startup banner.
///
/// Lists up to `limit` directories and counts the rest.
pub fn watch_summary(dirs: &[std::path::PathBuf], limit: usize) -> String {
    let shown: Vec<String> = dirs
        .iter()
        .take(limit)
        .map(|d| d.display().to_string())
        .collect();

    match dirs.len().saturating_sub(limit) {
        0 => shown.join(", "),
        rest => format!("{} (+{} more)", shown.join(", "), rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_watch_summary_short_list() {
        let dirs = vec![PathBuf::from("/site"), PathBuf::from("/site/css")];
        assert_eq!(watch_summary(&dirs, 5), "/site, /site/css");
    }

    #[test]
    fn test_watch_summary_truncates() {
        let dirs: Vec<PathBuf> = (0..4).map(|i| PathBuf::from(format!("/d{i}"))).collect();
        assert_eq!(watch_summary(&dirs, 2), "/d0, /d1 (+2 more)");
    }

    #[test]
    fn test_watch_summary_empty() {
        assert_eq!(watch_summary(&[], 3), "");
    }
}
