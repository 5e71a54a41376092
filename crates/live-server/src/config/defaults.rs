use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

pub fn default_watch_dir() -> PathBuf {
    PathBuf::from("./")
}

pub fn default_port() -> String {
    ":8080".to_string()
}

/// Loopback only; serving on every interface is opt-in via `--host 0.0.0.0`.
pub fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

pub fn default_browser() -> bool {
    true
}

pub fn default_debounce_ms() -> u64 {
    100
}
