/// Add the leading colon to a port value if it is missing.
///
/// `"1080"` becomes `":1080"`; `":1080"` is returned as is.
pub fn normalize_port(port: &str) -> String {
    if port.starts_with(':') {
        port.to_string()
    } else {
        format!(":{}", port)
    }
}

/// Parse and normalize a `--port` value.
///
/// Accepts `8080` or `:8080`; anything that is not a valid TCP port after
/// the colon is rejected.
///
/// # Errors
///
/// Returns an error message if the value is empty or not a number in
/// `0..=65535`.
pub fn parse_port(s: &str) -> Result<String, String> {
    let normalized = normalize_port(s.trim());
    let digits = &normalized[1..];

    if digits.is_empty() {
        return Err("Port cannot be empty".to_string());
    }

    digits
        .parse::<u16>()
        .map(|_| normalized.clone())
        .map_err(|_| format!("Port must be a number between 0 and 65535: '{}'", s))
}
