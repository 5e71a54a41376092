//! Reload script injection for HTML pages.

use memchr::memmem;
use std::borrow::Cow;

/// Marker the script is inserted in front of.
pub const HEAD_CLOSE: &[u8] = b"</head>";

/// Script block added to every served HTML page.
///
/// Connects to `/ws` on the page's own host (secure scheme on https pages)
/// and reloads the page when the server sends `reload`.
pub const RELOAD_SCRIPT: &str = concat!(
    "<script>\n",
    include_str!("../../assets/reload-client.js"),
    "</script>\n"
);

/// Insert `script` immediately before the first `</head>` in `html`.
///
/// The match is exact and case-sensitive. Pages without a `</head>` are
/// returned untouched, so the result borrows from the input in that case.
pub fn inject_script<'a>(html: &'a [u8], script: &str) -> Cow<'a, [u8]> {
    let Some(pos) = memmem::find(html, HEAD_CLOSE) else {
        return Cow::Borrowed(html);
    };

    let mut out = Vec::with_capacity(html.len() + script.len());
    out.extend_from_slice(&html[..pos]);
    out.extend_from_slice(script.as_bytes());
    out.extend_from_slice(&html[pos..]);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_before_head_close() {
        let html = b"<html><head><title>t</title></head><body></body></html>";
        let out = inject_script(html, "<script>x</script>");
        assert_eq!(
            out.as_ref(),
            b"<html><head><title>t</title><script>x</script></head><body></body></html>"
        );
    }

    #[test]
    fn test_only_first_occurrence() {
        let html = b"<head></head><pre></head></pre>";
        let out = inject_script(html, "S");
        assert_eq!(out.as_ref(), b"<head>S</head><pre></head></pre>");
    }

    #[test]
    fn test_no_head_close_unchanged() {
        let html = b"<html><body>hi</body></html>";
        let out = inject_script(html, "<script>x</script>");
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.as_ref(), html);
    }

    #[test]
    fn test_uppercase_marker_not_matched() {
        let html = b"<HEAD></HEAD>";
        assert_eq!(inject_script(html, "S").as_ref(), html);
    }

    #[test]
    fn test_non_utf8_bytes_preserved() {
        let html = b"\xff\xfe<head></head>\x80";
        let out = inject_script(html, "S");
        assert_eq!(out.as_ref(), b"\xff\xfe<head>S</head>\x80");
    }

    #[test]
    fn test_reload_script_shape() {
        assert!(RELOAD_SCRIPT.starts_with("<script>"));
        assert!(RELOAD_SCRIPT.trim_end().ends_with("</script>"));
        assert!(RELOAD_SCRIPT.contains("location.host"));
        assert!(RELOAD_SCRIPT.contains("\"/ws\""));
        assert!(RELOAD_SCRIPT.contains("wss://"));
        assert!(RELOAD_SCRIPT.contains("\"reload\""));
        assert!(!RELOAD_SCRIPT.contains("</head>"));
    }
}
