//! Mapping request paths onto files under the served root.

use percent_encoding::percent_decode_str;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// File served when a request names a directory.
pub const INDEX_DOCUMENT: &str = "index.html";

/// Why a request path did not resolve to a servable file.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Nothing to serve at that path
    #[error("not found")]
    NotFound,

    /// The path tried to leave the served root (`..`, symlinks pointing out)
    #[error("path escapes the served root")]
    OutsideRoot,

    /// The file exists but could not be inspected
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ResolveError {
    /// Client-side failures answer 404; only [`ResolveError::Io`] is a server fault.
    pub fn is_not_found(&self) -> bool {
        !matches!(self, ResolveError::Io(_))
    }
}

/// A request path resolved to a regular file inside the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    path: PathBuf,
    html: bool,
}

impl ResolvedFile {
    /// Canonical location on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the requested name ends in `.html` and gets the reload script.
    pub fn is_html(&self) -> bool {
        self.html
    }
}

/// Resolve `request_path` (the URL path, still percent-encoded) under `root`.
///
/// `root` must already be canonical. Directories resolve to their
/// [`INDEX_DOCUMENT`]; the final file must exist, be a regular file and
/// canonicalize to a location under `root`.
pub fn resolve(root: &Path, request_path: &str) -> Result<ResolvedFile, ResolveError> {
    let relative = sanitize(request_path)?;
    let mut candidate = root.join(relative);

    let meta = metadata(&candidate)?;
    if meta.is_dir() {
        candidate.push(INDEX_DOCUMENT);
        if !metadata(&candidate)?.is_file() {
            return Err(ResolveError::NotFound);
        }
    } else if !meta.is_file() {
        return Err(ResolveError::NotFound);
    }

    let canonical = candidate.canonicalize()?;
    if !canonical.starts_with(root) {
        return Err(ResolveError::OutsideRoot);
    }

    let html = candidate
        .extension()
        .is_some_and(|ext| ext == "html");

    Ok(ResolvedFile {
        path: canonical,
        html,
    })
}

/// Decode the URL path and turn it into a relative path of plain segments.
fn sanitize(request_path: &str) -> Result<PathBuf, ResolveError> {
    let decoded = percent_decode_str(request_path)
        .decode_utf8()
        .map_err(|_| ResolveError::NotFound)?;

    let mut relative = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(ResolveError::OutsideRoot),
            s if s.contains(['\0', '\\']) => return Err(ResolveError::NotFound),
            s => {
                // Catches drive prefixes such as `C:` on Windows.
                let plain = Path::new(s)
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
                if !plain {
                    return Err(ResolveError::OutsideRoot);
                }
                relative.push(s);
            }
        }
    }

    Ok(relative)
}

fn metadata(path: &Path) -> Result<std::fs::Metadata, ResolveError> {
    std::fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => ResolveError::NotFound,
        _ => ResolveError::Io(e),
    })
}
