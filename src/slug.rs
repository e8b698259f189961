// File name sanitization.
// Local names can hold spaces, brackets and other characters that are
// awkward in URLs and remote shells. Remote names are built from the
// base name only: lowercase it, squash everything outside
// `[A-Za-z0-9._~+-]` into single hyphens, then percent-encode the result
// as one URL path segment.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9._~+-]+").expect("slug pattern is a valid regex")
});

/// Everything except the RFC 3986 unreserved characters gets escaped.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Turn `name` into a token safe for a URL path segment and a remote path.
///
/// The result may be empty when `name` has no allowed characters at all.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    DISALLOWED
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Percent-encode `segment` with no extra safe characters.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Remote name for a local path: the encoded slug of its base name.
///
/// Returns `None` when the slug comes out empty.
pub fn remote_name(path: &Path) -> Option<String> {
    let base = path.file_name()?.to_string_lossy();
    let slug = slugify(&base);
    if slug.is_empty() {
        return None;
    }
    Some(encode_segment(&slug))
}
