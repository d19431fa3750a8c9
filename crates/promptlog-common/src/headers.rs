//! Stable textual dump of a header map for the audit log.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

/// One `name: value` line per header value, sorted, joined with `\n`.
/// Names are lower-case; credentials in `authorization` are masked.
pub fn dump_headers(headers: &HeaderMap) -> String {
    let mut lines: Vec<String> = headers
        .iter()
        .map(|(name, value)| {
            let value = if *name == AUTHORIZATION {
                mask_credentials(value)
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            format!("{}: {}", name.as_str(), value)
        })
        .collect();
    lines.sort();
    lines.join("\n")
}

fn mask_credentials(value: &HeaderValue) -> String {
    let raw = String::from_utf8_lossy(value.as_bytes());
    match raw.split_once(' ') {
        Some((scheme, _)) => format!("{scheme} ***"),
        None => "***".to_string(),
    }
}
