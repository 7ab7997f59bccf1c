//! Link extraction from bulk subscription text
//!
//! Subscription bodies arrive as plain link lists, as one Base64 blob, or as
//! a mix where individual lines are Base64 encoded. Extraction decodes what
//! looks like strict Base64 and scans every resulting text for links with a
//! recognized scheme prefix.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::base64::decode_strict;
use super::protocols::SUPPORTED_PROTOCOLS;

/// Shortest line considered for per-line Base64 decoding
const MIN_ENCODED_LINE_LEN: usize = 20;

// ============================================================================
// Link Set
// ============================================================================

/// Distinct links in first-seen order
#[derive(Debug, Default)]
struct LinkSet {
    links: Vec<String>,
    seen: HashSet<String>,
}

impl LinkSet {
    fn insert(&mut self, link: &str) {
        if self.seen.insert(link.to_string()) {
            self.links.push(link.to_string());
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.links
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Extracts distinct candidate links from free-form text
///
/// The whole input is decoded first if it is strict Base64. Every line of
/// the resulting text that is at least 20 characters of strict Base64 is
/// decoded and scanned as well, so a blob may carry encoded link lines.
/// Links are returned in first-seen order.
pub fn extract_links(input: &str) -> Vec<String> {
    let mut found = LinkSet::default();
    extract_into(input, &mut found);
    found.into_vec()
}

/// Extracts distinct candidate links from several text blobs
///
/// Duplicates across blobs are reported once.
pub fn extract_links_from_many<I, S>(inputs: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut found = LinkSet::default();
    for input in inputs {
        extract_into(input.as_ref(), &mut found);
    }
    found.into_vec()
}

fn extract_into(input: &str, found: &mut LinkSet) {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return;
    }

    let before = found.links.len();
    let text = match decode_strict(trimmed) {
        Some(bytes) => {
            debug!("Input is Base64 encoded ({} bytes decoded)", bytes.len());
            String::from_utf8_lossy(&bytes).into_owned()
        }
        None => trimmed.to_string(),
    };
    scan_links(&text, found);

    for line in text.lines().map(str::trim) {
        if line.len() < MIN_ENCODED_LINE_LEN {
            continue;
        }
        if let Some(bytes) = decode_strict(line) {
            trace!("Decoded Base64 line of {} bytes", line.len());
            scan_links(&String::from_utf8_lossy(&bytes), found);
        }
    }

    debug!("Extracted {} new link(s)", found.links.len() - before);
}

/// Collects every link starting at a scheme prefix and running to the next
/// whitespace
///
/// Matches are taken leftmost first and scanning resumes after each match,
/// so a prefix glued to a label (`node1vless://`) is found while `ss://`
/// inside `vmess://` is not.
fn scan_links(text: &str, found: &mut LinkSet) {
    let mut pos = 0;
    while pos < text.len() {
        if !text.is_char_boundary(pos) {
            pos += 1;
            continue;
        }

        let rest = &text[pos..];
        if !SUPPORTED_PROTOCOLS.iter().any(|prefix| rest.starts_with(prefix)) {
            pos += 1;
            continue;
        }

        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        trace!("Found link candidate at offset {}", pos);
        found.insert(&rest[..len]);
        pos += len;
    }
}
