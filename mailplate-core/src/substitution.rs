//! Single-pass placeholder substitution.
//!
//! The document is scanned left to right once. Fragment values are copied to
//! the output and never scanned again, so a value that happens to contain a
//! token is inserted literally.

use crate::types::{Fragments, Placeholder};

const DELIMITER: &str = "%%";
const TOKEN_PREFIX: &str = "%%EMAIL_";

/// Replace every recognised token in `html` with its fragment value.
pub fn substitute(html: &str, fragments: &Fragments) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(pos) = rest.find(DELIMITER) {
        let (before, candidate) = rest.split_at(pos);
        out.push_str(before);

        match Placeholder::ALL
            .into_iter()
            .find(|p| candidate.starts_with(p.token()))
        {
            Some(placeholder) => {
                out.push_str(fragments.get(placeholder).unwrap_or(""));
                rest = &candidate[placeholder.token().len()..];
            }
            None => {
                // Advance one byte so "%%%EMAIL_BODY%%" still matches at offset 1.
                out.push('%');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Find the first token-shaped marker (`%%EMAIL_[A-Z_]*%%`) in `text`.
///
/// Matches recognised tokens and unknown ones alike.
pub fn find_marker(text: &str) -> Option<&str> {
    let mut offset = 0;
    while let Some(pos) = text[offset..].find(TOKEN_PREFIX) {
        let start = offset + pos;
        let name_start = start + TOKEN_PREFIX.len();
        let tail = &text[name_start..];
        let name_len = tail
            .bytes()
            .take_while(|b| b.is_ascii_uppercase() || *b == b'_')
            .count();
        if tail[name_len..].starts_with(DELIMITER) {
            return Some(&text[start..name_start + name_len + DELIMITER.len()]);
        }
        offset = start + 1;
    }
    None
}
