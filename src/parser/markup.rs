// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tolerant scanning of the firmware's HTML fragments.
//!
//! The legacy pages are small, machine-generated and frequently leave
//! `</tr>` and `</td>` out, so these helpers scan for tag openings
//! case-insensitively instead of building a DOM. A row or cell ends at
//! its closing tag, at the next sibling opening, or at the end of input.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b([^>]*)>").expect("valid regex"));

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+)))?"#)
        .expect("valid regex")
});

/// Returns the inner HTML of every `<tr>` element.
pub(crate) fn rows(html: &str) -> Vec<&str> {
    blocks(html, "tr", &["tr", "table", "tbody"])
}

/// Returns the text of every `<td>` cell in a row.
pub(crate) fn cells(row: &str) -> Vec<String> {
    blocks(row, "td", &["td"])
        .into_iter()
        .map(text)
        .collect()
}

/// Strips tags, decodes the common entities and collapses whitespace.
pub(crate) fn text(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the attributes of the first `<input>` whose `id` matches.
///
/// Attribute names are lower-cased; bare attributes such as `checked`
/// map to an empty string.
pub(crate) fn input_by_id(html: &str, id: &str) -> Option<HashMap<String, String>> {
    INPUT_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|attrs| attributes(attrs.as_str()))
        .find(|attrs| attrs.get("id").is_some_and(|value| value == id))
}

fn attributes(source: &str) -> HashMap<String, String> {
    ATTR_RE
        .captures_iter(source)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or_else(String::new, |m| m.as_str().to_string());
            Some((name, value))
        })
        .collect()
}

/// Finds each `<tag ...>` opening and returns the content up to the
/// closing tag or the next opening of `tag` or any of `stops`.
fn blocks<'a>(html: &'a str, tag: &str, stops: &[&str]) -> Vec<&'a str> {
    // ASCII lower-casing keeps byte offsets identical to the original.
    let lower = html.to_ascii_lowercase();
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(start) = find_open(&lower, tag, cursor) {
        let Some(tag_end) = lower[start..].find('>').map(|i| start + i + 1) else {
            break;
        };

        let close = format!("</{tag}");
        let mut end = lower.len();
        if let Some(i) = lower[tag_end..].find(&close) {
            end = end.min(tag_end + i);
        }
        for stop in stops {
            if let Some(i) = find_open(&lower, stop, tag_end) {
                end = end.min(i);
            }
            if *stop != tag
                && let Some(i) = lower[tag_end..].find(&format!("</{stop}"))
            {
                end = end.min(tag_end + i);
            }
        }

        found.push(&html[tag_end..end]);
        cursor = end.max(tag_end);
    }

    found
}

/// Finds `<tag` followed by whitespace, `>` or `/` at or after `from`.
fn find_open(lower: &str, tag: &str, from: usize) -> Option<usize> {
    let needle = format!("<{tag}");
    let mut offset = from;
    while let Some(i) = lower.get(offset..)?.find(&needle) {
        let at = offset + i;
        let next = lower.as_bytes().get(at + needle.len()).copied();
        if matches!(next, Some(b'>' | b'/' | b' ' | b'\t' | b'\r' | b'\n') | None) {
            return Some(at);
        }
        offset = at + needle.len();
    }
    None
}
