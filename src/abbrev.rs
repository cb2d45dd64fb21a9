//! Shortening of paths and counts for column display.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

const ELLIPSIS: &str = "...";
const SI_PREFIXES: [&str; 9] = ["", "K", "M", "G", "T", "P", "E", "Z", "Y"];
const BINARY_PREFIXES: [&str; 9] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

/// Fit `path` into `max_width` columns by replacing part of it with `...`.
///
/// Tries, in order: the path unchanged; truncating the first single component long
/// enough to absorb the excess; replacing the span of whole components that removes the
/// fewest characters (never the entire path); keeping only the tail of the last
/// component. The path is used as given, without normalization.
pub fn abbrev_path(path: &Path, max_width: usize) -> String {
    let text = path.to_string_lossy();
    let len = text.chars().count();
    if len <= max_width {
        return text.into_owned();
    }
    if max_width < ELLIPSIS.len() {
        return ELLIPSIS[..max_width].to_string();
    }

    let mut parts = split_parts(path);
    let overage = len - max_width + ELLIPSIS.len();

    for part in parts.iter_mut() {
        let part_len = part.chars().count();
        let needed = if ends_with_separator(part) {
            overage + 1
        } else {
            overage
        };
        if part_len >= needed {
            let kept: String = part.chars().take(part_len - needed).collect();
            *part = kept + ELLIPSIS;
            return join_parts(&parts);
        }
    }

    // Deleting several components means the ellipsis brings back one separator.
    let overage = overage + 1;
    let mut spans: BTreeMap<usize, Vec<(usize, usize)>> = BTreeMap::new();
    for start in 0..parts.len() {
        for end in start + 1..=parts.len() {
            if start == 0 && end == parts.len() {
                break;
            }
            let deleted = chars_deleted(&parts, start, end);
            if deleted >= overage {
                spans.entry(deleted).or_default().push((start, end));
                break;
            }
        }
        if spans.contains_key(&overage) {
            break;
        }
    }

    match spans.values().next().and_then(|candidates| candidates.first()) {
        Some(&(start, end)) => {
            let mut kept: Vec<String> = parts[..start].to_vec();
            kept.push(ELLIPSIS.to_string());
            kept.extend_from_slice(&parts[end..]);
            join_parts(&kept)
        }
        None => {
            let last = parts.last().map(String::as_str).unwrap_or_default();
            let tail_len = max_width - ELLIPSIS.len();
            let skip = last.chars().count().saturating_sub(tail_len);
            let tail: String = last.chars().skip(skip).collect();
            format!("{}{}", ELLIPSIS, tail)
        }
    }
}

/// Render `count` with SI (`K`, `M`, ...) or binary (`KiB`, `MiB`, ...) prefixes, with
/// one decimal place unless the scaled value is whole.
pub fn abbrev_count(count: u64, use_si: bool) -> String {
    let (divisor, prefixes, separator) = if use_si {
        (1000.0, &SI_PREFIXES, "")
    } else {
        (1024.0, &BINARY_PREFIXES, " ")
    };

    let mut value = count as f64;
    let mut index = 0;
    while value.trunc() >= divisor && index < prefixes.len() - 1 {
        value /= divisor;
        index += 1;
    }

    if value.fract() == 0.0 {
        format!("{}{}{}", value as u64, separator, prefixes[index])
    } else {
        format!("{:.1}{}{}", value, separator, prefixes[index])
    }
}

/// Components as display strings; a drive prefix and root separator form one part.
fn split_parts(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut anchor = String::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => anchor.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::RootDir => anchor.push(MAIN_SEPARATOR),
            other => {
                if !anchor.is_empty() {
                    parts.push(std::mem::take(&mut anchor));
                }
                parts.push(other.as_os_str().to_string_lossy().into_owned());
            }
        }
    }
    if !anchor.is_empty() {
        parts.push(anchor);
    }
    parts
}

fn join_parts(parts: &[String]) -> String {
    let mut joined = PathBuf::new();
    for part in parts {
        joined.push(part);
    }
    joined.to_string_lossy().into_owned()
}

fn ends_with_separator(part: &str) -> bool {
    part.ends_with(MAIN_SEPARATOR) || (cfg!(windows) && part.ends_with(':'))
}

/// Characters removed, separators included, if `parts[start..end]` were dropped.
fn chars_deleted(parts: &[String], start: usize, end: usize) -> usize {
    let chars: usize = parts[start..end].iter().map(|p| p.chars().count()).sum();
    let deleted = chars + (end - start);
    if ends_with_separator(&parts[start]) {
        deleted - 1
    } else {
        deleted
    }
}
