//! Minimal section lookup over markdown artifacts.
//!
//! Not a markdown parser: only ATX headings and `-`/`*` bullets are recognized.

use std::collections::HashSet;

/// Heading level of a line (`## Goal` -> 2), or `None` if it is not a heading.
fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match line[hashes..].chars().next() {
        Some(' ') | Some('\t') => Some(hashes),
        None => Some(hashes),
        _ => None,
    }
}

fn heading_text(line: &str, level: usize) -> &str {
    line[level..].trim()
}

/// Text of the first level-1 heading.
pub fn title(content: &str) -> Option<String> {
    content
        .lines()
        .find(|line| heading_level(line) == Some(1))
        .map(|line| heading_text(line, 1).to_string())
        .filter(|t| !t.is_empty())
}

/// Body of the section headed `heading` at `level`, up to the next heading
/// of the same or a higher level. Matching is case-insensitive; the body is
/// trimmed. Returns `None` when the heading is absent.
pub fn section(content: &str, level: usize, heading: &str) -> Option<String> {
    let mut lines = content.lines();

    lines.find(|line| {
        heading_level(line) == Some(level)
            && heading_text(line, level).eq_ignore_ascii_case(heading)
    })?;

    let body: Vec<&str> = lines
        .take_while(|line| heading_level(line).map_or(true, |l| l > level))
        .collect();

    Some(body.join("\n").trim().to_string())
}

/// First non-empty line of a section.
pub fn first_line(body: &str) -> String {
    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Value of a `- <label>: value` bullet anywhere in the document.
pub fn labeled_bullet(content: &str, label: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let item = line.trim_start().strip_prefix("- ")?;
        let value = item.trim_start().strip_prefix(label)?.strip_prefix(':')?;
        Some(value.trim().to_string())
    })
}

/// Bullet items of a block with code ticks stripped, deduplicated in order.
pub fn bullet_items(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    body.lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
        })
        .map(|item| item.trim().trim_matches('`').trim().to_string())
        .filter(|item| !item.is_empty() && !item.eq_ignore_ascii_case("(none)"))
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
