//! Response text for executed commands.

use std::fmt::Display;

use crate::{KeyValueEntry, Point, Rect};

/// Format the result of `insert`.
pub fn format_insert<K: Display>(entry: &KeyValueEntry<K, Point>, inserted: bool) -> String {
    if inserted {
        format!("Point inserted: ({entry})")
    } else {
        format!("Point rejected: ({entry})")
    }
}

/// Format the result of `remove <name>`.
pub fn format_remove_by_key<K: Display>(name: &str, removed: Option<&KeyValueEntry<K, Point>>) -> String {
    match removed {
        Some(entry) => format!("Point removed: ({entry})"),
        None => format!("Point not removed: {name}"),
    }
}

/// Format the result of `remove <x> <y>`.
///
/// `valid` is false when the point failed bounds validation.
pub fn format_remove_by_point<K: Display>(
    point: Point,
    valid: bool,
    removed: Option<&KeyValueEntry<K, Point>>,
) -> String {
    if !valid {
        return format!("Point rejected: ({point})");
    }
    match removed {
        Some(entry) => format!("Point removed: ({entry})"),
        None => format!("Point not found: ({point})"),
    }
}

/// Format a rejected `regionsearch` rectangle.
pub fn format_region_rejected(region: &Rect) -> String {
    format!("Rectangle rejected: ({region})")
}

/// Format the result of `regionsearch`.
///
/// The matches sit on their own block between the header and the visited
/// count; with no matches that block is an empty line.
pub fn format_region_search<'a, K: Display + 'a>(
    region: &Rect,
    found: impl IntoIterator<Item = &'a KeyValueEntry<K, Point>>,
    nodes_visited: usize,
) -> String {
    let lines: Vec<String> = found
        .into_iter()
        .map(|entry| format!("Point found: ({entry})"))
        .collect();
    format!(
        "Points intersecting region ({region})\n{}\n{nodes_visited} quadtree nodes visited",
        lines.join("\n")
    )
}

/// Format the result of `search <name>`.
pub fn format_search<'a, K: Display + 'a>(
    name: &str,
    found: impl IntoIterator<Item = &'a KeyValueEntry<K, Point>>,
) -> String {
    let lines: Vec<String> = found.into_iter().map(|entry| format!("Found ({entry})")).collect();
    if lines.is_empty() {
        format!("Point not found: {name}")
    } else {
        lines.join("\n")
    }
}

/// Format the result of `duplicates`.
pub fn format_duplicates(points: &[Point]) -> String {
    let mut out = String::from("Duplicate points:");
    for point in points {
        out.push_str(&format!("\n({point})"));
    }
    out
}
