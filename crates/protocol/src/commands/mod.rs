//! Command definitions for the pointdb line protocol.
//!
//! This module contains both the request grammar and the response formats.

mod request;
mod response;

pub use request::*;
pub use response::*;

/// Command verbs, as they appear at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Insert a named point.
    Insert,
    /// Remove by name or by coordinates.
    Remove,
    /// Report all points inside a rectangle.
    RegionSearch,
    /// Report all points with a name.
    Search,
    /// Report points held by more than one record.
    Duplicates,
    /// Print both index structures.
    Dump,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Insert => "insert",
            Verb::Remove => "remove",
            Verb::RegionSearch => "regionsearch",
            Verb::Search => "search",
            Verb::Duplicates => "duplicates",
            Verb::Dump => "dump",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "insert" => Some(Verb::Insert),
            "remove" => Some(Verb::Remove),
            "regionsearch" => Some(Verb::RegionSearch),
            "search" => Some(Verb::Search),
            "duplicates" => Some(Verb::Duplicates),
            "dump" => Some(Verb::Dump),
            _ => None,
        }
    }
}
