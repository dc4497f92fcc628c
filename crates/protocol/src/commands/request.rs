//! Command line parsing.

use std::str::SplitWhitespace;

use super::Verb;
use crate::{Point, ProtocolError, Rect};

/// Parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `insert <name> <x> <y>`
    Insert { name: String, point: Point },
    /// `remove <name>`
    RemoveByKey { name: String },
    /// `remove <x> <y>`
    RemoveByPoint { point: Point },
    /// `regionsearch <x> <y> <w> <h>`
    RegionSearch { region: Rect },
    /// `search <name>`
    Search { name: String },
    /// `duplicates`
    Duplicates,
    /// `dump`
    Dump,
}

impl Command {
    /// Parse one command line.
    ///
    /// Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ProtocolError> {
        let mut tokens = Tokens::new(line);
        let Some(head) = tokens.inner.next() else {
            return Ok(None);
        };
        let verb = Verb::parse(head).ok_or_else(|| ProtocolError::UnknownCommand(head.to_string()))?;
        tokens.command = verb.as_str();

        let command = match verb {
            Verb::Insert => {
                let name = tokens.word("name")?;
                let x = tokens.int("x")?;
                let y = tokens.int("y")?;
                Command::Insert {
                    name,
                    point: Point::new(x, y),
                }
            }
            Verb::Remove => {
                // One argument is a name, two are coordinates.
                let first = tokens.word("name")?;
                match tokens.inner.next() {
                    None => Command::RemoveByKey { name: first },
                    Some(second) => Command::RemoveByPoint {
                        point: Point::new(parse_int(&first)?, parse_int(second)?),
                    },
                }
            }
            Verb::RegionSearch => {
                let x = tokens.int("x")?;
                let y = tokens.int("y")?;
                let w = tokens.int("w")?;
                let h = tokens.int("h")?;
                Command::RegionSearch {
                    region: Rect::new(x, y, w, h),
                }
            }
            Verb::Search => Command::Search {
                name: tokens.word("name")?,
            },
            Verb::Duplicates => Command::Duplicates,
            Verb::Dump => Command::Dump,
        };

        tokens.finish()?;
        Ok(Some(command))
    }

    pub fn verb(&self) -> Verb {
        match self {
            Command::Insert { .. } => Verb::Insert,
            Command::RemoveByKey { .. } | Command::RemoveByPoint { .. } => Verb::Remove,
            Command::RegionSearch { .. } => Verb::RegionSearch,
            Command::Search { .. } => Verb::Search,
            Command::Duplicates => Verb::Duplicates,
            Command::Dump => Verb::Dump,
        }
    }
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
    command: &'static str,
}

impl<'a> Tokens<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            inner: line.split_whitespace(),
            command: "",
        }
    }

    fn next(&mut self, argument: &'static str) -> Result<&'a str, ProtocolError> {
        self.inner.next().ok_or(ProtocolError::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn word(&mut self, argument: &'static str) -> Result<String, ProtocolError> {
        self.next(argument).map(str::to_string)
    }

    fn int(&mut self, argument: &'static str) -> Result<i32, ProtocolError> {
        parse_int(self.next(argument)?)
    }

    fn finish(mut self) -> Result<(), ProtocolError> {
        match self.inner.next() {
            None => Ok(()),
            Some(extra) => Err(ProtocolError::UnexpectedArgument {
                command: self.command,
                argument: extra.to_string(),
            }),
        }
    }
}

fn parse_int(token: &str) -> Result<i32, ProtocolError> {
    token.parse().map_err(|source| ProtocolError::InvalidNumber {
        value: token.to_string(),
        source,
    })
}
