//! Command execution.
//!
//! Parsed [`Command`]s run against a [`Database`] keyed by name; each one
//! yields the response text defined in `protocol::commands`.

use std::io::{self, BufRead, Write};

use protocol::commands::{self, Command};
use protocol::KeyValueEntry;
use tracing::{debug, warn};

use crate::config::Config;
use crate::database::Database;
use crate::IndexError;

/// Executes commands against a name-keyed point database.
#[derive(Debug)]
pub struct CommandProcessor {
    db: Database<String>,
}

impl CommandProcessor {
    pub fn new(db: Database<String>) -> Self {
        Self { db }
    }

    pub fn from_config(config: &Config) -> Result<Self, IndexError> {
        Ok(Self::new(Database::from_config(config)?))
    }

    pub fn database(&self) -> &Database<String> {
        &self.db
    }

    /// Execute one command and render its response.
    pub fn process(&mut self, command: Command) -> String {
        debug!(verb = command.verb().as_str(), "processing command");
        match command {
            Command::Insert { name, point } => {
                let entry = KeyValueEntry::new(name, point);
                let inserted = self.db.insert(entry.clone());
                commands::format_insert(&entry, inserted)
            }
            Command::RemoveByKey { name } => {
                let removed = self.db.remove(name.as_str());
                commands::format_remove_by_key(&name, removed.as_ref())
            }
            Command::RemoveByPoint { point } => {
                let valid = self.db.validate(&point);
                let removed = if valid { self.db.remove_by_value(&point) } else { None };
                commands::format_remove_by_point(point, valid, removed.as_ref())
            }
            Command::RegionSearch { region } => {
                if region.w < 1 || region.h < 1 {
                    return commands::format_region_rejected(&region);
                }
                let result = self.db.region_search(region.x, region.y, region.w, region.h);
                commands::format_region_search(&region, result.entries, result.nodes_visited)
            }
            Command::Search { name } => commands::format_search(&name, self.db.search(name.as_str())),
            Command::Duplicates => commands::format_duplicates(&self.db.duplicates()),
            Command::Dump => self.db.dump(),
        }
    }

    /// Run every command line from `input`, writing one response per
    /// command to `output`.
    ///
    /// Lines that fail to parse are logged and skipped. Returns the number of
    /// commands executed.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<usize> {
        let mut executed = 0;
        for (number, line) in input.lines().enumerate() {
            let line = line?;
            match Command::parse(&line) {
                Ok(Some(command)) => {
                    writeln!(output, "{}", self.process(command))?;
                    executed += 1;
                }
                Ok(None) => {}
                Err(e) => warn!(line = number + 1, "Skipping command: {}", e),
            }
        }
        output.flush()?;
        Ok(executed)
    }
}
