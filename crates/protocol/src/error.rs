//! Protocol error types.

use std::num::ParseIntError;

use thiserror::Error;

/// Errors that can occur while parsing a command line.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument `{argument}` for `{command}`")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Unexpected argument `{argument}` for `{command}`")]
    UnexpectedArgument {
        command: &'static str,
        argument: String,
    },

    #[error("Invalid integer `{value}`")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseIntError,
    },
}
