use super::Format;
use crate::model::compound::Error as CompoundError;
use thiserror::Error;

/// Errors raised while reading or writing structure files.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("malformed {format} record at line {line}: {details}")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    /// Neither the type column nor the atom name names an element.
    #[error("no element symbol in '{token}' ({format}, line {line})")]
    UnknownElement {
        format: Format,
        line: usize,
        token: String,
    },

    /// A record was well formed but the structure rejected it.
    #[error("inconsistent {format} connectivity at line {line}: {source}")]
    Topology {
        format: Format,
        line: usize,
        #[source]
        source: CompoundError,
    },
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub(crate) fn unknown_element(format: Format, line: usize, token: &str) -> Self {
        Self::UnknownElement {
            format,
            line,
            token: token.to_string(),
        }
    }

    pub(crate) fn topology(format: Format, line: usize) -> impl FnOnce(CompoundError) -> Self {
        move |source| Self::Topology {
            format,
            line,
            source,
        }
    }
}
