//! Module for the error management
use std::fmt;
use thiserror::Error;

/// A fatal problem found in a record of the feed
///
/// It carries the file and the line (1-based, the header being line 1) of the record
/// that could not be accepted under the active [crate::ParseOptions].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{file_name}:{line}: {message}")]
pub struct ParseError {
    /// Name of the file holding the faulty record (e.g. `stops.txt`)
    pub file_name: String,
    /// Line of the record in the file
    pub line: u64,
    /// Human readable description of the problem
    pub message: String,
}

/// Why a single field of a record was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// The field is mandatory but empty or absent from the header
    #[error("missing value")]
    Missing,
    /// The value could not be parsed
    #[error("'{value}' is not valid: {reason}")]
    Invalid {
        /// The raw value as found in the file
        value: String,
        /// What was expected
        reason: String,
    },
    /// The value references an id that was not loaded
    #[error("no {kind} with id '{id}'")]
    UnknownReference {
        /// Kind of the referenced object
        kind: &'static str,
        /// The unknown id
        id: String,
    },
    /// The id (or the sequence number within its parent) was already used
    #[error("'{0}' is already defined")]
    Duplicate(String),
}

/// A field-level validation failure produced while materializing a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the column in error
    pub field: String,
    /// The reason of the failure
    pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "field '{}': {}", self.field, self.kind)
    }
}

impl FieldError {
    pub(crate) fn new(field: &str, kind: FieldErrorKind) -> Self {
        Self {
            field: field.to_owned(),
            kind,
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::new(field, FieldErrorKind::Missing)
    }

    pub(crate) fn invalid(field: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::new(
            field,
            FieldErrorKind::Invalid {
                value: value.to_owned(),
                reason: reason.into(),
            },
        )
    }

    pub(crate) fn unknown_reference(field: &str, kind: &'static str, id: &str) -> Self {
        Self::new(
            field,
            FieldErrorKind::UnknownReference {
                kind,
                id: id.to_owned(),
            },
        )
    }

    pub(crate) fn duplicate(field: &str, value: impl Into<String>) -> Self {
        Self::new(field, FieldErrorKind::Duplicate(value.into()))
    }
}

/// An error that can occur when processing GTFS data.
#[derive(Error, Debug)]
pub enum Error {
    /// A mandatory file is not present in the feed
    #[error("Cound not find file {0}")]
    MissingFile(String),
    /// An id looked up in the feed is not present
    #[error("The id {0} is not known")]
    ReferenceError(String),
    /// The given path to the GTFS is neither a file nor a directory
    #[error("Could not read GTFS: {0} is neither a file nor a directory")]
    NotFileNorDirectory(String),
    /// The time is not given in the HH:MM:SS format
    #[error("'{0}' is not a valid time; HH:MM:SS format is expected.")]
    InvalidTime(String),
    /// The color is not given in the RRGGBB format, without a leading `#`
    #[error("'{0}' is not a valid color; RRGGBB format is expected, without a leading `#`")]
    InvalidColor(String),
    /// Generic Input/Output error while reading a file
    #[error("impossible to read file")]
    IO(#[from] std::io::Error),
    /// Impossible to read a file
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        /// The file name that could not be read
        file_name: String,
        /// The inital error that caused the unability to read the file
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The file is not a well formed CSV file (e.g. a row has not the same number of columns as the header)
    #[error("impossible to read csv file '{file_name}' at line {line}")]
    CSVError {
        /// File name that could not be parsed as CSV
        file_name: String,
        /// Line where the csv library gave up
        line: u64,
        /// The initial error by the csv library
        #[source]
        source: csv::Error,
    },
    /// A record was rejected under the active parse options
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Error when trying to unzip the GTFS archive
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

impl Error {
    /// File and line of the faulty record, when the error is tied to one
    pub fn location(&self) -> Option<(&str, u64)> {
        match self {
            Error::Parse(e) => Some((&e.file_name, e.line)),
            Error::CSVError {
                file_name, line, ..
            } => Some((file_name, *line)),
            _ => None,
        }
    }
}
