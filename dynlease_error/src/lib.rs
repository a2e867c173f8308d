use bon::bon;
use miette::{Diagnostic, NamedSource, Report, SourceSpan};

use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DynleaseError {
    ////////////////////////////////
    // Lib native errors
    #[error(transparent)]
    #[diagnostic(transparent)]
    WrapError(#[from] WrapError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    LibError(#[from] LibError),

    ////////////////////////////////
    // Lease database
    #[error(transparent)]
    #[diagnostic(transparent)]
    ParseError(#[from] LeaseParseError),

    ////////////////////////////////
    // Type convertion
    #[error(transparent)]
    #[diagnostic(code(dynlease::time::error))]
    TimeError(#[from] jiff::Error),

    #[error(transparent)]
    #[diagnostic(code(serde::error))]
    SerdeError(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(dynlease::io::error))]
    IoError(#[from] std::io::Error),
}

/**
Errors raised while reading a lease database.
Each one points at the offending line of the file.
*/
#[derive(Debug, Error, Diagnostic)]
pub enum LeaseParseError {
    #[error("lease {ip} closes without its `{field}` timestamp")]
    #[diagnostic(
        code(dynlease::parse::incomplete_block),
        help("Every lease block must set both `starts` and `ends` before its closing brace.")
    )]
    IncompleteBlock {
        ip: String,
        field: &'static str,
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("block closed here")]
        span: SourceSpan,
    },

    #[error("lease {ip} has a malformed `{field}` timestamp")]
    #[diagnostic(
        code(dynlease::parse::timestamp),
        help("Expected `<weekday> YYYY/MM/DD HH:MM:SS`, in UTC.")
    )]
    MalformedTimestamp {
        ip: String,
        field: &'static str,
        line: usize,
        #[source]
        origin: jiff::Error,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a lease timestamp")]
        span: SourceSpan,
    },

    #[error("malformed `{keyword}` statement")]
    #[diagnostic(code(dynlease::parse::statement))]
    MalformedLine {
        keyword: String,
        line: usize,
        #[help]
        help: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("missing value")]
        span: SourceSpan,
    },
}
impl LeaseParseError {
    /// The 1-based line number the error was raised at.
    pub fn line(&self) -> usize {
        match self {
            LeaseParseError::IncompleteBlock { line, .. }
            | LeaseParseError::MalformedTimestamp { line, .. }
            | LeaseParseError::MalformedLine { line, .. } => *line,
        }
    }
}

/**
A config error with help higher origin
Can be recursively chained.
*/
#[derive(Debug, Error, Diagnostic)]
#[error("{}", message)]
#[diagnostic(code(dynlease::wrap::error))]
pub struct WrapError {
    pub message: String,
    #[diagnostic_source]
    pub origin: Report,
    #[help]
    pub help: String,
}

#[bon]
impl WrapError {
    #[builder]
    pub fn new(msg: &str, help: &str, origin: Report) -> Self {
        Self {
            message: msg.to_owned(),
            help: help.to_owned(),
            origin,
        }
    }
}

/**
A root cause error with no inner origin
*/
#[derive(Debug, Error, Diagnostic)]
#[error("{}", message)]
#[diagnostic(code(dynlease::lib::error))]
pub struct LibError {
    pub message: String,
    #[help]
    pub help: String,
}
impl LibError {
    pub fn new(message: &str, help: &str) -> Self {
        Self {
            message: message.to_owned(),
            help: help.to_owned(),
        }
    }
}
