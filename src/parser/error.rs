use std::fmt;

use thiserror::Error;

use crate::ast::Location;
use crate::parser::lexer::Token;
use crate::source::SourceFile;

/// Result type for parsing operations.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// What went wrong, independent of where.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, was {found}")]
    ExpectedToken { expected: Token, found: Token },

    #[error("unexpected token {found}")]
    UnexpectedToken { found: Token },

    #[error("unexpected identifier '{name}'")]
    UnexpectedIdentifier { name: String },

    /// A field declaration carried method-style type parameters.
    #[error("type parameters are not allowed on fields: {}", .names.join(", "))]
    GenericField { names: Vec<String> },

    /// A sibling declarator in a multi-variable field did not start with an
    /// identifier, or its array brackets were malformed.
    #[error("malformed variable declarator, was {found}")]
    MalformedDeclarator { found: Token },

    #[error("unrecognized input '{text}'")]
    UnrecognizedToken { text: String },

    #[error("invalid unicode escape")]
    InvalidUnicodeEscape,
}

/// A fatal parse error: the source it occurred in, the position at which it
/// was detected, and the failure itself. There is no recovery; a failed
/// parse yields exactly one of these and no tree.
#[derive(Debug, Clone)]
pub struct ParseError {
    source: SourceFile,
    location: Location,
    kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(source: SourceFile, location: Location, kind: ParseErrorKind) -> Self {
        Self { source, location, kind }
    }

    pub fn source_file(&self) -> &SourceFile {
        &self.source
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.source.display_path(),
            self.location.line,
            self.location.column,
            self.kind
        )
    }
}

impl std::error::Error for ParseError {}
