//! Error types for fastgtools

use thiserror::Error;

/// Result type alias for fastgtools operations
pub type Result<T> = std::result::Result<T, FastgError>;

/// Main error type for fastgtools
///
/// Every parse error is fatal: the first one aborts the parse and no partial
/// graph is returned. Line numbers are 1-based.
#[derive(Error, Debug)]
pub enum FastgError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input does not open with a declaration line
    #[error("line {line}: file doesn't start with a '>' declaration")]
    ContentBeforeHeader { line: usize },

    /// A declaration line lacks the trailing `;`
    #[error("line {line}: declaration is missing its ';' terminator: {header}")]
    MissingTerminator { line: usize, header: String },

    /// An edge name matches neither supported naming dialect
    #[error("line {line}: malformed edge name \"{token}\"")]
    MalformedEdgeName { line: usize, token: String },

    /// Gap, bracketed annotation or other unsupported FASTG notation
    #[error("line {line}: unsupported FASTG notation '{notation}' in adjacency list")]
    UnsupportedNotation { line: usize, notation: char },

    /// The same ordered adjacency was declared twice
    #[error("line {line}: duplicate adjacency {source_name} -> {target}")]
    DuplicateAdjacency {
        line: usize,
        source_name: String,
        target: String,
    },

    /// A sequence byte outside {A, C, G, T, U}; `column` is 1-based
    #[error(
        "line {line}, column {column}: sequence character '{}' \
         is not in the alphabet {{A, C, G, T, U}}",
        .byte.escape_ascii()
    )]
    InvalidSequenceCharacter { line: usize, column: usize, byte: u8 },

    /// Declared length differs from the length of the sequence body
    #[error("line {line}: edge {name} declares length {declared} but its sequence has length {actual}")]
    LengthMismatch {
        line: usize,
        name: String,
        declared: u64,
        actual: u64,
    },

    /// Two mentions of one edge disagree on length or coverage
    #[error(
        "line {line}: edge {name} has length {length} and coverage {coverage}, \
         but line {first_line} gives length {first_length} and coverage {first_coverage}"
    )]
    InconsistentEdge {
        name: String,
        first_line: usize,
        first_length: u64,
        first_coverage: f64,
        line: usize,
        length: u64,
        coverage: f64,
    },

    /// A referenced edge was never declared (strict mode only)
    #[error("edge {name} is referenced at line {line} but never declared")]
    UndeclaredEdge { name: String, line: usize },

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File not found errors
    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl From<serde_json::Error> for FastgError {
    fn from(err: serde_json::Error) -> Self {
        FastgError::Serialization(err.to_string())
    }
}
