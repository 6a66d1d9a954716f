//! Error types for statement generation.

/// Errors raised while generating DDL statements.
///
/// Every variant is a programming error in the migration author's input;
/// none of them are transient, so callers should never retry.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A type shorthand expands, directly or transitively, to itself.
    #[error("cannot resolve type of '{}' (resolution chain: {})", .chain.last().map_or("", String::as_str), .chain.join(" -> "))]
    CyclicType {
        /// The shorthand names visited, in resolution order, ending with
        /// the name that was seen twice.
        chain: Vec<String>,
    },

    /// The same constraint kind was defined both on the table and on a column.
    #[error("'{kind}' constraint on table '{table}' is defined both at table level and on columns")]
    DuplicateConstraint {
        /// Table the constraint targets.
        table: String,
        /// Constraint kind (e.g. `primaryKey`).
        kind: String,
    },

    /// Two options were supplied that cannot be combined.
    #[error("'{first}' and '{second}' cannot both be specified")]
    MutuallyExclusive {
        /// First of the conflicting options.
        first: &'static str,
        /// Second of the conflicting options.
        second: &'static str,
    },

    /// The dollar-quote tag generator was configured with no characters.
    #[error("tag generator alphabet must not be empty")]
    EmptyAlphabet,

    /// A required builder parameter was not supplied.
    #[error("{operation} requires '{parameter}' to be specified")]
    MissingParameter {
        /// Operation being built.
        operation: &'static str,
        /// The missing parameter.
        parameter: &'static str,
    },

    /// An option value is not valid for the operation.
    #[error("invalid options for {operation}: {message}")]
    InvalidOption {
        /// Operation being built.
        operation: &'static str,
        /// What is wrong with the supplied options.
        message: String,
    },

    /// An automatic down statement was requested for an operation that
    /// cannot compute one.
    #[error("cannot derive a down statement for {operation}: {reason}")]
    NotReversible {
        /// Operation the down statement was requested for.
        operation: &'static str,
        /// The specific missing information; names what the author must
        /// supply in an explicit down migration instead.
        reason: String,
    },
}

/// Result type for statement generation.
pub type Result<T> = std::result::Result<T, CoreError>;
