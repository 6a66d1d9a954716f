//! Shared formatting options threaded through every builder.

use crate::name::{IdentPolicy, IdentWriter};
use crate::typing::TypeShorthands;

/// Formatting options bound once per migration run and shared read-only
/// across every builder invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattingOptions {
    /// Identifier transform without quoting; used where a name becomes
    /// part of a derived identifier (e.g. generated constraint names).
    pub schemalize: IdentWriter,
    /// Identifier transform with quoting; used when a name is emitted
    /// into statement text.
    pub literal: IdentWriter,
    /// Merged type-shorthand table (built-ins overridden by the caller's).
    pub shorthands: TypeShorthands,
}

impl FormattingOptions {
    /// Builds options from the resolved configuration.
    #[must_use]
    pub fn new(fold_case: bool, shorthands: TypeShorthands) -> Self {
        Self {
            schemalize: IdentWriter::new(IdentPolicy {
                fold_case,
                quote: false,
            }),
            literal: IdentWriter::new(IdentPolicy {
                fold_case,
                quote: true,
            }),
            shorthands: TypeShorthands::builtin().merged_with(shorthands),
        }
    }
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self::new(false, TypeShorthands::new())
    }
}
