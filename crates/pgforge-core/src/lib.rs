//! `PostgreSQL` DDL generation for schema migrations.
//!
//! `pgforge-core` turns typed operation descriptions into the SQL
//! statements a migration runner executes, where:
//! - Identifiers are quoted and optionally case-folded consistently
//! - Values are dollar-quoted so no input can break out of a literal
//! - Column types expand through user-defined shorthands with cycle
//!   detection
//! - Every creating operation knows how to derive its inverse, so down
//!   migrations come for free
//!
//! # Architecture
//!
//! - **Operations** - One builder module per object kind (tables,
//!   indexes, roles, policies, ...), tied together by the
//!   [`operations::Operation`] enum
//! - **Name** - Identifier quoting, qualification and camelCase folding
//! - **Value** - Literal escaping with collision-free dollar-quote tags
//! - **Typing** - Column definitions and type-shorthand resolution
//! - **Template** - `{placeholder}` substitution for raw SQL
//!
//! # Example
//!
//! ```rust
//! use pgforge_core::prelude::*;
//!
//! let operation = Operation::CreateTable {
//!     name: Name::new("names"),
//!     columns: vec![
//!         ("id".to_string(), ColumnSpec::from("id")),
//!         ("name".to_string(), ColumnSpec::from("varchar(10)")),
//!     ],
//!     options: Box::default(),
//! };
//!
//! let opts = FormattingOptions::default();
//! let statements = operation.up(&opts).unwrap();
//! assert_eq!(
//!     statements[0],
//!     "CREATE TABLE \"names\" (\n  \"id\" serial PRIMARY KEY,\n  \"name\" varchar(10)\n);"
//! );
//!
//! // Creations reverse to drops.
//! let down = operation.reverse().unwrap();
//! assert_eq!(down.up(&opts).unwrap()[0], "DROP TABLE \"names\";");
//! ```

pub mod error;
pub mod name;
pub mod operations;
pub mod options;
pub mod template;
pub mod typing;
pub mod value;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, Result};
    pub use crate::name::{decamelize, IdentPolicy, IdentWriter, Name};
    pub use crate::operations::{DropOptions, Operation};
    pub use crate::options::FormattingOptions;
    pub use crate::template::{render_template, TemplateArg};
    pub use crate::typing::{
        ColumnDefinition, ColumnSpec, References, ReferentialAction, TypeShorthands,
    };
    pub use crate::value::{escape_string, escape_value, PgLiteral, TagGenerator, Value};
}
