//! Statement builders for every supported DDL operation, and the
//! [`Operation`] enum tying them into the reversal protocol.
//!
//! Each submodule builds SQL for one object kind. [`Operation`] wraps
//! them into a single serializable value that knows how to render its
//! forward statements and, where possible, derive its inverse.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::Name;
use crate::options::FormattingOptions;
use crate::typing::ColumnSpec;

pub mod cast;
pub mod column;
pub mod constraint;
pub mod domain;
pub mod extension;
pub mod func;
pub mod grant;
pub mod index;
pub mod mview;
pub mod operator;
pub mod policy;
pub mod role;
pub mod schema;
pub mod sequence;
pub mod sql;
pub mod table;
pub mod trigger;
pub mod ty;
pub mod view;

use cast::CastOptions;
use column::{AddColumnsOptions, AlterColumnOptions};
use constraint::ConstraintArg;
use domain::{AlterDomainOptions, DomainOptions};
use extension::ExtensionOptions;
use func::{FunctionOptions, FunctionParam};
use grant::{GrantOptions, RevokeOptions, SchemaPrivilege, TablePrivilege, TableTarget};
use index::{IndexColumn, IndexOptions};
use mview::{AlterMaterializedViewOptions, MaterializedViewOptions, RefreshOptions};
use operator::{OperatorClassOptions, OperatorListItem, OperatorOptions};
use policy::PolicyOptions;
use role::RoleOptions;
use schema::SchemaOptions;
use sequence::{CreateSequenceOptions, SequenceOptions};
use table::{AlterTableOptions, TableOptions};
use trigger::TriggerOptions;
use ty::{AddTypeValueOptions, TypeShape};
use view::{AlterViewOptions, ViewOptions};

/// Common options for `DROP` statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropOptions {
    /// Add `IF EXISTS`.
    pub if_exists: bool,
    /// Add `CASCADE`.
    pub cascade: bool,
}

impl DropOptions {
    pub(crate) const fn if_exists_sql(self) -> &'static str {
        if self.if_exists {
            " IF EXISTS"
        } else {
            ""
        }
    }

    pub(crate) const fn cascade_sql(self) -> &'static str {
        if self.cascade {
            " CASCADE"
        } else {
            ""
        }
    }
}

/// Joins lines with a comma and indents each one, for multi-line
/// statement bodies.
pub(crate) fn format_lines(lines: &[String], indent: &str) -> String {
    lines
        .iter()
        .map(|line| format!("{indent}{line}"))
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Builds a `COMMENT ON` statement; `None` clears the comment.
pub(crate) fn make_comment(object: &str, name: &str, comment: Option<&str>) -> String {
    let value = comment.map_or_else(
        || "NULL".to_string(),
        crate::value::escape_string,
    );
    format!("COMMENT ON {object} {name} IS {value};")
}

/// A single schema-changing operation.
///
/// An operation renders its forward SQL with [`Operation::up`] and, when
/// the inverse can be derived, produces it with [`Operation::reverse`].
/// Creations reverse to drops, renames swap their names, grants become
/// revokes. Drops, alters and revokes cannot be reversed because the
/// prior state is unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
#[allow(clippy::large_enum_variant)]
pub enum Operation {
    /// `CREATE TABLE`.
    CreateTable {
        /// Table name.
        name: Name,
        /// Columns in declaration order.
        columns: Vec<(String, ColumnSpec)>,
        /// Table options.
        options: Box<TableOptions>,
    },
    /// `DROP TABLE`.
    DropTable {
        /// Table name.
        name: Name,
        /// Drop options.
        options: DropOptions,
    },
    /// `ALTER TABLE .. RENAME TO`.
    RenameTable {
        /// Current name.
        name: Name,
        /// New name.
        new_name: Name,
    },
    /// `ALTER TABLE`.
    AlterTable {
        /// Table name.
        name: Name,
        /// Alterations.
        options: Box<AlterTableOptions>,
    },
    /// `ALTER TABLE .. ADD COLUMN`.
    AddColumns {
        /// Table name.
        table: Name,
        /// Columns to add.
        columns: Vec<(String, ColumnSpec)>,
        /// Options.
        options: AddColumnsOptions,
    },
    /// `ALTER TABLE .. DROP COLUMN`.
    DropColumns {
        /// Table name.
        table: Name,
        /// Columns to drop.
        columns: Vec<String>,
        /// Drop options.
        options: DropOptions,
    },
    /// `ALTER TABLE .. RENAME COLUMN`.
    RenameColumn {
        /// Table name.
        table: Name,
        /// Current column name.
        old_name: String,
        /// New column name.
        new_name: String,
    },
    /// `ALTER TABLE .. ALTER COLUMN`.
    AlterColumn {
        /// Table name.
        table: Name,
        /// Column name.
        column: String,
        /// Alterations.
        options: Box<AlterColumnOptions>,
    },
    /// `ALTER TABLE .. ADD CONSTRAINT`.
    AddConstraint {
        /// Table name.
        table: Name,
        /// Constraint name; required for reversal.
        name: Option<String>,
        /// Constraint body.
        constraint: ConstraintArg,
    },
    /// `ALTER TABLE .. DROP CONSTRAINT`.
    DropConstraint {
        /// Table name.
        table: Name,
        /// Constraint name.
        name: String,
        /// Drop options.
        options: DropOptions,
    },
    /// `ALTER TABLE .. RENAME CONSTRAINT`.
    RenameConstraint {
        /// Table name.
        table: Name,
        /// Current constraint name.
        old_name: String,
        /// New constraint name.
        new_name: String,
    },
    /// `CREATE INDEX`.
    CreateIndex {
        /// Indexed table.
        table: Name,
        /// Indexed columns or expressions.
        columns: Vec<IndexColumn>,
        /// Index options.
        options: Box<IndexOptions>,
    },
    /// `DROP INDEX`.
    DropIndex {
        /// Indexed table, used to derive the index name.
        table: Name,
        /// Indexed columns, used to derive the index name.
        columns: Vec<IndexColumn>,
        /// Index options the index was created with.
        options: Box<IndexOptions>,
        /// Drop options.
        drop: DropOptions,
    },
    /// `CREATE TYPE`.
    CreateType {
        /// Type name.
        name: Name,
        /// Enum labels or composite attributes.
        shape: TypeShape,
    },
    /// `DROP TYPE`.
    DropType {
        /// Type name.
        name: Name,
        /// Drop options.
        options: DropOptions,
    },
    /// `ALTER TYPE .. RENAME TO`.
    RenameType {
        /// Current name.
        name: Name,
        /// New name.
        new_name: Name,
    },
    /// `ALTER TYPE .. ADD VALUE`.
    AddTypeValue {
        /// Type name.
        name: Name,
        /// New enum label.
        value: String,
        /// Placement options.
        options: AddTypeValueOptions,
    },
    /// `ALTER TYPE .. RENAME VALUE`.
    RenameTypeValue {
        /// Type name.
        name: Name,
        /// Current label.
        value: String,
        /// New label.
        new_value: String,
    },
    /// `ALTER TYPE .. ADD ATTRIBUTE`.
    AddTypeAttribute {
        /// Type name.
        name: Name,
        /// Attribute name.
        attribute: String,
        /// Attribute type.
        type_name: String,
    },
    /// `ALTER TYPE .. DROP ATTRIBUTE`.
    DropTypeAttribute {
        /// Type name.
        name: Name,
        /// Attribute name.
        attribute: String,
        /// Drop options; cascade is not supported here.
        options: DropOptions,
    },
    /// `ALTER TYPE .. ALTER ATTRIBUTE .. SET DATA TYPE`.
    SetTypeAttribute {
        /// Type name.
        name: Name,
        /// Attribute name.
        attribute: String,
        /// New attribute type.
        type_name: String,
    },
    /// `ALTER TYPE .. RENAME ATTRIBUTE`.
    RenameTypeAttribute {
        /// Type name.
        name: Name,
        /// Current attribute name.
        attribute: String,
        /// New attribute name.
        new_attribute: String,
    },
    /// `CREATE DOMAIN`.
    CreateDomain {
        /// Domain name.
        name: Name,
        /// Underlying type.
        type_name: String,
        /// Domain options.
        options: Box<DomainOptions>,
    },
    /// `ALTER DOMAIN`.
    AlterDomain {
        /// Domain name.
        name: Name,
        /// Alterations.
        options: Box<AlterDomainOptions>,
    },
    /// `DROP DOMAIN`.
    DropDomain {
        /// Domain name.
        name: Name,
        /// Drop options.
        options: DropOptions,
    },
    /// `ALTER DOMAIN .. RENAME TO`.
    RenameDomain {
        /// Current name.
        name: Name,
        /// New name.
        new_name: Name,
    },
    /// `CREATE SEQUENCE`.
    CreateSequence {
        /// Sequence name.
        name: Name,
        /// Sequence options.
        options: Box<CreateSequenceOptions>,
    },
    /// `ALTER SEQUENCE`.
    AlterSequence {
        /// Sequence name.
        name: Name,
        /// New sequence options.
        options: Box<SequenceOptions>,
    },
    /// `DROP SEQUENCE`.
    DropSequence {
        /// Sequence name.
        name: Name,
        /// Drop options.
        options: DropOptions,
    },
    /// `ALTER SEQUENCE .. RENAME TO`.
    RenameSequence {
        /// Current name.
        name: Name,
        /// New name.
        new_name: Name,
    },
    /// `CREATE ROLE`.
    CreateRole {
        /// Role name.
        name: Name,
        /// Role options.
        options: Box<RoleOptions>,
    },
    /// `ALTER ROLE`.
    AlterRole {
        /// Role name.
        name: Name,
        /// Role options.
        options: Box<RoleOptions>,
    },
    /// `DROP ROLE`.
    DropRole {
        /// Role name.
        name: Name,
        /// Add `IF EXISTS`.
        if_exists: bool,
    },
    /// `ALTER ROLE .. RENAME TO`.
    RenameRole {
        /// Current name.
        name: Name,
        /// New name.
        new_name: Name,
    },
    /// `CREATE FUNCTION`.
    CreateFunction {
        /// Function name.
        name: Name,
        /// Parameters.
        params: Vec<FunctionParam>,
        /// Function options.
        options: Box<FunctionOptions>,
        /// Function body, dollar-quoted on output.
        body: String,
    },
    /// `DROP FUNCTION`.
    DropFunction {
        /// Function name.
        name: Name,
        /// Parameters, for the type-only signature.
        params: Vec<FunctionParam>,
        /// Drop options.
        options: DropOptions,
    },
    /// `ALTER FUNCTION .. RENAME TO`.
    RenameFunction {
        /// Current name.
        name: Name,
        /// Parameters, for the type-only signature.
        params: Vec<FunctionParam>,
        /// New name.
        new_name: Name,
    },
    /// `CREATE TRIGGER`.
    CreateTrigger {
        /// Table the trigger fires on.
        table: Name,
        /// Trigger name.
        name: String,
        /// Trigger options.
        options: Box<TriggerOptions>,
    },
    /// `DROP TRIGGER`.
    DropTrigger {
        /// Table the trigger fires on.
        table: Name,
        /// Trigger name.
        name: String,
        /// Drop options.
        options: DropOptions,
    },
    /// `ALTER TRIGGER .. RENAME TO`.
    RenameTrigger {
        /// Table the trigger fires on.
        table: Name,
        /// Current name.
        old_name: String,
        /// New name.
        new_name: String,
    },
    /// `CREATE SCHEMA`.
    CreateSchema {
        /// Schema name.
        name: String,
        /// Schema options.
        options: SchemaOptions,
    },
    /// `DROP SCHEMA`.
    DropSchema {
        /// Schema name.
        name: String,
        /// Drop options.
        options: DropOptions,
    },
    /// `ALTER SCHEMA .. RENAME TO`.
    RenameSchema {
        /// Current name.
        name: String,
        /// New name.
        new_name: String,
    },
    /// `CREATE VIEW`.
    CreateView {
        /// View name.
        name: Name,
        /// View options.
        options: Box<ViewOptions>,
        /// Defining query.
        definition: String,
    },
    /// `ALTER VIEW`.
    AlterView {
        /// View name.
        name: Name,
        /// Alterations.
        options: AlterViewOptions,
    },
    /// `DROP VIEW`.
    DropView {
        /// View name.
        name: Name,
        /// Drop options.
        options: DropOptions,
    },
    /// `ALTER VIEW .. RENAME TO`.
    RenameView {
        /// Current name.
        name: Name,
        /// New name.
        new_name: Name,
    },
    /// `CREATE MATERIALIZED VIEW`.
    CreateMaterializedView {
        /// View name.
        name: Name,
        /// View options.
        options: Box<MaterializedViewOptions>,
        /// Defining query.
        definition: String,
    },
    /// `ALTER MATERIALIZED VIEW`.
    AlterMaterializedView {
        /// View name.
        name: Name,
        /// Alterations.
        options: Box<AlterMaterializedViewOptions>,
    },
    /// `REFRESH MATERIALIZED VIEW`. Its own inverse.
    RefreshMaterializedView {
        /// View name.
        name: Name,
        /// Refresh options.
        options: RefreshOptions,
    },
    /// `DROP MATERIALIZED VIEW`.
    DropMaterializedView {
        /// View name.
        name: Name,
        /// Drop options.
        options: DropOptions,
    },
    /// `ALTER MATERIALIZED VIEW .. RENAME TO`.
    RenameMaterializedView {
        /// Current name.
        name: Name,
        /// New name.
        new_name: Name,
    },
    /// `CREATE OPERATOR`.
    CreateOperator {
        /// Operator symbol.
        name: Name,
        /// Operator options.
        options: Box<OperatorOptions>,
    },
    /// `DROP OPERATOR`.
    DropOperator {
        /// Operator symbol.
        name: Name,
        /// Left operand type.
        left: Option<String>,
        /// Right operand type.
        right: Option<String>,
        /// Drop options.
        options: DropOptions,
    },
    /// `CREATE OPERATOR CLASS`.
    CreateOperatorClass {
        /// Class name.
        name: Name,
        /// Indexed type.
        type_name: String,
        /// Index method.
        index_method: String,
        /// Class items.
        items: Vec<OperatorListItem>,
        /// Class options.
        options: OperatorClassOptions,
    },
    /// `DROP OPERATOR CLASS`.
    DropOperatorClass {
        /// Class name.
        name: Name,
        /// Index method.
        index_method: String,
        /// Drop options.
        options: DropOptions,
    },
    /// `ALTER OPERATOR CLASS .. RENAME TO`.
    RenameOperatorClass {
        /// Current name.
        name: Name,
        /// Index method.
        index_method: String,
        /// New name.
        new_name: Name,
    },
    /// `CREATE OPERATOR FAMILY`.
    CreateOperatorFamily {
        /// Family name.
        name: Name,
        /// Index method.
        index_method: String,
    },
    /// `DROP OPERATOR FAMILY`.
    DropOperatorFamily {
        /// Family name.
        name: Name,
        /// Index method.
        index_method: String,
        /// Drop options.
        options: DropOptions,
    },
    /// `ALTER OPERATOR FAMILY .. RENAME TO`.
    RenameOperatorFamily {
        /// Current name.
        name: Name,
        /// Index method.
        index_method: String,
        /// New name.
        new_name: Name,
    },
    /// `ALTER OPERATOR FAMILY .. ADD`.
    AddToOperatorFamily {
        /// Family name.
        name: Name,
        /// Index method.
        index_method: String,
        /// Items to add.
        items: Vec<OperatorListItem>,
    },
    /// `ALTER OPERATOR FAMILY .. DROP`.
    RemoveFromOperatorFamily {
        /// Family name.
        name: Name,
        /// Index method.
        index_method: String,
        /// Items to remove, matched by number and signature.
        items: Vec<OperatorListItem>,
    },
    /// `CREATE POLICY`.
    CreatePolicy {
        /// Table the policy applies to.
        table: Name,
        /// Policy name.
        name: String,
        /// Policy options.
        options: Box<PolicyOptions>,
    },
    /// `ALTER POLICY`.
    AlterPolicy {
        /// Table the policy applies to.
        table: Name,
        /// Policy name.
        name: String,
        /// Alterations.
        options: Box<PolicyOptions>,
    },
    /// `DROP POLICY`.
    DropPolicy {
        /// Table the policy applies to.
        table: Name,
        /// Policy name.
        name: String,
        /// Add `IF EXISTS`.
        if_exists: bool,
    },
    /// `ALTER POLICY .. RENAME TO`.
    RenamePolicy {
        /// Table the policy applies to.
        table: Name,
        /// Current name.
        old_name: String,
        /// New name.
        new_name: String,
    },
    /// `GRANT .. ON <tables> TO`.
    GrantOnTables {
        /// Granted privileges.
        privileges: Vec<TablePrivilege>,
        /// Target tables.
        target: TableTarget,
        /// Grantee roles; empty means `PUBLIC`.
        roles: Vec<String>,
        /// Grant options.
        options: GrantOptions,
    },
    /// `REVOKE .. ON <tables> FROM`.
    RevokeOnTables {
        /// Revoked privileges.
        privileges: Vec<TablePrivilege>,
        /// Target tables.
        target: TableTarget,
        /// Roles to revoke from; empty means `PUBLIC`.
        roles: Vec<String>,
        /// Revoke options.
        options: RevokeOptions,
    },
    /// `GRANT .. ON SCHEMA .. TO`.
    GrantOnSchemas {
        /// Granted privileges.
        privileges: Vec<SchemaPrivilege>,
        /// Target schemas.
        schemas: Vec<String>,
        /// Grantee roles; empty means `PUBLIC`.
        roles: Vec<String>,
        /// Grant options.
        options: GrantOptions,
    },
    /// `REVOKE .. ON SCHEMA .. FROM`.
    RevokeOnSchemas {
        /// Revoked privileges.
        privileges: Vec<SchemaPrivilege>,
        /// Target schemas.
        schemas: Vec<String>,
        /// Roles to revoke from; empty means `PUBLIC`.
        roles: Vec<String>,
        /// Revoke options.
        options: RevokeOptions,
    },
    /// `GRANT <roles> TO <roles>`.
    GrantRoles {
        /// Roles being granted.
        roles_from: Vec<Name>,
        /// Receiving roles.
        roles_to: Vec<String>,
        /// `WITH ADMIN OPTION`.
        with_admin_option: bool,
    },
    /// `REVOKE <roles> FROM <roles>`.
    RevokeRoles {
        /// Roles being revoked.
        roles_from: Vec<Name>,
        /// Roles losing membership.
        roles_to: Vec<String>,
        /// Revoke options.
        options: RevokeOptions,
    },
    /// `CREATE EXTENSION`, one statement per name.
    CreateExtension {
        /// Extension names.
        extensions: Vec<String>,
        /// Extension options.
        options: ExtensionOptions,
    },
    /// `DROP EXTENSION`, one statement per name.
    DropExtension {
        /// Extension names.
        extensions: Vec<String>,
        /// Drop options.
        options: DropOptions,
    },
    /// `CREATE CAST`.
    CreateCast {
        /// Source type.
        from_type: String,
        /// Target type.
        to_type: String,
        /// Cast options.
        options: CastOptions,
    },
    /// `DROP CAST`.
    DropCast {
        /// Source type.
        from_type: String,
        /// Target type.
        to_type: String,
        /// Add `IF EXISTS`.
        if_exists: bool,
    },
    /// Raw SQL with an optional down script.
    RunSql {
        /// Forward SQL.
        up: String,
        /// Reverse SQL; absent makes the operation irreversible.
        down: Option<String>,
    },
}

impl Operation {
    /// A short camelCase tag naming the operation, used in errors and
    /// logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CreateTable { .. } => "createTable",
            Self::DropTable { .. } => "dropTable",
            Self::RenameTable { .. } => "renameTable",
            Self::AlterTable { .. } => "alterTable",
            Self::AddColumns { .. } => "addColumns",
            Self::DropColumns { .. } => "dropColumns",
            Self::RenameColumn { .. } => "renameColumn",
            Self::AlterColumn { .. } => "alterColumn",
            Self::AddConstraint { .. } => "addConstraint",
            Self::DropConstraint { .. } => "dropConstraint",
            Self::RenameConstraint { .. } => "renameConstraint",
            Self::CreateIndex { .. } => "createIndex",
            Self::DropIndex { .. } => "dropIndex",
            Self::CreateType { .. } => "createType",
            Self::DropType { .. } => "dropType",
            Self::RenameType { .. } => "renameType",
            Self::AddTypeValue { .. } => "addTypeValue",
            Self::RenameTypeValue { .. } => "renameTypeValue",
            Self::AddTypeAttribute { .. } => "addTypeAttribute",
            Self::DropTypeAttribute { .. } => "dropTypeAttribute",
            Self::SetTypeAttribute { .. } => "setTypeAttribute",
            Self::RenameTypeAttribute { .. } => "renameTypeAttribute",
            Self::CreateDomain { .. } => "createDomain",
            Self::AlterDomain { .. } => "alterDomain",
            Self::DropDomain { .. } => "dropDomain",
            Self::RenameDomain { .. } => "renameDomain",
            Self::CreateSequence { .. } => "createSequence",
            Self::AlterSequence { .. } => "alterSequence",
            Self::DropSequence { .. } => "dropSequence",
            Self::RenameSequence { .. } => "renameSequence",
            Self::CreateRole { .. } => "createRole",
            Self::AlterRole { .. } => "alterRole",
            Self::DropRole { .. } => "dropRole",
            Self::RenameRole { .. } => "renameRole",
            Self::CreateFunction { .. } => "createFunction",
            Self::DropFunction { .. } => "dropFunction",
            Self::RenameFunction { .. } => "renameFunction",
            Self::CreateTrigger { .. } => "createTrigger",
            Self::DropTrigger { .. } => "dropTrigger",
            Self::RenameTrigger { .. } => "renameTrigger",
            Self::CreateSchema { .. } => "createSchema",
            Self::DropSchema { .. } => "dropSchema",
            Self::RenameSchema { .. } => "renameSchema",
            Self::CreateView { .. } => "createView",
            Self::AlterView { .. } => "alterView",
            Self::DropView { .. } => "dropView",
            Self::RenameView { .. } => "renameView",
            Self::CreateMaterializedView { .. } => "createMaterializedView",
            Self::AlterMaterializedView { .. } => "alterMaterializedView",
            Self::RefreshMaterializedView { .. } => "refreshMaterializedView",
            Self::DropMaterializedView { .. } => "dropMaterializedView",
            Self::RenameMaterializedView { .. } => "renameMaterializedView",
            Self::CreateOperator { .. } => "createOperator",
            Self::DropOperator { .. } => "dropOperator",
            Self::CreateOperatorClass { .. } => "createOperatorClass",
            Self::DropOperatorClass { .. } => "dropOperatorClass",
            Self::RenameOperatorClass { .. } => "renameOperatorClass",
            Self::CreateOperatorFamily { .. } => "createOperatorFamily",
            Self::DropOperatorFamily { .. } => "dropOperatorFamily",
            Self::RenameOperatorFamily { .. } => "renameOperatorFamily",
            Self::AddToOperatorFamily { .. } => "addToOperatorFamily",
            Self::RemoveFromOperatorFamily { .. } => "removeFromOperatorFamily",
            Self::CreatePolicy { .. } => "createPolicy",
            Self::AlterPolicy { .. } => "alterPolicy",
            Self::DropPolicy { .. } => "dropPolicy",
            Self::RenamePolicy { .. } => "renamePolicy",
            Self::GrantOnTables { .. } => "grantOnTables",
            Self::RevokeOnTables { .. } => "revokeOnTables",
            Self::GrantOnSchemas { .. } => "grantOnSchemas",
            Self::RevokeOnSchemas { .. } => "revokeOnSchemas",
            Self::GrantRoles { .. } => "grantRoles",
            Self::RevokeRoles { .. } => "revokeRoles",
            Self::CreateExtension { .. } => "createExtension",
            Self::DropExtension { .. } => "dropExtension",
            Self::CreateCast { .. } => "createCast",
            Self::DropCast { .. } => "dropCast",
            Self::RunSql { .. } => "sql",
        }
    }

    /// True when the statements must run outside a transaction.
    #[must_use]
    pub fn requires_no_transaction(&self) -> bool {
        match self {
            Self::CreateIndex { options, .. } | Self::DropIndex { options, .. } => {
                options.concurrently
            }
            Self::RefreshMaterializedView { options, .. } => options.concurrently,
            _ => false,
        }
    }

    /// Renders the forward SQL statements.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the individual builders, such as
    /// missing required parameters or mutually exclusive options.
    pub fn up(&self, opts: &FormattingOptions) -> Result<Vec<String>> {
        match self {
            Self::CreateTable {
                name,
                columns,
                options,
            } => table::create_table(opts, name, columns, options),
            Self::DropTable { name, options } => {
                Ok(vec![table::drop_table(opts, name, *options)])
            }
            Self::RenameTable { name, new_name } => {
                Ok(vec![table::rename_table(opts, name, new_name)])
            }
            Self::AlterTable { name, options } => {
                Ok(vec![table::alter_table(opts, name, options)?])
            }
            Self::AddColumns {
                table,
                columns,
                options,
            } => column::add_columns(opts, table, columns, *options),
            Self::DropColumns {
                table,
                columns,
                options,
            } => Ok(vec![column::drop_columns(opts, table, columns, *options)]),
            Self::RenameColumn {
                table,
                old_name,
                new_name,
            } => Ok(vec![column::rename_column(opts, table, old_name, new_name)]),
            Self::AlterColumn {
                table,
                column,
                options,
            } => column::alter_column(opts, table, column, options),
            Self::AddConstraint {
                table,
                name,
                constraint,
            } => Ok(constraint::add_constraint(
                opts,
                table,
                name.as_deref(),
                constraint,
            )),
            Self::DropConstraint {
                table,
                name,
                options,
            } => Ok(vec![constraint::drop_constraint(opts, table, name, *options)]),
            Self::RenameConstraint {
                table,
                old_name,
                new_name,
            } => Ok(vec![constraint::rename_constraint(
                opts, table, old_name, new_name,
            )]),
            Self::CreateIndex {
                table,
                columns,
                options,
            } => Ok(vec![index::create_index(opts, table, columns, options)?]),
            Self::DropIndex {
                table,
                columns,
                options,
                drop,
            } => Ok(vec![index::drop_index(opts, table, columns, options, *drop)?]),
            Self::CreateType { name, shape } => Ok(vec![ty::create_type(opts, name, shape)]),
            Self::DropType { name, options } => Ok(vec![ty::drop_type(opts, name, *options)]),
            Self::RenameType { name, new_name } => {
                Ok(vec![ty::rename_type(opts, name, new_name)])
            }
            Self::AddTypeValue {
                name,
                value,
                options,
            } => Ok(vec![ty::add_type_value(opts, name, value, options)?]),
            Self::RenameTypeValue {
                name,
                value,
                new_value,
            } => Ok(vec![ty::rename_type_value(opts, name, value, new_value)]),
            Self::AddTypeAttribute {
                name,
                attribute,
                type_name,
            } => Ok(vec![ty::add_type_attribute(opts, name, attribute, type_name)]),
            Self::DropTypeAttribute {
                name,
                attribute,
                options,
            } => Ok(vec![ty::drop_type_attribute(opts, name, attribute, *options)]),
            Self::SetTypeAttribute {
                name,
                attribute,
                type_name,
            } => Ok(vec![ty::set_type_attribute(opts, name, attribute, type_name)]),
            Self::RenameTypeAttribute {
                name,
                attribute,
                new_attribute,
            } => Ok(vec![ty::rename_type_attribute(
                opts,
                name,
                attribute,
                new_attribute,
            )]),
            Self::CreateDomain {
                name,
                type_name,
                options,
            } => Ok(vec![domain::create_domain(opts, name, type_name, options)?]),
            Self::AlterDomain { name, options } => domain::alter_domain(opts, name, options),
            Self::DropDomain { name, options } => {
                Ok(vec![domain::drop_domain(opts, name, *options)])
            }
            Self::RenameDomain { name, new_name } => {
                Ok(vec![domain::rename_domain(opts, name, new_name)])
            }
            Self::CreateSequence { name, options } => {
                Ok(vec![sequence::create_sequence(opts, name, options)])
            }
            Self::AlterSequence { name, options } => {
                Ok(vec![sequence::alter_sequence(opts, name, options)])
            }
            Self::DropSequence { name, options } => {
                Ok(vec![sequence::drop_sequence(opts, name, *options)])
            }
            Self::RenameSequence { name, new_name } => {
                Ok(vec![sequence::rename_sequence(opts, name, new_name)])
            }
            Self::CreateRole { name, options } => {
                Ok(vec![role::create_role(opts, name, options)])
            }
            Self::AlterRole { name, options } => Ok(vec![role::alter_role(opts, name, options)?]),
            Self::DropRole { name, if_exists } => {
                Ok(vec![role::drop_role(opts, name, *if_exists)])
            }
            Self::RenameRole { name, new_name } => {
                Ok(vec![role::rename_role(opts, name, new_name)])
            }
            Self::CreateFunction {
                name,
                params,
                options,
                body,
            } => Ok(vec![func::create_function(opts, name, params, options, body)?]),
            Self::DropFunction {
                name,
                params,
                options,
            } => Ok(vec![func::drop_function(opts, name, params, *options)]),
            Self::RenameFunction {
                name,
                params,
                new_name,
            } => Ok(vec![func::rename_function(opts, name, params, new_name)]),
            Self::CreateTrigger {
                table,
                name,
                options,
            } => trigger::create_trigger(opts, table, name, options),
            Self::DropTrigger {
                table,
                name,
                options,
            } => Ok(vec![trigger::drop_trigger(opts, table, name, *options)]),
            Self::RenameTrigger {
                table,
                old_name,
                new_name,
            } => Ok(vec![trigger::rename_trigger(opts, table, old_name, new_name)]),
            Self::CreateSchema { name, options } => {
                Ok(vec![schema::create_schema(opts, name, options)])
            }
            Self::DropSchema { name, options } => {
                Ok(vec![schema::drop_schema(opts, name, *options)])
            }
            Self::RenameSchema { name, new_name } => {
                Ok(vec![schema::rename_schema(opts, name, new_name)])
            }
            Self::CreateView {
                name,
                options,
                definition,
            } => Ok(vec![view::create_view(opts, name, options, definition)]),
            Self::AlterView { name, options } => Ok(vec![view::alter_view(opts, name, options)?]),
            Self::DropView { name, options } => Ok(vec![view::drop_view(opts, name, *options)]),
            Self::RenameView { name, new_name } => {
                Ok(vec![view::rename_view(opts, name, new_name)])
            }
            Self::CreateMaterializedView {
                name,
                options,
                definition,
            } => Ok(vec![mview::create_materialized_view(
                opts, name, options, definition,
            )]),
            Self::AlterMaterializedView { name, options } => {
                Ok(vec![mview::alter_materialized_view(opts, name, options)?])
            }
            Self::RefreshMaterializedView { name, options } => {
                Ok(vec![mview::refresh_materialized_view(opts, name, *options)])
            }
            Self::DropMaterializedView { name, options } => {
                Ok(vec![mview::drop_materialized_view(opts, name, *options)])
            }
            Self::RenameMaterializedView { name, new_name } => {
                Ok(vec![mview::rename_materialized_view(opts, name, new_name)])
            }
            Self::CreateOperator { name, options } => {
                Ok(vec![operator::create_operator(opts, name, options)?])
            }
            Self::DropOperator {
                name,
                left,
                right,
                options,
            } => Ok(vec![operator::drop_operator(
                opts,
                name,
                left.as_deref(),
                right.as_deref(),
                *options,
            )]),
            Self::CreateOperatorClass {
                name,
                type_name,
                index_method,
                items,
                options,
            } => Ok(vec![operator::create_operator_class(
                opts,
                name,
                type_name,
                index_method,
                items,
                options,
            )]),
            Self::DropOperatorClass {
                name,
                index_method,
                options,
            } => Ok(vec![operator::drop_operator_class(
                opts,
                name,
                index_method,
                *options,
            )]),
            Self::RenameOperatorClass {
                name,
                index_method,
                new_name,
            } => Ok(vec![operator::rename_operator_class(
                opts,
                name,
                index_method,
                new_name,
            )]),
            Self::CreateOperatorFamily { name, index_method } => Ok(vec![
                operator::create_operator_family(opts, name, index_method),
            ]),
            Self::DropOperatorFamily {
                name,
                index_method,
                options,
            } => Ok(vec![operator::drop_operator_family(
                opts,
                name,
                index_method,
                *options,
            )]),
            Self::RenameOperatorFamily {
                name,
                index_method,
                new_name,
            } => Ok(vec![operator::rename_operator_family(
                opts,
                name,
                index_method,
                new_name,
            )]),
            Self::AddToOperatorFamily {
                name,
                index_method,
                items,
            } => Ok(vec![operator::add_to_operator_family(
                opts,
                name,
                index_method,
                items,
            )]),
            Self::RemoveFromOperatorFamily {
                name,
                index_method,
                items,
            } => Ok(vec![operator::remove_from_operator_family(
                opts,
                name,
                index_method,
                items,
            )]),
            Self::CreatePolicy {
                table,
                name,
                options,
            } => Ok(vec![policy::create_policy(opts, table, name, options)]),
            Self::AlterPolicy {
                table,
                name,
                options,
            } => Ok(vec![policy::alter_policy(opts, table, name, options)]),
            Self::DropPolicy {
                table,
                name,
                if_exists,
            } => Ok(vec![policy::drop_policy(opts, table, name, *if_exists)]),
            Self::RenamePolicy {
                table,
                old_name,
                new_name,
            } => Ok(vec![policy::rename_policy(opts, table, old_name, new_name)]),
            Self::GrantOnTables {
                privileges,
                target,
                roles,
                options,
            } => Ok(vec![grant::grant_on_tables(
                opts, privileges, target, roles, *options,
            )]),
            Self::RevokeOnTables {
                privileges,
                target,
                roles,
                options,
            } => Ok(vec![grant::revoke_on_tables(
                opts, privileges, target, roles, options,
            )]),
            Self::GrantOnSchemas {
                privileges,
                schemas,
                roles,
                options,
            } => Ok(vec![grant::grant_on_schemas(
                opts, privileges, schemas, roles, *options,
            )]),
            Self::RevokeOnSchemas {
                privileges,
                schemas,
                roles,
                options,
            } => Ok(vec![grant::revoke_on_schemas(
                opts, privileges, schemas, roles, options,
            )]),
            Self::GrantRoles {
                roles_from,
                roles_to,
                with_admin_option,
            } => Ok(vec![grant::grant_roles(
                opts,
                roles_from,
                roles_to,
                *with_admin_option,
            )]),
            Self::RevokeRoles {
                roles_from,
                roles_to,
                options,
            } => Ok(vec![grant::revoke_roles(opts, roles_from, roles_to, options)]),
            Self::CreateExtension {
                extensions,
                options,
            } => Ok(extension::create_extension(opts, extensions, options)),
            Self::DropExtension {
                extensions,
                options,
            } => Ok(extension::drop_extension(opts, extensions, *options)),
            Self::CreateCast {
                from_type,
                to_type,
                options,
            } => Ok(vec![cast::create_cast(opts, from_type, to_type, options)]),
            Self::DropCast {
                from_type,
                to_type,
                if_exists,
            } => Ok(vec![cast::drop_cast(from_type, to_type, *if_exists)]),
            Self::RunSql { up, .. } => Ok(vec![sql::run_sql(opts, up, &[])]),
        }
    }

    /// Derives the inverse operation.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotReversible`] when the prior state cannot
    /// be reconstructed from this operation alone.
    #[allow(clippy::too_many_lines)]
    pub fn reverse(&self) -> Result<Self> {
        let irreversible = |reason: &str| CoreError::NotReversible {
            operation: self.kind(),
            reason: reason.to_string(),
        };
        match self {
            Self::CreateTable { name, .. } => Ok(Self::DropTable {
                name: name.clone(),
                options: DropOptions::default(),
            }),
            Self::RenameTable { name, new_name } => Ok(Self::RenameTable {
                name: new_name.clone(),
                new_name: name.clone(),
            }),
            Self::AddColumns { table, columns, .. } => Ok(Self::DropColumns {
                table: table.clone(),
                columns: columns.iter().map(|(name, _)| name.clone()).collect(),
                options: DropOptions::default(),
            }),
            Self::RenameColumn {
                table,
                old_name,
                new_name,
            } => Ok(Self::RenameColumn {
                table: table.clone(),
                old_name: new_name.clone(),
                new_name: old_name.clone(),
            }),
            Self::AddConstraint {
                table,
                name,
                constraint,
            } => {
                let name = name
                    .as_ref()
                    .ok_or_else(|| irreversible("constraint has no name to drop it by"))?;
                if matches!(constraint, ConstraintArg::Expression(_)) {
                    return Err(irreversible(
                        "raw constraint expressions cannot be reconstructed",
                    ));
                }
                Ok(Self::DropConstraint {
                    table: table.clone(),
                    name: name.clone(),
                    options: DropOptions::default(),
                })
            }
            Self::RenameConstraint {
                table,
                old_name,
                new_name,
            } => Ok(Self::RenameConstraint {
                table: table.clone(),
                old_name: new_name.clone(),
                new_name: old_name.clone(),
            }),
            Self::CreateIndex {
                table,
                columns,
                options,
            } => Ok(Self::DropIndex {
                table: table.clone(),
                columns: columns.clone(),
                options: options.clone(),
                drop: DropOptions::default(),
            }),
            Self::CreateType { name, .. } => Ok(Self::DropType {
                name: name.clone(),
                options: DropOptions::default(),
            }),
            Self::RenameType { name, new_name } => Ok(Self::RenameType {
                name: new_name.clone(),
                new_name: name.clone(),
            }),
            Self::RenameTypeValue {
                name,
                value,
                new_value,
            } => Ok(Self::RenameTypeValue {
                name: name.clone(),
                value: new_value.clone(),
                new_value: value.clone(),
            }),
            Self::AddTypeAttribute {
                name, attribute, ..
            } => Ok(Self::DropTypeAttribute {
                name: name.clone(),
                attribute: attribute.clone(),
                options: DropOptions::default(),
            }),
            Self::RenameTypeAttribute {
                name,
                attribute,
                new_attribute,
            } => Ok(Self::RenameTypeAttribute {
                name: name.clone(),
                attribute: new_attribute.clone(),
                new_attribute: attribute.clone(),
            }),
            Self::CreateDomain { name, .. } => Ok(Self::DropDomain {
                name: name.clone(),
                options: DropOptions::default(),
            }),
            Self::RenameDomain { name, new_name } => Ok(Self::RenameDomain {
                name: new_name.clone(),
                new_name: name.clone(),
            }),
            Self::CreateSequence { name, .. } => Ok(Self::DropSequence {
                name: name.clone(),
                options: DropOptions::default(),
            }),
            Self::RenameSequence { name, new_name } => Ok(Self::RenameSequence {
                name: new_name.clone(),
                new_name: name.clone(),
            }),
            Self::CreateRole { name, .. } => Ok(Self::DropRole {
                name: name.clone(),
                if_exists: false,
            }),
            Self::RenameRole { name, new_name } => Ok(Self::RenameRole {
                name: new_name.clone(),
                new_name: name.clone(),
            }),
            Self::CreateFunction { name, params, .. } => Ok(Self::DropFunction {
                name: name.clone(),
                params: params.clone(),
                options: DropOptions::default(),
            }),
            Self::RenameFunction {
                name,
                params,
                new_name,
            } => Ok(Self::RenameFunction {
                name: new_name.clone(),
                params: params.clone(),
                new_name: name.clone(),
            }),
            Self::CreateTrigger { table, name, .. } => Ok(Self::DropTrigger {
                table: table.clone(),
                name: name.clone(),
                options: DropOptions::default(),
            }),
            Self::RenameTrigger {
                table,
                old_name,
                new_name,
            } => Ok(Self::RenameTrigger {
                table: table.clone(),
                old_name: new_name.clone(),
                new_name: old_name.clone(),
            }),
            Self::CreateSchema { name, .. } => Ok(Self::DropSchema {
                name: name.clone(),
                options: DropOptions::default(),
            }),
            Self::RenameSchema { name, new_name } => Ok(Self::RenameSchema {
                name: new_name.clone(),
                new_name: name.clone(),
            }),
            Self::CreateView { name, .. } => Ok(Self::DropView {
                name: name.clone(),
                options: DropOptions::default(),
            }),
            Self::RenameView { name, new_name } => Ok(Self::RenameView {
                name: new_name.clone(),
                new_name: name.clone(),
            }),
            Self::CreateMaterializedView { name, .. } => Ok(Self::DropMaterializedView {
                name: name.clone(),
                options: DropOptions::default(),
            }),
            Self::RefreshMaterializedView { .. } => Ok(self.clone()),
            Self::RenameMaterializedView { name, new_name } => {
                Ok(Self::RenameMaterializedView {
                    name: new_name.clone(),
                    new_name: name.clone(),
                })
            }
            Self::CreateOperator { name, options } => Ok(Self::DropOperator {
                name: name.clone(),
                left: options.left.clone(),
                right: options.right.clone(),
                options: DropOptions::default(),
            }),
            Self::CreateOperatorClass {
                name, index_method, ..
            } => Ok(Self::DropOperatorClass {
                name: name.clone(),
                index_method: index_method.clone(),
                options: DropOptions::default(),
            }),
            Self::RenameOperatorClass {
                name,
                index_method,
                new_name,
            } => Ok(Self::RenameOperatorClass {
                name: new_name.clone(),
                index_method: index_method.clone(),
                new_name: name.clone(),
            }),
            Self::CreateOperatorFamily { name, index_method } => Ok(Self::DropOperatorFamily {
                name: name.clone(),
                index_method: index_method.clone(),
                options: DropOptions::default(),
            }),
            Self::RenameOperatorFamily {
                name,
                index_method,
                new_name,
            } => Ok(Self::RenameOperatorFamily {
                name: new_name.clone(),
                index_method: index_method.clone(),
                new_name: name.clone(),
            }),
            Self::AddToOperatorFamily {
                name,
                index_method,
                items,
            } => Ok(Self::RemoveFromOperatorFamily {
                name: name.clone(),
                index_method: index_method.clone(),
                items: items.clone(),
            }),
            Self::CreatePolicy { table, name, .. } => Ok(Self::DropPolicy {
                table: table.clone(),
                name: name.clone(),
                if_exists: false,
            }),
            Self::RenamePolicy {
                table,
                old_name,
                new_name,
            } => Ok(Self::RenamePolicy {
                table: table.clone(),
                old_name: new_name.clone(),
                new_name: old_name.clone(),
            }),
            Self::GrantOnTables {
                privileges,
                target,
                roles,
                ..
            } => Ok(Self::RevokeOnTables {
                privileges: privileges.clone(),
                target: target.clone(),
                roles: roles.clone(),
                options: RevokeOptions::default(),
            }),
            Self::GrantOnSchemas {
                privileges,
                schemas,
                roles,
                ..
            } => Ok(Self::RevokeOnSchemas {
                privileges: privileges.clone(),
                schemas: schemas.clone(),
                roles: roles.clone(),
                options: RevokeOptions::default(),
            }),
            Self::GrantRoles {
                roles_from,
                roles_to,
                ..
            } => Ok(Self::RevokeRoles {
                roles_from: roles_from.clone(),
                roles_to: roles_to.clone(),
                options: RevokeOptions::default(),
            }),
            Self::CreateExtension { extensions, .. } => Ok(Self::DropExtension {
                extensions: extensions.clone(),
                options: DropOptions::default(),
            }),
            Self::CreateCast {
                from_type, to_type, ..
            } => Ok(Self::DropCast {
                from_type: from_type.clone(),
                to_type: to_type.clone(),
                if_exists: false,
            }),
            Self::RunSql { up, down } => down.as_ref().map_or_else(
                || Err(irreversible("no down SQL was provided")),
                |down| {
                    Ok(Self::RunSql {
                        up: down.clone(),
                        down: Some(up.clone()),
                    })
                },
            ),
            Self::DropTable { .. }
            | Self::DropColumns { .. }
            | Self::DropConstraint { .. }
            | Self::DropIndex { .. }
            | Self::DropType { .. }
            | Self::DropTypeAttribute { .. }
            | Self::DropDomain { .. }
            | Self::DropSequence { .. }
            | Self::DropRole { .. }
            | Self::DropFunction { .. }
            | Self::DropTrigger { .. }
            | Self::DropSchema { .. }
            | Self::DropView { .. }
            | Self::DropMaterializedView { .. }
            | Self::DropOperator { .. }
            | Self::DropOperatorClass { .. }
            | Self::DropOperatorFamily { .. }
            | Self::RemoveFromOperatorFamily { .. }
            | Self::DropPolicy { .. }
            | Self::DropExtension { .. }
            | Self::DropCast { .. } => {
                Err(irreversible("the dropped definition is not recorded"))
            }
            Self::AlterTable { .. }
            | Self::AlterColumn { .. }
            | Self::AddTypeValue { .. }
            | Self::SetTypeAttribute { .. }
            | Self::AlterDomain { .. }
            | Self::AlterSequence { .. }
            | Self::AlterRole { .. }
            | Self::AlterView { .. }
            | Self::AlterMaterializedView { .. }
            | Self::AlterPolicy { .. } => {
                Err(irreversible("the previous settings are not recorded"))
            }
            Self::RevokeOnTables { .. }
            | Self::RevokeOnSchemas { .. }
            | Self::RevokeRoles { .. } => {
                Err(irreversible("the revoked privileges are not recorded"))
            }
        }
    }

    /// True when [`Operation::reverse`] would succeed.
    #[must_use]
    pub fn is_reversible(&self) -> bool {
        self.reverse().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_create_table_reverses_to_drop() {
        let operation = Operation::CreateTable {
            name: Name::new("names"),
            columns: vec![("id".to_string(), ColumnSpec::from("id"))],
            options: Box::default(),
        };
        let opts = FormattingOptions::default();
        assert_eq!(
            operation.up(&opts).unwrap(),
            vec![
                "CREATE TABLE \"names\" (\n  \"id\" serial PRIMARY KEY\n);".to_string()
            ]
        );

        let reversed = operation.reverse().unwrap();
        assert_eq!(reversed.up(&opts).unwrap(), vec!["DROP TABLE \"names\";".to_string()]);
    }

    #[test]
    fn test_equal_options_render_identical_sql() {
        let shorthands = || {
            let mut table = crate::typing::TypeShorthands::new();
            table.insert(
                "money",
                crate::typing::ColumnDefinition::of_type("numeric(12,2)"),
            );
            table
        };
        let operation = Operation::CreateTable {
            name: Name::new("accountBalances"),
            columns: vec![
                ("id".to_string(), ColumnSpec::from("id")),
                ("amount".to_string(), ColumnSpec::from("money")),
            ],
            options: Box::default(),
        };

        let first = FormattingOptions::new(true, shorthands());
        let second = FormattingOptions::new(true, shorthands());
        assert_eq!(operation.up(&first).unwrap(), operation.up(&second).unwrap());
    }

    #[test]
    fn test_rename_reverse_round_trips() {
        let operation = Operation::RenameTable {
            name: Name::new("old"),
            new_name: Name::new("new"),
        };
        let twice = operation.reverse().unwrap().reverse().unwrap();
        assert_eq!(twice, operation);
    }

    #[test]
    fn test_unnamed_constraint_is_not_reversible() {
        let operation = Operation::AddConstraint {
            table: Name::new("items"),
            name: None,
            constraint: ConstraintArg::from("CHECK (price > 0)"),
        };
        let err = operation.reverse().unwrap_err();
        match err {
            CoreError::NotReversible { operation, .. } => {
                assert_eq!(operation, "addConstraint");
            }
            other => panic!("expected NotReversible, got {other}"),
        }
    }

    #[test]
    fn test_named_expression_constraint_is_not_reversible() {
        let operation = Operation::AddConstraint {
            table: Name::new("items"),
            name: Some("price_positive".to_string()),
            constraint: ConstraintArg::from("CHECK (price > 0)"),
        };
        assert!(!operation.is_reversible());
    }

    #[test]
    fn test_drop_operations_are_not_reversible() {
        let operation = Operation::DropTable {
            name: Name::new("names"),
            options: DropOptions::default(),
        };
        assert!(!operation.is_reversible());
    }

    #[test]
    fn test_refresh_materialized_view_is_self_inverse() {
        let operation = Operation::RefreshMaterializedView {
            name: Name::new("totals"),
            options: RefreshOptions::default(),
        };
        assert_eq!(operation.reverse().unwrap(), operation);
    }

    #[test]
    fn test_grant_reverses_to_revoke() {
        let operation = Operation::GrantOnTables {
            privileges: vec![TablePrivilege::Select],
            target: TableTarget::Tables(vec![Name::new("docs")]),
            roles: vec!["reader".to_string()],
            options: GrantOptions::default(),
        };
        let reversed = operation.reverse().unwrap();
        let opts = FormattingOptions::default();
        assert_eq!(
            reversed.up(&opts).unwrap(),
            vec!["REVOKE SELECT ON \"docs\" FROM \"reader\";".to_string()]
        );
        assert!(!reversed.is_reversible());
    }

    #[test]
    fn test_run_sql_with_down_swaps() {
        let operation = Operation::RunSql {
            up: "UPDATE t SET v = 1".to_string(),
            down: Some("UPDATE t SET v = 0".to_string()),
        };
        let opts = FormattingOptions::default();
        assert_eq!(
            operation.reverse().unwrap().up(&opts).unwrap(),
            vec!["UPDATE t SET v = 0;".to_string()]
        );

        let no_down = Operation::RunSql {
            up: "UPDATE t SET v = 1".to_string(),
            down: None,
        };
        assert!(!no_down.is_reversible());
    }

    #[test]
    fn test_concurrent_index_requires_no_transaction() {
        let operation = Operation::CreateIndex {
            table: Name::new("users"),
            columns: vec![IndexColumn::from("email")],
            options: Box::new(IndexOptions {
                concurrently: true,
                ..IndexOptions::default()
            }),
        };
        assert!(operation.requires_no_transaction());
        assert!(operation.is_reversible());
    }

    #[test]
    fn test_operation_serde_round_trip() {
        let operation = Operation::AddColumns {
            table: Name::new("users"),
            columns: vec![(
                "age".to_string(),
                ColumnSpec::Full(crate::typing::ColumnDefinition {
                    type_name: "int".to_string(),
                    default: Some(Value::Int(0)),
                    ..crate::typing::ColumnDefinition::default()
                }),
            )],
            options: AddColumnsOptions::default(),
        };
        let json = serde_json::to_string(&operation).unwrap();
        let parsed: Operation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, operation);
    }
}
