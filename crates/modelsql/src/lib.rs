//! # modelsql
//!
//! A type-directed SQL statement builder with struct-to-table mapping.
//!
//! ## Features
//!
//! - **Models from types**: table and column metadata derived once per struct and cached
//! - **Two value accessors**: name-based field access through generated code, or direct
//!   reads and writes at recorded field offsets
//! - **Expression trees**: predicates nest freely and render with their grouping intact
//! - **Joins and subqueries**: usable as tables, operands, `IN`/`EXISTS`/`ANY` targets
//! - **Pluggable dialects**: MySQL, SQLite, PostgreSQL or a custom quote/placeholder pair
//! - **Partial updates**: unset fields never overwrite columns with zero values
//!
//! ## Example
//!
//! ```ignore
//! use modelsql::prelude::*;
//!
//! #[derive(Debug, Default, Entity)]
//! struct User {
//!     id: i64,
//!     first_name: String,
//!     age: i32,
//!     last_name: Option<String>,
//! }
//!
//! let db = Db::open(executor, DbConfig::new())?;
//!
//! // SELECT * FROM `user` WHERE (`age` > ?) AND (`first_name` = ?);
//! let users = db
//!     .selector::<User>()
//!     .where_([col("age").gt(18), col("first_name").eq("Tom")])
//!     .get_multi()
//!     .await?;
//!
//! // UPDATE `user` SET `first_name` = ? WHERE `id` = ?;
//! let user = User { id: 1, first_name: "Jerry".into(), ..Default::default() };
//! db.updater::<User>()
//!     .update(&user)
//!     .set([col("first_name").into(), col("age").into()])
//!     .where_([col("id").eq(user.id)])
//!     .exec()
//!     .await?;
//! ```

// Lets the derive's `::modelsql::` paths resolve inside this crate's own tests.
extern crate self as modelsql;

pub mod accessor;
pub mod client;
pub mod db;
pub mod dialect;
pub mod error;
pub mod model;
pub mod prelude;
pub mod qb;
pub mod query;
pub mod value;

#[cfg(feature = "postgres")]
pub mod pg;

pub use accessor::{AccessorStrategy, DirectAccessor, ReflectiveAccessor, ValueAccessor};
pub use client::{Executor, Mapping};
pub use db::{Db, DbConfig, RegistryScope};
pub use dialect::{CustomDialect, Dialect, DialectKind, MySql, PlaceholderStyle, Postgres, Sqlite};
pub use error::{OrmError, OrmResult};
pub use model::{
    Entity, EntityDescriptor, FieldDescriptor, FieldModel, ModelOption, Registry, TableModel,
};
pub use query::Query;
pub use value::{FieldType, FromValue, Mismatch, ScalarKind, SqlType, ToValue, Value};

#[cfg(feature = "derive")]
pub use modelsql_derive::Entity;
