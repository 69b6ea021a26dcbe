//! Convenient imports for typical `modelsql` usage.
//!
//! ```ignore
//! use modelsql::prelude::*;
//! ```

pub use crate::{
    AccessorStrategy, Db, DbConfig, DialectKind, Entity, Executor, Mapping, OrmError, OrmResult,
    Query, Registry, Value,
};

pub use crate::qb::{
    all, any, assign, assign_non_zero, avg, col, count, count_all, exists, max, min, not, some,
    sum, table_of,
};
