//! Model-driven statement builders.
//!
//! Statements are composed from an expression tree and rendered against the table models of
//! the entities they mention. Column names may be given as Rust field names or as column
//! names; both resolve through the model.
//!
//! # Usage
//!
//! ```ignore
//! use modelsql::qb::{col, exists, table_of};
//!
//! // SELECT * FROM `user` WHERE (`age` >= ?) AND (`first_name` LIKE ?);
//! let query = db
//!     .selector::<User>()
//!     .where_([col("age").ge(18), col("first_name").like("A%")])
//!     .build()?;
//!
//! // SELECT * FROM (`user` AS `u` JOIN `order` AS `o` ON `u`.`id` = `o`.`user_id`);
//! let u = table_of::<User>().alias("u");
//! let o = table_of::<Order>().alias("o");
//! let query = db
//!     .selector::<User>()
//!     .from(u.clone().join(o.clone()).on([u.col("id").eq(o.col("user_id"))]))
//!     .build()?;
//!
//! // SELECT * FROM `user` WHERE EXISTS (SELECT `user_id` FROM `order`);
//! let sub = db.selector::<Order>().select([col("user_id").into()]).as_subquery("o");
//! let query = db.selector::<User>().where_([exists(sub)]).build()?;
//! ```

mod builder;
mod expr;
mod select;
mod table;
mod update;

pub use expr::{
    Aggregate, AggregateFn, Assignable, Assignment, Column, Expr, IntoExpr, Op, Predicate,
    Selectable, SubqueryExpr, all, any, assign, assign_non_zero, avg, col, count, count_all,
    exists, max, min, not, some, sum,
};
pub use select::{SelectStatement, Selector};
pub use table::{EntityRef, Join, JoinBuilder, JoinKind, Subquery, Table, TableRef, table_of};
pub use update::Updater;

#[cfg(all(test, feature = "derive"))]
mod tests;
