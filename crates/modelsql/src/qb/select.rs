//! SELECT statement builder.

use super::builder::Builder;
use super::expr::{Column, Predicate, Selectable};
use super::table::{EntityRef, Subquery, TableRef};
use crate::client::Executor;
use crate::db::Db;
use crate::error::{OrmError, OrmResult};
use crate::model::Entity;
use crate::query::Query;
use std::marker::PhantomData;

/// Type-erased SELECT configuration, shared by [`Selector`] and [`Subquery`].
#[derive(Debug, Clone)]
pub struct SelectStatement {
    pub(crate) entity: EntityRef,
    pub(crate) columns: Vec<Selectable>,
    pub(crate) table: TableRef,
    pub(crate) where_: Vec<Predicate>,
    pub(crate) group_by: Vec<Column>,
    pub(crate) having: Vec<Predicate>,
    /// 0 means no LIMIT.
    pub(crate) limit: u64,
    /// 0 means no OFFSET.
    pub(crate) offset: u64,
}

impl SelectStatement {
    fn new(entity: EntityRef) -> Self {
        Self {
            entity,
            columns: Vec::new(),
            table: TableRef::Implicit,
            where_: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            limit: 0,
            offset: 0,
        }
    }
}

/// SELECT builder for entity type `T`.
///
/// ```ignore
/// use modelsql::qb::{avg, col};
///
/// let users = db
///     .selector::<User>()
///     .where_([col("age").gt(18)])
///     .limit(10)
///     .get_multi()
///     .await?;
///
/// // SELECT `dept`,AVG(`age`) AS `avg_age` FROM `user` GROUP BY `dept` HAVING AVG(`age`) > ?;
/// let query = db
///     .selector::<User>()
///     .select([col("dept").into(), avg("age").alias("avg_age").into()])
///     .group_by([col("dept")])
///     .having([avg("age").gt(30)])
///     .build()?;
/// ```
pub struct Selector<'db, T, E = ()> {
    db: &'db Db<E>,
    stmt: SelectStatement,
    _marker: PhantomData<fn() -> T>,
}

impl<'db, T: Entity, E> Selector<'db, T, E> {
    pub(crate) fn new(db: &'db Db<E>) -> Self {
        Self {
            db,
            stmt: SelectStatement::new(EntityRef::of::<T>()),
            _marker: PhantomData,
        }
    }

    // ==================== configuration ====================

    /// Select list; empty means `*`.
    pub fn select(mut self, columns: impl IntoIterator<Item = Selectable>) -> Self {
        self.stmt.columns = columns.into_iter().collect();
        self
    }

    /// FROM source; defaults to `T`'s own table.
    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
        self.stmt.table = table.into();
        self
    }

    /// Replace the WHERE predicates. Several predicates are ANDed.
    pub fn where_(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.stmt.where_ = predicates.into_iter().collect();
        self
    }

    /// Add one WHERE predicate.
    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.stmt.where_.push(predicate);
        self
    }

    pub fn group_by(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.stmt.group_by = columns.into_iter().collect();
        self
    }

    /// Replace the HAVING predicates. Several predicates are ANDed.
    pub fn having(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.stmt.having = predicates.into_iter().collect();
        self
    }

    /// Bound as an argument; 0 removes the LIMIT.
    pub fn limit(mut self, n: u64) -> Self {
        self.stmt.limit = n;
        self
    }

    /// Bound as an argument; 0 removes the OFFSET.
    pub fn offset(mut self, n: u64) -> Self {
        self.stmt.offset = n;
        self
    }

    // ==================== build ====================

    /// Render the statement.
    pub fn build(&self) -> OrmResult<Query> {
        let registry = self.db.registry();
        let model = self.stmt.entity.model(registry)?;
        let mut builder = Builder::new(registry, self.db.dialect(), model);
        builder.render_select(&self.stmt)?;
        Ok(builder.finish())
    }

    /// Use this statement as a table or an expression operand.
    pub fn as_subquery(self, alias: impl Into<String>) -> Subquery {
        Subquery::new(self.stmt, alias.into())
    }
}

impl<'db, T, E> Selector<'db, T, E>
where
    T: Entity + Default,
    E: Executor,
{
    // ==================== execution ====================

    /// Fetch exactly one row.
    ///
    /// `NoRows` when nothing matches, `TooManyRows` when more than one row does.
    pub async fn get(&self) -> OrmResult<T> {
        let mut rows = self.fetch().await?;
        if rows.len() > 1 {
            return Err(OrmError::TooManyRows {
                expected: 1,
                got: rows.len(),
            });
        }
        rows.pop().ok_or(OrmError::NoRows)
    }

    /// Fetch every matching row.
    pub async fn get_multi(&self) -> OrmResult<Vec<T>> {
        self.fetch().await
    }

    async fn fetch(&self) -> OrmResult<Vec<T>> {
        let query = self.build()?;
        let mapping = self.db.mapping::<T>()?;
        self.db.log_statement("select", &query);
        self.db.executor().execute_query(&query, &mapping).await
    }
}
