//! The execution seam: what a database backend must provide to run built statements.

use crate::accessor::ValueAccessor;
use crate::error::{OrmError, OrmResult};
use crate::model::{Entity, TableModel};
use crate::query::Query;
use crate::value::Value;
use std::sync::Arc;

/// Runs built statements against a database.
///
/// Implemented for `tokio_postgres::Client` with the `postgres` feature; tests and other
/// backends provide their own.
pub trait Executor: Send + Sync {
    /// Run a row-returning statement and materialize each row through `mapping`.
    fn execute_query<T: Entity + Default>(
        &self,
        query: &Query,
        mapping: &Mapping<T>,
    ) -> impl std::future::Future<Output = OrmResult<Vec<T>>> + Send;

    /// Run a statement and return the number of affected rows.
    fn execute_update(
        &self,
        query: &Query,
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;
}

impl<E: Executor> Executor for &E {
    fn execute_query<T: Entity + Default>(
        &self,
        query: &Query,
        mapping: &Mapping<T>,
    ) -> impl std::future::Future<Output = OrmResult<Vec<T>>> + Send {
        (**self).execute_query(query, mapping)
    }

    fn execute_update(
        &self,
        query: &Query,
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        (**self).execute_update(query)
    }
}

/// How result rows map onto `T`: its table model plus the configured value accessor.
pub struct Mapping<T> {
    accessor: Box<dyn ValueAccessor<T>>,
}

impl<T: Entity> Mapping<T> {
    pub fn new(accessor: Box<dyn ValueAccessor<T>>) -> Self {
        Self { accessor }
    }

    pub fn model(&self) -> &Arc<TableModel> {
        self.accessor.model()
    }

    pub fn accessor(&self) -> &dyn ValueAccessor<T> {
        self.accessor.as_ref()
    }

    /// Store a result column into `row`.
    ///
    /// `column` is matched against column names first, then field names.
    pub fn set_column(&self, row: &mut T, column: &str, value: Value) -> OrmResult<()> {
        let model = self.accessor.model();
        let field = model
            .column(column)
            .or_else(|| model.field(column))
            .ok_or_else(|| OrmError::unknown_column(column))?;
        self.accessor.set_field(row, field.field_name, value)
    }
}

impl<T: Entity + Default> Mapping<T> {
    /// A fresh row to fill with [`set_column`](Mapping::set_column).
    pub fn new_row(&self) -> T {
        T::default()
    }
}

impl<T> std::fmt::Debug for Mapping<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapping")
            .field("table", &self.accessor.model().table_name())
            .finish()
    }
}
