//! The entry point tying an executor to a dialect, a model registry and an accessor strategy.

mod config;

pub use config::{DbConfig, RegistryScope};

use crate::accessor::{AccessorStrategy, ValueAccessor};
use crate::client::Mapping;
use crate::dialect::Dialect;
use crate::error::OrmResult;
use crate::model::{Entity, Registry, TableModel};
use crate::qb::{Selector, Updater};
use crate::query::Query;
use std::sync::Arc;

/// A configured database handle.
///
/// `E` is the [`Executor`](crate::Executor) statements run on. `Db<()>` (see
/// [`Db::offline`]) can build statements but not run them.
///
/// ```ignore
/// use modelsql::{Db, DbConfig};
/// use modelsql::dialect::DialectKind;
///
/// let db = Db::open(client, DbConfig::new().dialect(DialectKind::Postgres))?;
/// let user = db.selector::<User>().where_([col("id").eq(1i64)]).get().await?;
/// ```
pub struct Db<E = ()> {
    executor: E,
    dialect: Box<dyn Dialect>,
    registry: Option<Arc<Registry>>,
    accessor: AccessorStrategy,
    config: DbConfig,
}

impl Db<()> {
    /// A `Db` without an executor, for building statements only.
    pub fn offline(config: DbConfig) -> OrmResult<Self> {
        Self::open((), config)
    }
}

impl<E> Db<E> {
    /// Validate `config` and create a handle around `executor`.
    pub fn open(executor: E, config: DbConfig) -> OrmResult<Self> {
        config.validate()?;
        let dialect = config.dialect.into_dialect()?;
        let registry = match config.registry {
            RegistryScope::Global => None,
            RegistryScope::Isolated => Some(Arc::new(Registry::new())),
        };
        tracing::debug!(
            target: "modelsql::db",
            dialect = dialect.name(),
            accessor = ?config.accessor,
            registry = ?config.registry,
            "opened db"
        );
        Ok(Self {
            executor,
            dialect,
            registry,
            accessor: config.accessor,
            config,
        })
    }

    /// Like [`Db::open`], but panics on an invalid configuration.
    ///
    /// Meant for process start-up, where a bad configuration is unrecoverable.
    pub fn must_open(executor: E, config: DbConfig) -> Self {
        match Self::open(executor, config) {
            Ok(db) => db,
            Err(e) => panic!("failed to open db: {e}"),
        }
    }

    /// Use `registry` for model lookups instead of the configured one.
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replace the configured dialect.
    pub fn with_dialect(mut self, dialect: impl Dialect + 'static) -> Self {
        self.dialect = Box::new(dialect);
        self
    }

    pub fn selector<T: Entity>(&self) -> Selector<'_, T, E> {
        Selector::new(self)
    }

    pub fn updater<T: Entity>(&self) -> Updater<'_, '_, T, E> {
        Updater::new(self)
    }

    pub fn registry(&self) -> &Registry {
        match &self.registry {
            Some(registry) => registry,
            None => Registry::global(),
        }
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Value accessor for `T` using the configured strategy.
    pub fn accessor<T: Entity>(&self) -> OrmResult<Box<dyn ValueAccessor<T>>> {
        let model = self.registry().get::<T>()?;
        self.accessor_for(model)
    }

    pub(crate) fn accessor_for<T: Entity>(
        &self,
        model: Arc<TableModel>,
    ) -> OrmResult<Box<dyn ValueAccessor<T>>> {
        self.accessor.accessor::<T>(model)
    }

    /// Row mapping for `T`, handed to the executor with each query.
    pub fn mapping<T: Entity>(&self) -> OrmResult<Mapping<T>> {
        Ok(Mapping::new(self.accessor::<T>()?))
    }

    pub(crate) fn log_statement(&self, kind: &'static str, query: &Query) {
        if !self.config.log_statements {
            return;
        }
        let sql = truncate_sql(query.sql(), self.config.max_logged_sql);
        tracing::debug!(
            target: "modelsql::sql",
            kind,
            sql = %sql,
            args = query.args().len(),
            "executing statement"
        );
    }
}

impl<E> std::fmt::Debug for Db<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("dialect", &self.dialect.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Truncate to at most `max` chars, marking the cut with `...`.
fn truncate_sql(sql: &str, max: Option<usize>) -> std::borrow::Cow<'_, str> {
    match max {
        Some(max) => match sql.char_indices().nth(max) {
            Some((end, _)) => format!("{}...", &sql[..end]).into(),
            None => sql.into(),
        },
        None => sql.into(),
    }
}
