//! Table references for FROM clauses and column qualifiers.

use super::expr::{Column, Predicate, Selectable};
use super::select::SelectStatement;
use crate::error::{OrmError, OrmResult};
use crate::model::{Entity, Registry, TableModel, short_type_name};
use std::fmt;
use std::sync::Arc;

/// A type-erased handle to an entity type, resolved against a registry at build time.
#[derive(Clone, Copy)]
pub struct EntityRef {
    type_name: &'static str,
    resolve: fn(&Registry) -> OrmResult<Arc<TableModel>>,
}

fn resolve_model<T: Entity>(registry: &Registry) -> OrmResult<Arc<TableModel>> {
    registry.get::<T>()
}

impl EntityRef {
    pub fn of<T: Entity>() -> Self {
        Self {
            type_name: short_type_name::<T>(),
            resolve: resolve_model::<T>,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Resolve the model, reporting failures as `ModelNotFound`.
    pub(crate) fn model(&self, registry: &Registry) -> OrmResult<Arc<TableModel>> {
        (self.resolve)(registry).map_err(|e| OrmError::model_not_found(self.type_name, e))
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityRef").field(&self.type_name).finish()
    }
}

/// Source of rows for a statement.
#[derive(Debug, Clone, Default)]
pub enum TableRef {
    /// The statement's own model.
    #[default]
    Implicit,
    Table(Table),
    Join(Box<Join>),
    Subquery(Subquery),
}

impl TableRef {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            TableRef::Implicit => "implicit table",
            TableRef::Table(_) => "table",
            TableRef::Join(_) => "join",
            TableRef::Subquery(_) => "subquery",
        }
    }
}

impl From<Table> for TableRef {
    fn from(t: Table) -> Self {
        TableRef::Table(t)
    }
}

impl From<Join> for TableRef {
    fn from(j: Join) -> Self {
        TableRef::Join(Box::new(j))
    }
}

impl From<Subquery> for TableRef {
    fn from(s: Subquery) -> Self {
        TableRef::Subquery(s)
    }
}

/// The table of an entity type, optionally aliased.
#[derive(Debug, Clone)]
pub struct Table {
    pub(crate) entity: EntityRef,
    pub(crate) alias: Option<String>,
}

/// Table reference for entity type `T`.
pub fn table_of<T: Entity>() -> Table {
    Table {
        entity: EntityRef::of::<T>(),
        alias: None,
    }
}

macro_rules! join_methods {
    () => {
        pub fn join(self, right: impl Into<TableRef>) -> JoinBuilder {
            JoinBuilder::new(self.into(), right.into(), JoinKind::Inner)
        }

        pub fn left_join(self, right: impl Into<TableRef>) -> JoinBuilder {
            JoinBuilder::new(self.into(), right.into(), JoinKind::Left)
        }

        pub fn right_join(self, right: impl Into<TableRef>) -> JoinBuilder {
            JoinBuilder::new(self.into(), right.into(), JoinKind::Right)
        }
    };
}

impl Table {
    /// `table AS alias`; columns taken from the table are then qualified by the alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Column qualified by this table.
    pub fn col(&self, name: impl Into<String>) -> Column {
        Column::qualified(TableRef::Table(self.clone()), name)
    }

    join_methods!();
}

/// Join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// `(left KIND right [ON ... | USING (...)])`.
#[derive(Debug, Clone)]
pub struct Join {
    pub(crate) left: TableRef,
    pub(crate) right: TableRef,
    pub(crate) kind: JoinKind,
    pub(crate) on: Vec<Predicate>,
    pub(crate) using: Vec<String>,
}

impl Join {
    join_methods!();
}

/// A join waiting for its condition.
#[derive(Debug, Clone)]
pub struct JoinBuilder {
    left: TableRef,
    right: TableRef,
    kind: JoinKind,
}

impl JoinBuilder {
    fn new(left: TableRef, right: TableRef, kind: JoinKind) -> Self {
        Self { left, right, kind }
    }

    /// Join condition; several predicates are ANDed.
    pub fn on(self, predicates: impl IntoIterator<Item = Predicate>) -> Join {
        Join {
            left: self.left,
            right: self.right,
            kind: self.kind,
            on: predicates.into_iter().collect(),
            using: Vec::new(),
        }
    }

    /// `USING (cols)`; names resolve against the joined models.
    pub fn using<S: Into<String>>(self, columns: impl IntoIterator<Item = S>) -> Join {
        Join {
            left: self.left,
            right: self.right,
            kind: self.kind,
            on: Vec::new(),
            using: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// A SELECT used as a table or an expression operand.
///
/// Created by [`Selector::as_subquery`](super::Selector::as_subquery). It exposes the
/// columns of its select list, or every column of its model when the list is `*`.
#[derive(Debug, Clone)]
pub struct Subquery {
    pub(crate) stmt: Arc<SelectStatement>,
    pub(crate) alias: String,
}

impl Subquery {
    pub(crate) fn new(stmt: SelectStatement, alias: String) -> Self {
        Self {
            stmt: Arc::new(stmt),
            alias,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Columns exposed by the subquery; empty when it selects `*`.
    pub fn columns(&self) -> &[Selectable] {
        &self.stmt.columns
    }

    /// Column qualified by the subquery alias.
    pub fn col(&self, name: impl Into<String>) -> Column {
        Column::qualified(TableRef::Subquery(self.clone()), name)
    }

    join_methods!();
}
