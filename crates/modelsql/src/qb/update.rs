//! UPDATE statement builder.

use super::builder::Builder;
use super::expr::{Assignable, Column, Predicate};
use super::table::{EntityRef, TableRef};
use crate::client::Executor;
use crate::db::Db;
use crate::error::{OrmError, OrmResult};
use crate::model::{Entity, Registry, TableModel};
use crate::query::Query;

/// What the SET list is made of.
#[derive(Debug, Clone)]
enum SetList {
    Explicit(Vec<Assignable>),
    /// Every mapped field of the target value, each skipped when zero.
    NonZeroColumns,
}

/// UPDATE builder for entity type `T`.
///
/// Bare [`Column`] assignables take their value from the entity passed to
/// [`update`](Updater::update) and are left out of the SET list while that value is the
/// zero value of the field's type, so partially filled entities never overwrite columns
/// with zeros.
///
/// ```ignore
/// use modelsql::qb::{assign, col};
///
/// // UPDATE `user` SET `first_name` = ?,`age` = ? WHERE `id` = ?;
/// let rows = db
///     .updater::<User>()
///     .update(&user)
///     .set([col("first_name").into(), assign("age", 30).into()])
///     .where_([col("id").eq(user.id)])
///     .exec()
///     .await?;
/// ```
pub struct Updater<'db, 'v, T, E = ()> {
    db: &'db Db<E>,
    value: Option<&'v T>,
    set: SetList,
    where_: Vec<Predicate>,
}

impl<'db, 'v, T: Entity, E> Updater<'db, 'v, T, E> {
    pub(crate) fn new(db: &'db Db<E>) -> Self {
        Self {
            db,
            value: None,
            set: SetList::Explicit(Vec::new()),
            where_: Vec::new(),
        }
    }

    /// Entity that bare column assignables read their values from.
    pub fn update(mut self, value: &'v T) -> Self {
        self.value = Some(value);
        self
    }

    pub fn set(mut self, assignables: impl IntoIterator<Item = Assignable>) -> Self {
        self.set = SetList::Explicit(assignables.into_iter().collect());
        self
    }

    /// Set every mapped column whose value in the updated entity is non-zero.
    pub fn set_non_zero_columns(mut self) -> Self {
        self.set = SetList::NonZeroColumns;
        self
    }

    /// Replace the WHERE predicates. Several predicates are ANDed.
    pub fn where_(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.where_ = predicates.into_iter().collect();
        self
    }

    /// Render the statement.
    ///
    /// Fails with `NoUpdatedColumns` when nothing is left to set.
    pub fn build(&self) -> OrmResult<Query> {
        if matches!(&self.set, SetList::Explicit(list) if list.is_empty()) {
            return Err(OrmError::NoUpdatedColumns);
        }
        let registry = self.db.registry();
        let model = EntityRef::of::<T>().model(registry)?;

        let assignables: Vec<Assignable> = match &self.set {
            SetList::Explicit(list) => list.clone(),
            SetList::NonZeroColumns => model
                .fields()
                .iter()
                .map(|f| Assignable::Column(Column::new(f.field_name)))
                .collect(),
        };
        let accessor = if assignables
            .iter()
            .any(|a| matches!(a, Assignable::Column(_)))
        {
            Some(self.db.accessor_for::<T>(model.clone())?)
        } else {
            None
        };

        let mut builder = Builder::new(registry, self.db.dialect(), model.clone());
        builder.push_sql("UPDATE ");
        builder.quote(model.table_name());
        builder.push_sql(" SET ");

        let mut rendered = 0usize;
        for assignable in &assignables {
            match assignable {
                Assignable::Assignment(a) => {
                    if a.is_skipped() {
                        continue;
                    }
                    if rendered > 0 {
                        builder.push_sql(",");
                    }
                    builder.build_column(None, &a.column)?;
                    builder.push_sql(" = ");
                    builder.render_expr(&a.value)?;
                }
                Assignable::Column(c) => {
                    check_qualifier(registry, &model, c)?;
                    let (Some(entity), Some(accessor)) = (self.value, accessor.as_ref()) else {
                        return Err(OrmError::validation(format!(
                            "column '{}' takes its value from the updated entity, but none was given",
                            c.name
                        )));
                    };
                    let field = model
                        .resolve(&c.name)
                        .ok_or_else(|| OrmError::unknown_column(c.name.as_str()))?;
                    let value = accessor.field(entity, field.field_name)?;
                    if field.ty.is_zero(&value) {
                        continue;
                    }
                    if rendered > 0 {
                        builder.push_sql(",");
                    }
                    builder.build_column(None, &c.name)?;
                    builder.push_sql(" = ");
                    builder.push_param(value);
                }
            }
            rendered += 1;
        }
        if rendered == 0 {
            return Err(OrmError::NoUpdatedColumns);
        }

        if !self.where_.is_empty() {
            builder.push_sql(" WHERE ");
            builder.build_predicates(&self.where_)?;
        }
        Ok(builder.finish())
    }
}

/// A bare column takes its value from the updated entity, so it may only be qualified by
/// that entity's own table.
fn check_qualifier(registry: &Registry, model: &TableModel, column: &Column) -> OrmResult<()> {
    match &column.table {
        None | Some(TableRef::Implicit) => Ok(()),
        Some(TableRef::Table(t)) if t.entity.model(registry)?.type_id() == model.type_id() => {
            Ok(())
        }
        Some(other) => Err(OrmError::UnsupportedTableType(format!(
            "{} qualifying column '{}' in an UPDATE of '{}'",
            other.kind(),
            column.name,
            model.type_name()
        ))),
    }
}

impl<'db, 'v, T: Entity, E: Executor> Updater<'db, 'v, T, E> {
    /// Build and execute; returns the number of affected rows.
    pub async fn exec(&self) -> OrmResult<u64> {
        let query = self.build()?;
        self.db.log_statement("update", &query);
        self.db.executor().execute_update(&query).await
    }
}
