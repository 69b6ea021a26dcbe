//! Shared SQL rendering for the statement builders.

use super::expr::{Aggregate, Column, Expr, Predicate, Selectable};
use super::select::SelectStatement;
use super::table::{EntityRef, Join, Subquery, TableRef};
use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::model::{Registry, TableModel};
use crate::query::Query;
use crate::value::Value;
use std::sync::Arc;

/// Accumulates SQL text and arguments for one statement.
///
/// Placeholders are emitted together with their argument, so the Nth placeholder always
/// binds the Nth argument, including across inlined subqueries.
pub(crate) struct Builder<'a> {
    sql: String,
    args: Vec<Value>,
    /// Model unqualified columns resolve against.
    model: Arc<TableModel>,
    registry: &'a Registry,
    dialect: &'a dyn Dialect,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        dialect: &'a dyn Dialect,
        model: Arc<TableModel>,
    ) -> Self {
        Self {
            sql: String::with_capacity(128),
            args: Vec::new(),
            model,
            registry,
            dialect,
        }
    }

    pub(crate) fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append a quoted identifier.
    pub(crate) fn quote(&mut self, ident: &str) {
        self.dialect.quote_into(&mut self.sql, ident);
    }

    /// Emit the next placeholder and bind `value` to it.
    pub(crate) fn push_param(&mut self, value: Value) {
        self.args.push(value);
        let placeholder = self.dialect.placeholder(self.args.len());
        self.sql.push_str(&placeholder);
    }

    fn entity_model(&self, entity: &EntityRef) -> OrmResult<Arc<TableModel>> {
        entity.model(self.registry)
    }

    /// Render a column reference, resolving `name` against the model the qualifier implies.
    pub(crate) fn build_column(&mut self, table: Option<&TableRef>, name: &str) -> OrmResult<()> {
        match table {
            None => {
                let field = self
                    .model
                    .resolve(name)
                    .ok_or_else(|| OrmError::unknown_column(name))?;
                self.dialect.quote_into(&mut self.sql, &field.column_name);
            }
            Some(TableRef::Implicit) => {
                let field = self
                    .model
                    .resolve(name)
                    .ok_or_else(|| OrmError::unknown_column(name))?;
                self.dialect.quote_into(&mut self.sql, self.model.table_name());
                self.sql.push('.');
                self.dialect.quote_into(&mut self.sql, &field.column_name);
            }
            Some(TableRef::Table(table)) => {
                let model = self.entity_model(&table.entity)?;
                let field = model
                    .resolve(name)
                    .ok_or_else(|| OrmError::unknown_column(name))?;
                let qualifier = table.alias.as_deref().unwrap_or(model.table_name());
                self.quote(qualifier);
                self.sql.push('.');
                self.quote(&field.column_name);
            }
            Some(join @ TableRef::Join(_)) => return Err(join_qualifier(join)),
            Some(TableRef::Subquery(sub)) => {
                let column = self
                    .subquery_column(sub, name)?
                    .ok_or_else(|| OrmError::unknown_column(name))?;
                self.quote(&sub.alias);
                self.sql.push('.');
                self.quote(&column);
            }
        }
        Ok(())
    }

    /// Name under which `sub` exposes `name`, if it does.
    fn subquery_column(&self, sub: &Subquery, name: &str) -> OrmResult<Option<String>> {
        let inner = self.entity_model(&sub.stmt.entity)?;
        if sub.stmt.columns.is_empty() {
            return Ok(inner.resolve(name).map(|f| f.column_name.clone()));
        }
        for selectable in &sub.stmt.columns {
            match selectable {
                Selectable::Column(c) if c.alias.is_none() => {
                    if let Some(column) = self.selected_column(&inner, c, name)? {
                        return Ok(Some(column));
                    }
                }
                other => {
                    if other.exposed_name() == Some(name) {
                        return Ok(Some(name.to_string()));
                    }
                }
            }
        }
        Ok(None)
    }

    /// The column an unaliased select-list entry `c` renders as, if `name` refers to it.
    ///
    /// `c` is resolved through its own qualifier, falling back to `inner`, the model of the
    /// subquery it belongs to.
    fn selected_column(
        &self,
        inner: &Arc<TableModel>,
        c: &Column,
        name: &str,
    ) -> OrmResult<Option<String>> {
        let model = match &c.table {
            None | Some(TableRef::Implicit) => Arc::clone(inner),
            Some(TableRef::Table(t)) => self.entity_model(&t.entity)?,
            Some(join @ TableRef::Join(_)) => return Err(join_qualifier(join)),
            Some(TableRef::Subquery(nested)) => {
                let Some(exposed) = self.subquery_column(nested, &c.name)? else {
                    return Ok(None);
                };
                let matches = exposed == name
                    || self.subquery_column(nested, name)?.as_deref() == Some(exposed.as_str());
                return Ok(matches.then_some(exposed));
            }
        };
        let Some(field) = model.resolve(&c.name) else {
            return Ok(None);
        };
        let matches = field.column_name == name
            || model.resolve(name).is_some_and(|f| f.index == field.index);
        Ok(matches.then(|| field.column_name.clone()))
    }

    /// AND the predicates left to right and render the result.
    ///
    /// `[a, b, c]` renders as `((a) AND (b)) AND (c)`; a single predicate renders bare.
    pub(crate) fn build_predicates(&mut self, predicates: &[Predicate]) -> OrmResult<()> {
        let Some((last, init)) = predicates.split_last() else {
            return Ok(());
        };
        if init.is_empty() {
            return self.render_predicate(last);
        }
        self.sql.push('(');
        self.build_predicates(init)?;
        self.sql.push_str(") AND (");
        self.render_predicate(last)?;
        self.sql.push(')');
        Ok(())
    }

    fn render_predicate(&mut self, p: &Predicate) -> OrmResult<()> {
        if let Some(left) = &p.left {
            self.render_operand(left)?;
            self.sql.push(' ');
        }
        self.sql.push_str(p.op.as_str());
        self.sql.push(' ');
        self.render_operand(&p.right)
    }

    /// Predicate operands are parenthesized; anything else renders as is.
    fn render_operand(&mut self, expr: &Expr) -> OrmResult<()> {
        match expr {
            Expr::Predicate(p) => {
                self.sql.push('(');
                self.render_predicate(p)?;
                self.sql.push(')');
                Ok(())
            }
            other => self.render_expr(other),
        }
    }

    pub(crate) fn render_expr(&mut self, expr: &Expr) -> OrmResult<()> {
        match expr {
            Expr::Column(c) => self.build_column(c.table.as_ref(), &c.name),
            Expr::Value(v) => {
                self.push_param(v.clone());
                Ok(())
            }
            Expr::Predicate(p) => self.render_predicate(p),
            Expr::Aggregate(a) => self.render_aggregate(a, false),
            Expr::Subquery(sub) => self.render_subquery(&sub.stmt),
            Expr::SubqueryExpr(e) => {
                self.sql.push_str(e.keyword);
                self.sql.push(' ');
                self.render_subquery(&e.sub.stmt)
            }
        }
    }

    fn render_aggregate(&mut self, agg: &Aggregate, with_alias: bool) -> OrmResult<()> {
        self.sql.push_str(agg.func);
        self.sql.push('(');
        match &agg.arg {
            Some(c) => self.build_column(c.table.as_ref(), &c.name)?,
            None => self.sql.push('*'),
        }
        self.sql.push(')');
        if with_alias {
            self.build_alias(agg.alias.as_deref());
        }
        Ok(())
    }

    fn build_alias(&mut self, alias: Option<&str>) {
        if let Some(alias) = alias {
            self.sql.push_str(" AS ");
            self.quote(alias);
        }
    }

    pub(crate) fn build_table(&mut self, table: &TableRef) -> OrmResult<()> {
        match table {
            TableRef::Implicit => {
                self.dialect.quote_into(&mut self.sql, self.model.table_name());
            }
            TableRef::Table(t) => {
                let model = self.entity_model(&t.entity)?;
                self.quote(model.table_name());
                self.build_alias(t.alias.as_deref());
            }
            TableRef::Join(join) => self.build_join(join)?,
            TableRef::Subquery(sub) => {
                self.render_subquery(&sub.stmt)?;
                self.build_alias(Some(&sub.alias));
            }
        }
        Ok(())
    }

    fn build_join(&mut self, join: &Join) -> OrmResult<()> {
        self.sql.push('(');
        self.build_table(&join.left)?;
        self.sql.push(' ');
        self.sql.push_str(join.kind.as_str());
        self.sql.push(' ');
        self.build_table(&join.right)?;
        if !join.on.is_empty() {
            self.sql.push_str(" ON ");
            self.build_predicates(&join.on)?;
        } else if !join.using.is_empty() {
            self.sql.push_str(" USING (");
            for (i, name) in join.using.iter().enumerate() {
                if i > 0 {
                    self.sql.push(',');
                }
                let column = match self.join_column(&join.left, name)? {
                    Some(column) => column,
                    None => self
                        .join_column(&join.right, name)?
                        .ok_or_else(|| OrmError::unknown_column(name.as_str()))?,
                };
                self.quote(&column);
            }
            self.sql.push(')');
        }
        self.sql.push(')');
        Ok(())
    }

    /// Column name `name` maps to in one side of a join.
    fn join_column(&self, table: &TableRef, name: &str) -> OrmResult<Option<String>> {
        match table {
            TableRef::Implicit => Ok(self.model.resolve(name).map(|f| f.column_name.clone())),
            TableRef::Table(t) => {
                let model = self.entity_model(&t.entity)?;
                Ok(model.resolve(name).map(|f| f.column_name.clone()))
            }
            TableRef::Join(join) => match self.join_column(&join.left, name)? {
                Some(column) => Ok(Some(column)),
                None => self.join_column(&join.right, name),
            },
            TableRef::Subquery(sub) => self.subquery_column(sub, name),
        }
    }

    /// `(SELECT ...)` with the inner arguments bound in place.
    fn render_subquery(&mut self, stmt: &SelectStatement) -> OrmResult<()> {
        self.sql.push('(');
        self.render_select(stmt)?;
        self.sql.push(')');
        Ok(())
    }

    /// Render `stmt` without terminator, resolving its columns against its own model.
    pub(crate) fn render_select(&mut self, stmt: &SelectStatement) -> OrmResult<()> {
        let inner = self.entity_model(&stmt.entity)?;
        let outer = std::mem::replace(&mut self.model, inner);
        let result = self.render_select_body(stmt);
        self.model = outer;
        result
    }

    fn render_select_body(&mut self, stmt: &SelectStatement) -> OrmResult<()> {
        self.sql.push_str("SELECT ");
        if stmt.columns.is_empty() {
            self.sql.push('*');
        }
        for (i, selectable) in stmt.columns.iter().enumerate() {
            if i > 0 {
                self.sql.push(',');
            }
            match selectable {
                Selectable::Column(c) => {
                    self.build_column(c.table.as_ref(), &c.name)?;
                    self.build_alias(c.alias.as_deref());
                }
                Selectable::Aggregate(a) => self.render_aggregate(a, true)?,
            }
        }

        self.sql.push_str(" FROM ");
        self.build_table(&stmt.table)?;

        if !stmt.where_.is_empty() {
            self.sql.push_str(" WHERE ");
            self.build_predicates(&stmt.where_)?;
        }
        if !stmt.group_by.is_empty() {
            self.sql.push_str(" GROUP BY ");
            for (i, c) in stmt.group_by.iter().enumerate() {
                if i > 0 {
                    self.sql.push(',');
                }
                self.build_column(c.table.as_ref(), &c.name)?;
            }
        }
        if !stmt.having.is_empty() {
            self.sql.push_str(" HAVING ");
            self.build_predicates(&stmt.having)?;
        }
        if stmt.limit > 0 {
            self.sql.push_str(" LIMIT ");
            self.push_param(Value::I64(saturating_i64(stmt.limit)));
        }
        if stmt.offset > 0 {
            self.sql.push_str(" OFFSET ");
            self.push_param(Value::I64(saturating_i64(stmt.offset)));
        }
        Ok(())
    }

    /// Terminate the statement.
    pub(crate) fn finish(mut self) -> Query {
        self.sql.push(';');
        Query::new(self.sql, self.args)
    }
}

fn join_qualifier(join: &TableRef) -> OrmError {
    OrmError::UnsupportedTableType(format!("{} used as a column qualifier", join.kind()))
}

fn saturating_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
