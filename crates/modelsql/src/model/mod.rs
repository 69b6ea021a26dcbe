//! Table metadata derived from entity types.
//!
//! A [`TableModel`] is computed once per Rust type by the [`Registry`] and shared behind an
//! `Arc`. Table and column names default to the snake_case form of the type and field names
//! unless the entity (or a [`ModelOption`]) says otherwise.

mod entity;
mod registry;

pub use entity::{Entity, EntityDescriptor, FieldDescriptor};
pub use registry::Registry;

use crate::error::{OrmError, OrmResult};
use crate::value::FieldType;
use heck::ToSnakeCase;
use std::any::TypeId;
use std::alloc::Layout;
use std::collections::HashMap;

/// Mapping of one struct field to one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldModel {
    pub field_name: &'static str,
    pub column_name: String,
    pub ty: FieldType,
    /// Byte offset inside the struct, used by the direct-memory accessor.
    pub offset: usize,
    /// Position in declaration order.
    pub index: usize,
}

/// Mapping of a struct type to a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    type_id: TypeId,
    type_name: &'static str,
    table_name: String,
    fields: Vec<FieldModel>,
    by_column: HashMap<String, usize>,
    by_field: HashMap<&'static str, usize>,
}

/// Explicit metadata supplied at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOption {
    TableName(String),
    ColumnName { field: String, column: String },
}

impl ModelOption {
    pub fn table_name(name: impl Into<String>) -> Self {
        Self::TableName(name.into())
    }

    pub fn column_name(field: impl Into<String>, column: impl Into<String>) -> Self {
        Self::ColumnName {
            field: field.into(),
            column: column.into(),
        }
    }
}

impl TableModel {
    /// Derive the model for `T`, applying `options` on top of the entity's own metadata.
    pub(crate) fn derive<T: Entity>(options: &[ModelOption]) -> OrmResult<Self> {
        let desc = T::descriptor();
        let entity = desc.type_name;
        if desc.fields.is_empty() {
            return Err(OrmError::UnsupportedType(entity.to_string()));
        }

        let mut table_name = desc
            .table
            .map(str::to_string)
            .unwrap_or_else(|| entity.to_snake_case());
        let mut column_overrides: HashMap<&str, &str> = HashMap::new();
        for opt in options {
            match opt {
                ModelOption::TableName(name) => table_name = name.clone(),
                ModelOption::ColumnName { field, column } => {
                    if !desc.fields.iter().any(|f| f.name == field) {
                        return Err(OrmError::unknown_field(field.as_str()));
                    }
                    column_overrides.insert(field.as_str(), column.as_str());
                }
            }
        }
        if table_name.is_empty() {
            return Err(OrmError::invalid_model(entity, "empty table name"));
        }

        let layout = Layout::new::<T>();
        let mut fields = Vec::with_capacity(desc.fields.len());
        let mut by_column = HashMap::with_capacity(desc.fields.len());
        let mut by_field = HashMap::with_capacity(desc.fields.len());

        for (index, f) in desc.fields.iter().enumerate() {
            let column_name = match column_overrides.get(f.name) {
                Some(col) => (*col).to_string(),
                None => f
                    .column
                    .map(str::to_string)
                    .unwrap_or_else(|| f.name.to_snake_case()),
            };
            if f.name.is_empty() || column_name.is_empty() {
                return Err(OrmError::invalid_model(entity, "empty field or column name"));
            }
            check_field_layout(entity, f.name, f.ty, f.offset, layout)?;

            if by_field.insert(f.name, index).is_some() {
                return Err(OrmError::invalid_model(
                    entity,
                    format!("duplicate field '{}'", f.name),
                ));
            }
            if by_column.insert(column_name.clone(), index).is_some() {
                return Err(OrmError::invalid_model(
                    entity,
                    format!("duplicate column '{column_name}'"),
                ));
            }
            fields.push(FieldModel {
                field_name: f.name,
                column_name,
                ty: f.ty,
                offset: f.offset,
                index,
            });
        }

        Ok(Self {
            type_id: TypeId::of::<T>(),
            type_name: entity,
            table_name,
            fields,
            by_column,
            by_field,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Rust type name the model was derived from.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Whether this model was derived for `T`.
    pub fn is_for<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldModel] {
        &self.fields
    }

    /// Look up a field by Rust field name.
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.by_field.get(name).map(|&i| &self.fields[i])
    }

    /// Look up a field by column name.
    pub fn column(&self, name: &str) -> Option<&FieldModel> {
        self.by_column.get(name).map(|&i| &self.fields[i])
    }

    /// Look up by field name first, then by column name.
    pub fn resolve(&self, name: &str) -> Option<&FieldModel> {
        self.field(name).or_else(|| self.column(name))
    }
}

/// Type name without its module path: `app::models::User` becomes `User`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

/// A field must lie entirely inside the struct and be aligned for its type.
pub(crate) fn check_field_layout(
    entity: &'static str,
    name: &str,
    ty: FieldType,
    offset: usize,
    layout: Layout,
) -> OrmResult<()> {
    let field_layout = ty.layout();
    let end = offset.checked_add(field_layout.size());
    let fits = matches!(end, Some(end) if end <= layout.size());
    if !fits || offset % field_layout.align() != 0 {
        return Err(OrmError::invalid_model(
            entity,
            format!("field '{name}' ({ty}) at offset {offset} does not fit the struct layout"),
        ));
    }
    Ok(())
}
