//! The metadata contract between a Rust struct and the registry.

use crate::error::OrmResult;
use crate::value::{FieldType, Value};

/// One named field of an entity, as reported by [`Entity::descriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name.
    pub name: &'static str,
    /// Explicit column name; `None` derives it from `name`.
    pub column: Option<&'static str>,
    pub ty: FieldType,
    /// Byte offset of the field inside the struct.
    pub offset: usize,
}

/// Shape of an entity type: its name, optional explicit table and mapped fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Rust type name without module path.
    pub type_name: &'static str,
    /// Explicit table name; `None` derives it from `type_name`.
    pub table: Option<&'static str>,
    pub fields: Vec<FieldDescriptor>,
}

/// A struct that maps to a table.
///
/// Normally implemented with `#[derive(Entity)]`:
///
/// ```ignore
/// use modelsql::Entity;
///
/// #[derive(Debug, Default, Entity)]
/// #[orm(table = "users")]
/// struct User {
///     id: i64,
///     #[orm(column = "mail")]
///     email: Option<String>,
/// }
/// ```
///
/// # Safety
///
/// Every [`FieldDescriptor`] returned by [`Entity::descriptor`] must carry the byte offset of
/// that field inside `Self` and a [`FieldType`] whose Rust type is exactly the field's
/// declared type. The direct-memory accessor reads and writes through those offsets.
pub unsafe trait Entity: Send + Sync + 'static {
    fn descriptor() -> EntityDescriptor;

    /// Read the field named `name` (Rust field name).
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Write the field named `name` (Rust field name).
    ///
    /// Fails with `UnknownField` or `TypeMismatch`; on error the entity is unchanged.
    fn set_field(&mut self, name: &str, value: Value) -> OrmResult<()>;
}
