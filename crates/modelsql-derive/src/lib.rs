//! Derive macros for modelsql
//!
//! Provides `#[derive(Entity)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod entity;

/// Derive `Entity` for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use modelsql::Entity;
///
/// #[derive(Debug, Default, Entity)]
/// #[orm(table = "users")]
/// struct User {
///     id: i64,
///     first_name: String,
///     #[orm(column = "email_address")]
///     email: Option<String>,
///     #[orm(skip)]
///     cache: Vec<String>,
/// }
/// ```
///
/// # Generated
///
/// - `descriptor()` - type name, table name and each mapped field's name, column,
///   `FieldType` and byte offset
/// - `get_field` / `set_field` - name-based field access
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (default: snake_case of the struct name)
/// - `#[orm(column = "name")]` - Column name (default: snake_case of the field name)
/// - `#[orm(skip)]` - Leave the field unmapped
///
/// Mapped field types must implement `modelsql::SqlType`.
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
