//! Attribute parsing for the Entity derive macro.
//!
//! Handles struct-level `#[orm(table = "...")]` and field-level
//! `#[orm(column = "...")]` / `#[orm(skip)]`.

use syn::{Attribute, LitStr, Result};

/// Parsed struct-level attributes.
#[derive(Default)]
pub(super) struct StructAttr {
    pub table: Option<LitStr>,
}

/// Parsed field-level attributes.
#[derive(Default)]
pub(super) struct FieldAttr {
    pub column: Option<LitStr>,
    pub skip: bool,
}

/// Parse every `#[orm(...)]` on the struct.
pub(super) fn struct_attr(attrs: &[Attribute]) -> Result<StructAttr> {
    let mut out = StructAttr::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("orm")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("table name must not be empty"));
                }
                out.table = Some(value);
                Ok(())
            } else {
                Err(meta.error("unsupported struct attribute, expected `table = \"...\"`"))
            }
        })?;
    }
    Ok(out)
}

/// Parse every `#[orm(...)]` on a field.
pub(super) fn field_attr(attrs: &[Attribute]) -> Result<FieldAttr> {
    let mut out = FieldAttr::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("orm")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("column name must not be empty"));
                }
                out.column = Some(value);
                Ok(())
            } else if meta.path.is_ident("skip") {
                out.skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported field attribute, expected `column = \"...\"` or `skip`"))
            }
        })?;
    }
    Ok(out)
}
