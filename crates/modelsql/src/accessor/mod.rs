//! Reading and writing entity fields by name.
//!
//! Two interchangeable strategies exist:
//!
//! - [`ReflectiveAccessor`] goes through the name-based [`Entity::get_field`] /
//!   [`Entity::set_field`] code generated by the derive.
//! - [`DirectAccessor`] reads and writes at the byte offsets recorded in the [`TableModel`].
//!
//! The strategy is picked once, when the accessor is built, and both produce the same
//! results and errors for every input.

mod direct;
mod reflect;

pub use direct::DirectAccessor;
pub use reflect::ReflectiveAccessor;

use crate::error::{OrmError, OrmResult};
use crate::model::{Entity, FieldModel, TableModel, short_type_name};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name-based access to the mapped fields of `T`.
///
/// `name` may be a Rust field name or a column name.
pub trait ValueAccessor<T>: Send + Sync {
    /// Model the accessor was built for.
    fn model(&self) -> &Arc<TableModel>;

    fn field(&self, entity: &T, name: &str) -> OrmResult<Value>;

    fn set_field(&self, entity: &mut T, name: &str, value: Value) -> OrmResult<()>;
}

/// Which [`ValueAccessor`] implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorStrategy {
    Reflective,
    #[default]
    Direct,
}

impl AccessorStrategy {
    /// Build an accessor for `T` over `model`.
    ///
    /// Fails with `ModelMismatch` when `model` was derived for another type.
    pub fn accessor<T: Entity>(
        self,
        model: Arc<TableModel>,
    ) -> OrmResult<Box<dyn ValueAccessor<T>>> {
        let accessor: Box<dyn ValueAccessor<T>> = match self {
            AccessorStrategy::Reflective => Box::new(ReflectiveAccessor::new::<T>(model)?),
            AccessorStrategy::Direct => Box::new(DirectAccessor::<T>::new(model)?),
        };
        Ok(accessor)
    }
}

fn ensure_model_for<T: 'static>(model: &TableModel) -> OrmResult<()> {
    if model.is_for::<T>() {
        Ok(())
    } else {
        Err(OrmError::ModelMismatch {
            expected: model.type_name(),
            found: short_type_name::<T>(),
        })
    }
}

fn lookup<'m>(model: &'m TableModel, name: &str) -> OrmResult<&'m FieldModel> {
    model.resolve(name).ok_or_else(|| OrmError::unknown_field(name))
}
